//! Table store for the course library

pub mod db;
pub mod error;
pub mod schema;

pub use db::TableStore;
pub use error::StoreError;
pub use schema::*;
