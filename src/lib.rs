//! Course Library - a curriculum catalog on a small table store
//!
//! The library keeps course and student records in a schema-checked table
//! store and seeds a fixed curriculum that can be browsed by academic year
//! and semester.

pub mod catalog;
pub mod config;
pub mod storage;
