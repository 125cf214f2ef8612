//! The fixed curriculum seeded into the catalog.

use super::models::Course;

/// `(name, code, year, semester, description)` in seeding order.
const CURRICULUM: &[(&str, &str, i64, i64, &str)] = &[
    // Year 1, semester 1
    ("C Language", "CLANG", 1, 1, "Fundamentals of C programming language"),
    ("Internet of Things", "IOT", 1, 1, "Introduction to IoT concepts and applications"),
    ("Communication", "COMM1", 1, 1, "Basic communication skills"),
    ("Vedic Math", "VMATH", 1, 1, "Ancient Indian mathematical techniques"),
    ("Discrete Math", "DMATH", 1, 1, "Mathematical structures discrete rather than continuous"),
    ("Human Value", "HVALUE", 1, 1, "Ethics and human values education"),
    // Year 1, semester 2
    ("Digital Design and Computer Architecture", "DDCA", 1, 2, "Digital logic and computer architecture fundamentals"),
    ("Basic Electrical and Electronic Circuits", "BEEC", 1, 2, "Basic electrical and electronic circuit analysis"),
    ("Data Structure", "DS", 1, 2, "Data organization and management techniques"),
    ("Linear Algebra", "LINALG", 1, 2, "Vector spaces and linear transformations"),
    ("Communication", "COMM2", 1, 2, "Advanced communication skills"),
    ("Indian Constitution", "ICONST", 1, 2, "Study of Indian constitutional framework"),
    ("SIL", "SIL", 1, 2, "Service and Inclusive Leadership"),
    // Year 2, semester 1
    ("Database Management Systems", "DBMS", 2, 1, "Database design and management systems"),
    ("Computer Network", "CN", 2, 1, "Computer networking fundamentals"),
    ("Front End", "FE", 2, 1, "Front-end web development technologies"),
    ("Object Oriented Programming using Java", "OOPS", 2, 1, "Object-oriented programming concepts with Java"),
    ("Artificial Intelligence and Machine Learning", "AIML", 2, 1, "Introduction to AI and ML algorithms"),
    ("Data Analytics", "DA", 2, 1, "Data analysis and visualization techniques"),
    ("Processor and Controller", "PC", 2, 1, "Microprocessors and microcontrollers"),
    ("Mathematical Optimization", "MO", 2, 1, "Optimization techniques in mathematics"),
    ("Japanese Language", "JL", 2, 1, "Japanese language basics"),
    // Year 2, semester 2
    ("Operating System", "OS", 2, 2, "Operating system concepts and design"),
    ("Probability", "PROB", 2, 2, "Probability theory and applications"),
];

/// Unsaved course records for the whole curriculum, in seeding order.
pub fn curriculum() -> Vec<Course> {
    CURRICULUM
        .iter()
        .map(|&(name, code, year, semester, description)| {
            Course::new(name, code, year, semester, description)
        })
        .collect()
}
