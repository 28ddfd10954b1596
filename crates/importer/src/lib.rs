//! Loads reference data (semesters, rooms and recurring bookings) from CSV
//! exports into the database.

pub mod error;
pub mod index;
pub mod rows;
