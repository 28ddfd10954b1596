//! Storage for rooms, their recurring bookings and user reservations.

mod convert;

pub mod db;
pub mod entities;
pub mod services;
pub mod store;
