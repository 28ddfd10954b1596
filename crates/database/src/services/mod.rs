pub mod availability;
pub mod booking;
pub mod import;
pub mod login;
