//! Domain types for finding free campus rooms.
//!
//! [`request::normalize`] turns the search form into a [`request::BookingRequest`],
//! and [`availability::find_available`] filters a snapshot of rooms and their
//! recurring bookings down to the rooms free for that request.

pub mod availability;
pub mod days;
pub mod request;
pub mod room;
pub mod semester;
pub mod time_range;
