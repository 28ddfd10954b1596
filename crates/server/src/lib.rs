//! HTTP service for finding and booking free campus rooms.

pub mod auth;
pub mod config;
pub mod demo;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;
