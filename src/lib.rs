//! Library exports for pantrychef, shared between the binary and tests.

pub mod config;
pub mod models;
pub mod providers;
pub mod resources;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
