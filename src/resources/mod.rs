//! Typed access to the recipe/ingredient backend.

pub mod client;
pub mod error;
pub mod ingredients;
pub mod recipes;

pub use client::{ConnectionStatus, ResourceClient};
pub use error::ResourceError;
pub use ingredients::ImageUpload;
