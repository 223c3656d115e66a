pub mod client;
pub mod schema;

pub use client::{UP_API_ADDRESS, UpClient};
