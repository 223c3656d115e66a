pub mod errors;
pub mod events;
pub mod ports;
pub mod types;
