pub mod core;
pub mod mock;
pub mod observability;
pub mod up;
