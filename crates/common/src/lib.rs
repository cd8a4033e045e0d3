pub mod config;
pub mod error;
pub mod numeric;
pub mod types;
