pub mod client;
pub mod queries;
pub mod snapshot;

pub use client::VulcanizeClient;
pub use snapshot::load_snapshot;
