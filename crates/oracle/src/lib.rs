pub mod deployment;
pub mod osm;
