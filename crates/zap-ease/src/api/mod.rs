pub mod config;
pub mod target;
pub mod types;
