pub mod config;
pub mod error;
pub mod index;
pub mod telemetry;
