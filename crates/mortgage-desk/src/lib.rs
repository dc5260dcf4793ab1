pub mod admin;
pub mod config;
pub mod desk;
pub mod error;
pub mod lending;
pub mod pricing;
pub mod registry;
pub mod telemetry;
