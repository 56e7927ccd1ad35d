pub mod admin;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod submissions;
pub mod telemetry;
