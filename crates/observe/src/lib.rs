//! Logging initialization shared by the binaries of this workspace.
pub mod config;
pub mod tracing;

pub use config::Config;
