/// Database configuration and connection management
pub mod database;

/// Default work schedule loading from config.toml
pub mod schedule;

/// Privileged actor identifiers from environment variables
pub mod admins;
