//! Core application logic and configuration

/// Application configuration
pub mod config;

/// Application state management
pub mod app_state;

/// Factory for configured app state
pub mod factory;

/// Logging macros
pub mod logging;

// Re-export commonly used items
pub use config::{load_config, load_config_or_default, Config, LoggingConfig, ServerConfig, StorageConfig, StorageType};
pub use app_state::AppState;
pub use factory::{create_app_state, ConfiguredAppState};
