//! Application Factory
//!
//! Builds an [`AppState`] over the storage backend named in the
//! configuration.

use crate::core::app_state::AppState;
use crate::core::config::{Config, StorageType};
use crate::storage::{FileStorage, MemoryStorage, Store};
use crate::types::{Result, StorageError};
use crate::log_info;

/// AppState over whichever backend was configured
pub enum ConfiguredAppState {
    /// One JSON file per document
    File {
        /// The application state with FileStorage
        app_state: AppState<FileStorage>,
    },
    /// Process-local documents
    Memory {
        /// The application state with MemoryStorage
        app_state: AppState<MemoryStorage>,
    },
}

impl ConfiguredAppState {
    /// Configuration the state was built from
    pub fn config(&self) -> &Config {
        match self {
            ConfiguredAppState::File { app_state } => &app_state.config,
            ConfiguredAppState::Memory { app_state } => &app_state.config,
        }
    }

    /// Get the HTTP address from config
    pub fn http_addr(&self) -> std::net::SocketAddr {
        self.config().server.http_addr
    }
}

/// Create AppState based on configuration
///
/// The file backend's data directory is created here so a fresh
/// deployment starts with an empty root collection.
pub fn create_app_state(config: Config) -> Result<ConfiguredAppState> {
    log_info!("Creating AppState with storage type: {:?}", config.storage.storage_type);
    let semantics = config.storage.put_semantics;

    match config.storage.storage_type {
        StorageType::File => {
            let data_dir = config.storage.data_dir.clone();
            std::fs::create_dir_all(&data_dir).map_err(|e| StorageError::io(&data_dir, e))?;
            log_info!("FileStorage rooted at {}", data_dir.display());

            let store = Store::new(FileStorage::new(data_dir), semantics);
            Ok(ConfiguredAppState::File {
                app_state: AppState::new(store, config),
            })
        }
        StorageType::Memory => {
            log_info!("Initializing MemoryStorage");
            let store = Store::new(MemoryStorage::new(), semantics);
            Ok(ConfiguredAppState::Memory {
                app_state: AppState::new(store, config),
            })
        }
    }
}
