//! Application state shared by every request handler

use std::sync::Arc;

use crate::core::config::Config;
use crate::storage::{StorageImpl, Store};

/// Central application state holding the store and configuration
pub struct AppState<S: StorageImpl> {
    /// Document store over the configured backend
    pub store: Arc<Store<S>>,

    /// Application configuration
    pub config: Config,
}

// Clone without requiring S: Clone; only the Arc is cloned
impl<S: StorageImpl> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: StorageImpl> AppState<S> {
    /// Create a new AppState over an initialised store
    pub fn new(store: Store<S>, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }
}
