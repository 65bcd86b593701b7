//! Application State Management
//!
//! Wires configuration, logging and the storage service together. The service
//! sits behind a single mutex so a multi-threaded host runs every operation,
//! including its capacity check and insert, as one critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use log::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::logging;
use crate::service::StorageService;

/// Application state containing the storage service and its configuration
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Mutex<StorageService>>,
    pub config: AppConfig,
}

impl AppState {
    /// Load configuration, install logging and build the service
    pub fn bootstrap() -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::load()?;
        logging::init(&config.logging)?;
        Ok(Self::from_config(config)?)
    }

    /// Create application state from configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        info!("Initializing application state with configuration");
        let service = StorageService::from_config(&config.service)?;
        Ok(Self {
            storage: Arc::new(Mutex::new(service)),
            config,
        })
    }

    /// Create application state for testing with an empty service
    pub fn new_for_testing() -> Self {
        Self {
            storage: Arc::new(Mutex::new(StorageService::new())),
            config: AppConfig::default(),
        }
    }

    /// Lock the service. A panic in another holder does not leave the
    /// service half-updated, since operations validate before mutating.
    pub fn lock(&self) -> MutexGuard<'_, StorageService> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the service
    pub fn with_storage<R>(&self, f: impl FnOnce(&mut StorageService) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}
