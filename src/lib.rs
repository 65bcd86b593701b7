// src/lib.rs

pub mod app_state;
pub mod backup;
pub mod config;
pub mod error;
pub mod logging;
pub mod quota;
pub mod service;
pub mod storage;

pub use error::{Result, StorageError};
pub use service::{CloudStorage, StorageService};
