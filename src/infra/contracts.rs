use std::time::Duration;

use anyhow::Result;

use crate::infra::{config::AppConfig, error::AppError};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}

/// Key-value preferences grouped into named stores.
pub trait PreferenceStore {
    fn get_bool(&self, store: &str, key: &str) -> Result<Option<bool>, AppError>;
    fn get_f64(&self, store: &str, key: &str) -> Result<Option<f64>, AppError>;
    fn set_bool(&mut self, store: &str, key: &str, value: bool) -> Result<(), AppError>;
    fn set_f64(&mut self, store: &str, key: &str, value: f64) -> Result<(), AppError>;
    /// Drops every key of the store.
    fn clear(&mut self, store: &str) -> Result<(), AppError>;
}

/// Restarts the process after a delay. Scheduling cannot be cancelled.
pub trait Relauncher {
    fn schedule(&self, delay: Duration);
}
