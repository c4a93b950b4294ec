use std::time::Duration;

use crate::infra::contracts::Relauncher;

#[cfg(test)]
use std::{cell::RefCell, collections::HashMap};

#[cfg(test)]
use anyhow::Result;

#[cfg(test)]
use crate::infra::{
    config::AppConfig,
    contracts::{ConfigAdapter, ExternalOpener, PreferenceStore},
    error::AppError,
};

/// Relauncher for headless commands, which exit on their own.
#[derive(Debug, Clone, Default)]
pub struct NoopRelauncher;

impl Relauncher for NoopRelauncher {
    fn schedule(&self, delay: Duration) {
        tracing::debug!(
            delay_ms = delay.as_millis() as u64,
            "relaunch skipped outside the shell"
        );
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

#[cfg(test)]
impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: RefCell<Vec<String>>,
}

#[cfg(test)]
impl ExternalOpener for RecordingOpener {
    fn open(&self, target: &str) -> Result<()> {
        self.opened.borrow_mut().push(target.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRelauncher {
    pub scheduled: RefCell<Vec<Duration>>,
}

#[cfg(test)]
impl Relauncher for RecordingRelauncher {
    fn schedule(&self, delay: Duration) {
        self.scheduled.borrow_mut().push(delay);
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredValue {
    Bool(bool),
    Float(f64),
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    pub values: HashMap<(String, String), StoredValue>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryPreferenceStore {
    fn write(&mut self, store: &str, key: &str, value: StoredValue) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::PreferenceWrite {
                path: format!("{store}.toml").into(),
                source: std::io::Error::other("write rejected"),
            });
        }

        self.values.insert((store.to_owned(), key.to_owned()), value);
        Ok(())
    }

    fn read(&self, store: &str, key: &str) -> Option<StoredValue> {
        self.values.get(&(store.to_owned(), key.to_owned())).copied()
    }

    pub fn store_len(&self, store: &str) -> usize {
        self.values.keys().filter(|(name, _)| name == store).count()
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, store: &str, key: &str) -> Result<Option<bool>, AppError> {
        Ok(match self.read(store, key) {
            Some(StoredValue::Bool(flag)) => Some(flag),
            _ => None,
        })
    }

    fn get_f64(&self, store: &str, key: &str) -> Result<Option<f64>, AppError> {
        Ok(match self.read(store, key) {
            Some(StoredValue::Float(number)) => Some(number),
            _ => None,
        })
    }

    fn set_bool(&mut self, store: &str, key: &str, value: bool) -> Result<(), AppError> {
        self.write(store, key, StoredValue::Bool(value))
    }

    fn set_f64(&mut self, store: &str, key: &str, value: f64) -> Result<(), AppError> {
        self.write(store, key, StoredValue::Float(value))
    }

    fn clear(&mut self, store: &str) -> Result<(), AppError> {
        self.values.retain(|(name, _), _| name != store);
        Ok(())
    }
}
