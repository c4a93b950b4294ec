use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage paths: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory at {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read preference store at {path}: {source}")]
    PreferenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preference store at {path}: {source}")]
    PreferenceParse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("failed to write preference store at {path}: {source}")]
    PreferenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("another telewatch instance holds the lock at {path}")]
    InstanceLocked { path: PathBuf },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
