use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{domain::settings::MediaDir, infra::error::AppError};

const APP_DIR_NAME: &str = "telewatch";
const TDLIB_DIR_NAME: &str = "tdlib";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// App-private files; holds the chat library database.
    pub files_dir: PathBuf,
    /// App-specific external storage; holds the chat library's downloaded media.
    pub external_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    /// Resolves the layout under `root` when given, otherwise under the platform directories.
    pub fn resolve(root: Option<&Path>) -> Result<Self, AppError> {
        if let Some(root) = root {
            return Ok(Self::under_root(root));
        }

        let config_base = dirs::config_dir().ok_or_else(|| missing_base("config"))?;
        let cache_base = dirs::cache_dir().ok_or_else(|| missing_base("cache"))?;
        let data_base = dirs::data_dir().ok_or_else(|| missing_base("data"))?;
        let data_dir = data_base.join(APP_DIR_NAME);

        Ok(Self {
            config_dir: config_base.join(APP_DIR_NAME),
            cache_dir: cache_base.join(APP_DIR_NAME),
            files_dir: data_dir.join("files"),
            external_dir: data_dir.join("external"),
            log_dir: data_dir.join("logs"),
        })
    }

    pub fn under_root(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            files_dir: root.join("files"),
            external_dir: root.join("external"),
            log_dir: root.join("logs"),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [
            &self.config_dir,
            &self.cache_dir,
            &self.files_dir,
            &self.external_dir,
            &self.log_dir,
        ] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn prefs_dir(&self) -> PathBuf {
        self.config_dir.join("prefs")
    }

    pub fn instance_lock_file(&self) -> PathBuf {
        self.config_dir.join("telewatch.lock")
    }

    pub fn tdlib_database_dir(&self) -> PathBuf {
        self.files_dir.join(TDLIB_DIR_NAME)
    }

    pub fn tdlib_files_dir(&self) -> PathBuf {
        self.external_dir.join(TDLIB_DIR_NAME)
    }

    pub fn media_dir(&self, media: MediaDir) -> PathBuf {
        self.tdlib_files_dir().join(media.dir_name())
    }
}

fn missing_base(kind: &str) -> AppError {
    AppError::StoragePathResolution {
        details: format!("unable to resolve platform {kind} directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_dirs_live_under_external_tdlib_tree() {
        let layout = StorageLayout::under_root(Path::new("/srv/tw"));

        assert_eq!(
            layout.media_dir(MediaDir::Thumbnails),
            PathBuf::from("/srv/tw/external/tdlib/thumbnails")
        );
        assert_eq!(
            layout.media_dir(MediaDir::Temp),
            PathBuf::from("/srv/tw/external/tdlib/temp")
        );
    }

    #[test]
    fn logs_survive_cache_and_files_resets() {
        let layout = StorageLayout::under_root(Path::new("/srv/tw"));

        assert!(!layout.log_dir.starts_with(&layout.cache_dir));
        assert!(!layout.log_dir.starts_with(&layout.files_dir));
        assert!(layout.prefs_dir().starts_with(&layout.config_dir));
    }

    #[test]
    fn ensure_dirs_creates_every_directory() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());

        layout.ensure_dirs().expect("dirs should be created");

        assert!(layout.cache_dir.is_dir());
        assert!(layout.files_dir.is_dir());
        assert!(layout.external_dir.is_dir());
        assert!(layout.log_dir.is_dir());
    }
}
