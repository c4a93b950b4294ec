use std::{fs, io::ErrorKind, path::PathBuf};

use toml_edit::{value, DocumentMut};

use crate::infra::{contracts::PreferenceStore, error::AppError};

/// Store holding the login marker written once the chat library is authorized.
pub const LOGIN_STORE: &str = "LoginPref";
/// Store holding user-facing app preferences.
pub const APP_SETTINGS_STORE: &str = "app_settings";

pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";
pub const KEY_SHOW_MESSAGE_PREVIEW: &str = "show_message_preview";
pub const KEY_CHAT_LIST_WIDTH: &str = "chat_list_width";
pub const KEY_DATA_COLLECTION: &str = "data_collection";

/// One TOML file per named store under `dir`.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    dir: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn store_path(&self, store: &str) -> PathBuf {
        self.dir.join(format!("{store}.toml"))
    }

    fn read_document(&self, store: &str) -> Result<DocumentMut, AppError> {
        let path = self.store_path(store);
        match fs::read_to_string(&path) {
            Ok(raw) => raw
                .parse::<DocumentMut>()
                .map_err(|source| AppError::PreferenceParse { path, source }),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(DocumentMut::new()),
            Err(source) => Err(AppError::PreferenceRead { path, source }),
        }
    }

    fn write_document(&self, store: &str, document: &DocumentMut) -> Result<(), AppError> {
        let path = self.store_path(store);
        fs::create_dir_all(&self.dir).map_err(|source| AppError::PreferenceWrite {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, document.to_string())
            .map_err(|source| AppError::PreferenceWrite { path, source })
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get_bool(&self, store: &str, key: &str) -> Result<Option<bool>, AppError> {
        let document = self.read_document(store)?;
        Ok(document.get(key).and_then(|item| item.as_bool()))
    }

    fn get_f64(&self, store: &str, key: &str) -> Result<Option<f64>, AppError> {
        let document = self.read_document(store)?;
        Ok(document.get(key).and_then(|item| {
            item.as_float()
                .or_else(|| item.as_integer().map(|number| number as f64))
        }))
    }

    fn set_bool(&mut self, store: &str, key: &str, flag: bool) -> Result<(), AppError> {
        let mut document = self.read_document(store)?;
        document[key] = value(flag);
        self.write_document(store, &document)
    }

    fn set_f64(&mut self, store: &str, key: &str, number: f64) -> Result<(), AppError> {
        let mut document = self.read_document(store)?;
        document[key] = value(number);
        self.write_document(store, &document)
    }

    fn clear(&mut self, store: &str) -> Result<(), AppError> {
        let path = self.store_path(store);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AppError::PreferenceWrite { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_reads_as_empty() {
        let root = tempfile::tempdir().expect("temp dir");
        let store = TomlPreferenceStore::new(root.path().join("prefs"));

        assert_eq!(
            store
                .get_bool(APP_SETTINGS_STORE, KEY_SHOW_MESSAGE_PREVIEW)
                .expect("read should succeed"),
            None
        );
    }

    #[test]
    fn values_persist_across_instances() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut store = TomlPreferenceStore::new(root.path().join("prefs"));

        store
            .set_bool(APP_SETTINGS_STORE, KEY_SHOW_MESSAGE_PREVIEW, false)
            .expect("write bool");
        store
            .set_f64(APP_SETTINGS_STORE, KEY_CHAT_LIST_WIDTH, 45.0)
            .expect("write float");

        let reopened = TomlPreferenceStore::new(root.path().join("prefs"));
        assert_eq!(
            reopened
                .get_bool(APP_SETTINGS_STORE, KEY_SHOW_MESSAGE_PREVIEW)
                .expect("read bool"),
            Some(false)
        );
        assert_eq!(
            reopened
                .get_f64(APP_SETTINGS_STORE, KEY_CHAT_LIST_WIDTH)
                .expect("read float"),
            Some(45.0)
        );
    }

    #[test]
    fn integer_values_read_as_floats() {
        let root = tempfile::tempdir().expect("temp dir");
        let store = TomlPreferenceStore::new(root.path());
        fs::write(root.path().join("app_settings.toml"), "chat_list_width = 40\n")
            .expect("fixture should be writable");

        assert_eq!(
            store
                .get_f64(APP_SETTINGS_STORE, KEY_CHAT_LIST_WIDTH)
                .expect("read float"),
            Some(40.0)
        );
    }

    #[test]
    fn clear_drops_only_the_named_store() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut store = TomlPreferenceStore::new(root.path());
        store
            .set_bool(LOGIN_STORE, KEY_IS_LOGGED_IN, true)
            .expect("write login");
        store
            .set_bool(APP_SETTINGS_STORE, KEY_DATA_COLLECTION, true)
            .expect("write settings");

        store.clear(LOGIN_STORE).expect("clear should succeed");
        store.clear(LOGIN_STORE).expect("clearing twice is a no-op");

        assert_eq!(
            store.get_bool(LOGIN_STORE, KEY_IS_LOGGED_IN).expect("read"),
            None
        );
        assert_eq!(
            store
                .get_bool(APP_SETTINGS_STORE, KEY_DATA_COLLECTION)
                .expect("read"),
            Some(true)
        );
    }

    #[test]
    fn malformed_store_reports_parse_error() {
        let root = tempfile::tempdir().expect("temp dir");
        let store = TomlPreferenceStore::new(root.path());
        fs::write(root.path().join("LoginPref.toml"), "is_logged_in = = true")
            .expect("fixture should be writable");

        let error = store
            .get_bool(LOGIN_STORE, KEY_IS_LOGGED_IN)
            .expect_err("malformed store must fail");

        assert!(matches!(error, AppError::PreferenceParse { .. }));
    }
}
