use std::path::Path;

use crate::{
    infra::{
        self, config::AppConfig, config::FileConfigAdapter, contracts::ConfigAdapter,
        error::AppError, storage_layout::StorageLayout,
    },
    usecases::context::AppContext,
};

/// Loads config, prepares the storage tree and starts file logging.
pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = load_config(&FileConfigAdapter::new(config_path))?;
    let mut context = build_context(config)?;

    let guard = infra::logging::init(&context.config.logging, &context.layout.log_dir)?;
    context.attach_log_guard(guard);
    tracing::info!(
        config_dir = %context.layout.config_dir.display(),
        "telewatch bootstrapped"
    );

    Ok(context)
}

fn load_config(adapter: &dyn ConfigAdapter) -> Result<AppConfig, AppError> {
    adapter.load().map_err(AppError::Other)
}

fn build_context(config: AppConfig) -> Result<AppContext, AppError> {
    let layout = StorageLayout::resolve(config.storage.root.as_deref())?;
    layout.ensure_dirs()?;

    Ok(AppContext::new(config, layout))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::infra::stubs::StubConfigAdapter;

    #[test]
    fn stub_adapter_yields_default_config() {
        let config = load_config(&StubConfigAdapter).expect("config should load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = load_config(&FileConfigAdapter::new(Some(Path::new(
            "./missing-config.toml",
        ))))
        .expect("defaults should load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn context_creates_storage_tree_under_configured_root() {
        let root = tempfile::tempdir().expect("temp dir");
        let config_path = root.path().join("config.toml");
        let storage_root = root.path().join("data");
        fs::write(
            &config_path,
            format!("[storage]\nroot = {:?}\n", storage_root.display().to_string()),
        )
        .expect("config should be writable");

        let config = load_config(&FileConfigAdapter::new(Some(&config_path))).expect("config");
        let context = build_context(config).expect("context should build");

        assert_eq!(context.layout, StorageLayout::under_root(&storage_root));
        assert!(context.layout.cache_dir.is_dir());
        assert!(context.layout.log_dir.is_dir());
    }
}
