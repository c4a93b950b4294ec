use std::{
    sync::mpsc::{self, Sender},
    time::Duration,
};

use anyhow::Result;

use crate::{
    cli::{Cli, ClearTarget, Command},
    domain::{self, shell_state::ShellExit},
    infra::{
        self,
        contracts::PreferenceStore,
        instance_lock::InstanceLock,
        opener::SystemOpener,
        preferences::{TomlPreferenceStore, KEY_IS_LOGGED_IN, LOGIN_STORE},
        relaunch::{relaunch_current_process, TimerRelauncher},
        storage_layout::StorageLayout,
        stubs::NoopRelauncher,
    },
    telegram::{self, tdlib::AuthorizationStatus, TelegramAdapter},
    ui,
    usecases::{
        self, bootstrap,
        context::AppContext,
        shell::DefaultShellOrchestrator,
        storage_cleanup::{self, ClearOutcome, ResetOutcome},
    },
};

const TELEGRAM_START_FAILED: &str = "TELEGRAM_START_FAILED";
const AUTH_PROBE_PENDING: &str = "AUTH_PROBE_PENDING";
const LOGIN_MARKER_WRITE_FAILED: &str = "LOGIN_MARKER_WRITE_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        telegram = telegram::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => run_shell(context)?,
        Command::Clear { target } => {
            let _lock = InstanceLock::acquire(&context.layout.instance_lock_file())?;
            let outcome = clear_target(&context.layout, target);
            tracing::info!(
                clear_target = ?target,
                media_removed = outcome.media_removed,
                cache_removed = outcome.cache_removed,
                "headless clear completed"
            );
            println!("{}", storage_cleanup::SUCCESS_NOTICE);
        }
        Command::Reset => {
            let _lock = InstanceLock::acquire(&context.layout.instance_lock_file())?;
            let outcome = reset(&context.layout);
            tracing::info!(
                cache_removed = outcome.cache_removed,
                files_removed = outcome.files_removed,
                stores_cleared = outcome.stores_cleared,
                "headless reset completed"
            );
            println!("{}", storage_cleanup::SUCCESS_NOTICE);
        }
    }

    Ok(())
}

fn run_shell(context: AppContext) -> Result<()> {
    let lock = InstanceLock::acquire(&context.layout.instance_lock_file())?;
    let (update_tx, update_rx) = mpsc::channel();
    let (relaunch_tx, relaunch_rx) = mpsc::channel();

    let telegram = start_telegram(&context, update_tx);
    let mut preferences = TomlPreferenceStore::new(context.layout.prefs_dir());
    if !telegram.is_stub() {
        let status = telegram.wait_for_authorization(context.auth_probe_timeout());
        remember_authorization(status, &mut preferences);
    }

    let mut orchestrator = DefaultShellOrchestrator::new(
        telegram,
        preferences,
        SystemOpener,
        TimerRelauncher::new(relaunch_tx),
        context.shell_options(),
    );
    orchestrator.initialize();

    let mut event_source = ui::CrosstermEventSource::new(update_rx, relaunch_rx);
    let exit = ui::shell::start(&mut event_source, &mut orchestrator)?;

    // The chat library and the lock must be released before a new process takes over.
    drop(orchestrator);
    drop(lock);

    if exit == ShellExit::Relaunch {
        tracing::info!("restarting after settings action");
        drop(context);
        relaunch_current_process()?;
    }

    Ok(())
}

fn start_telegram(context: &AppContext, update_tx: Sender<()>) -> TelegramAdapter {
    match TelegramAdapter::start(&context.config.telegram, &context.layout, update_tx) {
        Ok(adapter) => adapter,
        Err(error) => {
            tracing::warn!(
                code = TELEGRAM_START_FAILED,
                error = %error,
                "telegram unavailable; running with an offline chat list"
            );
            TelegramAdapter::stub()
        }
    }
}

fn remember_authorization(status: AuthorizationStatus, preferences: &mut dyn PreferenceStore) {
    match status {
        AuthorizationStatus::Ready => {
            if let Err(error) = preferences.set_bool(LOGIN_STORE, KEY_IS_LOGGED_IN, true) {
                tracing::warn!(
                    code = LOGIN_MARKER_WRITE_FAILED,
                    error = %error,
                    "login marker could not be saved"
                );
            }
        }
        AuthorizationStatus::Pending => tracing::warn!(
            code = AUTH_PROBE_PENDING,
            "authorization still pending; starting shell anyway"
        ),
        AuthorizationStatus::LoginRequired | AuthorizationStatus::Closed => {
            tracing::info!(status = ?status, "chat library is not authorized")
        }
    }
}

fn clear_target(layout: &StorageLayout, target: ClearTarget) -> ClearOutcome {
    match target.media() {
        Some(media) => storage_cleanup::clear_media(layout, media),
        None => storage_cleanup::clear_cache(layout),
    }
}

/// Headless reset: the process exits on its own, so no relaunch is scheduled.
fn reset(layout: &StorageLayout) -> ResetOutcome {
    let mut preferences = TomlPreferenceStore::new(layout.prefs_dir());
    storage_cleanup::reset_app(layout, &mut preferences, &NoopRelauncher, Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        domain::settings::MediaDir,
        infra::{preferences::APP_SETTINGS_STORE, stubs::MemoryPreferenceStore},
    };

    #[test]
    fn ready_authorization_writes_login_marker() {
        let mut preferences = MemoryPreferenceStore::default();

        remember_authorization(AuthorizationStatus::Ready, &mut preferences);

        assert_eq!(
            preferences.get_bool(LOGIN_STORE, KEY_IS_LOGGED_IN).expect("read"),
            Some(true)
        );
    }

    #[test]
    fn pending_authorization_leaves_marker_untouched() {
        let mut preferences = MemoryPreferenceStore::default();

        remember_authorization(AuthorizationStatus::Pending, &mut preferences);
        remember_authorization(AuthorizationStatus::LoginRequired, &mut preferences);

        assert_eq!(preferences.store_len(LOGIN_STORE), 0);
    }

    #[test]
    fn clear_target_removes_selected_media_only() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());
        for media in MediaDir::ALL {
            fs::create_dir_all(layout.media_dir(media)).expect("media dir");
        }

        let outcome = clear_target(&layout, ClearTarget::Videos);

        assert!(outcome.media_removed);
        assert!(!layout.media_dir(MediaDir::Videos).exists());
        assert!(layout.media_dir(MediaDir::Photos).exists());
    }

    #[test]
    fn clear_cache_target_leaves_media_alone() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());
        layout.ensure_dirs().expect("dirs");
        fs::create_dir_all(layout.media_dir(MediaDir::Temp)).expect("temp dir");

        let outcome = clear_target(&layout, ClearTarget::Cache);

        assert!(outcome.cache_removed);
        assert!(!outcome.media_removed);
        assert!(layout.media_dir(MediaDir::Temp).exists());
    }

    #[test]
    fn headless_reset_removes_preference_files() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());
        layout.ensure_dirs().expect("dirs");
        let mut preferences = TomlPreferenceStore::new(layout.prefs_dir());
        preferences
            .set_bool(APP_SETTINGS_STORE, "data_collection", true)
            .expect("seed settings");
        preferences
            .set_bool(LOGIN_STORE, KEY_IS_LOGGED_IN, true)
            .expect("seed login");

        let outcome = reset(&layout);

        assert_eq!(outcome.stores_cleared, 2);
        assert!(!layout.files_dir.exists());
        assert!(!layout.prefs_dir().join("app_settings.toml").exists());
        assert!(!layout.prefs_dir().join("LoginPref.toml").exists());
        assert!(layout.log_dir.exists());
    }
}
