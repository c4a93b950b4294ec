use std::time::Duration;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    infra::{config::AppConfig, storage_layout::StorageLayout},
    usecases::shell::ShellOptions,
};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, layout: StorageLayout) -> Self {
        Self {
            config,
            layout,
            _log_guard: None,
        }
    }

    /// Keeps the log writer alive until the context is dropped.
    pub fn attach_log_guard(&mut self, guard: WorkerGuard) {
        self._log_guard = Some(guard);
    }

    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            layout: self.layout.clone(),
            load_more_threshold: self.config.chat_list.load_more_threshold,
            relaunch_delay: Duration::from_millis(self.config.settings.relaunch_delay_ms),
        }
    }

    pub fn auth_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.config.startup.auth_probe_timeout_ms)
    }
}
