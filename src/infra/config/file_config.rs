use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{
    AppConfig, ChatListConfig, LogConfig, SettingsConfig, StartupConfig, StorageConfig,
    TelegramConfig,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub telegram: Option<FileTelegramConfig>,
    pub startup: Option<FileStartupConfig>,
    pub chat_list: Option<FileChatListConfig>,
    pub settings: Option<FileSettingsConfig>,
    pub storage: Option<FileStorageConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(telegram) = self.telegram {
            telegram.merge_into(&mut config.telegram);
        }

        if let Some(startup) = self.startup {
            startup.merge_into(&mut config.startup);
        }

        if let Some(chat_list) = self.chat_list {
            chat_list.merge_into(&mut config.chat_list);
        }

        if let Some(settings) = self.settings {
            settings.merge_into(&mut config.settings);
        }

        if let Some(storage) = self.storage {
            storage.merge_into(&mut config.storage);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTelegramConfig {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
    pub use_test_dc: Option<bool>,
}

impl FileTelegramConfig {
    fn merge_into(self, config: &mut TelegramConfig) {
        if let Some(api_id) = self.api_id {
            config.api_id = api_id;
        }

        if let Some(api_hash) = self.api_hash {
            config.api_hash = api_hash;
        }

        if let Some(use_test_dc) = self.use_test_dc {
            config.use_test_dc = use_test_dc;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStartupConfig {
    pub auth_probe_timeout_ms: Option<u64>,
}

impl FileStartupConfig {
    fn merge_into(self, config: &mut StartupConfig) {
        if let Some(timeout_ms) = self.auth_probe_timeout_ms {
            config.auth_probe_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatListConfig {
    pub load_more_threshold: Option<usize>,
}

impl FileChatListConfig {
    fn merge_into(self, config: &mut ChatListConfig) {
        if let Some(threshold) = self.load_more_threshold {
            config.load_more_threshold = threshold;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSettingsConfig {
    pub relaunch_delay_ms: Option<u64>,
}

impl FileSettingsConfig {
    fn merge_into(self, config: &mut SettingsConfig) {
        if let Some(delay_ms) = self.relaunch_delay_ms {
            config.relaunch_delay_ms = delay_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStorageConfig {
    pub root: Option<PathBuf>,
}

impl FileStorageConfig {
    fn merge_into(self, config: &mut StorageConfig) {
        if let Some(root) = self.root {
            config.root = Some(root);
        }
    }
}
