use std::time::{Duration, Instant};

use super::{
    chat_list_state::ChatListState, contacts::ContactsScreen, folder::FolderTab,
    settings::SettingsScreen,
};

pub const NOTICE_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Settings(SettingsScreen),
    Contacts(ContactsScreen),
    About,
    DataCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    Relaunch,
}

/// Transient confirmation shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub shown_at: Instant,
}

/// Values read from the `app_settings` store that change how the shell renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiPreferences {
    pub show_message_preview: bool,
    pub chat_list_width: f64,
    pub data_collection_allowed: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_message_preview: true,
            chat_list_width: 30.0,
            data_collection_allowed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    running: bool,
    exit: ShellExit,
    screens: Vec<Screen>,
    chat_list: ChatListState,
    folder_tabs: Vec<FolderTab>,
    notice: Option<Notice>,
    preferences: UiPreferences,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            exit: ShellExit::Quit,
            screens: Vec::new(),
            chat_list: ChatListState::default(),
            folder_tabs: Vec::new(),
            notice: None,
            preferences: UiPreferences::default(),
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn exit(&self) -> ShellExit {
        self.exit
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn stop_for_relaunch(&mut self) {
        self.running = false;
        self.exit = ShellExit::Relaunch;
    }

    /// Topmost overlay screen; `None` means the chat list is showing.
    pub fn current_screen(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn current_screen_mut(&mut self) -> Option<&mut Screen> {
        self.screens.last_mut()
    }

    pub fn push_screen(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    pub fn pop_screen(&mut self) -> Option<Screen> {
        self.screens.pop()
    }

    pub fn chat_list(&self) -> &ChatListState {
        &self.chat_list
    }

    pub fn chat_list_mut(&mut self) -> &mut ChatListState {
        &mut self.chat_list
    }

    pub fn folder_tabs(&self) -> &[FolderTab] {
        &self.folder_tabs
    }

    pub fn set_folder_tabs(&mut self, tabs: Vec<FolderTab>) {
        self.folder_tabs = tabs;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn show_notice(&mut self, text: impl Into<String>, now: Instant) {
        self.notice = Some(Notice {
            text: text.into(),
            shown_at: now,
        });
    }

    pub fn expire_notice(&mut self, now: Instant) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|notice| now.saturating_duration_since(notice.shown_at) >= NOTICE_TTL);

        if expired {
            self.notice = None;
        }
    }

    pub fn preferences(&self) -> UiPreferences {
        self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut UiPreferences {
        &mut self.preferences
    }
}
