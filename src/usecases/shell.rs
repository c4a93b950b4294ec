use std::time::{Duration, Instant};

use anyhow::Result;

use crate::{
    domain::{
        contacts::ContactsScreen,
        events::{AppEvent, KeyInput},
        links::first_link,
        settings::{step_slider, SettingAction, SettingItem, SettingsScreen},
        shell_state::{Screen, ShellState},
    },
    infra::{
        contracts::{ExternalOpener, PreferenceStore, Relauncher},
        storage_layout::StorageLayout,
    },
    usecases::{
        list_chats::{self, ChatSource, ListChatsError, INITIAL_CHAT_LOAD},
        settings, storage_cleanup,
    },
};

use super::contracts::ShellOrchestrator;

const SETTING_SAVE_FAILED: &str = "SETTING_SAVE_FAILED";
const LINK_OPEN_FAILED: &str = "LINK_OPEN_FAILED";
const FOLDER_OPEN_FAILED: &str = "FOLDER_OPEN_FAILED";
const CONTACTS_LOAD_FAILED: &str = "CONTACTS_LOAD_FAILED";

/// Parameters of the shell that come from configuration.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub layout: StorageLayout,
    pub load_more_threshold: usize,
    pub relaunch_delay: Duration,
}

pub struct DefaultShellOrchestrator<C, P, O, R>
where
    C: ChatSource,
    P: PreferenceStore,
    O: ExternalOpener,
    R: Relauncher,
{
    state: ShellState,
    chats: C,
    preferences: P,
    opener: O,
    relauncher: R,
    options: ShellOptions,
}

impl<C, P, O, R> DefaultShellOrchestrator<C, P, O, R>
where
    C: ChatSource,
    P: PreferenceStore,
    O: ExternalOpener,
    R: Relauncher,
{
    pub fn new(chats: C, preferences: P, opener: O, relauncher: R, options: ShellOptions) -> Self {
        let mut state = ShellState::default();
        *state.preferences_mut() = settings::load_ui_preferences(&preferences);

        Self {
            state,
            chats,
            preferences,
            opener,
            relauncher,
            options,
        }
    }

    /// Requests the first page of chats and shows whatever is already loaded.
    pub fn initialize(&mut self) {
        self.state.chat_list_mut().set_loading();
        if let Err(error) = self.chats.load_chats(INITIAL_CHAT_LOAD) {
            tracing::warn!(error = ?error, "initial chat load request failed");
        }
        self.refresh_chats();
    }

    fn refresh_chats(&mut self) {
        self.state.set_folder_tabs(self.chats.folder_tabs());

        match list_chats::list_chats(&self.chats) {
            Ok(chats) => self.state.chat_list_mut().set_ready(chats),
            Err(ListChatsError::Unauthorized) => self.state.chat_list_mut().set_unauthorized(),
            Err(error) => {
                tracing::warn!(error = ?error, "chat list refresh failed");
                self.state.chat_list_mut().set_error();
            }
        }
    }

    fn request_more_chats(&mut self) {
        let chat_list = self.state.chat_list();
        let scroll_index = chat_list.scroll_index();
        let loaded = chat_list.loaded_len();

        if let Some(limit) = list_chats::request_more_chats(
            &self.chats,
            scroll_index,
            loaded,
            self.options.load_more_threshold,
        ) {
            tracing::debug!(scroll_index, loaded, limit, "requested more chats");
        }
    }

    fn notify(&mut self, text: &str) {
        self.state.show_notice(text, Instant::now());
    }

    fn handle_key(&mut self, key: KeyInput) -> Result<()> {
        match self.state.current_screen() {
            None => self.handle_chat_list_key(&key),
            Some(Screen::Settings(_)) => self.handle_settings_key(&key),
            Some(Screen::Contacts(_)) => self.handle_contacts_key(&key),
            Some(Screen::About) => self.handle_info_key(&key),
            Some(Screen::DataCollection) => {
                if key.key == "enter" {
                    self.toggle_data_collection();
                } else {
                    self.handle_info_key(&key);
                }
            }
        }

        Ok(())
    }

    fn handle_chat_list_key(&mut self, key: &KeyInput) {
        if self.state.chat_list().is_search_active() {
            self.handle_search_key(key);
            return;
        }

        match key.key.as_str() {
            "j" | "down" => {
                self.state.chat_list_mut().select_next();
                self.request_more_chats();
            }
            "k" | "up" => {
                self.state.chat_list_mut().select_previous();
                self.request_more_chats();
            }
            "/" => self.state.chat_list_mut().begin_search(),
            "tab" => {
                self.cycle_folder();
                self.request_more_chats();
            }
            "s" => self.open_settings_page(0),
            "c" => self.open_contacts(),
            "o" => self.open_selected_link(),
            "r" => self.refresh_chats(),
            "q" => self.state.stop(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: &KeyInput) {
        let chat_list = self.state.chat_list_mut();
        match key.key.as_str() {
            "esc" => chat_list.end_search(true),
            "enter" => {
                chat_list.end_search(false);
                return;
            }
            "backspace" => chat_list.pop_search_char(),
            text => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if !key.ctrl => chat_list.push_search_char(ch),
                    _ => return,
                }
            }
        }

        // A narrower query can leave the selection near the end of the loaded list.
        self.request_more_chats();
    }

    fn open_contacts(&mut self) {
        match list_chats::list_contacts(&self.chats) {
            Ok(contacts) => {
                tracing::debug!(count = contacts.len(), "contacts opened");
                self.state
                    .push_screen(Screen::Contacts(ContactsScreen::new(contacts)));
            }
            Err(error) => {
                tracing::warn!(code = CONTACTS_LOAD_FAILED, error = ?error, "contacts could not be loaded");
                self.notify("Failed to load contacts");
            }
        }
    }

    fn handle_contacts_key(&mut self, key: &KeyInput) {
        let Some(Screen::Contacts(screen)) = self.state.current_screen_mut() else {
            return;
        };

        match key.key.as_str() {
            "j" | "down" => screen.select_next(),
            "k" | "up" => screen.select_previous(),
            "enter" => {
                let Some(chat_id) = screen.selected_contact().map(|chat| chat.id) else {
                    return;
                };
                self.show_contact_chat(chat_id);
            }
            "esc" | "backspace" => {
                self.state.pop_screen();
            }
            _ => {}
        }
    }

    /// Returns to the chat list with the contact's chat selected.
    fn show_contact_chat(&mut self, chat_id: i64) {
        if !self.state.chat_list_mut().select_chat(chat_id) {
            self.notify("Chat not loaded yet");
            return;
        }

        self.state.pop_screen();
        self.request_more_chats();
    }

    fn cycle_folder(&mut self) {
        let current = self.state.chat_list().folder().map(|active| active.tab.id);
        let Some(tab) = list_chats::next_folder_tab(self.state.folder_tabs(), current).cloned()
        else {
            self.state.chat_list_mut().set_folder(None);
            return;
        };

        match list_chats::open_folder(&self.chats, &tab) {
            Ok(active) => {
                tracing::debug!(folder_id = tab.id, "folder selected");
                self.state.chat_list_mut().set_folder(Some(active));
            }
            Err(error) => {
                tracing::warn!(
                    code = FOLDER_OPEN_FAILED,
                    folder_id = tab.id,
                    error = ?error,
                    "folder could not be opened"
                );
                self.state.chat_list_mut().set_folder(None);
                self.notify("Failed to load folder");
            }
        }
    }

    fn open_selected_link(&mut self) {
        let Some(link) = self
            .state
            .chat_list()
            .selected_chat()
            .and_then(|chat| first_link(&chat.last_message_preview))
            .map(str::to_owned)
        else {
            return;
        };

        if let Err(error) = self.opener.open(&link) {
            tracing::warn!(code = LINK_OPEN_FAILED, error = %error, "link could not be opened");
            self.notify("Failed to open link");
        }
    }

    fn open_settings_page(&mut self, page_index: u8) {
        let screen = settings::build_settings_screen(page_index, &self.state.preferences());
        self.state.push_screen(Screen::Settings(screen));
    }

    fn handle_info_key(&mut self, key: &KeyInput) {
        if matches!(key.key.as_str(), "esc" | "backspace") {
            self.state.pop_screen();
        }
    }

    fn handle_settings_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.with_settings_screen(|screen| screen.select_next()),
            "k" | "up" => self.with_settings_screen(|screen| screen.select_previous()),
            "esc" | "backspace" => {
                self.state.pop_screen();
            }
            "enter" => self.activate_selected_setting(),
            "h" | "left" => self.step_selected_slider(-1),
            "l" | "right" => self.step_selected_slider(1),
            _ => {}
        }
    }

    fn with_settings_screen<F>(&mut self, update: F)
    where
        F: FnOnce(&mut SettingsScreen),
    {
        if let Some(Screen::Settings(screen)) = self.state.current_screen_mut() {
            update(screen);
        }
    }

    fn selected_setting(&self) -> Option<SettingItem> {
        match self.state.current_screen() {
            Some(Screen::Settings(screen)) => screen.selected_item().cloned(),
            _ => None,
        }
    }

    fn activate_selected_setting(&mut self) {
        match self.selected_setting() {
            Some(SettingItem::Click { action, .. }) => self.run_setting_action(action),
            Some(SettingItem::Switch {
                selected, setting, ..
            }) => {
                let toggled = !selected;
                if let Err(error) = settings::save_switch(&mut self.preferences, setting, toggled) {
                    tracing::warn!(code = SETTING_SAVE_FAILED, error = %error, "switch not saved");
                    self.notify("Failed to save setting");
                    return;
                }

                settings::apply_switch(self.state.preferences_mut(), setting, toggled);
                self.with_settings_screen(|screen| {
                    if let Some(SettingItem::Switch { selected, .. }) = screen.selected_item_mut() {
                        *selected = toggled;
                    }
                });
            }
            Some(SettingItem::ProgressBar { .. }) | None => {}
        }
    }

    fn step_selected_slider(&mut self, steps: i32) {
        let Some(SettingItem::ProgressBar {
            value,
            min,
            max,
            step,
            setting,
            ..
        }) = self.selected_setting()
        else {
            return;
        };

        let stepped = step_slider(value, min, max, step, steps);
        if stepped == value {
            return;
        }

        if let Err(error) = settings::save_slider(&mut self.preferences, setting, stepped) {
            tracing::warn!(code = SETTING_SAVE_FAILED, error = %error, "slider not saved");
            self.notify("Failed to save setting");
            return;
        }

        settings::apply_slider(self.state.preferences_mut(), setting, stepped);
        self.with_settings_screen(|screen| {
            if let Some(SettingItem::ProgressBar { value, .. }) = screen.selected_item_mut() {
                *value = stepped;
            }
        });
    }

    fn run_setting_action(&mut self, action: SettingAction) {
        tracing::info!(action = ?action, "settings action");

        match action {
            SettingAction::OpenPage(page) => self.open_settings_page(page.index()),
            SettingAction::OpenAbout => self.state.push_screen(Screen::About),
            SettingAction::OpenDataCollection => self.state.push_screen(Screen::DataCollection),
            SettingAction::ClearCache => {
                storage_cleanup::clear_cache(&self.options.layout);
                self.notify(storage_cleanup::SUCCESS_NOTICE);
            }
            SettingAction::ClearMedia(media) => {
                storage_cleanup::clear_media(&self.options.layout, media);
                self.notify(storage_cleanup::SUCCESS_NOTICE);
            }
            SettingAction::Restart => self.relauncher.schedule(self.options.relaunch_delay),
            SettingAction::ResetApp => {
                storage_cleanup::reset_app(
                    &self.options.layout,
                    &mut self.preferences,
                    &self.relauncher,
                    self.options.relaunch_delay,
                );
                *self.state.preferences_mut() = settings::load_ui_preferences(&self.preferences);
                self.notify(storage_cleanup::SUCCESS_NOTICE);
            }
        }
    }

    fn toggle_data_collection(&mut self) {
        let allowed = !self.state.preferences().data_collection_allowed;
        match settings::save_data_collection(&mut self.preferences, allowed) {
            Ok(()) => self.state.preferences_mut().data_collection_allowed = allowed,
            Err(error) => {
                tracing::warn!(code = SETTING_SAVE_FAILED, error = %error, "consent not saved");
                self.notify("Failed to save setting");
            }
        }
    }
}

impl<C, P, O, R> ShellOrchestrator for DefaultShellOrchestrator<C, P, O, R>
where
    C: ChatSource,
    P: PreferenceStore,
    O: ExternalOpener,
    R: Relauncher,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.state.expire_notice(Instant::now()),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::RelaunchRequested => self.state.stop_for_relaunch(),
            AppEvent::ChatsUpdated => self.refresh_chats(),
            AppEvent::InputKey(key) => self.handle_key(key)?,
        }

        Ok(())
    }
}
