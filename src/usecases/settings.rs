//! Builds settings pages and persists the values their items change.

use crate::{
    domain::{
        settings::{
            MediaDir, SettingAction, SettingItem, SettingsPage, SettingsScreen, SliderSetting,
            SwitchSetting,
        },
        shell_state::UiPreferences,
    },
    infra::{
        contracts::PreferenceStore,
        error::AppError,
        preferences::{
            APP_SETTINGS_STORE, KEY_CHAT_LIST_WIDTH, KEY_DATA_COLLECTION,
            KEY_SHOW_MESSAGE_PREVIEW,
        },
    },
};

pub const SETTINGS_TITLE: &str = "Settings";
pub const INTERFACE_TITLE: &str = "Interface";
pub const APP_SETTINGS_TITLE: &str = "App settings";

const PREFERENCE_READ_FAILED: &str = "PREFERENCE_READ_FAILED";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub fn slider_bounds(setting: SliderSetting) -> SliderBounds {
    match setting {
        SliderSetting::ChatListWidth => SliderBounds {
            min: 20.0,
            max: 60.0,
            step: 5.0,
        },
    }
}

/// Builds the page for `page_index`; unknown indices give an empty "Settings" page.
pub fn build_settings_screen(page_index: u8, preferences: &UiPreferences) -> SettingsScreen {
    let Some(page) = SettingsPage::from_index(page_index) else {
        return SettingsScreen::new(None, SETTINGS_TITLE, Vec::new());
    };

    let (title, items) = match page {
        SettingsPage::Main => (SETTINGS_TITLE, main_page_items()),
        SettingsPage::Interface => (INTERFACE_TITLE, interface_page_items(preferences)),
        SettingsPage::App => (APP_SETTINGS_TITLE, app_page_items()),
    };

    SettingsScreen::new(Some(page), title, items)
}

fn click(label: &str, action: SettingAction) -> SettingItem {
    SettingItem::Click {
        label: label.to_owned(),
        action,
    }
}

fn main_page_items() -> Vec<SettingItem> {
    vec![
        click(INTERFACE_TITLE, SettingAction::OpenPage(SettingsPage::Interface)),
        click(APP_SETTINGS_TITLE, SettingAction::OpenPage(SettingsPage::App)),
        click("About", SettingAction::OpenAbout),
    ]
}

fn interface_page_items(preferences: &UiPreferences) -> Vec<SettingItem> {
    let width = slider_bounds(SliderSetting::ChatListWidth);

    vec![
        SettingItem::Switch {
            label: "Show message previews".to_owned(),
            selected: preferences.show_message_preview,
            setting: SwitchSetting::ShowMessagePreview,
        },
        SettingItem::ProgressBar {
            label: "Chat list width".to_owned(),
            value: preferences.chat_list_width,
            min: width.min,
            max: width.max,
            step: width.step,
            setting: SliderSetting::ChatListWidth,
        },
    ]
}

fn app_page_items() -> Vec<SettingItem> {
    vec![
        click("Clear cache dir", SettingAction::ClearCache),
        click("Restart", SettingAction::Restart),
        click("Clear thumbnails", SettingAction::ClearMedia(MediaDir::Thumbnails)),
        click("Clear photos", SettingAction::ClearMedia(MediaDir::Photos)),
        click("Clear videos", SettingAction::ClearMedia(MediaDir::Videos)),
        click("Clear temp files", SettingAction::ClearMedia(MediaDir::Temp)),
        click("Reset app", SettingAction::ResetApp),
        click("Data collection", SettingAction::OpenDataCollection),
    ]
}

/// Reads UI preferences; unreadable or missing values fall back to defaults.
pub fn load_ui_preferences(store: &dyn PreferenceStore) -> UiPreferences {
    let defaults = UiPreferences::default();
    let width = slider_bounds(SliderSetting::ChatListWidth);

    UiPreferences {
        show_message_preview: read_or(
            store.get_bool(APP_SETTINGS_STORE, KEY_SHOW_MESSAGE_PREVIEW),
            defaults.show_message_preview,
        ),
        chat_list_width: read_or(
            store.get_f64(APP_SETTINGS_STORE, KEY_CHAT_LIST_WIDTH),
            defaults.chat_list_width,
        )
        .clamp(width.min, width.max),
        data_collection_allowed: read_or(
            store.get_bool(APP_SETTINGS_STORE, KEY_DATA_COLLECTION),
            defaults.data_collection_allowed,
        ),
    }
}

fn read_or<T>(result: Result<Option<T>, AppError>, default: T) -> T {
    match result {
        Ok(value) => value.unwrap_or(default),
        Err(error) => {
            tracing::warn!(
                code = PREFERENCE_READ_FAILED,
                error = %error,
                "preference unreadable; using default"
            );
            default
        }
    }
}

pub fn save_switch(
    store: &mut dyn PreferenceStore,
    setting: SwitchSetting,
    selected: bool,
) -> Result<(), AppError> {
    let key = match setting {
        SwitchSetting::ShowMessagePreview => KEY_SHOW_MESSAGE_PREVIEW,
    };
    store.set_bool(APP_SETTINGS_STORE, key, selected)
}

pub fn save_slider(
    store: &mut dyn PreferenceStore,
    setting: SliderSetting,
    value: f64,
) -> Result<(), AppError> {
    let key = match setting {
        SliderSetting::ChatListWidth => KEY_CHAT_LIST_WIDTH,
    };
    store.set_f64(APP_SETTINGS_STORE, key, value)
}

pub fn save_data_collection(store: &mut dyn PreferenceStore, allowed: bool) -> Result<(), AppError> {
    store.set_bool(APP_SETTINGS_STORE, KEY_DATA_COLLECTION, allowed)
}

/// Mirrors a persisted switch value into the in-memory preferences.
pub fn apply_switch(preferences: &mut UiPreferences, setting: SwitchSetting, selected: bool) {
    match setting {
        SwitchSetting::ShowMessagePreview => preferences.show_message_preview = selected,
    }
}

pub fn apply_slider(preferences: &mut UiPreferences, setting: SliderSetting, value: f64) {
    match setting {
        SliderSetting::ChatListWidth => preferences.chat_list_width = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::stubs::MemoryPreferenceStore;

    fn labels(screen: &SettingsScreen) -> Vec<&str> {
        screen.items().iter().map(SettingItem::label).collect()
    }

    #[test]
    fn main_page_links_to_sub_pages_and_about() {
        let screen = build_settings_screen(0, &UiPreferences::default());

        assert_eq!(screen.title(), SETTINGS_TITLE);
        assert_eq!(labels(&screen), vec!["Interface", "App settings", "About"]);
        assert_eq!(
            screen.items()[1],
            click(APP_SETTINGS_TITLE, SettingAction::OpenPage(SettingsPage::App))
        );
    }

    #[test]
    fn app_page_lists_maintenance_actions_in_order() {
        let screen = build_settings_screen(2, &UiPreferences::default());

        assert_eq!(screen.title(), APP_SETTINGS_TITLE);
        assert_eq!(
            labels(&screen),
            vec![
                "Clear cache dir",
                "Restart",
                "Clear thumbnails",
                "Clear photos",
                "Clear videos",
                "Clear temp files",
                "Reset app",
                "Data collection",
            ]
        );
    }

    #[test]
    fn interface_page_reflects_current_preferences() {
        let preferences = UiPreferences {
            show_message_preview: false,
            chat_list_width: 45.0,
            data_collection_allowed: false,
        };

        let screen = build_settings_screen(1, &preferences);

        assert_eq!(screen.page(), Some(SettingsPage::Interface));
        assert!(matches!(
            screen.items()[0],
            SettingItem::Switch { selected: false, .. }
        ));
        assert!(matches!(
            screen.items()[1],
            SettingItem::ProgressBar { value, min, max, step, .. }
                if value == 45.0 && min == 20.0 && max == 60.0 && step == 5.0
        ));
    }

    #[test]
    fn unknown_page_is_empty_settings_page() {
        let screen = build_settings_screen(7, &UiPreferences::default());

        assert_eq!(screen.title(), SETTINGS_TITLE);
        assert!(screen.items().is_empty());
        assert_eq!(screen.page(), None);
    }

    #[test]
    fn preferences_default_when_store_is_empty() {
        let store = MemoryPreferenceStore::default();

        assert_eq!(load_ui_preferences(&store), UiPreferences::default());
    }

    #[test]
    fn saved_values_load_back() {
        let mut store = MemoryPreferenceStore::default();
        save_switch(&mut store, SwitchSetting::ShowMessagePreview, false).expect("save switch");
        save_slider(&mut store, SliderSetting::ChatListWidth, 55.0).expect("save slider");
        save_data_collection(&mut store, true).expect("save consent");

        let preferences = load_ui_preferences(&store);

        assert!(!preferences.show_message_preview);
        assert_eq!(preferences.chat_list_width, 55.0);
        assert!(preferences.data_collection_allowed);
    }

    #[test]
    fn out_of_range_width_is_clamped_on_load() {
        let mut store = MemoryPreferenceStore::default();
        save_slider(&mut store, SliderSetting::ChatListWidth, 95.0).expect("save slider");

        assert_eq!(load_ui_preferences(&store).chat_list_width, 60.0);
    }
}
