//! Settings pages and their items.

/// Settings page addressed by its numeric index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPage {
    Main,
    Interface,
    App,
}

impl SettingsPage {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Main),
            1 => Some(Self::Interface),
            2 => Some(Self::App),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Main => 0,
            Self::Interface => 1,
            Self::App => 2,
        }
    }
}

/// Media subdirectory of the chat library's files dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDir {
    Thumbnails,
    Photos,
    Videos,
    Temp,
}

impl MediaDir {
    #[cfg(test)]
    pub const ALL: [MediaDir; 4] = [Self::Thumbnails, Self::Photos, Self::Videos, Self::Temp];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Thumbnails => "thumbnails",
            Self::Photos => "photos",
            Self::Videos => "videos",
            Self::Temp => "temp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingAction {
    OpenPage(SettingsPage),
    OpenAbout,
    OpenDataCollection,
    ClearCache,
    ClearMedia(MediaDir),
    Restart,
    ResetApp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSetting {
    ShowMessagePreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderSetting {
    ChatListWidth,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingItem {
    Click {
        label: String,
        action: SettingAction,
    },
    Switch {
        label: String,
        selected: bool,
        setting: SwitchSetting,
    },
    ProgressBar {
        label: String,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
        setting: SliderSetting,
    },
}

impl SettingItem {
    pub fn label(&self) -> &str {
        match self {
            Self::Click { label, .. }
            | Self::Switch { label, .. }
            | Self::ProgressBar { label, .. } => label,
        }
    }
}

/// Moves a slider value by `steps` increments of `step`, clamped to `[min, max]`.
pub fn step_slider(value: f64, min: f64, max: f64, step: f64, steps: i32) -> f64 {
    (value + step * f64::from(steps)).clamp(min, max)
}

/// One open settings page: its title, items and the selected row.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsScreen {
    page: Option<SettingsPage>,
    title: String,
    items: Vec<SettingItem>,
    selected_index: Option<usize>,
}

impl SettingsScreen {
    pub fn new(page: Option<SettingsPage>, title: impl Into<String>, items: Vec<SettingItem>) -> Self {
        let selected_index = if items.is_empty() { None } else { Some(0) };
        Self {
            page,
            title: title.into(),
            items,
            selected_index,
        }
    }

    pub fn page(&self) -> Option<SettingsPage> {
        self.page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[SettingItem] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_item(&self) -> Option<&SettingItem> {
        self.selected_index.and_then(|index| self.items.get(index))
    }

    pub fn selected_item_mut(&mut self) -> Option<&mut SettingItem> {
        self.selected_index.and_then(|index| self.items.get_mut(index))
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.items.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }
}
