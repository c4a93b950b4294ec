use super::{
    chat::Chat,
    chat_filter::{visible_chats, FolderContext, VisibleChats},
    folder::ActiveFolder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatListUiState {
    Loading,
    Ready,
    Empty,
    Unauthorized,
    Error,
}

/// Loaded chats plus the view parameters (search, folder, selection) applied to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListState {
    ui_state: ChatListUiState,
    chats: Vec<Chat>,
    search: String,
    search_active: bool,
    folder: Option<ActiveFolder>,
    selected_index: Option<usize>,
}

impl Default for ChatListState {
    fn default() -> Self {
        Self {
            ui_state: ChatListUiState::Loading,
            chats: Vec::new(),
            search: String::new(),
            search_active: false,
            folder: None,
            selected_index: None,
        }
    }
}

impl ChatListState {
    pub fn ui_state(&self) -> ChatListUiState {
        self.ui_state
    }

    pub fn loaded_len(&self) -> usize {
        self.chats.len()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    pub fn folder(&self) -> Option<&ActiveFolder> {
        self.folder.as_ref()
    }

    pub fn visible(&self) -> VisibleChats<'_> {
        let context = self.folder.as_ref().map(|active| FolderContext {
            folder: &active.rules,
            contact_ids: &active.contact_ids,
        });
        visible_chats(&self.chats, &self.search, context)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Selection position counted in loaded-list slots. Rows hidden by the
    /// search or folder take no room, so the position is measured back from
    /// the end of the loaded list. An empty view counts as the end.
    pub fn scroll_index(&self) -> usize {
        let visible_len = self.visible().len();
        let rows_below = self
            .selected_index
            .map_or(0, |index| visible_len.saturating_sub(index + 1));

        self.chats.len().saturating_sub(rows_below + 1)
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        self.selected_index
            .and_then(|index| self.visible().get(index))
    }

    pub fn set_loading(&mut self) {
        self.ui_state = ChatListUiState::Loading;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn set_ready(&mut self, chats: Vec<Chat>) {
        if chats.is_empty() {
            self.set_empty();
            return;
        }

        let previous_selected_chat_id = self.selected_chat().map(|chat| chat.id);
        self.ui_state = ChatListUiState::Ready;
        self.chats = chats;
        self.reselect(previous_selected_chat_id);
    }

    pub fn set_empty(&mut self) {
        self.ui_state = ChatListUiState::Empty;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn set_unauthorized(&mut self) {
        self.ui_state = ChatListUiState::Unauthorized;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn set_error(&mut self) {
        self.ui_state = ChatListUiState::Error;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn begin_search(&mut self) {
        self.search_active = true;
    }

    /// Leaves search mode; `clear` also drops the query.
    pub fn end_search(&mut self, clear: bool) {
        self.search_active = false;
        if clear && !self.search.is_empty() {
            self.search.clear();
            self.reselect(None);
        }
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.reselect(None);
    }

    pub fn pop_search_char(&mut self) {
        if self.search.pop().is_some() {
            self.reselect(None);
        }
    }

    pub fn set_folder(&mut self, folder: Option<ActiveFolder>) {
        self.folder = folder;
        self.reselect(None);
    }

    /// Selects `chat_id`, dropping the search and folder when they hide it.
    /// Returns false when the chat is not loaded.
    pub fn select_chat(&mut self, chat_id: i64) -> bool {
        if !self.chats.iter().any(|chat| chat.id == chat_id) {
            return false;
        }

        if self.visible().position(chat_id).is_none() {
            self.search.clear();
            self.search_active = false;
            self.folder = None;
        }
        self.selected_index = self.visible().position(chat_id);
        self.selected_index.is_some()
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.visible().len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }

    fn reselect(&mut self, previous_selected_chat_id: Option<i64>) {
        let selected_index = {
            let visible = self.visible();
            if visible.is_empty() {
                None
            } else {
                previous_selected_chat_id
                    .and_then(|chat_id| visible.position(chat_id))
                    .or(Some(0))
            }
        };
        self.selected_index = selected_index;
    }
}
