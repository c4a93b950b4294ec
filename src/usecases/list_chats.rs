use std::collections::HashSet;

use crate::domain::{
    chat::Chat,
    folder::{ActiveFolder, ChatFolder, FolderTab},
};

/// Chats requested when the shell starts, before any scrolling happens.
pub const INITIAL_CHAT_LOAD: usize = 20;

const CHAT_LOAD_REQUEST_FAILED: &str = "CHAT_LOAD_REQUEST_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
    Unknown,
}

/// External chat library as seen by the shell.
pub trait ChatSource {
    /// Loaded chats in list order.
    fn chats(&self) -> Result<Vec<Chat>, ChatSourceError>;
    /// Asks the library to load chats up to `limit`; results arrive as updates.
    fn load_chats(&self, limit: usize) -> Result<(), ChatSourceError>;
    fn folder_tabs(&self) -> Vec<FolderTab>;
    fn folder(&self, id: i32) -> Result<ChatFolder, ChatSourceError>;
    fn contact_ids(&self) -> Result<HashSet<i64>, ChatSourceError>;
    /// The user's contacts as private chats, in the library's contact order.
    fn contacts(&self) -> Result<Vec<Chat>, ChatSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChatsError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

pub fn list_chats(source: &dyn ChatSource) -> Result<Vec<Chat>, ListChatsError> {
    source.chats().map_err(map_source_error)
}

pub fn list_contacts(source: &dyn ChatSource) -> Result<Vec<Chat>, ListChatsError> {
    source.contacts().map_err(map_source_error)
}

/// Low-water-mark trigger: once `scroll_index` is within `threshold` rows of the
/// end of the loaded list, one more chat than currently loaded is requested.
pub fn load_more_limit(scroll_index: usize, loaded: usize, threshold: usize) -> Option<usize> {
    if scroll_index >= loaded.saturating_sub(threshold) {
        Some(loaded + 1)
    } else {
        None
    }
}

/// Issues a load request when the trigger fires. Returns the requested limit.
///
/// Requests are not deduplicated; every qualifying scroll position issues one.
pub fn request_more_chats(
    source: &dyn ChatSource,
    scroll_index: usize,
    loaded: usize,
    threshold: usize,
) -> Option<usize> {
    let limit = load_more_limit(scroll_index, loaded, threshold)?;

    if let Err(error) = source.load_chats(limit) {
        tracing::warn!(
            code = CHAT_LOAD_REQUEST_FAILED,
            limit,
            error = ?error,
            "chat load request failed"
        );
    }

    Some(limit)
}

pub fn open_folder(source: &dyn ChatSource, tab: &FolderTab) -> Result<ActiveFolder, ListChatsError> {
    let rules = source.folder(tab.id).map_err(map_source_error)?;
    let contact_ids = source.contact_ids().map_err(map_source_error)?;

    Ok(ActiveFolder {
        tab: tab.clone(),
        rules,
        contact_ids,
    })
}

/// Folder that follows `current` in tab order; `None` stands for "all chats".
pub fn next_folder_tab<'a>(tabs: &'a [FolderTab], current: Option<i32>) -> Option<&'a FolderTab> {
    match current {
        None => tabs.first(),
        Some(id) => tabs
            .iter()
            .position(|tab| tab.id == id)
            .and_then(|index| tabs.get(index + 1)),
    }
}

fn map_source_error(error: ChatSourceError) -> ListChatsError {
    match error {
        ChatSourceError::Unauthorized => ListChatsError::Unauthorized,
        ChatSourceError::Unavailable | ChatSourceError::Unknown => {
            ListChatsError::TemporarilyUnavailable
        }
        ChatSourceError::InvalidData => ListChatsError::DataContractViolation,
    }
}
