use std::collections::HashSet;

/// Rule set of a chat folder as defined by the chat source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatFolder {
    pub pinned_chat_ids: HashSet<i64>,
    pub included_chat_ids: HashSet<i64>,
    pub excluded_chat_ids: HashSet<i64>,
    pub include_contacts: bool,
    pub include_non_contacts: bool,
    pub include_bots: bool,
    pub include_groups: bool,
    pub include_channels: bool,
}

/// Folder entry advertised by the chat source; rules are fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTab {
    pub id: i32,
    pub label: String,
}

/// A folder selected for display together with the contacts it is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFolder {
    pub tab: FolderTab,
    pub rules: ChatFolder,
    pub contact_ids: HashSet<i64>,
}
