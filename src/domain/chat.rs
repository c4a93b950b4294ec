/// Kind of chat. Exactly one applies to every chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatKind {
    /// Private 1-to-1 conversation with a user or a bot.
    #[default]
    Private,
    /// Group chat (basic group or supergroup).
    Group,
    /// Broadcast channel.
    Channel,
    /// End-to-end encrypted chat. Matches none of the folder categories.
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    /// Last message preview, empty when the chat has no messages.
    pub last_message_preview: String,
    pub last_message_unix_ms: Option<i64>,
    pub unread_count: u32,
    pub is_pinned: bool,
    pub is_read: bool,
    /// Only meaningful for [`ChatKind::Private`].
    pub is_bot: bool,
    pub kind: ChatKind,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}
