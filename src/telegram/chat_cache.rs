use std::collections::{HashMap, HashSet};

use crate::domain::{chat::Chat, folder::FolderTab};

/// Library update already reduced to the fields the chat list renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCacheUpdate {
    NewChat {
        chat: Chat,
        main_order: i64,
        user_id: Option<i64>,
    },
    Position {
        chat_id: i64,
        order: i64,
        is_pinned: bool,
    },
    LastMessage {
        chat_id: i64,
        preview: String,
        unix_ms: Option<i64>,
    },
    Title {
        chat_id: i64,
        title: String,
    },
    ReadInbox {
        chat_id: i64,
        unread_count: u32,
    },
    Folders(Vec<FolderTab>),
    BotResolved {
        user_id: i64,
    },
}

#[derive(Debug, Clone)]
struct CachedChat {
    chat: Chat,
    main_order: i64,
    user_id: Option<i64>,
}

/// Chats known to the library, ordered the way the main chat list orders them.
#[derive(Debug, Default)]
pub struct ChatCache {
    chats: HashMap<i64, CachedChat>,
    folders: Vec<FolderTab>,
    bot_user_ids: HashSet<i64>,
}

impl ChatCache {
    /// Applies `update`; returns whether anything visible changed.
    pub fn apply(&mut self, update: ChatCacheUpdate) -> bool {
        match update {
            ChatCacheUpdate::NewChat {
                mut chat,
                main_order,
                user_id,
            } => {
                chat.is_read = chat.unread_count == 0;
                self.chats.insert(
                    chat.id,
                    CachedChat {
                        chat,
                        main_order,
                        user_id,
                    },
                );
                true
            }
            ChatCacheUpdate::Position {
                chat_id,
                order,
                is_pinned,
            } => self.update_chat(chat_id, |cached| {
                cached.main_order = order;
                cached.chat.is_pinned = is_pinned;
            }),
            ChatCacheUpdate::LastMessage {
                chat_id,
                preview,
                unix_ms,
            } => self.update_chat(chat_id, |cached| {
                cached.chat.last_message_preview = preview;
                cached.chat.last_message_unix_ms = unix_ms;
            }),
            ChatCacheUpdate::Title { chat_id, title } => {
                self.update_chat(chat_id, |cached| cached.chat.title = title)
            }
            ChatCacheUpdate::ReadInbox {
                chat_id,
                unread_count,
            } => self.update_chat(chat_id, |cached| {
                cached.chat.unread_count = unread_count;
                cached.chat.is_read = unread_count == 0;
            }),
            ChatCacheUpdate::Folders(folders) => {
                let changed = self.folders != folders;
                self.folders = folders;
                changed
            }
            ChatCacheUpdate::BotResolved { user_id } => {
                self.bot_user_ids.insert(user_id)
                    && self
                        .chats
                        .values()
                        .any(|cached| cached.user_id == Some(user_id))
            }
        }
    }

    fn update_chat<F>(&mut self, chat_id: i64, update: F) -> bool
    where
        F: FnOnce(&mut CachedChat),
    {
        match self.chats.get_mut(&chat_id) {
            Some(cached) => {
                update(cached);
                true
            }
            None => {
                tracing::debug!(chat_id, "update for unknown chat ignored");
                false
            }
        }
    }

    /// Chats in the main list, highest order first. Order 0 means "not in the list".
    pub fn chats(&self) -> Vec<Chat> {
        let mut listed: Vec<&CachedChat> = self
            .chats
            .values()
            .filter(|cached| cached.main_order != 0)
            .collect();
        listed.sort_by(|left, right| {
            right
                .main_order
                .cmp(&left.main_order)
                .then_with(|| right.chat.id.cmp(&left.chat.id))
        });

        listed
            .into_iter()
            .map(|cached| self.snapshot(cached))
            .collect()
    }

    /// Any known chat, whether or not it is in the main list.
    pub fn chat(&self, chat_id: i64) -> Option<Chat> {
        self.chats.get(&chat_id).map(|cached| self.snapshot(cached))
    }

    fn snapshot(&self, cached: &CachedChat) -> Chat {
        let mut chat = cached.chat.clone();
        chat.is_bot = cached
            .user_id
            .is_some_and(|user_id| self.bot_user_ids.contains(&user_id));
        chat
    }

    pub fn folder_tabs(&self) -> Vec<FolderTab> {
        self.folders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatKind;

    fn new_chat(id: i64, order: i64) -> ChatCacheUpdate {
        ChatCacheUpdate::NewChat {
            chat: Chat {
                id,
                title: format!("Chat {id}"),
                kind: ChatKind::Group,
                ..Chat::default()
            },
            main_order: order,
            user_id: None,
        }
    }

    fn ids(cache: &ChatCache) -> Vec<i64> {
        cache.chats().iter().map(|chat| chat.id).collect()
    }

    #[test]
    fn orders_chats_by_main_list_order_descending() {
        let mut cache = ChatCache::default();
        cache.apply(new_chat(1, 10));
        cache.apply(new_chat(2, 30));
        cache.apply(new_chat(3, 20));

        assert_eq!(ids(&cache), vec![2, 3, 1]);
    }

    #[test]
    fn chats_without_main_position_are_hidden() {
        let mut cache = ChatCache::default();
        cache.apply(new_chat(1, 0));
        cache.apply(new_chat(2, 5));

        assert_eq!(ids(&cache), vec![2]);

        cache.apply(ChatCacheUpdate::Position {
            chat_id: 1,
            order: 9,
            is_pinned: true,
        });

        assert_eq!(ids(&cache), vec![1, 2]);
        assert!(cache.chats()[0].is_pinned);
    }

    #[test]
    fn last_message_and_read_state_update_known_chat() {
        let mut cache = ChatCache::default();
        cache.apply(new_chat(1, 1));

        assert!(cache.apply(ChatCacheUpdate::LastMessage {
            chat_id: 1,
            preview: "hello".to_owned(),
            unix_ms: Some(1_700_000_000_000),
        }));
        assert!(cache.apply(ChatCacheUpdate::ReadInbox {
            chat_id: 1,
            unread_count: 3,
        }));

        let chat = &cache.chats()[0];
        assert_eq!(chat.last_message_preview, "hello");
        assert_eq!(chat.last_message_unix_ms, Some(1_700_000_000_000));
        assert_eq!(chat.unread_count, 3);
        assert!(!chat.is_read);
    }

    #[test]
    fn updates_for_unknown_chats_report_no_change() {
        let mut cache = ChatCache::default();

        assert!(!cache.apply(ChatCacheUpdate::Title {
            chat_id: 42,
            title: "Ghost".to_owned(),
        }));
        assert!(cache.chats().is_empty());
    }

    #[test]
    fn resolved_bots_flag_their_private_chats() {
        let mut cache = ChatCache::default();
        cache.apply(ChatCacheUpdate::NewChat {
            chat: Chat {
                id: 77,
                title: "Helper".to_owned(),
                ..Chat::default()
            },
            main_order: 1,
            user_id: Some(77),
        });

        assert!(!cache.chats()[0].is_bot);
        assert!(cache.apply(ChatCacheUpdate::BotResolved { user_id: 77 }));
        assert!(cache.chats()[0].is_bot);
        assert!(!cache.apply(ChatCacheUpdate::BotResolved { user_id: 77 }));
    }

    #[test]
    fn folder_list_replacement_reports_change_once() {
        let mut cache = ChatCache::default();
        let folders = vec![FolderTab {
            id: 3,
            label: "Work".to_owned(),
        }];

        assert!(cache.apply(ChatCacheUpdate::Folders(folders.clone())));
        assert!(!cache.apply(ChatCacheUpdate::Folders(folders.clone())));
        assert_eq!(cache.folder_tabs(), folders);
    }

    #[test]
    fn looks_up_chats_outside_the_main_list() {
        let mut cache = ChatCache::default();
        cache.apply(ChatCacheUpdate::NewChat {
            chat: Chat {
                id: 5,
                title: "Archived bot".to_owned(),
                kind: ChatKind::Private,
                ..Chat::default()
            },
            main_order: 0,
            user_id: Some(5),
        });
        cache.apply(ChatCacheUpdate::BotResolved { user_id: 5 });

        let chat = cache.chat(5).expect("chat should be cached");

        assert_eq!(chat.title, "Archived bot");
        assert!(chat.is_bot);
        assert!(cache.chat(6).is_none());
        assert!(cache.chats().is_empty());
    }
}
