//! Chat visibility rules: search matching, pinned partitioning and folder inclusion.

use std::collections::HashSet;

use super::{
    chat::{Chat, ChatKind},
    folder::ChatFolder,
};

/// Folder rules plus the contact ids they are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct FolderContext<'a> {
    pub folder: &'a ChatFolder,
    pub contact_ids: &'a HashSet<i64>,
}

/// Chats to render, split by partition. Each keeps the source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleChats<'a> {
    pub pinned: Vec<&'a Chat>,
    pub unpinned: Vec<&'a Chat>,
}

impl<'a> VisibleChats<'a> {
    pub fn len(&self) -> usize {
        self.pinned.len() + self.unpinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in display order: pinned first, then unpinned.
    pub fn rows(&self) -> impl Iterator<Item = &'a Chat> + '_ {
        self.pinned.iter().chain(self.unpinned.iter()).copied()
    }

    pub fn get(&self, index: usize) -> Option<&'a Chat> {
        self.rows().nth(index)
    }

    pub fn position(&self, chat_id: i64) -> Option<usize> {
        self.rows().position(|chat| chat.id == chat_id)
    }
}

/// Empty search matches everything, otherwise a case-insensitive substring match.
pub fn matches_search(title: &str, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    title.to_lowercase().contains(&search.to_lowercase())
}

/// Partition membership: the chat's own flag without a folder, folder pins otherwise.
pub fn is_pinned_in(chat: &Chat, folder: Option<&ChatFolder>) -> bool {
    match folder {
        Some(folder) => folder.pinned_chat_ids.contains(&chat.id),
        None => chat.is_pinned,
    }
}

/// Evaluates the folder category toggles, then the explicit exclude and include lists.
pub fn folder_includes(chat: &Chat, context: FolderContext<'_>) -> bool {
    let folder = context.folder;
    let mut show = false;

    if chat.kind == ChatKind::Channel && folder.include_channels {
        show = true;
    }
    if chat.kind == ChatKind::Group && folder.include_groups {
        show = true;
    }
    if chat.kind == ChatKind::Private {
        let category_enabled = if chat.is_bot {
            folder.include_bots
        } else if context.contact_ids.contains(&chat.id) {
            folder.include_contacts
        } else {
            folder.include_non_contacts
        };

        if category_enabled {
            show = true;
        }
    }

    if folder.excluded_chat_ids.contains(&chat.id) {
        show = false;
    }
    // Explicit inclusion wins over exclusion.
    if folder.included_chat_ids.contains(&chat.id) {
        show = true;
    }

    show
}

pub fn is_visible(
    chat: &Chat,
    search: &str,
    pinned_view: bool,
    folder: Option<FolderContext<'_>>,
) -> bool {
    if !matches_search(&chat.title, search) {
        return false;
    }

    if is_pinned_in(chat, folder.map(|context| context.folder)) != pinned_view {
        return false;
    }

    folder.is_none_or(|context| folder_includes(chat, context))
}

/// Runs one full pass per partition over `chats`: pinned first, then unpinned.
pub fn visible_chats<'a>(
    chats: &'a [Chat],
    search: &str,
    folder: Option<FolderContext<'_>>,
) -> VisibleChats<'a> {
    let pinned = chats
        .iter()
        .filter(|chat| is_visible(chat, search, true, folder))
        .collect();
    let unpinned = chats
        .iter()
        .filter(|chat| is_visible(chat, search, false, folder))
        .collect();

    VisibleChats { pinned, unpinned }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(id: i64, title: &str, kind: ChatKind) -> Chat {
        Chat {
            id,
            title: title.to_owned(),
            kind,
            ..Chat::default()
        }
    }

    fn pinned(id: i64, title: &str) -> Chat {
        Chat {
            is_pinned: true,
            ..chat(id, title, ChatKind::Private)
        }
    }

    fn ids(chats: &[&Chat]) -> Vec<i64> {
        chats.iter().map(|chat| chat.id).collect()
    }

    #[test]
    fn empty_search_matches_every_title() {
        assert!(matches_search("General", ""));
        assert!(matches_search("", ""));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(matches_search("Backend Team", "end t"));
        assert!(matches_search("Backend Team", "BACKEND"));
        assert!(matches_search("Привет мир", "ПРИВЕТ"));
        assert!(!matches_search("Backend Team", "frontend"));
        assert!(!matches_search("", "x"));
    }

    #[test]
    fn without_folder_partition_follows_chat_flag() {
        let chats = vec![
            pinned(1, "Saved"),
            chat(2, "General", ChatKind::Group),
            pinned(3, "Family"),
            chat(4, "News", ChatKind::Channel),
        ];

        let visible = visible_chats(&chats, "", None);

        assert_eq!(ids(&visible.pinned), vec![1, 3]);
        assert_eq!(ids(&visible.unpinned), vec![2, 4]);
    }

    #[test]
    fn no_chat_appears_in_both_partitions() {
        let chats = vec![pinned(1, "A"), chat(2, "B", ChatKind::Group)];

        for item in &chats {
            let in_pinned = is_visible(item, "", true, None);
            let in_unpinned = is_visible(item, "", false, None);
            assert_ne!(in_pinned, in_unpinned);
        }
    }

    #[test]
    fn folder_pins_replace_chat_flag() {
        let chats = vec![pinned(1, "Saved"), chat(2, "General", ChatKind::Group)];
        let folder = ChatFolder {
            pinned_chat_ids: HashSet::from([2]),
            include_groups: true,
            include_non_contacts: true,
            ..ChatFolder::default()
        };
        let contacts = HashSet::new();
        let context = FolderContext {
            folder: &folder,
            contact_ids: &contacts,
        };

        let visible = visible_chats(&chats, "", Some(context));

        assert_eq!(ids(&visible.pinned), vec![2]);
        assert_eq!(ids(&visible.unpinned), vec![1]);
    }

    #[test]
    fn inclusion_overrides_exclusion() {
        let item = chat(7, "Ops", ChatKind::Group);
        let folder = ChatFolder {
            included_chat_ids: HashSet::from([7]),
            excluded_chat_ids: HashSet::from([7]),
            ..ChatFolder::default()
        };
        let contacts = HashSet::new();
        let context = FolderContext {
            folder: &folder,
            contact_ids: &contacts,
        };

        assert!(folder_includes(&item, context));
        assert!(is_visible(&item, "", false, Some(context)));
    }

    #[test]
    fn exclusion_overrides_category_toggle() {
        let item = chat(7, "Ops", ChatKind::Group);
        let folder = ChatFolder {
            include_groups: true,
            excluded_chat_ids: HashSet::from([7]),
            ..ChatFolder::default()
        };
        let contacts = HashSet::new();

        assert!(!folder_includes(
            &item,
            FolderContext {
                folder: &folder,
                contact_ids: &contacts,
            }
        ));
    }

    #[test]
    fn group_folder_shows_groups_but_not_uncategorized_chats() {
        let folder = ChatFolder {
            include_groups: true,
            ..ChatFolder::default()
        };
        let contacts = HashSet::new();
        let context = FolderContext {
            folder: &folder,
            contact_ids: &contacts,
        };

        assert!(folder_includes(&chat(1, "Team", ChatKind::Group), context));
        assert!(!folder_includes(&chat(2, "Secret", ChatKind::Secret), context));
    }

    #[test]
    fn private_non_contact_follows_non_contact_toggle() {
        let folder = ChatFolder {
            include_non_contacts: true,
            include_contacts: false,
            ..ChatFolder::default()
        };
        let contacts = HashSet::from([99]);
        let context = FolderContext {
            folder: &folder,
            contact_ids: &contacts,
        };

        assert!(folder_includes(&chat(5, "Stranger", ChatKind::Private), context));
        assert!(!folder_includes(&chat(99, "Friend", ChatKind::Private), context));
    }

    #[test]
    fn bots_only_follow_bot_toggle() {
        let bot = Chat {
            is_bot: true,
            ..chat(5, "Weather bot", ChatKind::Private)
        };
        let contacts = HashSet::from([5]);
        let without_bots = ChatFolder {
            include_contacts: true,
            include_non_contacts: true,
            ..ChatFolder::default()
        };
        let with_bots = ChatFolder {
            include_bots: true,
            ..ChatFolder::default()
        };

        assert!(!folder_includes(
            &bot,
            FolderContext {
                folder: &without_bots,
                contact_ids: &contacts,
            }
        ));
        assert!(folder_includes(
            &bot,
            FolderContext {
                folder: &with_bots,
                contact_ids: &contacts,
            }
        ));
    }

    #[test]
    fn search_applies_under_folder() {
        let chats = vec![
            chat(1, "Backend", ChatKind::Group),
            chat(2, "Design", ChatKind::Group),
        ];
        let folder = ChatFolder {
            include_groups: true,
            ..ChatFolder::default()
        };
        let contacts = HashSet::new();
        let context = FolderContext {
            folder: &folder,
            contact_ids: &contacts,
        };

        let visible = visible_chats(&chats, "back", Some(context));

        assert_eq!(ids(&visible.unpinned), vec![1]);
        assert!(visible.pinned.is_empty());
    }

    #[test]
    fn visible_rows_put_pinned_before_unpinned() {
        let chats = vec![
            chat(1, "A", ChatKind::Group),
            pinned(2, "B"),
            chat(3, "C", ChatKind::Channel),
        ];

        let visible = visible_chats(&chats, "", None);

        assert_eq!(visible.rows().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        assert_eq!(visible.get(1).map(|c| c.id), Some(1));
        assert_eq!(visible.position(3), Some(2));
        assert_eq!(visible.len(), 3);
    }
}
