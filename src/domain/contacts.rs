use super::chat::Chat;

/// Contact list opened over the chat list, with its own selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsScreen {
    contacts: Vec<Chat>,
    selected_index: Option<usize>,
}

impl ContactsScreen {
    pub fn new(contacts: Vec<Chat>) -> Self {
        let selected_index = if contacts.is_empty() { None } else { Some(0) };
        Self {
            contacts,
            selected_index,
        }
    }

    pub fn contacts(&self) -> &[Chat] {
        &self.contacts
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_contact(&self) -> Option<&Chat> {
        self.selected_index
            .and_then(|index| self.contacts.get(index))
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.contacts.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }
}
