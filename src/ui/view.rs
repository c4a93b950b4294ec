use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    chat::{Chat, ChatKind},
    chat_filter::VisibleChats,
    chat_list_state::{ChatListState, ChatListUiState},
    contacts::ContactsScreen,
    links::{first_link, segment_links, TextSegment},
    settings::{SettingItem, SettingsPage, SettingsScreen},
    shell_state::{Screen, ShellState, UiPreferences},
};

use super::styles;

const EMPTY_TIMESTAMP: &str = "     ";
const ELLIPSIS: &str = "...";
const SLIDER_CELLS: usize = 10;

pub fn render(frame: &mut Frame<'_>, state: &ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let chat_list_percent = chat_list_percent(state.preferences());
    let [chats_area, side_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(chat_list_percent),
            Constraint::Percentage(100 - chat_list_percent),
        ])
        .areas(content_area);

    render_chat_list_panel(frame, chats_area, state);
    match state.current_screen() {
        None => render_chat_detail(frame, side_area, state.chat_list().selected_chat()),
        Some(Screen::Settings(screen)) => render_settings(frame, side_area, screen),
        Some(Screen::Contacts(screen)) => render_contacts(frame, side_area, screen),
        Some(Screen::About) => render_about(frame, side_area),
        Some(Screen::DataCollection) => {
            render_data_collection(frame, side_area, state.preferences())
        }
    }

    frame.render_widget(Paragraph::new(status_line(state)), status_area);
}

fn chat_list_percent(preferences: UiPreferences) -> u16 {
    preferences.chat_list_width.round().clamp(10.0, 90.0) as u16
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::panel_border_style())
}

fn render_chat_list_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let chat_list = state.chat_list();
    let block = panel(chat_list_title(chat_list));

    let placeholder = match chat_list.ui_state() {
        ChatListUiState::Loading => Some("Loading chats..."),
        ChatListUiState::Empty => Some("No chats yet."),
        ChatListUiState::Unauthorized => Some("Not logged in. No saved session was found."),
        ChatListUiState::Error => Some("Failed to load chats. Press r to retry."),
        ChatListUiState::Ready => None,
    };
    if let Some(placeholder) = placeholder {
        let message = Paragraph::new(placeholder)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let visible = chat_list.visible();
    if visible.is_empty() {
        frame.render_widget(Paragraph::new("No matching chats.").block(block), area);
        return;
    }

    // Inner width = area width - 2 (borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let items = build_chat_list_items(
        &visible,
        inner_width,
        state.preferences().show_message_preview,
    );
    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_row_style());

    let mut list_state = ListState::default();
    list_state.select(
        chat_list
            .selected_index()
            .map(|index| compute_visual_index(&visible, index)),
    );
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn chat_list_title(chat_list: &ChatListState) -> String {
    let mut title = match chat_list.folder() {
        Some(active) => format!("Chats: {}", active.tab.label),
        None => "Chats".to_owned(),
    };

    if chat_list.is_search_active() || !chat_list.search().is_empty() {
        title.push_str(" /");
        title.push_str(chat_list.search());
        if chat_list.is_search_active() {
            title.push('_');
        }
    }

    title
}

/// Builds the list of visual items including section headers.
fn build_chat_list_items(
    visible: &VisibleChats<'_>,
    width: usize,
    show_preview: bool,
) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let has_pinned = !visible.pinned.is_empty();

    if has_pinned {
        items.push(section_header_item("Pinned"));
        for chat in &visible.pinned {
            items.push(ListItem::new(chat_list_item_line(chat, width, show_preview)));
        }
    }

    if !visible.unpinned.is_empty() || !has_pinned {
        items.push(section_header_item("All Chats"));
        for chat in &visible.unpinned {
            items.push(ListItem::new(chat_list_item_line(chat, width, show_preview)));
        }
    }

    items
}

/// Computes the visual index in the list (accounting for section headers).
fn compute_visual_index(visible: &VisibleChats<'_>, chat_index: usize) -> usize {
    let pinned_count = visible.pinned.len();

    if chat_index < pinned_count {
        chat_index + 1
    } else if pinned_count > 0 {
        chat_index + 2
    } else {
        chat_index + 1
    }
}

fn section_header_item(title: &str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        format!("-- {title} --"),
        styles::section_header_style(),
    )))
}

fn chat_list_item_line(chat: &Chat, width: usize, show_preview: bool) -> Line<'static> {
    let timestamp = chat
        .last_message_unix_ms
        .map(format_chat_timestamp)
        .unwrap_or_else(|| EMPTY_TIMESTAMP.to_owned());
    let bot_marker = if chat.is_private() && chat.is_bot {
        " [bot]"
    } else {
        ""
    };
    let unread_badge = if chat.unread_count > 0 {
        format!(" [{}]", chat.unread_count)
    } else {
        String::new()
    };

    // timestamp (5) + " | " (3)
    let used = 8 + chat.title.width() + bot_marker.width() + unread_badge.width();
    let available = width.saturating_sub(used);

    let mut spans = vec![
        Span::styled(format!("{timestamp:>5}"), styles::timestamp_style()),
        Span::styled(" | ", styles::separator_style()),
        Span::styled(chat.title.clone(), styles::chat_name_style()),
    ];
    if !bot_marker.is_empty() {
        spans.push(Span::styled(bot_marker, styles::bot_marker_style()));
    }

    let mut padding = available;
    if show_preview && available > 1 {
        let normalized = normalize_preview(&chat.last_message_preview);
        let raw_preview = if normalized.is_empty() {
            "No messages yet".to_owned()
        } else {
            normalized
        };
        let preview = truncate_to_width(&raw_preview, available - 1);
        padding = available - 1 - preview.width();

        let preview_style = if chat.is_read {
            styles::chat_preview_style()
        } else {
            styles::detail_text_style()
        };
        spans.push(Span::raw(" "));
        spans.extend(segment_links(&preview).into_iter().map(|segment| match segment {
            TextSegment::Plain(plain) => Span::styled(plain.to_owned(), preview_style),
            TextSegment::Link(link) => Span::styled(link.to_owned(), styles::link_style()),
        }));
    }

    if padding > 0 {
        spans.push(Span::raw(" ".repeat(padding)));
    }
    if !unread_badge.is_empty() {
        spans.push(Span::styled(unread_badge, styles::unread_count_style()));
    }

    Line::from(spans)
}

fn normalize_preview(preview: &str) -> String {
    preview.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with an ellipsis.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut truncated = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        truncated.push(ch);
    }

    if max_width >= ELLIPSIS.len() {
        truncated.push_str(ELLIPSIS);
    }
    truncated
}

fn format_chat_timestamp(timestamp_ms: i64) -> String {
    use chrono::{Local, TimeZone};

    let datetime = match Local.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => return EMPTY_TIMESTAMP.to_owned(),
    };

    if datetime.date_naive() == Local::now().date_naive() {
        datetime.format("%H:%M").to_string()
    } else {
        datetime.format("%d.%m").to_string()
    }
}

fn render_chat_detail(frame: &mut Frame<'_>, area: Rect, chat: Option<&Chat>) {
    let Some(chat) = chat else {
        let hint = Paragraph::new("Select a chat with j/k.").block(panel("Chat".to_owned()));
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(kind_label(chat), styles::status_hint_style())),
        Line::from(""),
        preview_line(&chat.last_message_preview),
    ];
    if first_link(&chat.last_message_preview).is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "o: open link",
            styles::status_hint_style(),
        )));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(chat.title.clone()));
    frame.render_widget(detail, area);
}

fn kind_label(chat: &Chat) -> &'static str {
    match chat.kind {
        ChatKind::Private if chat.is_bot => "Bot",
        ChatKind::Private => "Private chat",
        ChatKind::Group => "Group",
        ChatKind::Channel => "Channel",
        ChatKind::Secret => "Secret chat",
    }
}

/// Renders message text with links highlighted.
fn preview_line(text: &str) -> Line<'static> {
    if text.is_empty() {
        return Line::from(Span::styled(
            "No messages yet",
            styles::chat_preview_style(),
        ));
    }

    let spans: Vec<Span<'static>> = segment_links(text)
        .into_iter()
        .map(|segment| match segment {
            TextSegment::Plain(plain) => {
                Span::styled(plain.to_owned(), styles::detail_text_style())
            }
            TextSegment::Link(link) => Span::styled(link.to_owned(), styles::link_style()),
        })
        .collect();
    Line::from(spans)
}

fn render_settings(frame: &mut Frame<'_>, area: Rect, screen: &SettingsScreen) {
    let block = panel(screen.title().to_owned());
    if screen.items().is_empty() {
        frame.render_widget(Paragraph::new("Nothing to configure here.").block(block), area);
        return;
    }

    let items: Vec<ListItem<'static>> = screen
        .items()
        .iter()
        .map(|item| ListItem::new(setting_item_line(item)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_row_style())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(screen.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_contacts(frame: &mut Frame<'_>, area: Rect, screen: &ContactsScreen) {
    let block = panel(format!("Contacts ({})", screen.contacts().len()));
    if screen.contacts().is_empty() {
        frame.render_widget(Paragraph::new("No contacts.").block(block), area);
        return;
    }

    let items: Vec<ListItem<'static>> = screen
        .contacts()
        .iter()
        .map(|contact| ListItem::new(contact_line(contact)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_row_style())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(screen.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn contact_line(contact: &Chat) -> Line<'static> {
    let mut spans = vec![Span::styled(contact.title.clone(), styles::chat_name_style())];
    if contact.is_bot {
        spans.push(Span::styled(" [bot]", styles::bot_marker_style()));
    }
    if !contact.last_message_preview.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            normalize_preview(&contact.last_message_preview),
            styles::chat_preview_style(),
        ));
    }
    Line::from(spans)
}

fn setting_item_line(item: &SettingItem) -> Line<'static> {
    let label = item.label().to_owned();
    match item {
        SettingItem::Click { .. } => Line::from(label),
        SettingItem::Switch { selected, .. } => {
            let marker = if *selected { "[x] " } else { "[ ] " };
            Line::from(vec![
                Span::styled(marker, styles::setting_value_style()),
                Span::raw(label),
            ])
        }
        SettingItem::ProgressBar {
            value, min, max, ..
        } => Line::from(vec![
            Span::raw(format!("{label} ")),
            Span::styled(slider_bar(*value, *min, *max), styles::setting_value_style()),
            Span::raw(format!(" {value:.0}")),
        ]),
    }
}

fn slider_bar(value: f64, min: f64, max: f64) -> String {
    let range = max - min;
    let ratio = if range > 0.0 {
        ((value - min) / range).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * SLIDER_CELLS as f64).round() as usize;

    format!("[{}{}]", "#".repeat(filled), "-".repeat(SLIDER_CELLS - filled))
}

fn render_about(frame: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("telewatch {}", env!("CARGO_PKG_VERSION")),
            styles::chat_name_style(),
        )),
        Line::from(env!("CARGO_PKG_DESCRIPTION")),
    ];

    let about = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel("About".to_owned()));
    frame.render_widget(about, area);
}

fn render_data_collection(frame: &mut Frame<'_>, area: Rect, preferences: UiPreferences) {
    let status = if preferences.data_collection_allowed {
        "Allowed"
    } else {
        "Not allowed"
    };
    let lines = vec![
        Line::from("Anonymous usage statistics help improve the client."),
        Line::from("No message content is ever collected."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(status, styles::setting_value_style()),
        ]),
    ];

    let consent = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel("Data collection".to_owned()));
    frame.render_widget(consent, area);
}

fn status_line(state: &ShellState) -> Line<'static> {
    if let Some(notice) = state.notice() {
        return Line::from(Span::styled(
            format!(" {} ", notice.text),
            styles::notice_style(),
        ));
    }

    let hint = match state.current_screen() {
        None if state.chat_list().is_search_active() => {
            "type to search | Enter: keep | Esc: clear"
        }
        None => {
            "j/k: move | /: search | Tab: folder | c: contacts | o: open link | s: settings | q: quit"
        }
        Some(Screen::Settings(screen)) if screen.page() == Some(SettingsPage::Interface) => {
            "j/k: move | Enter: toggle | h/l: adjust | Esc: back"
        }
        Some(Screen::Settings(_)) => "j/k: move | Enter: select | Esc: back",
        Some(Screen::Contacts(_)) => "j/k: move | Enter: show chat | Esc: back",
        Some(Screen::About) => "Esc: back",
        Some(Screen::DataCollection) => "Enter: toggle | Esc: back",
    };
    Line::from(Span::styled(hint, styles::status_hint_style()))
}
