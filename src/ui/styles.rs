//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Chat list styles
// =============================================================================

/// Style for chat name (bold, bright).
pub fn chat_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for message preview text (dimmed).
pub fn chat_preview_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for unread count badge (green).
pub fn unread_count_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Style for section headers like "-- Pinned --".
pub fn section_header_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for timestamp column.
pub fn timestamp_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for separator between timestamp and content.
pub fn separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the bot marker after a chat name.
pub fn bot_marker_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn selected_row_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Detail and settings styles
// =============================================================================

/// Style for detected links (underlined cyan).
pub fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn detail_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for an enabled switch or the filled part of a slider.
pub fn setting_value_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn panel_border_style() -> Style {
    Style::default().fg(Color::Gray)
}

// =============================================================================
// Status line styles
// =============================================================================

pub fn status_hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for transient notices such as "Successful".
pub fn notice_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}
