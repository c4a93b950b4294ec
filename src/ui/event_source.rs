use std::{sync::mpsc::Receiver, time::Duration};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Terminal input merged with the signals background threads send to the shell.
pub struct CrosstermEventSource {
    chat_updates: Receiver<()>,
    relaunch: Receiver<()>,
}

impl CrosstermEventSource {
    pub fn new(chat_updates: Receiver<()>, relaunch: Receiver<()>) -> Self {
        Self {
            chat_updates,
            relaunch,
        }
    }

    fn pending_signal(&self) -> Option<AppEvent> {
        if self.relaunch.try_recv().is_ok() {
            return Some(AppEvent::RelaunchRequested);
        }

        // Bursts of chat updates collapse into one refresh.
        let mut updated = false;
        while self.chat_updates.try_recv().is_ok() {
            updated = true;
        }
        updated.then_some(AppEvent::ChatsUpdated)
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(signal) = self.pending_signal() {
            return Ok(Some(signal));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(None);
            }
            return Ok(map_key(key));
        }

        Ok(None)
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let name = match key.code {
        KeyCode::Char('c') if ctrl => return Some(AppEvent::QuitRequested),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
