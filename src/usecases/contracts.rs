use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

/// Source of shell events: key presses, ticks and background signals.
/// `Ok(None)` means the event was ignored and the loop should poll again.
pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

/// Owns the shell state and reacts to events.
pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}
