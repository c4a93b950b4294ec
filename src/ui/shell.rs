use anyhow::Result;

use crate::{
    domain::shell_state::{ShellExit, ShellState},
    usecases::contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

/// Runs the TUI until the orchestrator stops. The terminal is restored before returning.
pub fn start(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<ShellExit> {
    tracing::info!("starting TUI shell");

    let mut terminal = TerminalSession::new()?;
    let exit = run_loop(event_source, orchestrator, |state| {
        terminal.draw(|frame| view::render(frame, state))
    });
    drop(terminal);

    let exit = exit?;
    tracing::info!(exit = ?exit, "TUI shell stopped");
    Ok(exit)
}

fn run_loop<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<ShellExit>
where
    D: FnMut(&ShellState) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(orchestrator.state())?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(orchestrator.state().exit())
}
