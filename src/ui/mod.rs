//! UI layer: terminal session, input mapping and rendering.

mod event_source;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::CrosstermEventSource;
pub(crate) use terminal::install_panic_restore;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
