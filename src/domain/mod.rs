//! Domain layer: core entities and business rules.

pub mod chat;
pub mod chat_filter;
pub mod chat_list_state;
pub mod contacts;
pub mod events;
pub mod folder;
pub mod links;
pub mod settings;
pub mod shell_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
