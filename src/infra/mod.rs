//! Infrastructure layer: adapters for config, storage, and OS integrations.

pub mod config;
pub mod contracts;
pub mod error;
pub mod fs_cleanup;
pub mod instance_lock;
pub mod logging;
pub mod opener;
pub mod preferences;
pub mod relaunch;
pub mod storage_layout;
pub mod stubs;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
