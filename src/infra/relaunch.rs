use std::{
    env,
    process::Command,
    sync::mpsc::Sender,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};

use crate::infra::contracts::Relauncher;

const RELAUNCH_TIMER_SPAWN_FAILED: &str = "RELAUNCH_TIMER_SPAWN_FAILED";

/// Fires a relaunch signal into the shell's event stream once the delay elapses.
#[derive(Debug, Clone)]
pub struct TimerRelauncher {
    signal_tx: Sender<()>,
}

impl TimerRelauncher {
    pub fn new(signal_tx: Sender<()>) -> Self {
        Self { signal_tx }
    }
}

impl Relauncher for TimerRelauncher {
    fn schedule(&self, delay: Duration) {
        let signal_tx = self.signal_tx.clone();
        let spawned = thread::Builder::new()
            .name("telewatch-relaunch".to_owned())
            .spawn(move || {
                thread::sleep(delay);
                let _ = signal_tx.send(());
            });

        match spawned {
            Ok(_) => tracing::info!(delay_ms = delay.as_millis() as u64, "relaunch scheduled"),
            Err(error) => tracing::warn!(
                code = RELAUNCH_TIMER_SPAWN_FAILED,
                error = %error,
                "relaunch timer could not be started"
            ),
        }
    }
}

/// Replaces the running process with a fresh copy of the current executable.
///
/// Only returns on failure. The terminal must already be restored.
pub fn relaunch_current_process() -> Result<()> {
    let executable = env::current_exe().context("failed to resolve current executable")?;
    let args: Vec<_> = env::args_os().skip(1).collect();

    tracing::info!(executable = %executable.display(), "relaunching");

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;

        let error = Command::new(&executable).args(&args).exec();
        Err(error).context("failed to exec relaunched process")
    }

    #[cfg(not(unix))]
    {
        Command::new(&executable)
            .args(&args)
            .spawn()
            .context("failed to spawn relaunched process")?;
        std::process::exit(0)
    }
}
