use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::settings::MediaDir;

#[derive(Debug, Parser)]
#[command(name = "telewatch", about = "Compact watch-style Telegram client (TUI)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start TUI shell
    Run,
    /// Delete the cache or one media directory without starting the shell
    Clear {
        #[arg(value_enum)]
        target: ClearTarget,
    },
    /// Wipe cache, chat library and preferences
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearTarget {
    Cache,
    Thumbnails,
    Photos,
    Videos,
    Temp,
}

impl ClearTarget {
    /// Media directory behind the target; `None` for the plain cache.
    pub fn media(self) -> Option<MediaDir> {
        match self {
            Self::Cache => None,
            Self::Thumbnails => Some(MediaDir::Thumbnails),
            Self::Photos => Some(MediaDir::Photos),
            Self::Videos => Some(MediaDir::Videos),
            Self::Temp => Some(MediaDir::Temp),
        }
    }
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
