//! Run configuration.
//!
//! Everything comes from the command line; the binary converts its parsed
//! arguments into a [`RunConfig`].

use std::io::IsTerminal;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `<name>: OK (<value>)` lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn resolve(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Applies the choice to every `colored` string in the process.
    pub fn apply(self) {
        colored::control::set_override(self.resolve());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Units to run; empty means all of them.
    pub only: Vec<String>,
    pub quiet: bool,
}

impl RunConfig {
    pub fn runs_everything(&self) -> bool {
        self.only.is_empty()
    }
}
