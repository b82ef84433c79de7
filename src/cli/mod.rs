//! CLI module.

pub mod args;
pub mod prompt;
pub mod run;

pub use args::Args;
pub use prompt::run_interactive;
pub use run::run_command;

use crate::download::BatchResult;
use crate::error::exit_codes;

/// How a CLI session ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The batch ran; individual files may still have failed.
    Completed(BatchResult),
    /// No links were found, or none survived the filter.
    NothingFound,
    /// The user declined the download.
    Declined,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(result) if result.failed > 0 => exit_codes::DOWNLOAD_ERROR,
            RunOutcome::Completed(_) | RunOutcome::Declined => exit_codes::SUCCESS,
            RunOutcome::NothingFound => exit_codes::NOTHING_FOUND,
        }
    }
}
