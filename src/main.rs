//! CLI entry point for bibchex.

use std::process::ExitCode;

mod app;
mod cli;

/// Process outcome mapped to the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// The run completed; individual lookup failures are reported, not fatal.
    Success,
    /// The run stopped early (missing credential, unreadable input, failed export).
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let exit = match app::runtime::run_bibchex().await {
        Ok(exit) => exit,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ProcessExit::Failure
        }
    };
    exit.into()
}
