//! Command implementations
//!
//! Each command returns a serializable result; printing and the exit status
//! are decided by the caller.

pub mod provision;
pub mod ingest;
pub mod linkage;
pub mod check;

use std::io::Write;
use std::process::ExitCode;

use serde::Serialize;

use crate::error::CliError;

/// How a command ended, as reflected in the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandStatus {
    /// Exit 0
    Success,
    /// Exit 2: data was rejected or found inconsistent
    Rejected,
    /// Exit 1: a batch could not be judged
    Failed,
}

impl CommandStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failed => ExitCode::from(1),
            CommandStatus::Rejected => ExitCode::from(2),
        }
    }
}

/// Prints a result to stdout as pretty JSON
pub fn emit<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout).map_err(|e| CliError::Output(serde_json::Error::io(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_outranks_rejection() {
        let worst = [CommandStatus::Rejected, CommandStatus::Failed, CommandStatus::Success]
            .into_iter()
            .max();
        assert_eq!(worst, Some(CommandStatus::Failed));
    }
}
