use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    /// The job table already holds `max_jobs` entries
    #[error("maximum number of background processes already running.")]
    TableFull,

    /// Process creation itself failed; the interpreter cannot continue
    #[error("failed to launch {program}: {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Command not recognized")]
    CommandNotFound { program: String },

    #[error("bg requires an argument to run a program in the background")]
    MissingProgram,

    #[error("Usage: {command} [processNum]")]
    InvalidUsage { command: &'static str },

    #[error("No background process with processNum [{index}] running")]
    NoSuchJob { index: i64 },

    #[error("{command} failed")]
    SignalFailed {
        command: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("Permission Denied")]
    PermissionDenied,

    #[error("Not a valid directory")]
    InvalidDirectory,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Fatal errors end the interpreter with a nonzero exit code. Everything
    /// else is reported and the loop carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::SpawnFailure { .. } | ShellError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_interpreter_output() {
        assert_eq!(
            ShellError::InvalidUsage { command: "stop" }.to_string(),
            "Usage: stop [processNum]"
        );
        assert_eq!(
            ShellError::NoSuchJob { index: 7 }.to_string(),
            "No background process with processNum [7] running"
        );
        assert_eq!(
            ShellError::SignalFailed { command: "kill", source: nix::Error::ESRCH }.to_string(),
            "kill failed"
        );
    }

    #[test]
    fn test_only_launch_and_input_errors_are_fatal() {
        let spawn = ShellError::SpawnFailure {
            program: "sleep".into(),
            source: io::Error::new(io::ErrorKind::Other, "fork"),
        };
        assert!(spawn.is_fatal());
        assert!(!ShellError::TableFull.is_fatal());
        assert!(!ShellError::CommandNotFound { program: "nope".into() }.is_fatal());
        assert!(!ShellError::PermissionDenied.is_fatal());
    }
}
