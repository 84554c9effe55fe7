use nix::sys::signal::Signal;
use tracing::{debug, warn};

use crate::error::{Result, ShellError};
use crate::jobs::{JobHandle, JobState, JobTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Kill,
    Stop,
    Resume,
}

impl JobAction {
    pub fn command_name(self) -> &'static str {
        match self {
            JobAction::Kill => "kill",
            JobAction::Stop => "stop",
            JobAction::Resume => "resume",
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            JobAction::Kill => Signal::SIGTERM,
            JobAction::Stop => Signal::SIGSTOP,
            JobAction::Resume => Signal::SIGCONT,
        }
    }
}

/// A successful kill removes the job right away; a later reap collects it.
pub fn apply_action<H: JobHandle>(
    table: &mut JobTable<H>,
    index_arg: Option<&str>,
    action: JobAction,
) -> Result<()> {
    let command = action.command_name();
    let index = parse_index(index_arg, command)?;

    let slot = usize::try_from(index)
        .ok()
        .filter(|&i| table.get(i).is_some())
        .ok_or(ShellError::NoSuchJob { index })?;

    let job = table
        .get_mut(slot)
        .ok_or(ShellError::NoSuchJob { index })?;

    job.signal(action.signal())
        .map_err(|source| ShellError::SignalFailed { command, source })?;
    debug!(index = slot, pid = %job.pid(), signal = %action.signal(), "signal delivered");

    match action {
        JobAction::Kill => {
            // a stopped process only acts on SIGTERM once it runs again
            if job.state() == JobState::Stopped {
                if let Err(e) = job.signal(Signal::SIGCONT) {
                    warn!(index = slot, pid = %job.pid(), error = %e, "could not continue killed job");
                }
            }
            table.retire_at(slot);
        }
        JobAction::Stop => job.set_state(JobState::Stopped),
        JobAction::Resume => job.set_state(JobState::Running),
    }

    Ok(())
}

// negative numbers parse here and fail the range check instead
fn parse_index(arg: Option<&str>, command: &'static str) -> Result<i64> {
    arg.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(ShellError::InvalidUsage { command })
}
