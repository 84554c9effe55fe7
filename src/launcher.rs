use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{Result, ShellError};
use crate::signals;

/// `argv[0]` is the program name.
pub fn spawn_foreground(argv: &[String]) -> Result<ExitStatus> {
    let (program, mut cmd) = build(argv)?;

    let mut child = cmd.spawn().map_err(|e| launch_error(program, e))?;
    debug!(program = %program, pid = child.id(), "foreground spawn");

    let status = child.wait()?;
    debug!(program = %program, %status, "foreground exit");
    Ok(status)
}

pub fn spawn_background(argv: &[String]) -> Result<Child> {
    let (program, mut cmd) = build(argv)?;

    // the line editor owns the terminal input
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let child = cmd.spawn().map_err(|e| launch_error(program, e))?;
    debug!(program = %program, pid = child.id(), "background spawn");
    Ok(child)
}

fn build(argv: &[String]) -> Result<(&str, Command)> {
    let (program, args) = argv.split_first().ok_or(ShellError::MissingProgram)?;

    let mut cmd = Command::new(program);
    cmd.args(args);
    unsafe {
        cmd.pre_exec(signals::restore_default_signals);
    }

    Ok((program.as_str(), cmd))
}

// exec errors come back from spawn with the child's errno
fn launch_error(program: &str, err: io::Error) -> ShellError {
    let not_runnable = matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || err.raw_os_error() == Some(libc::ENOEXEC);

    if not_runnable {
        debug!(program = %program, error = %err, "exec failed");
        ShellError::CommandNotFound {
            program: program.to_string(),
        }
    } else {
        ShellError::SpawnFailure {
            program: program.to_string(),
            source: err,
        }
    }
}
