//! Signal dispositions for the interpreter and the children it launches.

use std::io;

/// Keep Ctrl-C and Ctrl-\ from taking the interpreter down; the foreground
/// child still receives them through the terminal's process group.
pub fn ignore_interactive_signals() {
    #[cfg(unix)]
    unsafe {
        use libc::{signal, SIGINT, SIGQUIT, SIG_IGN};
        signal(SIGINT, SIG_IGN);
        signal(SIGQUIT, SIG_IGN);
    }
}

/// Runs in the forked child right before exec. Ignored dispositions survive
/// exec, so anything the interpreter ignores has to be put back here.
///
/// Only async-signal-safe calls are allowed in this function.
pub fn restore_default_signals() -> io::Result<()> {
    #[cfg(unix)]
    unsafe {
        use libc::{signal, SIGINT, SIGQUIT, SIG_DFL, SIG_ERR};
        if signal(SIGINT, SIG_DFL) == SIG_ERR || signal(SIGQUIT, SIG_DFL) == SIG_ERR {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
