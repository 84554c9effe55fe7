use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, ShellError};
use crate::jobs::{JobHandle, JobTable};

pub fn print_working_directory() -> Result<()> {
    // cwd may have been removed underneath us
    let cwd = env::current_dir().map_err(|_| ShellError::InvalidDirectory)?;
    println!("{}", cwd.display());
    Ok(())
}

/// `cd`, `cd ~` and `cd <path>`. The first two go to `$HOME`.
pub fn change_directory(arg: Option<&str>) -> Result<()> {
    let home = env::var_os("HOME").map(PathBuf::from);
    let target = resolve_target(arg, home).ok_or(ShellError::InvalidDirectory)?;

    env::set_current_dir(&target).map_err(|e| {
        debug!(target = %target.display(), error = %e, "cd failed");
        cd_error(&e)
    })
}

fn cd_error(err: &io::Error) -> ShellError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ShellError::PermissionDenied,
        _ => ShellError::InvalidDirectory,
    }
}

fn resolve_target(arg: Option<&str>, home: Option<PathBuf>) -> Option<PathBuf> {
    match arg {
        None | Some("~") => home,
        Some(path) => Some(PathBuf::from(path)),
    }
}

/// `bglist` output: one line per job, then a total.
pub fn write_job_list<H: JobHandle, W: Write>(table: &JobTable<H>, out: &mut W) -> io::Result<()> {
    if table.is_empty() {
        return writeln!(out, "No background jobs running");
    }

    for (index, job) in table.iter().enumerate() {
        writeln!(out, "{} [{}]: {}", index, job.state().flag(), job)?;
    }
    writeln!(out, "Total Background jobs: {}", table.len())
}

pub fn print_help() {
    println!("Available commands:");
    println!("  pwd                 - Print working directory");
    println!("  cd [path|~]         - Change directory (no argument or ~ goes home)");
    println!("  bg <program> [args] - Run a program in the background");
    println!("  bglist              - List background jobs");
    println!("  bgkill <n>          - Terminate background job n");
    println!("  stop <n>            - Suspend background job n");
    println!("  start <n>           - Resume background job n");
    println!("  history             - Show command history");
    println!("  quit                - Exit the shell");
    println!("\nAnything else runs as a foreground program.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{apply_action, JobAction};
    use crate::jobs::fake::table_with;

    fn render(table: &JobTable<crate::jobs::fake::FakeHandle>) -> String {
        let mut out = Vec::new();
        write_job_list(table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_job_list() {
        let (table, _flags) = table_with(&[]);
        assert_eq!(render(&table), "No background jobs running\n");
    }

    #[test]
    fn test_job_list_shows_index_state_name_pid() {
        let (mut table, _flags) = table_with(&["sleep100", "sleep200"]);
        apply_action(&mut table, Some("1"), JobAction::Stop).unwrap();

        assert_eq!(
            render(&table),
            "0 [R]: sleep100 3E8\n1 [S]: sleep200 3E9\nTotal Background jobs: 2\n"
        );
    }

    #[test]
    fn test_resolve_target() {
        let home = Some(PathBuf::from("/home/someone"));
        assert_eq!(resolve_target(None, home.clone()), home);
        assert_eq!(resolve_target(Some("~"), home.clone()), home);
        assert_eq!(resolve_target(Some("/tmp"), home), Some(PathBuf::from("/tmp")));
        assert_eq!(resolve_target(None, None), None);
    }

    #[test]
    fn test_cd_error_mapping() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(cd_error(&denied), ShellError::PermissionDenied));
        assert_eq!(cd_error(&denied).to_string(), "Permission Denied");

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(cd_error(&missing), ShellError::InvalidDirectory));
        assert_eq!(cd_error(&missing).to_string(), "Not a valid directory");
    }

    #[test]
    fn test_cd_into_missing_or_non_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = change_directory(missing.to_str()).unwrap_err();
        assert!(matches!(err, ShellError::InvalidDirectory));

        let file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        let err = change_directory(file.path().to_str()).unwrap_err();
        assert!(matches!(err, ShellError::InvalidDirectory));
    }
}
