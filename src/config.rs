use std::env;
use std::path::PathBuf;

pub const MAX_JOBS: usize = 5;

/// Program name plus at most 14 arguments.
pub const MAX_TOKENS: usize = 15;

const HISTORY_FILE_NAME: &str = ".bgshell_history";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub max_jobs: usize,
    pub max_tokens: usize,
    /// `None` keeps history in memory only.
    pub history_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_jobs: MAX_JOBS,
            max_tokens: MAX_TOKENS,
            history_file: default_history_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("RSHELL_HISTFILE") {
            // empty value turns persistence off
            config.history_file = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Some(filter) = lookup("RSHELL_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }
}

fn default_history_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE_NAME))
}
