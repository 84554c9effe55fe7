use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

pub struct History {
    commands: Vec<String>,
    file_path: Option<PathBuf>,
    position: usize,
}

impl History {
    pub fn new(file_path: Option<PathBuf>) -> Self {
        let commands = file_path
            .as_deref()
            .map(Self::load_from_file)
            .unwrap_or_default();
        let position = commands.len();

        Self {
            commands,
            file_path,
            position,
        }
    }

    fn load_from_file(path: &Path) -> Vec<String> {
        match File::open(path) {
            Ok(file) => BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .filter(|line| !line.trim().is_empty())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn add(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }

        // Don't add duplicate of last command
        if self.commands.last().map(String::as_str) != Some(command) {
            self.commands.push(command.to_string());
            self.save_to_file(command);
        }

        self.position = self.commands.len();
    }

    fn save_to_file(&self, command: &str) {
        let Some(path) = &self.file_path else {
            return;
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{}", command));

        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "could not write history");
        }
    }

    pub fn previous(&mut self) -> Option<&str> {
        if self.position > 0 {
            self.position -= 1;
            self.commands.get(self.position).map(String::as_str)
        } else {
            None
        }
    }

    pub fn next(&mut self) -> Option<&str> {
        if self.position + 1 < self.commands.len() {
            self.position += 1;
            Some(&self.commands[self.position])
        } else {
            self.position = self.commands.len();
            None
        }
    }

    /// Forget any up/down navigation; called when a new line starts.
    pub fn reset_position(&mut self) {
        self.position = self.commands.len();
    }

    pub fn entries(&self) -> &[String] {
        &self.commands
    }

    pub fn list(&self) {
        for (i, cmd) in self.entries().iter().enumerate() {
            println!("{}: {}", i + 1, cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_skips_blank_and_repeated_lines() {
        let mut history = History::new(None);
        history.add("ls");
        history.add("   ");
        history.add("ls");
        history.add("pwd");
        assert_eq!(history.entries(), ["ls", "pwd"]);
    }

    #[test]
    fn test_navigation() {
        let mut history = History::new(None);
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);

        history.add("one");
        history.add("two");

        assert_eq!(history.previous(), Some("two"));
        assert_eq!(history.previous(), Some("one"));
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), Some("two"));
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut history = History::new(Some(path.clone()));
        history.add("bg sleep 10");
        history.add("bglist");

        let reloaded = History::new(Some(path));
        assert_eq!(reloaded.entries(), ["bg sleep 10", "bglist"]);
    }
}
