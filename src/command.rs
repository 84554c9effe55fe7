use crate::control::JobAction;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Pwd,
    Cd(Option<String>),
    /// Program and its arguments, possibly empty when `bg` had nothing after it.
    Bg(Vec<String>),
    BgList,
    Job {
        action: JobAction,
        index: Option<String>,
    },
    History,
    Help,
    External(Vec<String>),
}

/// Split a line on whitespace, keeping at most `max_tokens` tokens. Anything
/// past the limit is dropped.
pub fn tokenize(line: &str, max_tokens: usize) -> Vec<String> {
    line.split_whitespace()
        .take(max_tokens)
        .map(str::to_string)
        .collect()
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str, max_tokens: usize) -> Option<Self> {
        let mut tokens = tokenize(line, max_tokens);
        if tokens.is_empty() {
            return None;
        }

        let name = tokens[0].clone();
        let first_arg = tokens.get(1).cloned();

        let cmd = match name.as_str() {
            "quit" => Command::Quit,
            "pwd" => Command::Pwd,
            "cd" => Command::Cd(first_arg),
            "bg" => {
                tokens.remove(0);
                Command::Bg(tokens)
            }
            "bglist" => Command::BgList,
            "bgkill" => Command::Job {
                action: JobAction::Kill,
                index: first_arg,
            },
            "stop" => Command::Job {
                action: JobAction::Stop,
                index: first_arg,
            },
            "start" => Command::Job {
                action: JobAction::Resume,
                index: first_arg,
            },
            "history" => Command::History,
            "help" => Command::Help,
            _ => Command::External(tokens),
        };

        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<Command> {
        Command::parse(line, 15)
    }

    #[test]
    fn test_tokenize_collapses_spaces_and_caps_length() {
        assert_eq!(tokenize("  ls   -l  /tmp ", 15), vec!["ls", "-l", "/tmp"]);

        let long: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let tokens = tokenize(&long.join(" "), 15);
        assert_eq!(tokens.len(), 15);
        assert_eq!(tokens[14], "14");
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("    "), None);
    }

    #[test]
    fn test_builtins() {
        assert_eq!(parse("quit"), Some(Command::Quit));
        assert_eq!(parse("pwd"), Some(Command::Pwd));
        assert_eq!(parse("cd"), Some(Command::Cd(None)));
        assert_eq!(parse("cd ~"), Some(Command::Cd(Some("~".into()))));
        assert_eq!(parse("bglist"), Some(Command::BgList));
    }

    #[test]
    fn test_bg_keeps_program_and_args() {
        assert_eq!(
            parse("bg sleep 100"),
            Some(Command::Bg(vec!["sleep".into(), "100".into()]))
        );
        assert_eq!(parse("bg"), Some(Command::Bg(vec![])));
    }

    #[test]
    fn test_job_control_commands() {
        assert_eq!(
            parse("bgkill 0"),
            Some(Command::Job { action: JobAction::Kill, index: Some("0".into()) })
        );
        assert_eq!(
            parse("stop"),
            Some(Command::Job { action: JobAction::Stop, index: None })
        );
        assert_eq!(
            parse("start 2"),
            Some(Command::Job { action: JobAction::Resume, index: Some("2".into()) })
        );
    }

    #[test]
    fn test_anything_else_is_external() {
        assert_eq!(
            parse("ls -la"),
            Some(Command::External(vec!["ls".into(), "-la".into()]))
        );
    }
}
