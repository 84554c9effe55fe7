use colored::Colorize;
use tracing::{debug, info};

use crate::builtins;
use crate::command::Command;
use crate::config::ShellConfig;
use crate::control::apply_action;
use crate::editor::LineEditor;
use crate::error::{Result, ShellError};
use crate::history::History;
use crate::jobs::JobTable;
use crate::launcher::{spawn_background, spawn_foreground};
use crate::prompt::Prompt;
use crate::signals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    config: ShellConfig,
    prompt: Prompt,
    history: History,
    editor: LineEditor,
    jobs: JobTable,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            prompt: Prompt::new(),
            history: History::new(config.history_file.clone()),
            editor: LineEditor::new(),
            jobs: JobTable::new(config.max_jobs),
            config,
        }
    }

    /// Read-dispatch-reap until `quit` or end of input. Only errors that make
    /// launching programs impossible come back out of here.
    pub fn run(&mut self) -> Result<()> {
        signals::ignore_interactive_signals();

        if self.editor.is_interactive() {
            println!("Type 'help' for available commands\n");
        }

        loop {
            let prompt = self.prompt.get_string();
            let Some(line) = self.editor.read_line(&prompt, &mut self.history)? else {
                info!("end of input");
                return Ok(());
            };

            self.history.add(&line);
            let flow = self.execute_line(&line);

            self.jobs.reap_terminated();

            if flow? == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let Some(cmd) = Command::parse(line, self.config.max_tokens) else {
            return Ok(Flow::Continue);
        };
        debug!(?cmd, "dispatch");

        match self.dispatch(cmd) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Flow> {
        match cmd {
            Command::Quit => return Ok(Flow::Quit),
            Command::Pwd => builtins::print_working_directory()?,
            Command::Cd(path) => builtins::change_directory(path.as_deref())?,
            Command::Bg(argv) => self.start_background(argv)?,
            Command::BgList => builtins::write_job_list(&self.jobs, &mut std::io::stdout().lock())?,
            Command::Job { action, index } => apply_action(&mut self.jobs, index.as_deref(), action)?,
            Command::History => self.history.list(),
            Command::Help => builtins::print_help(),
            Command::External(argv) => {
                spawn_foreground(&argv)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn start_background(&mut self, argv: Vec<String>) -> Result<()> {
        let name = argv.first().cloned().ok_or(ShellError::MissingProgram)?;
        self.jobs.ensure_capacity()?;

        let child = spawn_background(&argv)?;
        let index = self.jobs.insert(name, child)?;
        info!(index, "background job started");
        Ok(())
    }
}
