//! Dispatch, error reporting, and construction of the shell context.

use std::{io, path::PathBuf, sync::Arc};

use neon_config::ConfigError;
use neon_core::{Capabilities, CoreError, UuidGenerator};
use strsim::levenshtein;

pub use crate::core::errors::CliError;
use crate::core::{errors::BudgetError, paths, BudgetSession};

use super::commands;
use super::confirm::ShellConfirmer;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};
use super::system_clock::SystemClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Core(BudgetError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(BudgetError::from(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    /// Opens the session under the resolved base directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, paths::resolve_base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let caps = Capabilities::new(
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
            Arc::new(ShellConfirmer::new(mode)),
        );
        Self::with_session(mode, BudgetSession::open(base, caps)?)
    }

    pub fn with_session(mode: CliMode, session: BudgetSession) -> Result<Self, CliError> {
        crate::init_with_filter(session.config().log_filter.as_deref());
        output::set_preferences(OutputPreferences {
            color_enabled: mode == CliMode::Interactive && session.config().ui_color_enabled,
        });

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            session,
            last_command: None,
            running: true,
        })
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        let control = self.dispatch(&command, raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(BudgetError::QuotaExceeded { needed, quota }) => {
                cli_io::print_error(format!(
                    "Storage is full ({needed} of {quota} bytes). Nothing was saved."
                ));
                cli_io::print_hint("Delete old backups with `backup delete <id>` to free space.");
            }
            CommandError::Core(BudgetError::ImportRejected(message)) => {
                cli_io::print_error(format!("Invalid backup file: {message}"));
                cli_io::print_hint("Imports must be a JSON array of transactions.");
            }
            other => cli_io::print_error(other),
        }
    }
}

/// Runs `lines` through a script-mode shell opened under `base`.
pub fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err),
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn exit_stops_the_script() {
        let temp = TempDir::new().unwrap();
        let app = process_script(
            temp.path().to_path_buf(),
            &["exit", "tx add income Salary 10"],
        )
        .unwrap();
        assert!(!app.running);
        assert_eq!(app.session.budget().transactions().len(), 1);
    }

    #[test]
    fn errors_do_not_stop_the_script() {
        let temp = TempDir::new().unwrap();
        let app = process_script(
            temp.path().to_path_buf(),
            &[
                "tx add expense Food not-a-number",
                "bogus",
                "tx add expense Food 12.5 2024-06-01 Lunch out",
            ],
        )
        .unwrap();
        let transactions = app.session.budget().transactions();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description, "Lunch out");
        assert_eq!(
            app.last_command.as_deref(),
            Some("tx add expense Food 12.5 2024-06-01 Lunch out")
        );
    }

    #[test]
    fn aliases_reach_the_same_handler() {
        let temp = TempDir::new().unwrap();
        let app = process_script(
            temp.path().to_path_buf(),
            &["transaction add income Bonus 50"],
        )
        .unwrap();
        assert_eq!(app.session.budget().transactions()[0].category, "Bonus");
    }
}
