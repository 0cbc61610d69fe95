//! Shared runtime state for CLI interactions and command execution.

use crate::core::BudgetSession;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: BudgetSession,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn currency(&self) -> &str {
        &self.session.config().currency_symbol
    }

    pub fn prompt(&self) -> String {
        format!("neon [{}]> ", self.session.budget().theme())
    }
}
