use std::env;

use neon_core::Confirmer;
use tracing::warn;

use crate::cli::{io, shell_context::CliMode};

/// Answers confirmation prompts in script mode.
pub const ASSUME_YES_ENV: &str = "NEON_BUDGET_ASSUME_YES";

/// Asks on the terminal in interactive mode. Script mode never blocks: it
/// approves only when [`ASSUME_YES_ENV`] is truthy.
#[derive(Debug, Clone, Copy)]
pub struct ShellConfirmer {
    mode: CliMode,
}

impl ShellConfirmer {
    pub fn new(mode: CliMode) -> Self {
        Self { mode }
    }
}

impl Confirmer for ShellConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        match self.mode {
            CliMode::Script => {
                let approved = assume_yes();
                io::print_info(format!(
                    "{prompt} {}",
                    if approved { "(yes)" } else { "(no)" }
                ));
                approved
            }
            CliMode::Interactive => io::confirm_action(prompt, false).unwrap_or_else(|err| {
                warn!(error = %err, "confirmation prompt failed");
                false
            }),
        }
    }
}

fn assume_yes() -> bool {
    env::var(ASSUME_YES_ENV)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
