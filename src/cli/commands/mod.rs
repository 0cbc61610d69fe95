pub mod backup;
pub mod data;
pub mod loan;
pub mod report;
pub mod settings;
pub mod system;
pub mod template;
pub mod transaction;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ALIASES: &[(&str, &str)] = &[
    ("transaction", "tx"),
    ("transactions", "tx"),
    ("templates", "template"),
    ("backups", "backup"),
    ("quit", "exit"),
];

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(transaction::definitions());
    commands.extend(template::definitions());
    commands.extend(report::definitions());
    commands.extend(backup::definitions());
    commands.extend(data::definitions());
    commands.extend(loan::definitions());
    commands.extend(settings::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
    for &(alias, target) in ALIASES {
        registry.alias(alias, target);
    }
}
