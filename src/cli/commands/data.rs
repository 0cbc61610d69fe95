use std::path::Path;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_bytes;
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "data",
        "Export, import, and inspect stored data",
        "data export [directory]
         data import <file>
         data usage",
        cmd_data,
    )]
}

fn cmd_data(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return usage(context);
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "export" => export(context, rest),
        "import" => import(context, rest),
        "usage" => usage(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown data subcommand `{other}`"
        ))),
    }
}

fn export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = args.first().map(Path::new);
    let path = context.session.export_to_dir(dir)?;
    io::print_success(format!(
        "Exported {} transactions to {}",
        context.session.budget().transactions().len(),
        path.display()
    ));
    Ok(())
}

fn import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: data import <file>".into()))?;
    let count = context.session.import_file(Path::new(raw))?;
    io::print_success(format!("Import complete: {count} transactions loaded."));
    Ok(())
}

fn usage(context: &mut ShellContext) -> CommandResult {
    let usage = context.session.budget().storage_usage()?;
    io::print_info(format!("Data directory : {}", context.session.data_dir().display()));
    io::print_info(format!(
        "Storage used   : {} of {} ({:.1}%)",
        format_bytes(usage.used_bytes),
        format_bytes(usage.quota_bytes),
        usage.percent()
    ));
    Ok(())
}
