use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_bytes, resolve_id, short_id};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Create, list, restore, and delete local snapshots",
        "backup create
         backup list
         backup restore <id>
         backup delete <id>",
        cmd_backup,
    )]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return list(context);
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "create" | "new" => create(context),
        "list" | "ls" => list(context),
        "restore" => restore(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown backup subcommand `{other}`"
        ))),
    }
}

fn create(context: &mut ShellContext) -> CommandResult {
    let backup = context.session.budget_mut().create_backup()?;
    io::print_success(format!(
        "Backup created: {} ({} items, {})",
        backup.name,
        backup.item_count,
        format_bytes(backup.size)
    ));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let backups = context.session.budget().backups();
    if backups.is_empty() {
        io::print_info("No backups yet. Use `backup create` to take one.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Backups"),
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Name"),
            TableColumn::right("Items"),
            TableColumn::right("Size"),
        ],
    );
    for backup in backups {
        table.add_row(vec![
            short_id(&backup.id),
            backup.name.clone(),
            backup.item_count.to_string(),
            format_bytes(backup.size),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = target_id(context, args, "usage: backup restore <id>")?;
    if context.session.budget_mut().restore_backup(&id)? {
        io::print_success(format!(
            "Backup restored: {} transactions loaded.",
            context.session.budget().transactions().len()
        ));
    } else {
        io::print_info("Restore cancelled.");
    }
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = target_id(context, args, "usage: backup delete <id>")?;
    let removed = context.session.budget_mut().delete_backup(&id)?;
    io::print_success(format!("Backup deleted: {}", removed.name));
    Ok(())
}

fn target_id(context: &ShellContext, args: &[&str], usage: &str) -> Result<String, CommandError> {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(usage.to_string()))?;
    resolve_id(context.session.budget().backups(), raw)
}
