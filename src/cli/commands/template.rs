use neon_core::RecurrenceEngine;
use neon_domain::TemplateDraft;

use super::transaction::category_name;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{
    format_signed, parse_amount, parse_day, parse_kind, parse_toggle, resolve_id, short_id,
    ParsedArgs,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const ADD_OPTIONS: &[&str] = &["day", "description"];
const EDIT_OPTIONS: &[&str] = &[
    "name",
    "type",
    "category",
    "amount",
    "day",
    "auto",
    "description",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "template",
        "Manage recurring-payment templates",
        "template add <name> <income|expense> <category> <amount> [--day N] [--auto] [--description TEXT]
         template edit <id> [--name N] [--type T] [--category C] [--amount N] [--day N|none] [--auto on|off] [--description TEXT]
         template delete <id>
         template list",
        cmd_template,
    )]
}

fn cmd_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return list(context);
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        "list" | "ls" => list(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown template subcommand `{other}`"
        ))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ADD_OPTIONS, &["auto"])?;
    let (Some(name), Some(kind), Some(category), Some(amount)) = (
        parsed.positional(0),
        parsed.positional(1),
        parsed.positional(2),
        parsed.positional(3),
    ) else {
        return Err(CommandError::InvalidArguments(
            "usage: template add <name> <income|expense> <category> <amount> [--day N] [--auto]"
                .into(),
        ));
    };
    let kind = parse_kind(kind)?;
    let mut draft = TemplateDraft::new(
        name,
        kind,
        category_name(kind, category),
        parse_amount(amount)?,
    );
    if let Some(description) = parsed.option("description") {
        draft = draft.with_description(description);
    }
    match parsed.option("day") {
        Some(day) => draft = draft.scheduled(parse_day(day)?, parsed.switch("auto")),
        None if parsed.switch("auto") => {
            return Err(CommandError::InvalidArguments(
                "`--auto` needs `--day N` to know when to generate".into(),
            ))
        }
        None => {}
    }

    let before = context.session.budget().transactions().len();
    let template = context.session.budget_mut().add_template(draft)?;
    io::print_success(format!(
        "Template added: {} ({})",
        template.name,
        short_id(&template.id)
    ));
    report_generated(context, before);
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, EDIT_OPTIONS, &[])?;
    let raw_id = parsed.positional(0).ok_or_else(|| {
        CommandError::InvalidArguments("usage: template edit <id> [--field value]".into())
    })?;
    let id = resolve_id(context.session.budget().templates(), raw_id)?;
    let mut draft = context.session.budget().template(&id)?.to_draft_template();

    if let Some(name) = parsed.option("name") {
        draft.name = name.to_string();
    }
    if let Some(kind) = parsed.option("type") {
        draft.kind = parse_kind(kind)?;
    }
    if let Some(category) = parsed.option("category") {
        draft.category = category_name(draft.kind, category);
    }
    if let Some(amount) = parsed.option("amount") {
        draft.amount = parse_amount(amount)?;
    }
    if let Some(description) = parsed.option("description") {
        draft.description = description.to_string();
    }
    if let Some(day) = parsed.option("day") {
        draft.day_of_month = if day.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(parse_day(day)?)
        };
    }
    if let Some(auto) = parsed.option("auto") {
        draft.auto_add = Some(parse_toggle(auto)?);
    }

    let before = context.session.budget().transactions().len();
    let updated = context.session.budget_mut().edit_template(&id, draft)?;
    io::print_success(format!("Template updated: {}", updated.name));
    report_generated(context, before);
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw_id = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: template delete <id>".into()))?;
    let id = resolve_id(context.session.budget().templates(), raw_id)?;
    let removed = context.session.budget_mut().delete_template(&id)?;
    io::print_success(format!("Template deleted: {}", removed.name));
    io::print_hint("Transactions it already generated are kept.");
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let budget = context.session.budget();
    if budget.templates().is_empty() {
        io::print_info("No templates saved.");
        return Ok(());
    }
    let today = budget.today();

    let mut table = Table::new(
        Some("Templates"),
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Name").truncated(24),
            TableColumn::left("Category"),
            TableColumn::right("Amount"),
            TableColumn::right("Day"),
            TableColumn::left("Auto"),
            TableColumn::left("Next run"),
        ],
    );
    for template in budget.templates() {
        table.add_row(vec![
            short_id(&template.id),
            template.name.clone(),
            template.category.clone(),
            format_signed(context.currency(), template.kind, template.amount),
            template
                .day_of_month
                .map(|day| day.to_string())
                .unwrap_or_else(|| "-".into()),
            if template.is_automated() { "yes" } else { "no" }.to_string(),
            RecurrenceEngine::next_run_date(template, today)
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn report_generated(context: &ShellContext, before: usize) {
    let generated = context
        .session
        .budget()
        .transactions()
        .len()
        .saturating_sub(before);
    if generated > 0 {
        io::print_info(format!("Generated {generated} recurring transaction(s)."));
    }
}
