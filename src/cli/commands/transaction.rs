use chrono::NaiveDate;
use neon_domain::{canonical_category, categories_for, TransactionDraft, TransactionKind};

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::format::{
    format_signed, parse_amount, parse_date, parse_kind, resolve_id, short_id, ParsedArgs,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const DEFAULT_LIST_LIMIT: usize = 20;
const EDIT_OPTIONS: &[&str] = &["type", "category", "amount", "date", "description"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "tx",
        "Record, edit, and remove transactions",
        "tx add <income|expense> <category> <amount> [YYYY-MM-DD] [description...]
         tx edit <id> [--type T] [--category C] [--amount N] [--date D] [--description TEXT]
         tx delete <id>
         tx list [limit]
         tx clear
         tx from-template <template-id> [YYYY-MM-DD]",
        cmd_transaction,
    )]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return list(context, &[]);
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        "list" | "ls" => list(context, rest),
        "clear" => clear(context),
        "from-template" | "use" => from_template(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown tx subcommand `{other}`"
        ))),
    }
}

/// Known categories are normalized to their canonical spelling; anything
/// else is kept as typed.
pub(crate) fn category_name(kind: TransactionKind, raw: &str) -> String {
    canonical_category(kind, raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.mode() == CliMode::Interactive {
        prompt_draft(context.session.budget().today())?
    } else {
        draft_from_args(args, context.session.budget().today())?
    };

    let transaction = context.session.budget_mut().add_transaction(draft)?;
    io::print_success(format!(
        "Transaction added: {} {} {} ({})",
        transaction.date,
        transaction.category,
        format_signed(context.currency(), transaction.kind, transaction.amount),
        short_id(&transaction.id)
    ));
    Ok(())
}

fn draft_from_args(args: &[&str], today: NaiveDate) -> Result<TransactionDraft, CommandError> {
    let usage = || {
        CommandError::InvalidArguments(
            "usage: tx add <income|expense> <category> <amount> [YYYY-MM-DD] [description...]"
                .into(),
        )
    };
    let [kind, category, amount, tail @ ..] = args else {
        return Err(usage());
    };
    let kind = parse_kind(kind)?;
    let amount = parse_amount(amount)?;

    let (date, description) = match tail.split_first() {
        Some((first, rest)) => match NaiveDate::parse_from_str(first, "%Y-%m-%d") {
            Ok(date) => (date, rest.join(" ")),
            Err(_) => (today, tail.join(" ")),
        },
        None => (today, String::new()),
    };

    Ok(
        TransactionDraft::new(kind, category_name(kind, category), amount, date)
            .with_description(description),
    )
}

fn prompt_draft(today: NaiveDate) -> Result<TransactionDraft, CommandError> {
    let kinds: Vec<String> = TransactionKind::ALL.iter().map(|k| k.to_string()).collect();
    let kind = TransactionKind::ALL[io::prompt_select("Type", &kinds)?];
    let categories = categories_for(kind);
    let category = categories[io::prompt_select("Category", categories)?];
    let amount = parse_amount(&io::prompt_text("Amount", None)?)?;
    let date = parse_date(&io::prompt_text("Date", Some(&today.to_string()))?)?;
    let description = io::prompt_text("Description", Some(""))?;
    Ok(TransactionDraft::new(kind, category, amount, date).with_description(description.trim()))
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, EDIT_OPTIONS, &[])?;
    let raw_id = parsed.positional(0).ok_or_else(|| {
        CommandError::InvalidArguments("usage: tx edit <id> [--field value]".into())
    })?;
    let id = resolve_id(context.session.budget().transactions(), raw_id)?;
    let mut draft = context.session.budget().transaction(&id)?.to_draft();

    if let Some(kind) = parsed.option("type") {
        draft.kind = parse_kind(kind)?;
    }
    if let Some(category) = parsed.option("category") {
        draft.category = category_name(draft.kind, category);
    }
    if let Some(amount) = parsed.option("amount") {
        draft.amount = parse_amount(amount)?;
    }
    if let Some(date) = parsed.option("date") {
        draft.date = parse_date(date)?;
    }
    if let Some(description) = parsed.option("description") {
        draft.description = description.to_string();
    }

    let updated = context.session.budget_mut().edit_transaction(&id, draft)?;
    io::print_success(format!(
        "Transaction updated: {} {} {}",
        updated.date,
        updated.category,
        format_signed(context.currency(), updated.kind, updated.amount)
    ));
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw_id = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: tx delete <id>".into()))?;
    let id = resolve_id(context.session.budget().transactions(), raw_id)?;
    let removed = context.session.budget_mut().delete_transaction(&id)?;
    io::print_success(format!(
        "Transaction deleted: {} {}",
        removed.date, removed.category
    ));
    Ok(())
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid limit `{raw}`"))
        })?,
        None => DEFAULT_LIST_LIMIT,
    };
    let transactions = context.session.budget().transactions();
    if transactions.is_empty() {
        io::print_info("No transactions recorded.");
        return Ok(());
    }

    let mut table = Table::new(
        Some("Transactions"),
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Date"),
            TableColumn::left("Type"),
            TableColumn::left("Category"),
            TableColumn::right("Amount"),
            TableColumn::left("Description").truncated(32),
        ],
    );
    for txn in transactions.iter().take(limit) {
        table.add_row(vec![
            short_id(&txn.id),
            txn.date.to_string(),
            txn.kind.to_string(),
            txn.category.clone(),
            format_signed(context.currency(), txn.kind, txn.amount),
            txn.description.clone(),
        ]);
    }
    TableRenderer::render(&table);
    if transactions.len() > limit {
        io::print_hint(format!(
            "Showing {limit} of {}. Use `tx list <limit>` for more.",
            transactions.len()
        ));
    }
    Ok(())
}

fn clear(context: &mut ShellContext) -> CommandResult {
    if context.session.budget_mut().clear_transactions()? {
        io::print_success("All transactions cleared.");
    } else {
        io::print_info("Clear cancelled.");
    }
    Ok(())
}

fn from_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw_id = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: tx from-template <template-id> [YYYY-MM-DD]".into())
    })?;
    let date = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.session.budget().today(),
    };
    let id = resolve_id(context.session.budget().templates(), raw_id)?;
    let transaction = context.session.budget_mut().add_from_template(&id, date)?;
    io::print_success(format!(
        "Transaction added: {} {} {} ({})",
        transaction.date,
        transaction.category,
        format_signed(context.currency(), transaction.kind, transaction.amount),
        short_id(&transaction.id)
    ));
    Ok(())
}
