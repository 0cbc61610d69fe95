use neon_core::{HistoryFilter, HistoryService, KindFilter, SummaryService};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, format_signed, short_id, ParsedArgs};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const BREAKDOWN_MONTHS: usize = 6;
const TREND_DAYS: u32 = 7;
const RECENT_LIMIT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show balance, savings rate, and spending breakdowns",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "history",
            "Search transactions by description or category",
            "history [query...] [--type all|income|expense]",
            cmd_history,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let currency = context.currency().to_string();
    let budget = context.session.budget();
    let transactions = budget.transactions();
    let totals = SummaryService::totals(transactions);

    output_section("Summary");
    io::print_info(format!("  Balance      : {}", format_amount(&currency, totals.balance)));
    io::print_info(format!("  Income       : {}", format_amount(&currency, totals.income)));
    io::print_info(format!("  Expenses     : {}", format_amount(&currency, totals.expense)));
    io::print_info(format!(
        "  Savings rate : {:.1}%",
        SummaryService::savings_rate(transactions)
    ));

    let categories = SummaryService::expenses_by_category(transactions);
    if !categories.is_empty() {
        let mut table = Table::new(
            Some("Expenses by category"),
            vec![TableColumn::left("Category"), TableColumn::right("Amount")],
        );
        for row in &categories {
            table.add_row(vec![row.category.clone(), format_amount(&currency, row.amount)]);
        }
        TableRenderer::render(&table);
    }

    let months = SummaryService::monthly_breakdown(transactions, BREAKDOWN_MONTHS);
    if !months.is_empty() {
        let mut table = Table::new(
            Some("Monthly"),
            vec![
                TableColumn::left("Month"),
                TableColumn::right("Income"),
                TableColumn::right("Expenses"),
                TableColumn::right("Net"),
            ],
        );
        for month in &months {
            table.add_row(vec![
                month.month.clone(),
                format_amount(&currency, month.income),
                format_amount(&currency, month.expense),
                format_amount(&currency, month.net()),
            ]);
        }
        TableRenderer::render(&table);
    }

    let mut trend = Table::new(
        Some("Last 7 days"),
        vec![
            TableColumn::left("Date"),
            TableColumn::right("Net"),
            TableColumn::right("Running"),
        ],
    );
    for point in SummaryService::balance_trend(transactions, budget.today(), TREND_DAYS) {
        trend.add_row(vec![
            point.date.format("%a %d").to_string(),
            format_amount(&currency, point.net),
            format_amount(&currency, point.running_total),
        ]);
    }
    TableRenderer::render(&trend);

    let recent = SummaryService::recent(transactions, RECENT_LIMIT);
    if !recent.is_empty() {
        output_section("Recent activity");
        for txn in recent {
            io::print_info(format!(
                "  {}  {:<14} {}",
                txn.date,
                txn.category,
                format_signed(&currency, txn.kind, txn.amount)
            ));
        }
    }
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["type"], &[])?;
    let kind = match parsed.option("type") {
        Some(raw) => raw
            .parse::<KindFilter>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => KindFilter::All,
    };
    let filter = HistoryFilter::new(parsed.rest(0).unwrap_or_default(), kind);
    let rows = HistoryService::filter(context.session.budget().transactions(), &filter);

    if rows.is_empty() {
        io::print_info("No matching transactions.");
        return Ok(());
    }

    let mut table = Table::new(
        Some("History"),
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Date"),
            TableColumn::left("Category"),
            TableColumn::right("Amount"),
            TableColumn::left("Description").truncated(32),
        ],
    );
    for txn in &rows {
        table.add_row(vec![
            short_id(&txn.id),
            txn.date.to_string(),
            txn.category.clone(),
            format_signed(context.currency(), txn.kind, txn.amount),
            txn.description.clone(),
        ]);
    }
    TableRenderer::render(&table);
    io::print_info(format!("{} result(s), filter: {}", rows.len(), filter.kind));
    Ok(())
}
