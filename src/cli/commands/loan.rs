use neon_core::{LoanPlan, LoanService, LoanTerms, PaymentFrequency};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, parse_amount, parse_day, short_id, ParsedArgs};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const DEFAULT_PAY_DAY: u32 = 1;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "loan",
        "Plan a loan and optionally save it as a recurring template",
        "loan <principal> <annual-rate-%> <months> [--frequency monthly|bi-monthly] [--lender NAME]
         loan ... --save [--name NAME] [--day N] [--auto]",
        cmd_loan,
    )]
}

fn cmd_loan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(
        args,
        &["frequency", "lender", "name", "day"],
        &["save", "auto"],
    )?;
    let (Some(principal), Some(rate), Some(months)) = (
        parsed.positional(0),
        parsed.positional(1),
        parsed.positional(2),
    ) else {
        return Err(CommandError::InvalidArguments(
            "usage: loan <principal> <annual-rate-%> <months> [options]".into(),
        ));
    };

    let frequency = match parsed.option("frequency") {
        Some(raw) => raw.parse::<PaymentFrequency>()?,
        None => PaymentFrequency::Monthly,
    };
    let term_months = months
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid term `{months}`")))?;
    let plan = LoanService::plan(LoanTerms {
        principal: parse_amount(principal)?,
        annual_rate_percent: parse_amount(rate.trim_end_matches('%'))?,
        term_months,
        frequency,
    })?;

    print_plan(context.currency(), &plan);

    if parsed.switch("save") {
        let lender = parsed.option("lender");
        let name = parsed
            .option("name")
            .map(str::to_string)
            .unwrap_or_else(|| LoanPlan::default_template_name(lender));
        let day = match parsed.option("day") {
            Some(raw) => parse_day(raw)?,
            None => DEFAULT_PAY_DAY,
        };
        let draft = plan.to_template(name, lender, day, parsed.switch("auto"));
        let template = context.session.budget_mut().add_template(draft)?;
        io::print_success(format!(
            "Template added: {} ({})",
            template.name,
            short_id(&template.id)
        ));
    }
    Ok(())
}

fn print_plan(currency: &str, plan: &LoanPlan) {
    let label = match plan.terms.frequency {
        PaymentFrequency::Monthly => "Monthly payment",
        PaymentFrequency::BiMonthly => "Per payment (2x/month)",
    };
    output_section("Loan plan");
    io::print_info(format!("  {:<24}: {}", label, format_amount(currency, plan.payment)));
    io::print_info(format!(
        "  {:<24}: {}",
        "Total interest",
        format_amount(currency, plan.total_interest)
    ));
    io::print_info(format!(
        "  {:<24}: {}",
        "Total payment",
        format_amount(currency, plan.total_payment)
    ));
}
