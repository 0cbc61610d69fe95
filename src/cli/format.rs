//! Parsing and display helpers shared by command handlers.

use chrono::NaiveDate;

use neon_domain::{Identifiable, TransactionKind};

use crate::cli::core::CommandError;

const SHORT_ID_LEN: usize = 8;

/// `₱1,234.56` style rendering with thousands separators.
pub fn format_amount(symbol: &str, amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}{}{}.{:02}",
        if negative { "-" } else { "" },
        symbol,
        grouped,
        cents % 100
    )
}

/// Amount prefixed with `+` for income and `-` for expenses.
pub fn format_signed(symbol: &str, kind: TransactionKind, amount: f64) -> String {
    let sign = match kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!("{sign}{}", format_amount(symbol, amount))
}

pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.2} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Expands `input` to a full id: an exact match wins, otherwise a unique
/// prefix. Unknown input is passed through so the service reports it.
pub fn resolve_id<T: Identifiable>(items: &[T], input: &str) -> Result<String, CommandError> {
    if input.trim().is_empty() {
        return Err(CommandError::InvalidArguments("an id is required".into()));
    }
    if items.iter().any(|item| item.id() == input) {
        return Ok(input.to_string());
    }
    let mut matches = items.iter().filter(|item| item.id().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id().to_string()),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "id prefix `{input}` is ambiguous; type more characters"
        ))),
        (None, _) => Ok(input.to_string()),
    }
}

pub fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{raw}` (use YYYY-MM-DD)"))
    })
}

pub fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    raw.parse::<TransactionKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub fn parse_day(raw: &str) -> Result<u32, CommandError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|day| (1..=31).contains(day))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid day `{raw}` (use 1-31)"))
        })
}

pub fn parse_toggle(raw: &str) -> Result<bool, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{raw}`"
        ))),
    }
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`. Names listed in `switches` take no value; every other
    /// `--name` must be followed by one. Names outside both lists are rejected.
    pub fn parse(
        args: &[&'a str],
        options: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            if switches.contains(&name) {
                parsed.switches.push(name);
            } else if options.contains(&name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{name}` needs a value"))
                })?;
                parsed.options.push((name, value));
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{name}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }

    pub fn positional(&self, idx: usize) -> Option<&'a str> {
        self.positional.get(idx).copied()
    }

    /// Positional arguments from `start` joined with spaces, if any.
    pub fn rest(&self, start: usize) -> Option<String> {
        let rest = self.positional.get(start..)?;
        (!rest.is_empty()).then(|| rest.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_domain::TransactionDraft;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount("₱", 5000.0), "₱5,000.00");
        assert_eq!(format_amount("$", 1234567.891), "$1,234,567.89");
        assert_eq!(format_amount("$", 0.5), "$0.50");
        assert_eq!(format_amount("$", -12.0), "-$12.00");
        assert_eq!(
            format_signed("₱", TransactionKind::Expense, 12.0),
            "-₱12.00"
        );
    }

    #[test]
    fn ids_resolve_by_unique_prefix() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let items = vec![
            TransactionDraft::new(TransactionKind::Income, "Salary", 1.0, date)
                .into_transaction("abc123"),
            TransactionDraft::new(TransactionKind::Income, "Salary", 1.0, date)
                .into_transaction("abd456"),
        ];
        assert_eq!(resolve_id(&items, "abc").unwrap(), "abc123");
        assert!(resolve_id(&items, "ab").is_err());
        assert_eq!(resolve_id(&items, "zzz").unwrap(), "zzz");
    }

    #[test]
    fn empty_id_never_matches_a_lone_record() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let items = vec![TransactionDraft::new(TransactionKind::Income, "Salary", 1.0, date)
            .into_transaction("only")];
        assert!(matches!(
            resolve_id(&items, ""),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(resolve_id(&items, "  ").is_err());
    }

    #[test]
    fn flags_split_from_positionals() {
        let args = ["Rent", "--day", "5", "--auto", "monthly", "rent"];
        let parsed = ParsedArgs::parse(&args, &["day"], &["auto"]).unwrap();
        assert_eq!(parsed.positional(0), Some("Rent"));
        assert_eq!(parsed.option("day"), Some("5"));
        assert!(parsed.switch("auto"));
        assert_eq!(parsed.rest(1).as_deref(), Some("monthly rent"));
        assert!(ParsedArgs::parse(&["--bogus"], &[], &[]).is_err());
        assert!(ParsedArgs::parse(&["--day"], &["day"], &[]).is_err());
    }

    #[test]
    fn day_and_toggle_parsing() {
        assert_eq!(parse_day("31").unwrap(), 31);
        assert!(parse_day("0").is_err());
        assert!(parse_toggle("on").unwrap());
        assert!(parse_toggle("maybe").is_err());
        assert_eq!(format_bytes(2048), "2.0 KB");
    }
}
