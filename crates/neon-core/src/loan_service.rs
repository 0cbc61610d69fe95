//! Loan amortization planning and conversion into recurring templates.

use std::{fmt, str::FromStr};

use neon_domain::{TemplateDraft, TransactionKind, LOAN_PAYMENT_CATEGORY};

use crate::CoreError;

const DEFAULT_TEMPLATE_NAME: &str = "Housing/Loan Payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    /// Two payments per month, each half of the monthly amount.
    BiMonthly,
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFrequency::Monthly => f.write_str("Monthly"),
            PaymentFrequency::BiMonthly => f.write_str("Bi-Monthly"),
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "bimonthly" => Ok(PaymentFrequency::BiMonthly),
            other => Err(CoreError::Validation(format!(
                "unknown payment frequency `{other}` (expected monthly or bi-monthly)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub frequency: PaymentFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPlan {
    pub terms: LoanTerms,
    /// Amount due per payment (half the monthly amount for bi-monthly plans).
    pub payment: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

impl LoanPlan {
    /// `"<lender> Loan"`, or a generic housing label without a lender.
    pub fn default_template_name(lender: Option<&str>) -> String {
        match lender.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => format!("{name} Loan"),
            None => DEFAULT_TEMPLATE_NAME.to_string(),
        }
    }

    /// Recurring expense template paying this plan on `pay_day` each month.
    pub fn to_template(
        &self,
        name: impl Into<String>,
        lender: Option<&str>,
        pay_day: u32,
        auto_add: bool,
    ) -> TemplateDraft {
        let lender = lender
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Lender");
        TemplateDraft::new(
            name,
            TransactionKind::Expense,
            LOAN_PAYMENT_CATEGORY,
            round_cents(self.payment),
        )
        .with_description(format!(
            "Loan Payment to {} ({}) - {} months",
            lender, self.terms.frequency, self.terms.term_months
        ))
        .scheduled(pay_day, auto_add)
    }
}

pub struct LoanService;

impl LoanService {
    /// Standard amortization: `P*i*(1+i)^n / ((1+i)^n - 1)` with a monthly rate `i`.
    pub fn plan(terms: LoanTerms) -> Result<LoanPlan, CoreError> {
        if !(terms.principal.is_finite() && terms.principal > 0.0) {
            return Err(CoreError::Validation("principal must be greater than zero".into()));
        }
        if terms.term_months == 0 {
            return Err(CoreError::Validation("term must be at least one month".into()));
        }
        if !(terms.annual_rate_percent.is_finite() && terms.annual_rate_percent >= 0.0) {
            return Err(CoreError::Validation("interest rate cannot be negative".into()));
        }

        let principal = terms.principal;
        let months = f64::from(terms.term_months);
        let monthly_rate = terms.annual_rate_percent / 100.0 / 12.0;
        let monthly_payment = if monthly_rate == 0.0 {
            principal / months
        } else {
            let growth = (1.0 + monthly_rate).powf(months);
            principal * monthly_rate * growth / (growth - 1.0)
        };
        let total_payment = monthly_payment * months;
        let payment = match terms.frequency {
            PaymentFrequency::Monthly => monthly_payment,
            PaymentFrequency::BiMonthly => monthly_payment / 2.0,
        };

        Ok(LoanPlan {
            terms,
            payment,
            total_interest: total_payment - principal,
            total_payment,
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
