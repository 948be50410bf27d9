use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::emi::emi_with_rate;
use crate::error::{EngineError, EngineResult};
use crate::rate;
use crate::types::{LoanTerms, Money, round_money};

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based position in the schedule.
    pub period_index: u32,
    pub due_date: NaiveDate,
    /// The EMI, except on the final period where it absorbs rounding drift.
    pub installment_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance left once this period's principal is applied.
    pub remaining_balance: Money,
}

/// Column sums over a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Expands a loan into its monthly schedule, first installment due on `start_date`.
///
/// Interest is charged on the running balance and rounded each period. The
/// final period repays whatever balance is left, so the principal column sums
/// to the principal exactly and the last `remaining_balance` is zero.
///
/// # Errors
///
/// Returns `InvalidArgument` for invalid terms, or on `start_date` when a due
/// date falls outside the supported calendar.
pub fn build_schedule(terms: &LoanTerms, start_date: NaiveDate) -> EngineResult<Vec<AmortizationEntry>> {
    terms.validate()?;
    let periodic = rate::normalize(terms.annual_rate_percent)?;
    let emi = emi_with_rate(terms.principal, periodic, terms.term_months)?;
    let r = periodic.value();

    let mut balance = terms.principal;
    let mut entries = Vec::with_capacity(terms.term_months as usize);

    for period_index in 1..=terms.term_months {
        let due_date = start_date
            .checked_add_months(Months::new(period_index - 1))
            .ok_or_else(|| EngineError::invalid("start_date", "due date is out of the supported range"))?;

        let interest_component = round_money(balance * r);
        let principal_component = if period_index == terms.term_months {
            balance
        } else {
            // Capped so a loan priced at the minimum installment cannot overpay.
            (emi - interest_component).clamp(Decimal::ZERO, balance)
        };
        let remaining_balance = balance - principal_component;

        entries.push(AmortizationEntry {
            period_index,
            due_date,
            installment_amount: principal_component + interest_component,
            principal_component,
            interest_component,
            remaining_balance,
        });
        balance = remaining_balance;
    }

    if let Some(last) = entries.last() {
        tracing::debug!(
            principal = %terms.principal,
            term_months = terms.term_months,
            emi = %emi,
            final_installment = %last.installment_amount,
            "Amortization schedule built"
        );
    }

    Ok(entries)
}

/// Sums the installment, interest and principal columns of a schedule.
pub fn schedule_totals(schedule: &[AmortizationEntry]) -> ScheduleTotals {
    schedule.iter().fold(
        ScheduleTotals {
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
        },
        |mut acc, entry| {
            acc.total_payment += entry.installment_amount;
            acc.total_interest += entry.interest_component;
            acc.total_principal += entry.principal_component;
            acc
        },
    )
}
