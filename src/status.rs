use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::schedule::AmortizationEntry;

/// Number of entries the dashboard lists as upcoming.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

/// Payment state recorded outside the engine for one installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub period_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

/// A schedule entry joined with its payment state as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedEntry {
    #[serde(flatten)]
    pub entry: AmortizationEntry,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl ScheduleSummary {
    fn record(&mut self, status: PaymentStatus) {
        self.total += 1;
        match status {
            PaymentStatus::Paid => self.paid += 1,
            PaymentStatus::Pending => self.pending += 1,
            PaymentStatus::Overdue => self.overdue += 1,
        }
    }
}

/// Classifies every installment as paid, pending or overdue on `as_of`.
///
/// A record marked paid wins regardless of dates. Any other installment is
/// overdue once its due date is on or before `as_of`, pending otherwise.
/// Records whose period is not in the schedule, or whose `period_index`
/// disagrees with their map key, are ignored.
///
/// # Errors
///
/// Returns `InvalidArgument` on `schedule` when two entries share a period index.
pub fn project(
    schedule: &[AmortizationEntry],
    payments: &HashMap<u32, PaymentRecord>,
    as_of: NaiveDate,
) -> EngineResult<(Vec<ProjectedEntry>, ScheduleSummary)> {
    let mut seen = HashSet::with_capacity(schedule.len());
    for entry in schedule {
        if !seen.insert(entry.period_index) {
            return Err(EngineError::invalid(
                "schedule",
                format!("duplicate period index {}", entry.period_index),
            ));
        }
    }

    let orphaned = payments.keys().filter(|idx| !seen.contains(*idx)).count();
    if orphaned > 0 {
        tracing::debug!(orphaned, "Ignoring payment records outside the schedule");
    }
    let mismatched = payments
        .iter()
        .filter(|(key, record)| **key != record.period_index)
        .count();
    if mismatched > 0 {
        tracing::debug!(mismatched, "Ignoring payment records filed under another period");
    }

    let mut summary = ScheduleSummary::default();
    let projected = schedule
        .iter()
        .map(|entry| {
            let paid = payments
                .get(&entry.period_index)
                .filter(|record| record.period_index == entry.period_index)
                .filter(|record| record.status == PaymentStatus::Paid);

            let (status, paid_date) = match paid {
                Some(record) => (PaymentStatus::Paid, record.paid_date),
                None if entry.due_date <= as_of => (PaymentStatus::Overdue, None),
                None => (PaymentStatus::Pending, None),
            };
            summary.record(status);

            ProjectedEntry {
                entry: entry.clone(),
                status,
                paid_date,
            }
        })
        .collect();

    Ok((projected, summary))
}

/// Pending installments due on or after `as_of`, soonest first, at most `limit`.
pub fn upcoming_installments(
    projected: &[ProjectedEntry],
    as_of: NaiveDate,
    limit: usize,
) -> Vec<&ProjectedEntry> {
    let mut upcoming: Vec<&ProjectedEntry> = projected
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending && p.entry.due_date >= as_of)
        .collect();
    upcoming.sort_by_key(|p| (p.entry.due_date, p.entry.period_index));
    upcoming.truncate(limit);
    upcoming
}
