//! `emi_engine` prices vehicle loans and tracks their repayment.
//!
//! It provides the calculations behind a loan-application preview, an EMI
//! tracker and a finance-approval screen:
//! - **EMI**: the fixed monthly installment of an amortizing loan, rounded to
//!   whole currency units.
//! - **Amortization schedule**: the month-by-month split of each installment
//!   into principal and interest, ending at exactly zero balance.
//! - **Affordability**: the EMI as a share of monthly income, flagged above a
//!   policy threshold (50% by default).
//! - **Installment status**: paid / pending / overdue for each installment
//!   given externally recorded payments.
//!
//! All operations are pure functions over owned values and may be called from
//! any number of threads.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use emi_engine::{LoanTerms, RiskFlag, analyze, build_schedule, quote_loan};
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), emi_engine::EngineError> {
//!     let terms = LoanTerms::new(dec!(1_000_000), dec!(12), 60)?;
//!
//!     let quote = quote_loan(&terms)?;
//!     assert_eq!(quote.emi, dec!(22244));
//!     assert_eq!(quote.total_interest, dec!(334_640));
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let schedule = build_schedule(&terms, start)?;
//!     assert_eq!(schedule.len(), 60);
//!     assert_eq!(schedule[59].remaining_balance, dec!(0));
//!
//!     let affordability = analyze(quote.emi, dec!(80_000))?;
//!     assert_eq!(affordability.risk_flag, RiskFlag::Ok);
//!     Ok(())
//! }
//! ```

pub mod affordability;
pub mod config;
pub mod emi;
pub mod error;
pub mod financing;
pub mod rate;
pub mod schedule;
pub mod status;
pub mod types;

pub use affordability::{AffordabilityPolicy, AffordabilityResult, RiskFlag, analyze, analyze_with_threshold};
pub use config::LendingPolicy;
pub use emi::{LoanQuote, compute_emi, compute_emi_for, quote_loan};
pub use error::{EngineError, EngineResult};
pub use financing::{FinancingPolicy, FinancingStructure, SuggestedFinancing};
pub use rate::{PeriodicRate, normalize};
pub use schedule::{AmortizationEntry, ScheduleTotals, build_schedule, schedule_totals};
pub use status::{
    PaymentRecord, PaymentStatus, ProjectedEntry, ScheduleSummary, UPCOMING_LIMIT, project,
    upcoming_installments,
};
pub use types::{LoanTerms, Money, Percent, round_money};
