//! EMI (equated monthly installment) pricing.
//!
//! The installment follows the standard amortizing-loan formula:
//!
//! ```text
//! EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
//! ```
//!
//! where `P` is the principal, `r` the monthly periodic rate and `n` the
//! number of months. A zero rate degenerates to straight-line repayment,
//! `P / n`.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::rate::{self, PeriodicRate};
use crate::types::{LoanTerms, Money, Percent, minor_unit, round_money, round_money_up, validate_terms};

/// EMI preview with lifetime totals, as shown while a loan is being applied for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// The fixed monthly installment.
    pub emi: Money,
    /// `emi * term_months`.
    pub total_payment: Money,
    /// `total_payment - principal`, never below zero.
    pub total_interest: Money,
}

/// Computes the fixed monthly installment, rounded half-up to whole currency units.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the field when `principal <= 0`,
/// `annual_rate_percent < 0` or `term_months == 0`, and on `term_months` when
/// the compounding factor exceeds the decimal range.
pub fn compute_emi(principal: Money, annual_rate_percent: Percent, term_months: u32) -> EngineResult<Money> {
    validate_terms(principal, annual_rate_percent, term_months)?;
    let periodic = rate::normalize(annual_rate_percent)?;

    let emi = emi_with_rate(principal, periodic, term_months)?;

    tracing::debug!(
        principal = %principal,
        annual_rate_percent = %annual_rate_percent,
        term_months,
        emi = %emi,
        "EMI computed"
    );

    Ok(emi)
}

/// Same as [`compute_emi`] for a [`LoanTerms`] value.
pub fn compute_emi_for(terms: &LoanTerms) -> EngineResult<Money> {
    compute_emi(terms.principal, terms.annual_rate_percent, terms.term_months)
}

/// Prices a loan and reports the totals paid over its life.
pub fn quote_loan(terms: &LoanTerms) -> EngineResult<LoanQuote> {
    let emi = compute_emi_for(terms)?;
    let total_payment = emi
        .checked_mul(Decimal::from(terms.term_months))
        .ok_or_else(too_large)?;
    let total_interest = (total_payment - terms.principal).max(Decimal::ZERO);

    Ok(LoanQuote {
        principal: terms.principal,
        annual_rate_percent: terms.annual_rate_percent,
        term_months: terms.term_months,
        emi,
        total_payment,
        total_interest,
    })
}

/// Core formula on already validated inputs.
pub(crate) fn emi_with_rate(principal: Money, periodic: PeriodicRate, term_months: u32) -> EngineResult<Money> {
    let months = Decimal::from(term_months);

    let exact = if periodic.is_zero() {
        principal / months
    } else {
        let r = periodic.value();
        let growth = (Decimal::ONE + r)
            .checked_powu(term_months.into())
            .ok_or_else(|| {
                EngineError::invalid("term_months", "compounding factor exceeds the supported range")
            })?;
        let numerator = principal
            .checked_mul(r)
            .and_then(|v| v.checked_mul(growth))
            .ok_or_else(too_large)?;
        // A rate below decimal resolution leaves growth == 1.
        match numerator.checked_div(growth - Decimal::ONE) {
            Some(v) => v,
            None => principal / months,
        }
    };

    let mut emi = round_money(exact);

    // Rounding down must not leave the installments short of the principal.
    let repaid = emi.checked_mul(months).ok_or_else(too_large)?;
    if !periodic.is_zero() && repaid < principal {
        emi = round_money_up(exact);
    }

    Ok(emi.max(minor_unit()))
}

fn too_large() -> EngineError {
    EngineError::invalid("principal", "principal is too large to price")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_emi_reference_loan() {
        // 1,000,000 at 12% over 60 months: 22,244.45 before rounding.
        assert_eq!(compute_emi(dec!(1_000_000), dec!(12.0), 60).unwrap(), dec!(22244));
    }

    #[rstest]
    #[case(dec!(600_000), 12, dec!(50000))]
    #[case(dec!(120_000), 24, dec!(5000))]
    #[case(dec!(100_000), 3, dec!(33333))]
    fn test_zero_rate_is_straight_line(#[case] principal: Decimal, #[case] months: u32, #[case] expected: Decimal) {
        assert_eq!(compute_emi(principal, dec!(0), months).unwrap(), expected);
    }

    #[rstest]
    #[case(dec!(12000), dec!(12), 12, dec!(1066))]
    #[case(dec!(20100), dec!(12), 2, dec!(10201))]
    #[case(dec!(250_000), dec!(9), 1, dec!(251875))]
    fn test_emi_known_values(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] months: u32,
        #[case] expected: Decimal,
    ) {
        assert_eq!(compute_emi(principal, rate, months).unwrap(), expected);
    }

    #[rstest]
    #[case(dec!(0), dec!(12), 60, "principal")]
    #[case(dec!(1000), dec!(-1), 60, "annual_rate_percent")]
    #[case(dec!(1000), dec!(12), 0, "term_months")]
    fn test_invalid_inputs_name_the_field(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] months: u32,
        #[case] field: &str,
    ) {
        let err = compute_emi(principal, rate, months).unwrap_err();
        assert_eq!(err.field(), field);
    }

    #[test]
    fn test_tiny_principal_still_has_positive_emi() {
        let emi = compute_emi(dec!(1), dec!(12), 60).unwrap();
        assert_eq!(emi, dec!(1));
        let emi = compute_emi(dec!(2), dec!(0), 12).unwrap();
        assert_eq!(emi, dec!(1));
    }

    #[test]
    fn test_total_never_below_principal_with_interest() {
        // 100 at 0.01% over 3 months rounds to 33, which would pay back 99.
        let emi = compute_emi(dec!(100), dec!(0.01), 3).unwrap();
        assert_eq!(emi, dec!(34));
    }

    #[test]
    fn test_long_term_small_rate_does_not_diverge() {
        let emi = compute_emi(dec!(1_000_000), dec!(0.000001), 1200).unwrap();
        assert!(emi >= dec!(833) && emi <= dec!(834));
    }

    #[test]
    fn test_principal_beyond_decimal_range_is_rejected() {
        let err = compute_emi(Decimal::MAX, dec!(12), 60).unwrap_err();
        assert_eq!(err.field(), "principal");
    }

    #[test]
    fn test_quote_rejects_unrepresentable_total() {
        let terms = LoanTerms::new(Decimal::MAX, dec!(12), 60).unwrap();
        assert_eq!(quote_loan(&terms).unwrap_err().field(), "principal");
    }

    #[test]
    fn test_quote_loan() {
        let terms = LoanTerms::new(dec!(1_000_000), dec!(12), 60).unwrap();
        let quote = quote_loan(&terms).unwrap();

        assert_eq!(
            quote,
            LoanQuote {
                principal: dec!(1_000_000),
                annual_rate_percent: dec!(12),
                term_months: 60,
                emi: dec!(22244),
                total_payment: dec!(1_334_640),
                total_interest: dec!(334_640),
            }
        );
    }

    #[test]
    fn test_quote_zero_rate_has_no_interest() {
        let terms = LoanTerms::new(dec!(100_000), dec!(0), 3).unwrap();
        let quote = quote_loan(&terms).unwrap();
        assert_eq!(quote.total_interest, dec!(0));
    }
}
