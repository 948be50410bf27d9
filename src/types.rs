use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Monetary amounts, in whole currency units once rounded.
pub type Money = Decimal;

/// Percentages as written on forms (12.5 means 12.5%).
pub type Percent = Decimal;

/// Decimal places kept for monetary results. The observed market (NPR) works
/// in whole rupees.
pub const MONEY_DECIMAL_PLACES: u32 = 0;

/// Rounds a monetary amount half-up to the money precision.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_money_up(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::ToPositiveInfinity)
}

pub(crate) fn round_money_down(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::ToNegativeInfinity)
}

/// Smallest amount representable after rounding.
pub fn minor_unit() -> Money {
    Decimal::new(1, MONEY_DECIMAL_PLACES)
}

/// Immutable terms of a single loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// The amount borrowed.
    pub principal: Money,
    /// Annual nominal rate as a percentage (e.g., 12.0 for 12%). Zero is allowed.
    pub annual_rate_percent: Percent,
    /// Number of monthly installments.
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_months: u32) -> EngineResult<Self> {
        let terms = LoanTerms {
            principal,
            annual_rate_percent,
            term_months,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Checks the invariants; operations re-run this on every call.
    pub fn validate(&self) -> EngineResult<()> {
        validate_terms(self.principal, self.annual_rate_percent, self.term_months)
    }
}

pub(crate) fn validate_terms(principal: Money, annual_rate_percent: Percent, term_months: u32) -> EngineResult<()> {
    if principal <= Decimal::ZERO {
        return Err(EngineError::invalid("principal", "principal must be positive"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            "annual rate must not be negative",
        ));
    }
    if term_months == 0 {
        return Err(EngineError::invalid("term_months", "term must be at least one month"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(22244.45), dec!(22244))]
    #[case(dec!(22244.5), dec!(22245))]
    #[case(dec!(0.49), dec!(0))]
    #[case(dec!(1.5), dec!(2))]
    fn test_round_money_half_up(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[rstest]
    #[case(dec!(0), dec!(12), 60, "principal")]
    #[case(dec!(-5), dec!(12), 60, "principal")]
    #[case(dec!(1000), dec!(-0.1), 60, "annual_rate_percent")]
    #[case(dec!(1000), dec!(12), 0, "term_months")]
    fn test_loan_terms_rejects_invalid(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] months: u32,
        #[case] field: &str,
    ) {
        let err = LoanTerms::new(principal, rate, months).unwrap_err();
        assert_eq!(err.field(), field);
    }

    #[test]
    fn test_loan_terms_accepts_zero_rate() {
        let terms = LoanTerms::new(dec!(600000), dec!(0), 12).unwrap();
        assert_eq!(terms.term_months, 12);
    }

    #[test]
    fn test_loan_terms_deserialize_from_json() {
        let terms: LoanTerms = serde_json::from_str(
            r#"{"principal":"1000000","annual_rate_percent":"12.0","term_months":60}"#,
        )
        .unwrap();
        assert_eq!(terms.principal, dec!(1000000));
        assert!(terms.validate().is_ok());
    }
}
