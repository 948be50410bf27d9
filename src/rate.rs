use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::Percent;

/// Interest rate for one monthly period, as a fraction (0.01 means 1%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PeriodicRate(Decimal);

impl TryFrom<Decimal> for PeriodicRate {
    type Error = EngineError;

    fn try_from(value: Decimal) -> EngineResult<Self> {
        if value < Decimal::ZERO {
            return Err(EngineError::invalid("periodic_rate", "periodic rate must not be negative"));
        }
        Ok(PeriodicRate(value))
    }
}

impl From<PeriodicRate> for Decimal {
    fn from(rate: PeriodicRate) -> Self {
        rate.0
    }
}

impl PeriodicRate {
    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

/// Converts an annual nominal percentage into the monthly periodic rate.
///
/// The annual rate is split evenly over twelve months (`annual / 1200`), the
/// convention used for EMI pricing, so 12% a year is exactly 1% a month.
pub fn normalize(annual_rate_percent: Percent) -> EngineResult<PeriodicRate> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            "annual rate must not be negative",
        ));
    }
    Ok(PeriodicRate(annual_rate_percent / dec!(1200)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(12), dec!(0.01))]
    #[case(dec!(0), dec!(0))]
    #[case(dec!(6), dec!(0.005))]
    #[case(dec!(10.5), dec!(0.00875))]
    fn test_normalize(#[case] annual: Decimal, #[case] expected: Decimal) {
        assert_eq!(normalize(annual).unwrap().value(), expected);
    }

    #[test]
    fn test_zero_only_for_zero_rate() {
        assert!(normalize(dec!(0)).unwrap().is_zero());
        assert!(!normalize(dec!(0.0001)).unwrap().is_zero());
    }

    #[test]
    fn test_deserialize_checks_sign() {
        let rate: PeriodicRate = serde_json::from_str(r#""0.01""#).unwrap();
        assert_eq!(rate.value(), dec!(0.01));
        assert_eq!(serde_json::to_string(&rate).unwrap(), r#""0.01""#);

        assert!(serde_json::from_str::<PeriodicRate>(r#""-0.01""#).is_err());
        assert!(PeriodicRate::try_from(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = normalize(dec!(-1)).unwrap_err();
        assert_eq!(err.field(), "annual_rate_percent");
    }
}
