use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{Money, Percent};

/// EMI-to-income ratio above which an application is flagged.
pub const DEFAULT_MAX_EMI_TO_INCOME_PERCENT: Percent = dec!(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    Ok,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// EMI as a percentage of monthly income, unrounded.
    pub emi_to_income_ratio_percent: Percent,
    pub risk_flag: RiskFlag,
}

/// Threshold applied when judging affordability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityPolicy {
    pub max_emi_to_income_percent: Percent,
}

impl Default for AffordabilityPolicy {
    fn default() -> Self {
        Self {
            max_emi_to_income_percent: DEFAULT_MAX_EMI_TO_INCOME_PERCENT,
        }
    }
}

impl AffordabilityPolicy {
    pub fn analyze(&self, emi: Money, monthly_income: Money) -> EngineResult<AffordabilityResult> {
        analyze_with_threshold(emi, monthly_income, self.max_emi_to_income_percent)
    }

    pub fn validate(&self) -> EngineResult<()> {
        validate_threshold(self.max_emi_to_income_percent)
    }
}

/// Ratio analysis with the default 50% threshold.
///
/// A ratio of exactly 50% is still `Ok`; only values above it warn.
pub fn analyze(emi: Money, monthly_income: Money) -> EngineResult<AffordabilityResult> {
    analyze_with_threshold(emi, monthly_income, DEFAULT_MAX_EMI_TO_INCOME_PERCENT)
}

pub fn analyze_with_threshold(
    emi: Money,
    monthly_income: Money,
    threshold_percent: Percent,
) -> EngineResult<AffordabilityResult> {
    if monthly_income <= Decimal::ZERO {
        return Err(EngineError::invalid("monthly_income", "monthly income must be positive"));
    }
    if emi < Decimal::ZERO {
        return Err(EngineError::invalid("emi", "EMI must not be negative"));
    }
    validate_threshold(threshold_percent)?;

    let ratio = emi
        .checked_div(monthly_income)
        .and_then(|v| v.checked_mul(dec!(100)))
        .ok_or_else(|| EngineError::invalid("emi", "EMI is too large relative to monthly income"))?;
    let risk_flag = if ratio > threshold_percent {
        RiskFlag::Warning
    } else {
        RiskFlag::Ok
    };

    if risk_flag == RiskFlag::Warning {
        tracing::warn!(
            emi = %emi,
            monthly_income = %monthly_income,
            ratio_percent = %ratio,
            threshold_percent = %threshold_percent,
            "EMI exceeds affordability threshold"
        );
    }

    Ok(AffordabilityResult {
        emi_to_income_ratio_percent: ratio,
        risk_flag,
    })
}

fn validate_threshold(threshold_percent: Percent) -> EngineResult<()> {
    if threshold_percent <= Decimal::ZERO {
        return Err(EngineError::invalid(
            "max_emi_to_income_percent",
            "affordability threshold must be positive",
        ));
    }
    Ok(())
}
