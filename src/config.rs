use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::affordability::AffordabilityPolicy;
use crate::error::{EngineError, EngineResult};
use crate::financing::FinancingPolicy;
use crate::types::Percent;

/// Tunable lending policy. Fields left out of a policy document keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    pub affordability: AffordabilityPolicy,
    pub financing: FinancingPolicy,
    /// Rate offered when an application does not specify one.
    pub default_annual_rate_percent: Percent,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            affordability: AffordabilityPolicy::default(),
            financing: FinancingPolicy::default(),
            default_annual_rate_percent: dec!(12),
        }
    }
}

impl LendingPolicy {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let policy: LendingPolicy = serde_json::from_str(json).context("malformed lending policy")?;
        policy.validate().context("invalid lending policy")?;
        Ok(policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading lending policy from {}", path.display()))?;
        let policy = Self::from_json_str(&raw).with_context(|| format!("loading {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Lending policy loaded");
        Ok(policy)
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.affordability.validate()?;
        self.financing.validate()?;
        if self.default_annual_rate_percent < Decimal::ZERO {
            return Err(EngineError::invalid(
                "default_annual_rate_percent",
                "annual rate must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let policy = LendingPolicy::from_json_str("{}").unwrap();
        assert_eq!(policy, LendingPolicy::default());
        assert_eq!(policy.affordability.max_emi_to_income_percent, dec!(50));
        assert_eq!(policy.financing.max_tenure_months, 120);
    }

    #[test]
    fn test_partial_document_overrides_only_given_fields() {
        let policy = LendingPolicy::from_json_str(
            r#"{
                "affordability": { "max_emi_to_income_percent": "40" },
                "financing": { "max_tenure_months": 84 }
            }"#,
        )
        .unwrap();

        assert_eq!(policy.affordability.max_emi_to_income_percent, dec!(40));
        assert_eq!(policy.financing.max_tenure_months, 84);
        assert_eq!(policy.financing.min_tenure_months, 6);
        assert_eq!(policy.default_annual_rate_percent, dec!(12));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let err = LendingPolicy::from_json_str(r#"{ "financing": { "max_loan_to_value_percent": "150" } }"#)
            .unwrap_err();
        let root = err.root_cause().downcast_ref::<EngineError>().unwrap();
        assert_eq!(root.field(), "max_loan_to_value_percent");
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(LendingPolicy::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = LendingPolicy::from_json_file("/nonexistent/lending-policy.json").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/lending-policy.json"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("emi-engine-policy-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "default_annual_rate_percent": "10.5" }"#).unwrap();

        let policy = LendingPolicy::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(policy.default_annual_rate_percent, dec!(10.5));
    }
}
