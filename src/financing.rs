//! Limits on how a vehicle purchase may be financed.
//!
//! A loan must be at least [`FinancingPolicy::min_loan_amount`] and may cover
//! at most [`FinancingPolicy::max_loan_to_value_percent`] of the vehicle price;
//! the buyer puts down at least [`FinancingPolicy::min_down_payment_percent`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{LoanTerms, Money, Percent, round_money_down, round_money_up};

/// How a vehicle purchase is split between buyer and lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingStructure {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub loan_amount: Money,
}

/// Starting values offered to a buyer for a given vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFinancing {
    pub min_down_payment: Money,
    pub max_loan_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingPolicy {
    pub min_loan_amount: Money,
    pub max_loan_to_value_percent: Percent,
    pub min_down_payment_percent: Percent,
    pub min_tenure_months: u32,
    pub max_tenure_months: u32,
}

impl Default for FinancingPolicy {
    fn default() -> Self {
        Self {
            min_loan_amount: dec!(50_000),
            max_loan_to_value_percent: dec!(80),
            min_down_payment_percent: dec!(20),
            min_tenure_months: 6,
            max_tenure_months: 120,
        }
    }
}

impl FinancingPolicy {
    /// Minimum down payment and maximum loan for a vehicle, in whole units
    /// that stay inside the limits.
    pub fn suggest(&self, vehicle_price: Money) -> EngineResult<SuggestedFinancing> {
        check_vehicle_price(vehicle_price)?;
        Ok(SuggestedFinancing {
            min_down_payment: round_money_up(self.min_down_payment(vehicle_price)),
            max_loan_amount: round_money_down(self.max_loan_amount(vehicle_price)),
        })
    }

    pub fn check_structure(&self, structure: &FinancingStructure) -> EngineResult<()> {
        check_vehicle_price(structure.vehicle_price)?;

        if structure.loan_amount < self.min_loan_amount {
            return Err(EngineError::invalid(
                "loan_amount",
                format!("loan amount must be at least {}", self.min_loan_amount),
            ));
        }
        let max_loan = self.max_loan_amount(structure.vehicle_price);
        if structure.loan_amount > max_loan {
            return Err(EngineError::invalid(
                "loan_amount",
                format!(
                    "loan amount must not exceed {}% of the vehicle price ({})",
                    self.max_loan_to_value_percent, max_loan
                ),
            ));
        }

        let min_down = self.min_down_payment(structure.vehicle_price);
        if structure.down_payment < min_down {
            return Err(EngineError::invalid(
                "down_payment",
                format!(
                    "down payment must be at least {}% of the vehicle price ({})",
                    self.min_down_payment_percent, min_down
                ),
            ));
        }
        Ok(())
    }

    pub fn check_tenure(&self, term_months: u32) -> EngineResult<()> {
        if term_months < self.min_tenure_months || term_months > self.max_tenure_months {
            return Err(EngineError::invalid(
                "term_months",
                format!(
                    "tenure must be between {} and {} months",
                    self.min_tenure_months, self.max_tenure_months
                ),
            ));
        }
        Ok(())
    }

    /// Applies every financing limit and returns the terms of the loan.
    pub fn terms_for(
        &self,
        structure: &FinancingStructure,
        annual_rate_percent: Percent,
        term_months: u32,
    ) -> EngineResult<LoanTerms> {
        self.check_structure(structure)?;
        self.check_tenure(term_months)?;
        LoanTerms::new(structure.loan_amount, annual_rate_percent, term_months)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.min_loan_amount <= Decimal::ZERO {
            return Err(EngineError::invalid("min_loan_amount", "must be positive"));
        }
        check_percent("max_loan_to_value_percent", self.max_loan_to_value_percent)?;
        check_percent("min_down_payment_percent", self.min_down_payment_percent)?;
        if self.min_tenure_months == 0 {
            return Err(EngineError::invalid("min_tenure_months", "must be at least one month"));
        }
        if self.min_tenure_months > self.max_tenure_months {
            return Err(EngineError::invalid(
                "max_tenure_months",
                "must not be below min_tenure_months",
            ));
        }
        Ok(())
    }

    fn max_loan_amount(&self, vehicle_price: Money) -> Money {
        vehicle_price * self.max_loan_to_value_percent / dec!(100)
    }

    fn min_down_payment(&self, vehicle_price: Money) -> Money {
        vehicle_price * self.min_down_payment_percent / dec!(100)
    }
}

fn check_vehicle_price(vehicle_price: Money) -> EngineResult<()> {
    if vehicle_price <= Decimal::ZERO {
        return Err(EngineError::invalid("vehicle_price", "vehicle price must be positive"));
    }
    Ok(())
}

fn check_percent(field: &str, value: Percent) -> EngineResult<()> {
    if value <= Decimal::ZERO || value > dec!(100) {
        return Err(EngineError::invalid(field, "must be above 0 and at most 100"));
    }
    Ok(())
}
