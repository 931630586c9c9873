//! Bill amounts from a billing plan and one period's revenue.
//!
//! `total = max(base_rent + revenue * share% / 100, minimum_guarantee)`, where
//! the plan type decides which of the two terms apply.

use crate::entities::{billing_plan, location_billing, PlanType};
use crate::errors::ServiceError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("revenue share percent {0} is outside 0..=100")]
    PercentOutOfRange(Decimal),
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("amount out of range while computing {0}")]
    Overflow(&'static str),
}

impl From<CalculationError> for ServiceError {
    fn from(err: CalculationError) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Effective pricing for one location after overrides are applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillingTerms {
    pub plan_type: PlanType,
    pub base_rent: Decimal,
    pub revenue_share_percent: Decimal,
    pub minimum_guarantee: Option<Decimal>,
}

impl BillingTerms {
    /// Plan values, with the location's overrides taking precedence
    pub fn resolve(plan: &billing_plan::Model, assignment: &location_billing::Model) -> Self {
        Self {
            plan_type: plan.plan_type,
            base_rent: assignment
                .base_rent_override
                .unwrap_or(plan.base_rent_amount),
            revenue_share_percent: assignment
                .revenue_share_override
                .unwrap_or(plan.revenue_share_percent),
            minimum_guarantee: assignment
                .minimum_guarantee_override
                .or(plan.minimum_guarantee),
        }
    }

    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.revenue_share_percent < Decimal::ZERO || self.revenue_share_percent > HUNDRED {
            return Err(CalculationError::PercentOutOfRange(
                self.revenue_share_percent,
            ));
        }
        if self.base_rent < Decimal::ZERO {
            return Err(CalculationError::NegativeAmount {
                field: "base_rent",
                value: self.base_rent,
            });
        }
        if let Some(guarantee) = self.minimum_guarantee {
            if guarantee < Decimal::ZERO {
                return Err(CalculationError::NegativeAmount {
                    field: "minimum_guarantee",
                    value: guarantee,
                });
            }
        }
        Ok(())
    }
}

/// Line items of a computed bill; `total = subtotal + minimum_guarantee_adjustment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillBreakdown {
    pub plan_type: PlanType,
    pub revenue_basis: Decimal,
    pub base_rent: Decimal,
    pub revenue_share: Decimal,
    pub subtotal: Decimal,
    pub minimum_guarantee_adjustment: Decimal,
    pub total: Decimal,
}

/// Rounds to cents, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the bill for `revenue` under `terms`.
///
/// A losing period (negative revenue) contributes no revenue share; it never
/// produces a credit.
pub fn calculate(terms: &BillingTerms, revenue: Decimal) -> Result<BillBreakdown, CalculationError> {
    terms.validate()?;

    let (base_rent, share_applies) = match terms.plan_type {
        PlanType::FixedRent => (terms.base_rent, false),
        PlanType::RevenueShare => (Decimal::ZERO, true),
        PlanType::Hybrid => (terms.base_rent, true),
    };

    let revenue_share = if share_applies && revenue > Decimal::ZERO {
        revenue
            .checked_mul(terms.revenue_share_percent)
            .and_then(|scaled| scaled.checked_div(HUNDRED))
            .map(round_money)
            .ok_or(CalculationError::Overflow("revenue_share"))?
    } else {
        Decimal::ZERO
    };

    let base_rent = round_money(base_rent);
    let subtotal = base_rent
        .checked_add(revenue_share)
        .ok_or(CalculationError::Overflow("subtotal"))?;
    let minimum_guarantee_adjustment = match terms.minimum_guarantee.map(round_money) {
        Some(guarantee) if guarantee > subtotal => guarantee - subtotal,
        _ => Decimal::ZERO,
    };

    Ok(BillBreakdown {
        plan_type: terms.plan_type,
        revenue_basis: round_money(revenue),
        base_rent,
        revenue_share,
        subtotal,
        minimum_guarantee_adjustment,
        total: subtotal + minimum_guarantee_adjustment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn terms(plan_type: PlanType, rent: Decimal, pct: Decimal, min: Option<Decimal>) -> BillingTerms {
        BillingTerms {
            plan_type,
            base_rent: rent,
            revenue_share_percent: pct,
            minimum_guarantee: min,
        }
    }

    #[rstest]
    #[case::fixed_ignores_revenue(PlanType::FixedRent, dec!(10000), dec!(2000), dec!(0), dec!(2000))]
    #[case::share_only(PlanType::RevenueShare, dec!(10000), dec!(0), dec!(30), dec!(3000))]
    #[case::hybrid_adds_both(PlanType::Hybrid, dec!(10000), dec!(1000), dec!(20), dec!(3000))]
    #[case::rounds_half_away(PlanType::RevenueShare, dec!(0.05), dec!(0), dec!(50), dec!(0.03))]
    fn computes_totals(
        #[case] plan: PlanType,
        #[case] revenue: Decimal,
        #[case] rent: Decimal,
        #[case] pct: Decimal,
        #[case] expected: Decimal,
    ) {
        let breakdown = calculate(&terms(plan, rent, pct, None), revenue).unwrap();
        assert_eq!(breakdown.total, expected);
        assert_eq!(breakdown.minimum_guarantee_adjustment, Decimal::ZERO);
    }

    #[test]
    fn minimum_guarantee_lifts_total() {
        let breakdown = calculate(
            &terms(PlanType::Hybrid, dec!(500), dec!(10), Some(dec!(2500))),
            dec!(12000),
        )
        .unwrap();
        assert_eq!(breakdown.subtotal, dec!(1700));
        assert_eq!(breakdown.minimum_guarantee_adjustment, dec!(800));
        assert_eq!(breakdown.total, dec!(2500));
    }

    #[test]
    fn minimum_guarantee_below_subtotal_is_ignored() {
        let breakdown = calculate(
            &terms(PlanType::RevenueShare, dec!(0), dec!(25), Some(dec!(100))),
            dec!(1000),
        )
        .unwrap();
        assert_eq!(breakdown.total, dec!(250));
        assert_eq!(breakdown.minimum_guarantee_adjustment, dec!(0));
    }

    #[test]
    fn losing_period_yields_no_share() {
        let breakdown = calculate(
            &terms(PlanType::Hybrid, dec!(1000), dec!(20), None),
            dec!(-4500.50),
        )
        .unwrap();
        assert_eq!(breakdown.revenue_basis, dec!(-4500.50));
        assert_eq!(breakdown.revenue_share, dec!(0));
        assert_eq!(breakdown.total, dec!(1000));
    }

    #[test]
    fn rejects_invalid_terms() {
        assert_eq!(
            calculate(&terms(PlanType::RevenueShare, dec!(0), dec!(100.5), None), dec!(1)),
            Err(CalculationError::PercentOutOfRange(dec!(100.5)))
        );
        assert_matches!(
            calculate(&terms(PlanType::FixedRent, dec!(-1), dec!(0), None), dec!(1)),
            Err(CalculationError::NegativeAmount { field: "base_rent", .. })
        );
        assert_matches!(
            ServiceError::from(CalculationError::PercentOutOfRange(dec!(101))),
            ServiceError::ValidationError(msg) if msg.contains("101")
        );
    }

    #[test]
    fn oversized_revenue_is_an_error() {
        let huge = Decimal::MAX;
        assert_eq!(
            calculate(&terms(PlanType::RevenueShare, dec!(0), dec!(50), None), huge),
            Err(CalculationError::Overflow("revenue_share"))
        );
        assert_eq!(
            calculate(&terms(PlanType::Hybrid, Decimal::MAX, dec!(100), None), dec!(1)),
            Err(CalculationError::Overflow("subtotal"))
        );
    }
}
