//! Property-based tests for the bill calculator.
//!
//! These tests use proptest to verify the pricing invariants across a wide
//! range of plans and revenues.

use proptest::prelude::*;
use rust_decimal::Decimal;
use slotfleet_api::entities::PlanType;
use slotfleet_api::services::billing::{calculate, BillingTerms};

// Strategies for generating test data
fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn revenue_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn percent_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis_points| Decimal::new(basis_points, 2))
}

fn plan_type_strategy() -> impl Strategy<Value = PlanType> {
    prop_oneof![
        Just(PlanType::FixedRent),
        Just(PlanType::RevenueShare),
        Just(PlanType::Hybrid),
    ]
}

fn terms_strategy() -> impl Strategy<Value = BillingTerms> {
    (
        plan_type_strategy(),
        money_strategy(),
        percent_strategy(),
        proptest::option::of(money_strategy()),
    )
        .prop_map(|(plan_type, base_rent, revenue_share_percent, minimum_guarantee)| BillingTerms {
            plan_type,
            base_rent,
            revenue_share_percent,
            minimum_guarantee,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn total_never_below_minimum_guarantee(terms in terms_strategy(), revenue in revenue_strategy()) {
        let bill = calculate(&terms, revenue).unwrap();
        if let Some(guarantee) = terms.minimum_guarantee {
            prop_assert!(bill.total >= guarantee.round_dp(2), "{:?} -> {:?}", terms, bill);
        }
    }

    #[test]
    fn total_never_below_subtotal(terms in terms_strategy(), revenue in revenue_strategy()) {
        let bill = calculate(&terms, revenue).unwrap();
        prop_assert!(bill.total >= bill.subtotal);
        prop_assert_eq!(bill.total, bill.subtotal + bill.minimum_guarantee_adjustment);
        prop_assert!(bill.minimum_guarantee_adjustment >= Decimal::ZERO);
    }

    #[test]
    fn fixed_rent_ignores_revenue(
        mut terms in terms_strategy(),
        first in revenue_strategy(),
        second in revenue_strategy(),
    ) {
        terms.plan_type = PlanType::FixedRent;
        let a = calculate(&terms, first).unwrap();
        let b = calculate(&terms, second).unwrap();
        prop_assert_eq!(a.total, b.total);
        prop_assert_eq!(a.revenue_share, Decimal::ZERO);
    }

    #[test]
    fn revenue_share_is_monotone(
        mut terms in terms_strategy(),
        low in revenue_strategy(),
        extra in money_strategy(),
    ) {
        terms.plan_type = PlanType::RevenueShare;
        let a = calculate(&terms, low).unwrap();
        let b = calculate(&terms, low + extra).unwrap();
        prop_assert!(b.revenue_share >= a.revenue_share);
        prop_assert!(b.total >= a.total);
    }

    #[test]
    fn amounts_are_whole_cents(terms in terms_strategy(), revenue in revenue_strategy()) {
        let bill = calculate(&terms, revenue).unwrap();
        for amount in [bill.base_rent, bill.revenue_share, bill.subtotal, bill.total] {
            prop_assert!(amount.scale() <= 2, "{} has more than two decimals", amount);
        }
    }
}
