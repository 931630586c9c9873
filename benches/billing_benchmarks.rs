use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use slotfleet_api::entities::{BillingFrequency, PlanType};
use slotfleet_api::services::billing::{calculate, period_containing, BillingTerms};

fn terms(plan_type: PlanType) -> BillingTerms {
    BillingTerms {
        plan_type,
        base_rent: dec!(1500),
        revenue_share_percent: dec!(12.5),
        minimum_guarantee: Some(dec!(2500)),
    }
}

// Bill calculation per plan type
fn calculation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bill_calculation");

    for plan_type in [PlanType::FixedRent, PlanType::RevenueShare, PlanType::Hybrid] {
        let terms = terms(plan_type);
        group.bench_with_input(
            BenchmarkId::from_parameter(plan_type),
            &terms,
            |b, terms| {
                b.iter(|| calculate(black_box(terms), black_box(dec!(48213.77))));
            },
        );
    }

    group.finish();
}

// A year of monthly reports for one location
fn batch_calculation_benchmark(c: &mut Criterion) {
    let terms = terms(PlanType::Hybrid);
    let revenues: Vec<Decimal> = (1..=12).map(|m| Decimal::new(m * 731_245, 2)).collect();

    c.bench_function("bill_calculation_year", |b| {
        b.iter(|| {
            revenues
                .iter()
                .filter_map(|revenue| calculate(&terms, *revenue).ok())
                .map(|bill| bill.total)
                .sum::<Decimal>()
        });
    });
}

fn period_benchmark(c: &mut Criterion) {
    let anchor = chrono::NaiveDate::from_ymd_opt(2019, 1, 31).unwrap_or_default();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 17).unwrap_or_default();

    c.bench_function("period_containing", |b| {
        b.iter(|| period_containing(BillingFrequency::Quarterly, black_box(anchor), black_box(date)));
    });
}

criterion_group!(
    benches,
    calculation_benchmark,
    batch_calculation_benchmark,
    period_benchmark
);
criterion_main!(benches);
