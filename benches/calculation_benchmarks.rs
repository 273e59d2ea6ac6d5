//! Performance benchmarks for the payslip engine.
//!
//! This benchmark suite measures:
//! - A single salaried payslip over a full year of actuals
//! - A single hourly annual projection
//! - Batches of 100 and 1000 staff members
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payslip_engine::config::RateTableLoader;
use payslip_engine::engine::{compute_batch, compute_payslip};
use payslip_engine::models::{
    EmploymentType, PayslipBasis, StaffCompensationProfile, WorkPeriodActual,
};

/// Loads the rate tables used by every benchmark.
fn load_rates() -> RateTableLoader {
    RateTableLoader::load("./config/jp_2024").expect("Failed to load config")
}

/// Creates a profile; every third staff member is hourly.
fn create_profile(index: usize) -> StaffCompensationProfile {
    let hourly = index % 3 == 0;
    StaffCompensationProfile {
        staff_id: format!("staff_{:04}", index),
        employment_type: if hourly {
            EmploymentType::Hourly
        } else {
            EmploymentType::Salaried
        },
        monthly_salary: Some(Decimal::from(250_000 + (index as i64 % 10) * 10_000)),
        hourly_rate: Some(Decimal::from(1_100 + (index as i64 % 5) * 50)),
        contract_fee: None,
        commute_distance_km: Decimal::from(index as i64 % 20),
        has_social_insurance: !hourly,
    }
}

/// Creates actuals for the first `months` months of 2024.
fn create_actuals(months: u32) -> Vec<WorkPeriodActual> {
    (1..=months)
        .map(|month| WorkPeriodActual {
            year: 2024,
            month,
            days_worked: 20,
            hours_worked: Decimal::new(15_250, 2),
        })
        .collect()
}

/// Benchmark: Single salaried payslip over a full year.
fn bench_single_payslip(c: &mut Criterion) {
    let rates = load_rates();
    let profile = create_profile(1);
    let actuals = create_actuals(12);

    c.bench_function("single_payslip", |b| {
        b.iter(|| {
            black_box(compute_payslip(
                black_box(&profile),
                black_box(&actuals),
                &rates,
                PayslipBasis::Actuals { year: 2024 },
                rates.settings(),
            ))
        })
    });
}

/// Benchmark: Hourly annual projection from partial-year actuals.
fn bench_annual_projection(c: &mut Criterion) {
    let rates = load_rates();
    let profile = create_profile(0);
    let actuals = create_actuals(5);

    c.bench_function("annual_projection", |b| {
        b.iter(|| {
            black_box(compute_payslip(
                black_box(&profile),
                black_box(&actuals),
                &rates,
                PayslipBasis::AnnualProjection { year: 2024 },
                rates.settings(),
            ))
        })
    });
}

/// Benchmark: Batches of staff members.
fn bench_batch(c: &mut Criterion) {
    let rates = load_rates();

    let mut group = c.benchmark_group("batch_processing");

    for size in [100_usize, 1000] {
        let profiles: Vec<StaffCompensationProfile> = (0..size).map(create_profile).collect();
        let actuals: HashMap<String, Vec<WorkPeriodActual>> = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.staff_id.clone(), create_actuals(1 + (i % 12) as u32)))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(compute_batch(
                    &profiles,
                    &actuals,
                    &rates,
                    PayslipBasis::AnnualProjection { year: 2024 },
                    rates.settings(),
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_payslip,
    bench_annual_projection,
    bench_batch
);
criterion_main!(benches);
