use capsel::prelude::*;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

const PERIOD: f64 = 1.0e-4;
const HOUSING: Dimensions = Dimensions {
    width: 0.011,
    length: 0.0315,
    height: 0.021,
};

fn triangle(peak: f64) -> Waveform {
    let t = linspace(0.0, PERIOD, 2001);
    let i = t
        .iter()
        .map(|&t| {
            let x = t / PERIOD;
            peak * if x < 0.5 { 4.0 * x - 1.0 } else { 3.0 - 4.0 * x }
        })
        .collect();
    Waveform::new(t, i).expect("valid grid")
}

fn build_series(parts: usize) -> SeriesData {
    let candidates: Vec<_> = (0..parts)
        .map(|k| {
            let c = 5.0e-6 * (1 + k % 8) as f64;
            let v = [500.0, 800.0, 1100.0][k % 3];
            CandidateComponent::new(format!("B32778G{k:04}K000"), c, v, HOUSING)
                .with_derated_voltages(0.875 * v, 0.7 * v)
                .with_parasitics(4.0e-3, 20.0e-9)
                .with_rated_current(12.0)
        })
        .collect();
    let curve = FrequencyCurve::new(vec![1.0e3, 1.0e4, 1.0e5], vec![8.0e-3, 4.0e-3, 3.0e-3], vec![9.0, 12.0, 14.0])
        .expect("valid curve");
    let codes: Vec<String> = candidates.iter().map(|c| c.ordering_code.clone()).collect();
    let mut series = SeriesData::new(
        "B32778",
        Technology::Film,
        candidates,
        DeratingCurve::new(vec![40.0, 85.0, 105.0], vec![1.0, 1.0, 0.5]).expect("valid curve"),
        ThermalTable::new(vec![ThermalRow {
            dimensions: HOUSING,
            coefficient: 0.12,
        }])
        .expect("valid table"),
    );
    for code in &codes {
        series = series.with_frequency_curve(code, curve.clone());
    }
    series
}

fn bench_selection(c: &mut Criterion) {
    let config = EngineConfig::default();
    let requirement = Requirement::builder(
        4.0,
        OperatingPoint::new(triangle(40.0), 700.0),
        OperatingPoint::new(triangle(25.0), 730.0),
    )
    .build()
    .expect("valid requirement");

    let mut group = c.benchmark_group("selection");
    group.bench_function("analyze", |b| b.iter(|| analyze(&requirement, &config)));

    let analysis = analyze(&requirement, &config).expect("analysis");
    for parts in [64, 1024] {
        let series = build_series(parts);
        group.bench_function(BenchmarkId::new("evaluate_series", parts), |b| {
            b.iter(|| evaluate_series(&requirement, &analysis, &series, &config))
        });
        let designs = evaluate_series(&requirement, &analysis, &series, &config).designs;
        group.bench_function(BenchmarkId::new("frontier", parts), |b| {
            b.iter_batched(
                || designs.clone(),
                |d| Frontier::compute(&d, &config.band),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
