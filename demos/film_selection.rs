use capsel::prelude::*;
use std::f64::consts::TAU;

const SWITCHING_FREQUENCY: f64 = 10.0e3;

fn dc_link_current(fundamental_peak: f64, third_peak: f64) -> Result<Waveform, WaveformError> {
    // one switching period on an angle axis
    let theta = linspace(0.0, TAU, 721);
    let current = theta
        .iter()
        .map(|&x| fundamental_peak * x.sin() + third_peak * (3.0 * x).sin())
        .collect();
    Waveform::new(theta, current)
}

fn film_series() -> Result<SeriesData, TableError> {
    let large = Dimensions::new(0.035, 0.0415, 0.05);
    let small = Dimensions::new(0.021, 0.0315, 0.035);
    let parts = vec![
        // ordering code, capacitance, rated voltage, housing, ESR, ESL, rated current
        ("B32778G8256+000", 25.0e-6, 800.0, small, 4.2e-3, 18.0e-9, 14.0),
        ("B32778G8506+000", 50.0e-6, 800.0, large, 3.1e-3, 22.0e-9, 20.0),
        ("B32778G1206+000", 20.0e-6, 1100.0, large, 4.8e-3, 22.0e-9, 15.0),
        ("B32778G0106+000", 10.0e-6, 450.0, small, 5.5e-3, 15.0e-9, 11.0),
    ];
    let candidates: Vec<_> = parts
        .iter()
        .map(|&(code, c, v, dims, esr, esl, i_rms)| {
            CandidateComponent::new(code, c, v, dims)
                .with_derated_voltages(0.875 * v, 0.7 * v)
                .with_parasitics(esr, esl)
                .with_rated_current(i_rms)
        })
        .collect();

    let mut series = SeriesData::new(
        "B32778",
        Technology::Film,
        candidates,
        DeratingCurve::new(vec![70.0, 85.0, 105.0], vec![1.0, 1.0, 0.4])?,
        ThermalTable::new(vec![
            ThermalRow {
                dimensions: small,
                coefficient: 0.085,
            },
            ThermalRow {
                dimensions: large,
                coefficient: 0.16,
            },
        ])?,
    );
    for &(code, _, _, _, esr, _, i_rms) in &parts {
        let curve = FrequencyCurve::new(
            vec![1.0e3, 1.0e4, 1.0e5],
            vec![2.5 * esr, esr, 0.8 * esr],
            vec![0.7 * i_rms, i_rms, 1.1 * i_rms],
        )?;
        series = series.with_frequency_curve(code, curve);
    }
    Ok(series)
}

fn main() -> Result<(), CapselError> {
    let config =
        EngineConfig::default().with_decomposition(DecompositionConfig::angular(TimeAxis::Radians, SWITCHING_FREQUENCY));
    let requirement = Requirement::builder(
        8.0,
        OperatingPoint::new(dc_link_current(45.0, 12.0)?, 680.0),
        OperatingPoint::new(dc_link_current(30.0, 8.0)?, 730.0),
    )
    .ambient_temperature(55.0)
    .max_series(2)
    .build()?;

    let results = evaluate_catalogue(&requirement, &[film_series()?], &config)?;
    for (name, evaluation) in &results {
        println!("series {name}");
        println!("code, series, parallel, volume(cm3), loss(W), dT(C), cost");
        for d in &evaluation.designs {
            println!(
                "{}, {}, {}, {:.1}, {:.3}, {:.2}, {:.2}",
                d.component.ordering_code,
                d.series_count,
                d.parallel_count,
                d.volume_total * 1.0e6,
                d.power_loss_total,
                d.temperature_rise,
                d.cost
            );
        }
        for r in &evaluation.rejected {
            println!("rejected {}: {}", r.ordering_code, r.reason);
        }
        let frontier = evaluation.frontier(&config.band);
        let efficient: Vec<&str> = frontier
            .efficient
            .iter()
            .map(|&i| evaluation.designs[i].component.ordering_code.as_str())
            .collect();
        println!("pareto: {efficient:?}");
    }
    Ok(())
}
