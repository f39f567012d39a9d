//! Bank synthesis: series/parallel counts and aggregate metrics per candidate.
//!
//! [`synthesize`] is a pure function of an explicit [`SynthesisContext`] and one
//! candidate. Candidates that cannot form a valid bank come back as a typed
//! [`Rejection`]; lookup misses in the catalogue tables only drop the affected part.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::catalogue::{CandidateComponent, FrequencyCurve, Ratings, SeriesData};
use crate::config::EngineConfig;
use crate::constants::{resonance_frequency, PEAK_PER_RMS};
use crate::derating::{
    lifetime_voltage_derating, parallel_count_dvdt, self_heating_coefficient, DeratingContext, LookupMiss,
};
use crate::errors::CapselError;
use crate::math::{ceil_count, Scalar};
use crate::pareto::{BandConfig, Frontier, Objectives};
use crate::requirements::{analyze, Requirement, RequirementAnalysis};
use crate::spectrum::HarmonicSet;

/// Why a candidate produced no design.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// A field needed for synthesis is absent or not usable.
    #[error("missing or invalid {0}")]
    MissingData(&'static str),
    /// More devices in series than the requirement allows.
    #[error("needs {needed} devices in series, at most {max} allowed")]
    SeriesLimit {
        /// Required series count.
        needed: u32,
        /// Requirement limit.
        max: u32,
    },
    /// Self-resonance lies below the lowest harmonic of interest.
    #[error("resonance at {resonance:.0} Hz is below the lowest harmonic at {lowest:.0} Hz")]
    BelowResonance {
        /// Device resonance frequency (Hz).
        resonance: Scalar,
        /// Lowest non-DC harmonic (Hz).
        lowest: Scalar,
    },
    /// The bank heats up more than the derated limit.
    #[error("temperature rise {rise:.1} °C exceeds {limit:.1} °C")]
    Overheated {
        /// Computed rise (°C).
        rise: Scalar,
        /// Derated limit (°C).
        limit: Scalar,
    },
    /// A catalogue table has no usable row for this part.
    #[error(transparent)]
    Lookup(#[from] LookupMiss),
    /// An iterative derating step hit its iteration limit.
    #[error("{0} did not converge")]
    NotConverged(&'static str),
    /// A derived rating makes a device count unbounded.
    #[error("unusable {0}")]
    InvalidRating(&'static str),
}

/// Lower bounds on the parallel count.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelCounts {
    /// Devices needed for the capacitance.
    pub capacitance: u32,
    /// Devices needed for the current capability.
    pub current: u32,
    /// Devices needed for the slew-rate limit, when the series has a dv/dt table.
    pub dvdt: Option<u32>,
}

impl ParallelCounts {
    /// Governing parallel count.
    #[must_use]
    pub fn governing(&self) -> u32 {
        self.capacitance.max(self.current).max(self.dvdt.unwrap_or(1))
    }
}

/// A feasible bank built from one candidate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedDesign {
    /// The part the bank is built from.
    pub component: CandidateComponent,
    /// Devices in series.
    pub series_count: u32,
    /// Devices in parallel.
    pub parallel_count: u32,
    /// Breakdown of the parallel count.
    pub counts: ParallelCounts,
    /// Permitted device voltage at the virtual internal temperature (V).
    pub virtual_voltage: Scalar,
    /// Bank volume (m³).
    pub volume_total: Scalar,
    /// Loss per device (W), worst operating point.
    pub power_loss_per_device: Scalar,
    /// Bank loss (W).
    pub power_loss_total: Scalar,
    /// Self-heating of the bank (°C).
    pub temperature_rise: Scalar,
    /// Thermal conductance of the housing (W/°C).
    pub self_heating_coefficient: Scalar,
    /// Device self-resonance (Hz).
    pub resonance_frequency: Scalar,
    /// Bank cost.
    pub cost: Scalar,
}

impl SynthesizedDesign {
    /// Total number of devices in the bank.
    #[must_use]
    pub fn device_count(&self) -> u64 {
        u64::from(self.series_count) * u64::from(self.parallel_count)
    }
}

impl Objectives for SynthesizedDesign {
    fn objectives(&self) -> (Scalar, Scalar) {
        (self.volume_total, self.power_loss_total)
    }
}

/// Everything a candidate evaluation may read.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    /// Application requirement.
    pub requirement: &'a Requirement,
    /// Quantities derived from the requirement.
    pub analysis: &'a RequirementAnalysis,
    /// Ambient-dependent derating of the series.
    pub derating: DeratingContext,
    /// Series tables.
    pub series: &'a SeriesData,
    /// Engine settings.
    pub config: &'a EngineConfig,
}

impl<'a> SynthesisContext<'a> {
    /// Bundles the inputs and derives the series derating at the requirement's ambient.
    #[must_use]
    pub fn new(
        requirement: &'a Requirement,
        analysis: &'a RequirementAnalysis,
        series: &'a SeriesData,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            requirement,
            analysis,
            derating: DeratingContext::new(requirement.ambient_temperature(), series, config.clamp_policy),
            series,
            config,
        }
    }
}

fn virtual_voltage(ctx: &SynthesisContext<'_>, ratings: &Ratings) -> Result<Scalar, Rejection> {
    let at_temperature = ratings.voltage_at(ctx.derating.virtual_temperature);
    let (Some(target), false) = (ctx.requirement.target_lifetime(), ctx.series.lifetime_curves.is_empty()) else {
        return Ok(at_temperature);
    };
    let lifetime = lifetime_voltage_derating(
        target,
        ctx.derating.virtual_temperature,
        ratings.voltages[0],
        &ctx.series.lifetime_curves,
        &ctx.config.blend,
    )?;
    if !lifetime.converged {
        return Err(Rejection::NotConverged("lifetime curve blending"));
    }
    Ok(at_temperature.min(lifetime.voltage))
}

/// Per-device peak current capability over frequency.
enum Capability<'a> {
    Curve(&'a FrequencyCurve),
    Rated { rms_85: Scalar, esr: Scalar },
}

impl<'a> Capability<'a> {
    fn resolve(series: &'a SeriesData, candidate: &CandidateComponent) -> Result<Self, Rejection> {
        if let Some(curve) = series.frequency_curve(candidate) {
            return Ok(Capability::Curve(curve));
        }
        let positive = |v: Option<Scalar>| v.filter(|x| x.is_finite() && *x > 0.0);
        let rms_85 = positive(candidate.rated_rms_current_85).ok_or(Rejection::MissingData("rated_rms_current_85"))?;
        let esr = candidate
            .esr
            .filter(|r| r.is_finite() && *r >= 0.0)
            .ok_or(Rejection::MissingData("esr"))?;
        Ok(Capability::Rated { rms_85, esr })
    }

    fn esr_at(&self, frequency: Scalar) -> Scalar {
        match self {
            Capability::Curve(curve) => curve.esr_at(frequency),
            Capability::Rated { esr, .. } => *esr,
        }
    }

    fn parallel_count(&self, harmonics: &HarmonicSet, rms_current: Scalar, factor: Scalar) -> Result<u32, Rejection> {
        match self {
            Capability::Curve(curve) => harmonics
                .iter()
                .filter(|h| h.amplitude > 0.0)
                .map(|h| {
                    let peak_capability = factor * PEAK_PER_RMS * curve.rms_current_at(h.frequency);
                    ceil_count(h.amplitude / peak_capability)
                        .ok_or(Rejection::InvalidRating("derated current capability"))
                })
                .try_fold(1, |acc, n| n.map(|n| acc.max(n))),
            Capability::Rated { rms_85, .. } => {
                ceil_count(rms_current / (rms_85 * factor)).ok_or(Rejection::InvalidRating("derated current capability"))
            }
        }
    }
}

/// ESR loss of one device carrying `1/parallel` of every harmonic.
fn device_loss(capability: &Capability<'_>, harmonics: &HarmonicSet, parallel: u32) -> Scalar {
    let n = Scalar::from(parallel);
    harmonics
        .iter()
        .map(|h| 0.5 * capability.esr_at(h.frequency) * (h.amplitude / n).powi(2))
        .sum()
}

/// Builds the smallest valid bank from `candidate`, or says why there is none.
pub fn synthesize(
    ctx: &SynthesisContext<'_>,
    candidate: &CandidateComponent,
) -> Result<SynthesizedDesign, Rejection> {
    let ratings = candidate.ratings().map_err(Rejection::MissingData)?;
    let requirement = ctx.requirement;
    let analysis = ctx.analysis;

    let virtual_voltage = virtual_voltage(ctx, &ratings)?;
    let series_count = ceil_count(
        requirement.max_dc_voltage() / (virtual_voltage * (1.0 + requirement.voltage_safety_margin() / 100.0)),
    )
    .ok_or(Rejection::InvalidRating("virtual voltage"))?;
    if series_count > requirement.max_series() {
        return Err(Rejection::SeriesLimit {
            needed: series_count,
            max: requirement.max_series(),
        });
    }

    let effective = ratings.capacitance * (1.0 - requirement.capacitance_tolerance() / 100.0) / Scalar::from(series_count);
    let by_capacitance =
        ceil_count(analysis.min_capacitance() / effective).ok_or(Rejection::InvalidRating("capacitance"))?;

    let capability = Capability::resolve(ctx.series, candidate)?;
    let mut by_current = 1;
    for point in &analysis.points {
        by_current = by_current.max(capability.parallel_count(
            &point.harmonics,
            point.rms_current,
            ctx.derating.derating_factor,
        )?);
    }

    let by_dvdt = match &ctx.series.dvdt_table {
        Some(table) => {
            let dvdt_max = table.max_dvdt(&candidate.ordering_code, ratings.voltages[0])?;
            Some(
                parallel_count_dvdt(analysis.peak_current(), dvdt_max, ratings.capacitance)
                    .ok_or(Rejection::InvalidRating("dv/dt limit"))?,
            )
        }
        None => None,
    };

    let counts = ParallelCounts {
        capacitance: by_capacitance,
        current: by_current,
        dvdt: by_dvdt,
    };
    let parallel_count = counts.governing();

    let resonance = resonance_frequency(ratings.capacitance, ratings.esl);
    if let Some(lowest) = analysis.lowest_harmonic() {
        if resonance < lowest {
            return Err(Rejection::BelowResonance { resonance, lowest });
        }
    }

    let power_loss_per_device = analysis
        .points
        .iter()
        .map(|p| device_loss(&capability, &p.harmonics, parallel_count))
        .fold(0.0, Scalar::max);
    let devices = Scalar::from(series_count) * Scalar::from(parallel_count);
    let power_loss_total = power_loss_per_device * devices;

    let g = self_heating_coefficient(&candidate.dimensions, &ctx.series.thermal_table)?;
    let temperature_rise = power_loss_total / g;
    if temperature_rise > ctx.derating.delta_t_limit {
        return Err(Rejection::Overheated {
            rise: temperature_rise,
            limit: ctx.derating.delta_t_limit,
        });
    }

    let unit_cost = ctx
        .config
        .cost_model(ctx.series.technology)
        .unit_cost(ratings.voltages[0], ratings.capacitance);

    Ok(SynthesizedDesign {
        component: candidate.clone(),
        series_count,
        parallel_count,
        counts,
        virtual_voltage,
        volume_total: devices * ratings.volume,
        power_loss_per_device,
        power_loss_total,
        temperature_rise,
        self_heating_coefficient: g,
        resonance_frequency: resonance,
        cost: devices * unit_cost,
    })
}

/// A candidate that produced no design.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCandidate {
    /// Ordering code of the part.
    pub ordering_code: String,
    /// Reason it was dropped.
    pub reason: Rejection,
}

/// Outcome of one technology series, in catalogue order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesEvaluation {
    /// Feasible designs.
    pub designs: Vec<SynthesizedDesign>,
    /// Candidates that were dropped and why.
    pub rejected: Vec<RejectedCandidate>,
}

impl SeriesEvaluation {
    /// Pareto frontier and band of the designs.
    #[must_use]
    pub fn frontier(&self, config: &BandConfig) -> Frontier {
        Frontier::compute(&self.designs, config)
    }
}

/// Evaluates every candidate of `series`.
///
/// `analysis` must come from [`analyze`] on the same requirement.
#[instrument(skip_all, fields(series = %series.name, candidates = series.candidates.len()))]
pub fn evaluate_series(
    requirement: &Requirement,
    analysis: &RequirementAnalysis,
    series: &SeriesData,
    config: &EngineConfig,
) -> SeriesEvaluation {
    let ctx = SynthesisContext::new(requirement, analysis, series, config);

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = series.candidates.par_iter().map(|c| synthesize(&ctx, c)).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = series.candidates.iter().map(|c| synthesize(&ctx, c)).collect();

    let mut evaluation = SeriesEvaluation::default();
    for (candidate, outcome) in series.candidates.iter().zip(outcomes) {
        match outcome {
            Ok(design) => evaluation.designs.push(design),
            Err(reason) => {
                debug!(ordering_code = %candidate.ordering_code, %reason, "candidate rejected");
                evaluation.rejected.push(RejectedCandidate {
                    ordering_code: candidate.ordering_code.clone(),
                    reason,
                });
            }
        }
    }
    info!(
        designs = evaluation.designs.len(),
        rejected = evaluation.rejected.len(),
        derating_factor = ctx.derating.derating_factor,
        "series evaluated"
    );
    evaluation
}

/// Analyses `requirement` once and evaluates every series against it.
#[instrument(skip_all, fields(series = catalogue.len()))]
pub fn evaluate_catalogue(
    requirement: &Requirement,
    catalogue: &[SeriesData],
    config: &EngineConfig,
) -> Result<BTreeMap<String, SeriesEvaluation>, CapselError> {
    let analysis = analyze(requirement, config)?;
    if !analysis.converged() {
        return Err(CapselError::Convergence(format!(
            "minimum capacitance search stopped at {:.3e} F",
            analysis.min_capacitance()
        )));
    }
    debug!(
        min_capacitance = analysis.min_capacitance(),
        rms_current = analysis.rms_current(),
        peak_current = analysis.peak_current(),
        "requirement analysed"
    );

    let mut results = BTreeMap::new();
    for series in catalogue {
        let evaluation = evaluate_series(requirement, &analysis, series, config);
        if results.insert(series.name.clone(), evaluation).is_some() {
            warn!(series = %series.name, "duplicate series name; keeping the last one");
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalogue::{Dimensions, Technology};
    use crate::cost::CostModel;
    use crate::derating::{DeratingCurve, DvdtRow, DvdtTable, LifetimeCurve, ThermalRow, ThermalTable};
    use crate::math::linspace;
    use crate::requirements::OperatingPoint;
    use crate::waveform::Waveform;

    const HOUSING: Dimensions = Dimensions {
        width: 0.011,
        length: 0.0315,
        height: 0.021,
    };
    const SMALL_HOUSING: Dimensions = Dimensions {
        width: 0.005,
        length: 0.0265,
        height: 0.0105,
    };

    fn sine(amplitude: Scalar) -> Waveform {
        let period = 1.0e-4;
        let t = linspace(0.0, period, 1001);
        let i = t.iter().map(|&t| amplitude * (std::f64::consts::TAU * t / period).sin()).collect();
        Waveform::new(t, i).unwrap()
    }

    fn requirement() -> Requirement {
        Requirement::builder(
            5.0,
            OperatingPoint::new(sine(20.0), 700.0),
            OperatingPoint::new(sine(10.0), 730.0),
        )
        .build()
        .unwrap()
    }

    fn part(code: &str, v85: Scalar) -> CandidateComponent {
        CandidateComponent::new(code, 20.0e-6, v85, HOUSING)
            .with_derated_voltages(0.875 * v85, 0.7 * v85)
            .with_parasitics(5.0e-3, 20.0e-9)
            .with_rated_current(10.0)
    }

    fn series(candidates: Vec<CandidateComponent>) -> SeriesData {
        let flat = FrequencyCurve::new(vec![1.0e3, 1.0e5], vec![5.0e-3, 5.0e-3], vec![10.0, 10.0]).unwrap();
        let codes: Vec<String> = candidates.iter().map(|c| c.ordering_code.clone()).collect();
        let mut s = SeriesData::new(
            "B32778",
            Technology::Film,
            candidates,
            DeratingCurve::new(vec![40.0, 85.0, 105.0], vec![1.0, 1.0, 0.5]).unwrap(),
            ThermalTable::new(vec![
                ThermalRow {
                    dimensions: HOUSING,
                    coefficient: 0.1,
                },
                ThermalRow {
                    dimensions: SMALL_HOUSING,
                    coefficient: 1.0e-4,
                },
            ])
            .unwrap(),
        );
        for code in codes.iter().filter(|c| !c.starts_with("NOCURVE")) {
            s = s.with_frequency_curve(code, flat.clone());
        }
        s
    }

    fn run(requirement: &Requirement, series: &SeriesData, candidate: &CandidateComponent) -> Result<SynthesizedDesign, Rejection> {
        let config = EngineConfig::default();
        let analysis = analyze(requirement, &config).unwrap();
        let ctx = SynthesisContext::new(requirement, &analysis, series, &config);
        synthesize(&ctx, candidate)
    }

    #[test]
    fn series_count_uses_margin_on_virtual_voltage() {
        let req = requirement();
        let c = part("B32778G1206K000", 400.0);
        let s = series(vec![c.clone()]);
        let design = run(&req, &s, &c).unwrap();
        // ceil(730 / (400 · 1.1)) = 2
        assert_eq!(design.series_count, 2);
        assert_relative_eq!(design.virtual_voltage, 400.0);
    }

    #[test]
    fn counts_losses_and_totals_are_consistent() {
        let req = requirement();
        let config = EngineConfig::default();
        let analysis = analyze(&req, &config).unwrap();
        let c = part("B32778G1106+000", 800.0);
        let s = series(vec![c.clone()]);
        let ctx = SynthesisContext::new(&req, &analysis, &s, &config);
        let design = synthesize(&ctx, &c).unwrap();

        assert_eq!(design.series_count, 1);
        let expected_cap = (analysis.min_capacitance() / (20.0e-6 * 0.95)).ceil() as u32;
        assert_eq!(design.counts.capacitance, expected_cap);
        // 20 A peak against 10 A rms · √2 capability
        assert_eq!(design.counts.current, 2);
        assert_eq!(design.counts.dvdt, None);
        assert_eq!(design.parallel_count, expected_cap.max(2));

        let n = Scalar::from(design.parallel_count);
        let loss: Scalar = analysis.points[0]
            .harmonics
            .iter()
            .map(|h| 0.5 * 5.0e-3 * (h.amplitude / n).powi(2))
            .sum();
        assert_relative_eq!(design.power_loss_per_device, loss, max_relative = 1e-12);
        assert_relative_eq!(design.power_loss_total, loss * n);
        assert_relative_eq!(design.temperature_rise, loss * n / 0.1);
        assert_relative_eq!(design.volume_total, n * HOUSING.volume());
        assert_relative_eq!(design.cost, n * CostModel::film().unit_cost(800.0, 20.0e-6));
    }

    #[test]
    fn rated_current_fallback_without_curve() {
        let req = requirement();
        let c = part("NOCURVE-1", 800.0);
        let s = series(vec![c.clone()]);
        let design = run(&req, &s, &c).unwrap();
        // worst rms is 20/√2 ≈ 14.1 A against 10 A rated
        assert_eq!(design.counts.current, 2);

        let bare = CandidateComponent::new("NOCURVE-2", 20.0e-6, 800.0, HOUSING)
            .with_derated_voltages(700.0, 560.0)
            .with_parasitics(5.0e-3, 20.0e-9);
        assert_eq!(run(&req, &s, &bare), Err(Rejection::MissingData("rated_rms_current_85")));
    }

    #[test]
    fn rejections_are_typed() {
        let req = requirement();
        let low_voltage = part("B32778A", 200.0);
        let missing = CandidateComponent::new("B32778B", 20.0e-6, 800.0, HOUSING);
        let inductive = part("B32778C", 800.0).with_parasitics(5.0e-3, 1.0e-3);
        let hot = CandidateComponent {
            dimensions: SMALL_HOUSING,
            ..part("B32778D", 800.0)
        };
        let unknown_housing = CandidateComponent {
            dimensions: Dimensions::new(0.1, 0.1, 0.1),
            ..part("B32778E", 800.0)
        };
        let s = series(vec![
            low_voltage.clone(),
            missing.clone(),
            inductive.clone(),
            hot.clone(),
            unknown_housing.clone(),
        ]);

        assert_eq!(run(&req, &s, &low_voltage), Err(Rejection::SeriesLimit { needed: 4, max: 2 }));
        assert_eq!(run(&req, &s, &missing), Err(Rejection::MissingData("rated_voltage_105")));
        let no_esl = CandidateComponent {
            esl: None,
            ..part("B32778F", 800.0)
        };
        assert_eq!(run(&req, &s, &no_esl), Err(Rejection::MissingData("esl")));
        assert!(matches!(run(&req, &s, &inductive), Err(Rejection::BelowResonance { .. })));
        assert!(matches!(run(&req, &s, &hot), Err(Rejection::Overheated { .. })));
        assert_eq!(
            run(&req, &s, &unknown_housing),
            Err(Rejection::Lookup(LookupMiss::NotFound("thermal coefficient")))
        );
    }

    #[test]
    fn dvdt_table_adds_a_lower_bound() {
        let req = requirement();
        let c = part("B32778G1106K000", 800.0);
        let s = series(vec![c.clone()]).with_dvdt_table(
            DvdtTable::new(vec![DvdtRow {
                series: "B32778".into(),
                rated_voltage: 800.0,
                dvdt_max: 1.05e5,
            }])
            .unwrap(),
        );
        let design = run(&req, &s, &c).unwrap();
        // 20 A / (1.05e5 V/s · 20 µF) ≈ 9.5
        assert_eq!(design.counts.dvdt, Some(10));
        assert!(design.parallel_count >= 10);

        let other = part("B32779G1106K000", 800.0);
        assert_eq!(run(&req, &s, &other), Err(Rejection::Lookup(LookupMiss::NotFound("dv/dt limit"))));
    }

    #[test]
    fn lifetime_target_caps_virtual_voltage() {
        let req = Requirement::builder(
            5.0,
            OperatingPoint::new(sine(20.0), 700.0),
            OperatingPoint::new(sine(10.0), 730.0),
        )
        .target_lifetime(1.0e5)
        .build()
        .unwrap();
        let c = part("B32778G1106K000", 800.0);
        let s = series(vec![c.clone()]).with_lifetime_curves(vec![
            LifetimeCurve::new(800.0, 70.0, vec![(1.0e3, 900.0), (1.0e6, 600.0)]).unwrap(),
        ]);
        let design = run(&req, &s, &c).unwrap();
        assert_relative_eq!(design.virtual_voltage, 700.0, max_relative = 1e-9);

        let far = Requirement::builder(
            5.0,
            OperatingPoint::new(sine(20.0), 700.0),
            OperatingPoint::new(sine(10.0), 730.0),
        )
        .target_lifetime(1.0e8)
        .build()
        .unwrap();
        assert!(matches!(
            run(&far, &s, &c),
            Err(Rejection::Lookup(LookupMiss::OutOfDomain { .. }))
        ));
    }

    #[test]
    fn device_count_does_not_overflow() {
        let req = requirement();
        let c = part("B32778G1106+000", 800.0);
        let s = series(vec![c.clone()]);
        let design = SynthesizedDesign {
            series_count: 2,
            parallel_count: u32::MAX,
            ..run(&req, &s, &c).unwrap()
        };
        assert_eq!(design.device_count(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn series_evaluation_keeps_catalogue_order() {
        let req = requirement();
        let config = EngineConfig::default();
        let analysis = analyze(&req, &config).unwrap();
        let parts = vec![part("B32778X1", 800.0), part("B32778X2", 200.0), part("B32778X3", 1100.0)];
        let s = series(parts);
        let eval = evaluate_series(&req, &analysis, &s, &config);
        let codes: Vec<&str> = eval.designs.iter().map(|d| d.component.ordering_code.as_str()).collect();
        assert_eq!(codes, ["B32778X1", "B32778X3"]);
        assert_eq!(eval.rejected.len(), 1);
        assert_eq!(eval.rejected[0].ordering_code, "B32778X2");
    }
}
