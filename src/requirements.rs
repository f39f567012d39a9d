//! Application requirements and the quantities derived from them.
//!
//! The minimum bank capacitance follows from the charge swing of the capacitor
//! current over one period: integrating `i(t)` gives `q(t)`, and a bank of
//! capacitance `C` sees a voltage ripple of `(max q − min q) / C`. The ripple is
//! strictly decreasing in `C`, so the smallest admissible capacitance is found by
//! bisection on a logarithmic scale.

use crate::config::EngineConfig;
use crate::constants::{CAPACITANCE_SEARCH_MAX, CAPACITANCE_SEARCH_MIN, DEFAULT_REQUIREMENT_SAMPLES};
use crate::math::{geometric_mean, Scalar};
use crate::spectrum::{decompose, HarmonicSet, SpectrumError};
use crate::waveform::Waveform;

/// Errors raised while validating or analysing a requirement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequirementError {
    /// A scalar requirement is outside its admissible range.
    #[error("invalid requirement '{name}': {value}")]
    InvalidValue {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: Scalar,
    },
    /// The capacitance search bounds are not a proper interval.
    #[error("invalid search bounds [{0}, {1}]")]
    InvalidBounds(Scalar, Scalar),
    /// Harmonic decomposition of an operating point failed.
    #[error("operating point {index}: {source}")]
    Spectrum {
        /// Zero-based operating point index.
        index: usize,
        /// Underlying decomposition error.
        source: SpectrumError,
    },
}

/// One operating point: a capacitor current waveform at a given DC bus voltage.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint {
    /// Capacitor current over one period.
    pub waveform: Waveform,
    /// DC bus voltage in V.
    pub dc_voltage: Scalar,
}

impl OperatingPoint {
    /// Creates an operating point.
    #[must_use]
    pub fn new(waveform: Waveform, dc_voltage: Scalar) -> Self {
        Self { waveform, dc_voltage }
    }
}

/// Electrical and thermal requirements of a capacitor bank.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    ripple_budget: Scalar,
    max_current_point: OperatingPoint,
    max_voltage_point: OperatingPoint,
    ambient_temperature: Scalar,
    voltage_safety_margin: Scalar,
    max_series: u32,
    capacitance_tolerance: Scalar,
    target_lifetime: Option<Scalar>,
}

impl Requirement {
    /// Starts a requirement from the two operating points and the ripple budget.
    ///
    /// Defaults: 40 °C ambient, 10 % voltage margin, at most 2 devices in series,
    /// 5 % capacitance tolerance and no lifetime target.
    #[must_use]
    pub fn builder(
        ripple_budget: Scalar,
        max_current_point: OperatingPoint,
        max_voltage_point: OperatingPoint,
    ) -> RequirementBuilder {
        RequirementBuilder {
            inner: Self {
                ripple_budget,
                max_current_point,
                max_voltage_point,
                ambient_temperature: 40.0,
                voltage_safety_margin: 10.0,
                max_series: 2,
                capacitance_tolerance: 5.0,
                target_lifetime: None,
            },
        }
    }

    /// Peak-to-peak voltage ripple budget in V.
    #[must_use]
    pub fn ripple_budget(&self) -> Scalar {
        self.ripple_budget
    }

    /// Both operating points, maximum-current point first.
    #[must_use]
    pub fn operating_points(&self) -> [&OperatingPoint; 2] {
        [&self.max_current_point, &self.max_voltage_point]
    }

    /// Ambient temperature in °C.
    #[must_use]
    pub fn ambient_temperature(&self) -> Scalar {
        self.ambient_temperature
    }

    /// Voltage safety margin in percent.
    #[must_use]
    pub fn voltage_safety_margin(&self) -> Scalar {
        self.voltage_safety_margin
    }

    /// Maximum number of devices in series.
    #[must_use]
    pub fn max_series(&self) -> u32 {
        self.max_series
    }

    /// Capacitance tolerance class in percent.
    #[must_use]
    pub fn capacitance_tolerance(&self) -> Scalar {
        self.capacitance_tolerance
    }

    /// Target lifetime in hours, if lifetime derating is requested.
    #[must_use]
    pub fn target_lifetime(&self) -> Option<Scalar> {
        self.target_lifetime
    }

    /// Highest DC bus voltage of the two operating points.
    #[must_use]
    pub fn max_dc_voltage(&self) -> Scalar {
        self.max_current_point.dc_voltage.max(self.max_voltage_point.dc_voltage)
    }
}

/// Builder for [`Requirement`].
#[derive(Debug, Clone)]
pub struct RequirementBuilder {
    inner: Requirement,
}

impl RequirementBuilder {
    /// Ambient temperature in °C.
    #[must_use]
    pub fn ambient_temperature(mut self, celsius: Scalar) -> Self {
        self.inner.ambient_temperature = celsius;
        self
    }

    /// Voltage safety margin in percent.
    #[must_use]
    pub fn voltage_safety_margin(mut self, percent: Scalar) -> Self {
        self.inner.voltage_safety_margin = percent;
        self
    }

    /// Maximum number of devices in series.
    #[must_use]
    pub fn max_series(mut self, count: u32) -> Self {
        self.inner.max_series = count;
        self
    }

    /// Capacitance tolerance class in percent.
    #[must_use]
    pub fn capacitance_tolerance(mut self, percent: Scalar) -> Self {
        self.inner.capacitance_tolerance = percent;
        self
    }

    /// Target lifetime in hours.
    #[must_use]
    pub fn target_lifetime(mut self, hours: Scalar) -> Self {
        self.inner.target_lifetime = Some(hours);
        self
    }

    /// Validates and returns the requirement.
    pub fn build(self) -> Result<Requirement, RequirementError> {
        let r = self.inner;
        let positive = |name, value: Scalar| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(RequirementError::InvalidValue { name, value })
            }
        };
        positive("ripple_budget", r.ripple_budget)?;
        positive("max_current_point.dc_voltage", r.max_current_point.dc_voltage)?;
        positive("max_voltage_point.dc_voltage", r.max_voltage_point.dc_voltage)?;
        if !r.ambient_temperature.is_finite() {
            return Err(RequirementError::InvalidValue {
                name: "ambient_temperature",
                value: r.ambient_temperature,
            });
        }
        if !(r.voltage_safety_margin.is_finite() && r.voltage_safety_margin > -100.0) {
            return Err(RequirementError::InvalidValue {
                name: "voltage_safety_margin",
                value: r.voltage_safety_margin,
            });
        }
        if r.max_series == 0 {
            return Err(RequirementError::InvalidValue { name: "max_series", value: 0.0 });
        }
        if !(r.capacitance_tolerance.is_finite() && (0.0..100.0).contains(&r.capacitance_tolerance)) {
            return Err(RequirementError::InvalidValue {
                name: "capacitance_tolerance",
                value: r.capacitance_tolerance,
            });
        }
        if let Some(hours) = r.target_lifetime {
            positive("target_lifetime", hours)?;
        }
        Ok(r)
    }
}

/// Termination criteria of the logarithmic capacitance bisection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitanceSearch {
    /// Lower bracket in F.
    pub lower: Scalar,
    /// Upper bracket in F.
    pub upper: Scalar,
    /// Stop once `upper / lower − 1` falls below this value.
    pub relative_tolerance: Scalar,
    /// Hard iteration limit.
    pub max_iterations: usize,
    /// Samples per period used for charge integration.
    pub samples: usize,
}

impl Default for CapacitanceSearch {
    fn default() -> Self {
        Self {
            lower: CAPACITANCE_SEARCH_MIN,
            upper: CAPACITANCE_SEARCH_MAX,
            relative_tolerance: 1e-6,
            max_iterations: 200,
            samples: DEFAULT_REQUIREMENT_SAMPLES,
        }
    }
}

/// Outcome of the minimum-capacitance search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitanceEstimate {
    /// Smallest capacitance (F) whose ripple stays within budget.
    pub capacitance: Scalar,
    /// Bisection steps taken.
    pub iterations: usize,
    /// Whether the relative tolerance was reached.
    pub converged: bool,
}

/// Running charge `q(t)` of the waveform resampled onto `samples` points.
///
/// Non-finite current samples contribute no charge.
#[must_use]
pub fn charge_curve(waveform: &Waveform, samples: usize) -> Vec<Scalar> {
    let (t, i) = waveform.resample(samples.max(2));
    let finite = |x: Scalar| if x.is_finite() { x } else { 0.0 };
    let mut q = Vec::with_capacity(t.len());
    q.push(0.0);
    for k in 1..t.len() {
        let dt = t[k] - t[k - 1];
        let prev = q[k - 1];
        q.push(prev + 0.5 * (finite(i[k - 1]) + finite(i[k])) * dt);
    }
    q
}

fn peak_to_peak(values: &[Scalar]) -> Scalar {
    let (lo, hi) = values
        .iter()
        .fold((Scalar::INFINITY, Scalar::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    hi - lo
}

/// Smallest bank capacitance that keeps the peak-to-peak ripple within `ripple_budget`.
pub fn minimum_capacitance(
    waveform: &Waveform,
    ripple_budget: Scalar,
    search: &CapacitanceSearch,
) -> Result<CapacitanceEstimate, RequirementError> {
    if !(ripple_budget.is_finite() && ripple_budget > 0.0) {
        return Err(RequirementError::InvalidValue {
            name: "ripple_budget",
            value: ripple_budget,
        });
    }
    if !(search.lower > 0.0 && search.upper > search.lower && search.upper.is_finite()) {
        return Err(RequirementError::InvalidBounds(search.lower, search.upper));
    }

    let charge_swing = peak_to_peak(&charge_curve(waveform, search.samples));
    let ripple = |c: Scalar| charge_swing / c;
    if ripple(search.upper) > ripple_budget {
        // the admissible capacitance lies above the bracket
        return Ok(CapacitanceEstimate {
            capacitance: search.upper,
            iterations: 0,
            converged: false,
        });
    }

    let (mut low, mut high) = (search.lower, search.upper);
    let mut iterations = 0;
    while high / low - 1.0 >= search.relative_tolerance {
        if iterations == search.max_iterations {
            return Ok(CapacitanceEstimate {
                capacitance: high,
                iterations,
                converged: false,
            });
        }
        let mid = geometric_mean(low, high);
        if ripple(mid) > ripple_budget {
            low = mid;
        } else {
            high = mid;
        }
        iterations += 1;
    }
    Ok(CapacitanceEstimate {
        capacitance: high,
        iterations,
        converged: true,
    })
}

/// Root-mean-square current over the period.
///
/// Uniformly spaced samples are averaged directly; otherwise the waveform is first
/// resampled onto a uniform periodic grid.
#[must_use]
pub fn rms_current(waveform: &Waveform) -> Scalar {
    let mean_square = |values: &[Scalar]| {
        let finite: Vec<Scalar> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            0.0
        } else {
            finite.iter().map(|v| v * v).sum::<Scalar>() / finite.len() as Scalar
        }
    };
    if waveform.is_uniform() {
        mean_square(waveform.current()).sqrt()
    } else {
        let (_, i) = waveform.resample_periodic(DEFAULT_REQUIREMENT_SAMPLES);
        mean_square(&i).sqrt()
    }
}

/// Quantities derived from one operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPointAnalysis {
    /// DC bus voltage in V.
    pub dc_voltage: Scalar,
    /// Minimum capacitance search result.
    pub capacitance: CapacitanceEstimate,
    /// RMS current in A.
    pub rms_current: Scalar,
    /// Peak current in A.
    pub peak_current: Scalar,
    /// Harmonic content of the current.
    pub harmonics: HarmonicSet,
}

/// Governing values of a requirement across both operating points.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementAnalysis {
    /// Per-operating-point results, maximum-current point first.
    pub points: [OperatingPointAnalysis; 2],
}

impl RequirementAnalysis {
    /// Largest minimum capacitance of the two operating points.
    #[must_use]
    pub fn min_capacitance(&self) -> Scalar {
        self.points.iter().map(|p| p.capacitance.capacitance).fold(0.0, Scalar::max)
    }

    /// Largest RMS current of the two operating points.
    #[must_use]
    pub fn rms_current(&self) -> Scalar {
        self.points.iter().map(|p| p.rms_current).fold(0.0, Scalar::max)
    }

    /// Largest peak current of the two operating points.
    #[must_use]
    pub fn peak_current(&self) -> Scalar {
        self.points.iter().map(|p| p.peak_current).fold(0.0, Scalar::max)
    }

    /// Lowest non-DC harmonic frequency across both operating points.
    #[must_use]
    pub fn lowest_harmonic(&self) -> Option<Scalar> {
        self.points
            .iter()
            .filter_map(|p| p.harmonics.lowest_frequency())
            .reduce(Scalar::min)
    }

    /// True if every capacitance search converged.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.points.iter().all(|p| p.capacitance.converged)
    }
}

fn analyze_point(
    index: usize,
    point: &OperatingPoint,
    ripple_budget: Scalar,
    config: &EngineConfig,
) -> Result<OperatingPointAnalysis, RequirementError> {
    let harmonics = decompose(&point.waveform, &config.decomposition)
        .map_err(|source| RequirementError::Spectrum { index, source })?;
    // the decomposition has validated the abscissa; integrate in seconds from here on
    let seconds = point
        .waveform
        .rescaled(config.decomposition.axis, config.decomposition.fundamental)
        .map_err(|e| RequirementError::Spectrum { index, source: e.into() })?;
    Ok(OperatingPointAnalysis {
        dc_voltage: point.dc_voltage,
        capacitance: minimum_capacitance(&seconds, ripple_budget, &config.capacitance_search)?,
        rms_current: rms_current(&seconds),
        peak_current: seconds.peak(),
        harmonics,
    })
}

/// Analyses both operating points of `requirement`.
pub fn analyze(requirement: &Requirement, config: &EngineConfig) -> Result<RequirementAnalysis, RequirementError> {
    let [a, b] = requirement.operating_points();
    Ok(RequirementAnalysis {
        points: [
            analyze_point(0, a, requirement.ripple_budget, config)?,
            analyze_point(1, b, requirement.ripple_budget, config)?,
        ],
    })
}
