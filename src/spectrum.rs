//! Harmonic decomposition of one-period current waveforms.
//!
//! The waveform is resampled onto `N` uniform points covering `[0, T)`, transformed
//! with a forward FFT and folded into a one-sided amplitude spectrum: bin `k` sits at
//! `k / T` Hz, its amplitude is `2·|X_k| / N` (the DC bin is not doubled) and its
//! phase is `arg(X_k)`, so that
//!
//! ```text
//! i(t) ≈ Σ_k  A_k · cos(2π f_k t + φ_k)
//! ```
//!
//! A [`HarmonicFilter`] then drops bins that are irrelevant for loss evaluation.

use std::str::FromStr;

use rustfft::FftPlanner;

use crate::constants::DEFAULT_SPECTRUM_SAMPLES;
use crate::math::{CScalar, Scalar};
use crate::waveform::{TimeAxis, Waveform, WaveformError};

/// Errors raised by the harmonic decomposition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    /// The waveform does not start at `t = 0`.
    #[error("period vector must start at 0, got {0}")]
    NonZeroStart(Scalar),
    /// Abscissa conversion failed.
    #[error(transparent)]
    Waveform(#[from] WaveformError),
    /// An unknown time-axis string was supplied.
    #[error("unknown time axis '{0}': expected 'rad', 'deg' or 'time'")]
    UnknownAxis(String),
    /// An unknown filter string was supplied.
    #[error("unknown filter '{0}': expected 'factor', 'harmonic' or 'disabled'")]
    UnknownFilter(String),
    /// The filter parameter is out of range.
    #[error("invalid filter parameter: {0}")]
    InvalidFilter(String),
    /// Fewer than two samples per period were requested.
    #[error("at least two samples per period are required, got {0}")]
    TooFewSamples(usize),
}

impl FromStr for TimeAxis {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rad" | "radians" => Ok(Self::Radians),
            "deg" | "degrees" => Ok(Self::Degrees),
            "time" | "s" | "seconds" => Ok(Self::Seconds),
            _ => Err(SpectrumError::UnknownAxis(s.to_owned())),
        }
    }
}

/// Spectral filtering policy applied after the transform.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HarmonicFilter {
    /// Keep bins whose amplitude exceeds this fraction of the input's peak current.
    Factor(Scalar),
    /// Keep only the first `K` bins (bin 0 is DC, bin 1 the fundamental).
    Harmonic(usize),
    /// Keep every bin up to Nyquist.
    Disabled,
}

impl Default for HarmonicFilter {
    fn default() -> Self {
        Self::Factor(0.01)
    }
}

impl HarmonicFilter {
    /// Builds a filter from its policy name using the default parameter of that policy.
    pub fn from_name(name: &str) -> Result<Self, SpectrumError> {
        match name.to_ascii_lowercase().as_str() {
            "factor" => Ok(Self::Factor(0.01)),
            "harmonic" => Ok(Self::Harmonic(100)),
            "disabled" => Ok(Self::Disabled),
            _ => Err(SpectrumError::UnknownFilter(name.to_owned())),
        }
    }

    fn validate(self) -> Result<Self, SpectrumError> {
        match self {
            Self::Factor(f) if !(f.is_finite() && f >= 0.0) => {
                Err(SpectrumError::InvalidFilter(format!("factor {f} must be finite and non-negative")))
            }
            other => Ok(other),
        }
    }
}

impl FromStr for HarmonicFilter {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Parameters of the harmonic decomposition.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecompositionConfig {
    /// Samples per period fed into the FFT.
    pub samples: usize,
    /// Unit of the waveform abscissa.
    pub axis: TimeAxis,
    /// Fundamental frequency (Hz); required for [`TimeAxis::Radians`] and [`TimeAxis::Degrees`].
    pub fundamental: Option<Scalar>,
    /// Bin selection policy.
    pub filter: HarmonicFilter,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SPECTRUM_SAMPLES,
            axis: TimeAxis::Seconds,
            fundamental: None,
            filter: HarmonicFilter::default(),
        }
    }
}

impl DecompositionConfig {
    /// Configuration for a waveform whose abscissa is an angle.
    #[must_use]
    pub fn angular(axis: TimeAxis, fundamental: Scalar) -> Self {
        Self {
            axis,
            fundamental: Some(fundamental),
            ..Self::default()
        }
    }

    /// Replaces the filter policy.
    #[must_use]
    pub fn with_filter(mut self, filter: HarmonicFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the number of samples per period.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}

/// A single spectral line.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// Frequency in Hz.
    pub frequency: Scalar,
    /// Peak amplitude in A.
    pub amplitude: Scalar,
    /// Phase in radians.
    pub phase: Scalar,
}

/// Filtered one-sided spectrum of a periodic waveform.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarmonicSet {
    fundamental: Scalar,
    harmonics: Vec<Harmonic>,
}

impl HarmonicSet {
    /// Builds a set from already computed lines.
    #[must_use]
    pub fn from_harmonics(fundamental: Scalar, harmonics: Vec<Harmonic>) -> Self {
        Self { fundamental, harmonics }
    }

    /// Frequency (Hz) of the period the set was derived from.
    #[must_use]
    pub fn fundamental(&self) -> Scalar {
        self.fundamental
    }

    /// Spectral lines in increasing frequency.
    #[must_use]
    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// Iterates the spectral lines.
    pub fn iter(&self) -> std::slice::Iter<'_, Harmonic> {
        self.harmonics.iter()
    }

    /// Number of lines kept by the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.harmonics.len()
    }

    /// True when the filter removed every line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.harmonics.is_empty()
    }

    /// DC component, if it survived filtering.
    #[must_use]
    pub fn dc(&self) -> Option<&Harmonic> {
        self.harmonics.first().filter(|h| h.frequency == 0.0)
    }

    /// Lowest non-DC frequency in the set.
    #[must_use]
    pub fn lowest_frequency(&self) -> Option<Scalar> {
        self.harmonics.iter().map(|h| h.frequency).find(|&f| f > 0.0)
    }

    /// Highest frequency in the set.
    #[must_use]
    pub fn highest_frequency(&self) -> Option<Scalar> {
        self.harmonics.last().map(|h| h.frequency)
    }

    /// Evaluates the Fourier series of the kept lines at time `t`.
    #[must_use]
    pub fn reconstruct(&self, t: Scalar) -> Scalar {
        self.harmonics
            .iter()
            .map(|h| h.amplitude * (std::f64::consts::TAU * h.frequency * t + h.phase).cos())
            .sum()
    }
}

impl<'a> IntoIterator for &'a HarmonicSet {
    type Item = &'a Harmonic;
    type IntoIter = std::slice::Iter<'a, Harmonic>;

    fn into_iter(self) -> Self::IntoIter {
        self.harmonics.iter()
    }
}

/// Decomposes one period of `waveform` into harmonics.
pub fn decompose(waveform: &Waveform, config: &DecompositionConfig) -> Result<HarmonicSet, SpectrumError> {
    if waveform.start() != 0.0 {
        return Err(SpectrumError::NonZeroStart(waveform.start()));
    }
    let filter = config.filter.validate()?;
    let n = config.samples;
    if n < 2 {
        return Err(SpectrumError::TooFewSamples(n));
    }
    let waveform = waveform.rescaled(config.axis, config.fundamental)?;
    let period = waveform.period();
    let fundamental = 1.0 / period;

    let (_, samples) = waveform.resample_periodic(n);
    let mut buffer: Vec<CScalar> = samples
        .iter()
        .map(|&i| CScalar::new(if i.is_finite() { i } else { 0.0 }, 0.0))
        .collect();
    let fft = FftPlanner::<Scalar>::new().plan_fft_forward(n);
    fft.process(&mut buffer);

    let peak = waveform.peak();
    let one_sided = n / 2 + 1;
    let harmonics = buffer
        .iter()
        .take(one_sided)
        .enumerate()
        .map(|(k, x)| {
            let scale = if k == 0 { 1.0 } else { 2.0 };
            (
                k,
                Harmonic {
                    frequency: k as Scalar * fundamental,
                    amplitude: scale * x.norm() / n as Scalar,
                    phase: x.arg(),
                },
            )
        })
        .filter(|(k, h)| match filter {
            HarmonicFilter::Factor(f) => h.amplitude > f * peak,
            HarmonicFilter::Harmonic(count) => *k < count,
            HarmonicFilter::Disabled => true,
        })
        .map(|(_, h)| h)
        .collect();

    Ok(HarmonicSet { fundamental, harmonics })
}
