//! One-period current waveforms and the sampling helpers shared by the analyzers.

use crate::math::{interp, linspace, periodic_grid, Scalar};

/// Errors raised while constructing or transforming a waveform.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveformError {
    /// Time and current vectors differ in length.
    #[error("time has {time} samples but current has {current}")]
    LengthMismatch {
        /// Number of time samples.
        time: usize,
        /// Number of current samples.
        current: usize,
    },
    /// Fewer than two samples were supplied.
    #[error("a waveform needs at least two samples, got {0}")]
    TooShort(usize),
    /// A time stamp is NaN or infinite.
    #[error("time sample {0} is not finite")]
    NonFiniteTime(usize),
    /// Time stamps go backwards.
    #[error("time decreases at sample {0}")]
    NonMonotonicTime(usize),
    /// The waveform spans no time at all.
    #[error("waveform has zero duration")]
    ZeroDuration,
    /// A fundamental frequency was required for the abscissa conversion.
    #[error("a fundamental frequency is required to convert {0} into seconds")]
    MissingFundamental(&'static str),
    /// The fundamental frequency is not a positive finite number.
    #[error("invalid fundamental frequency {0}")]
    InvalidFundamental(Scalar),
}

/// Unit of the waveform abscissa.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAxis {
    /// One period spans 2π.
    #[default]
    Radians,
    /// One period spans 360°.
    Degrees,
    /// Abscissa is already in seconds.
    Seconds,
}

impl TimeAxis {
    const fn label(self) -> &'static str {
        match self {
            Self::Radians => "radians",
            Self::Degrees => "degrees",
            Self::Seconds => "seconds",
        }
    }
}

/// A time/current sample sequence covering exactly one period.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    time: Vec<Scalar>,
    current: Vec<Scalar>,
}

impl Waveform {
    /// Creates a waveform after validating the abscissa.
    ///
    /// Current samples may be non-finite; consumers decide how to treat them.
    pub fn new(time: Vec<Scalar>, current: Vec<Scalar>) -> Result<Self, WaveformError> {
        if time.len() != current.len() {
            return Err(WaveformError::LengthMismatch {
                time: time.len(),
                current: current.len(),
            });
        }
        if time.len() < 2 {
            return Err(WaveformError::TooShort(time.len()));
        }
        if let Some(i) = time.iter().position(|t| !t.is_finite()) {
            return Err(WaveformError::NonFiniteTime(i));
        }
        if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(WaveformError::NonMonotonicTime(i + 1));
        }
        if time[time.len() - 1] <= time[0] {
            return Err(WaveformError::ZeroDuration);
        }
        Ok(Self { time, current })
    }

    /// Builds a waveform from `(time, current)` pairs.
    pub fn from_pairs(pairs: &[(Scalar, Scalar)]) -> Result<Self, WaveformError> {
        let (time, current) = pairs.iter().copied().unzip();
        Self::new(time, current)
    }

    /// Time stamps.
    #[must_use]
    pub fn time(&self) -> &[Scalar] {
        &self.time
    }

    /// Current samples.
    #[must_use]
    pub fn current(&self) -> &[Scalar] {
        &self.current
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a constructed waveform; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// First time stamp.
    #[must_use]
    pub fn start(&self) -> Scalar {
        self.time[0]
    }

    /// Duration of the period.
    #[must_use]
    pub fn period(&self) -> Scalar {
        self.time[self.time.len() - 1] - self.time[0]
    }

    /// Largest absolute current sample, ignoring non-finite samples.
    #[must_use]
    pub fn peak(&self) -> Scalar {
        self.current
            .iter()
            .filter(|i| i.is_finite())
            .fold(0.0, |acc, i| acc.max(i.abs()))
    }

    /// Returns a copy with the abscissa converted into seconds.
    ///
    /// Radian and degree abscissae are divided by `2π·f0` and `360·f0` respectively.
    pub fn rescaled(&self, axis: TimeAxis, fundamental: Option<Scalar>) -> Result<Self, WaveformError> {
        let scale = match axis {
            TimeAxis::Seconds => return Ok(self.clone()),
            TimeAxis::Radians => std::f64::consts::TAU,
            TimeAxis::Degrees => 360.0,
        };
        let f0 = fundamental.ok_or(WaveformError::MissingFundamental(axis.label()))?;
        if !(f0.is_finite() && f0 > 0.0) {
            return Err(WaveformError::InvalidFundamental(f0));
        }
        let time = self.time.iter().map(|t| t / (scale * f0)).collect();
        Self::new(time, self.current.clone())
    }

    /// Current at time `t`, linearly interpolated and clamped to the sampled span.
    #[must_use]
    pub fn current_at(&self, t: Scalar) -> Scalar {
        interp(t, &self.time, &self.current).unwrap_or(0.0)
    }

    /// Resamples onto `n` uniform points spanning `[start, end]` inclusive.
    #[must_use]
    pub fn resample(&self, n: usize) -> (Vec<Scalar>, Vec<Scalar>) {
        let t = linspace(self.start(), self.start() + self.period(), n);
        let i = t.iter().map(|&x| self.current_at(x)).collect();
        (t, i)
    }

    /// Resamples onto `n` uniform points spanning `[start, end)`, suitable for a DFT.
    #[must_use]
    pub fn resample_periodic(&self, n: usize) -> (Vec<Scalar>, Vec<Scalar>) {
        let t = periodic_grid(self.start(), self.start() + self.period(), n);
        let i = t.iter().map(|&x| self.current_at(x)).collect();
        (t, i)
    }

    /// True when the time stamps are equally spaced.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        let step = self.period() / (self.len() - 1) as Scalar;
        self.time
            .windows(2)
            .all(|w| ((w[1] - w[0]) - step).abs() <= 1.0e-9 * step)
    }
}
