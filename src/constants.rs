//! Reference temperatures, search bounds and engine-wide numeric defaults.
//!
//! ## References
//!
//! Cost coefficients follow R. Burkart and J. W. Kolar, "Component Cost Models for
//! Multi-Objective Optimizations of Switched-Mode Power Converters", COMPEL 2013.
//! Reference temperatures are the datasheet rating points of DC-link film capacitors.

use std::f64::consts::PI;

/// Datasheet temperature (°C) at which the rated voltage and RMS current are specified.
pub const TEMPERATURE_85: f64 = 85.0;
/// First derated voltage reference temperature (°C).
pub const TEMPERATURE_105: f64 = 105.0;
/// Second derated voltage reference temperature (°C).
pub const TEMPERATURE_125: f64 = 125.0;
/// The three voltage reference temperatures in increasing order.
pub const REFERENCE_TEMPERATURES: [f64; 3] = [TEMPERATURE_85, TEMPERATURE_105, TEMPERATURE_125];

/// Lower capacitance bound (F) of the minimum-capacitance search.
pub const CAPACITANCE_SEARCH_MIN: f64 = 1.0e-9;
/// Upper capacitance bound (F) of the minimum-capacitance search.
pub const CAPACITANCE_SEARCH_MAX: f64 = 1.0e3;

/// Default allowed self-heating (°C) of a film capacitor at 85 °C ambient.
pub const FILM_DELTA_T_LIMIT: f64 = 15.0;

/// Default number of samples per period used by the harmonic decomposition.
pub const DEFAULT_SPECTRUM_SAMPLES: usize = 1000;
/// Default number of samples per period used for charge integration.
pub const DEFAULT_REQUIREMENT_SAMPLES: usize = 5000;

/// Ratio between the peak and RMS value of a sinusoid.
pub const PEAK_PER_RMS: f64 = std::f64::consts::SQRT_2;

/// Series self-resonance frequency (Hz) of a capacitance `c` (F) with parasitic inductance `l` (H).
///
/// Returns `f64::INFINITY` when no inductance is given.
#[inline]
#[must_use]
pub fn resonance_frequency(c: f64, l: f64) -> f64 {
    if l <= 0.0 || c <= 0.0 {
        return f64::INFINITY;
    }
    1.0 / (2.0 * PI * (c * l).sqrt())
}
