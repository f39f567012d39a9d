//! Temperature, thermal, lifetime and slew-rate derating of candidate components.

/// Voltage slew-rate limits.
pub mod dvdt;
/// Lifetime curves and lifetime-driven voltage derating.
pub mod lifetime;
/// Ambient-temperature current derating.
pub mod temperature;
/// Self-heating coefficient tables.
pub mod thermal;

pub use dvdt::{parallel_count_dvdt, DvdtRow, DvdtTable};
pub use lifetime::{lifetime_voltage_derating, BlendCriteria, LifetimeCurve, LifetimeDerating, SemiLogCurve};
pub use temperature::{temperature_current_derating, ClampPolicy, DeratingCurve};
pub use thermal::{self_heating_coefficient, ThermalRow, ThermalTable};

use crate::catalogue::SeriesData;
use crate::math::Scalar;

/// A catalogue lookup that found no usable row.
///
/// These are data-sparsity conditions: the affected candidate is dropped and the
/// rest of the series is still evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupMiss {
    /// No row matched.
    #[error("no {0} found")]
    NotFound(&'static str),
    /// More than one row matched.
    #[error("{matches} rows match in {table}")]
    Ambiguous {
        /// Looked-up quantity.
        table: &'static str,
        /// Number of matching rows.
        matches: usize,
    },
    /// The requested value lies outside the tabulated domain.
    #[error("{value} is outside the {table} domain")]
    OutOfDomain {
        /// Looked-up quantity.
        table: &'static str,
        /// Requested value.
        value: Scalar,
    },
    /// Matching rows contradict each other.
    #[error("inconsistent {0} data")]
    Inconsistent(&'static str),
}

/// Per-series values that depend only on the ambient temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeratingContext {
    /// Current derating factor at ambient.
    pub derating_factor: Scalar,
    /// Allowed self-heating (°C): `factor² × series limit`.
    pub delta_t_limit: Scalar,
    /// Conservative internal temperature estimate: ambient plus the allowed self-heating.
    pub virtual_temperature: Scalar,
}

impl DeratingContext {
    /// Derives the context of `series` at `ambient` °C.
    #[must_use]
    pub fn new(ambient: Scalar, series: &SeriesData, policy: ClampPolicy) -> Self {
        let derating_factor = temperature_current_derating(ambient, &series.derating_curve, policy);
        let delta_t_limit = derating_factor.powi(2) * series.delta_t_limit;
        Self {
            derating_factor,
            delta_t_limit,
            virtual_temperature: ambient + delta_t_limit,
        }
    }
}
