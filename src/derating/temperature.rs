//! Ambient-temperature current derating.

use crate::catalogue::{validate_columns, TableError};
use crate::math::{interp, Scalar};

/// Behaviour of [`temperature_current_derating`] outside the tabulated temperatures.
///
/// Below the table both policies return the first factor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampPolicy {
    /// Hold the last tabulated factor above the table.
    #[default]
    Boundary,
    /// Treat temperatures above the table as not permitted (factor 0).
    ZeroAboveRange,
}

/// Current derating factor over ambient temperature, from the datasheet.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DeratingCurve {
    temperature: Vec<Scalar>,
    factor: Vec<Scalar>,
}

impl DeratingCurve {
    /// Creates a curve; temperatures must be strictly increasing and factors non-negative.
    pub fn new(temperature: Vec<Scalar>, factor: Vec<Scalar>) -> Result<Self, TableError> {
        validate_columns("derating curve", &temperature, &factor)?;
        if let Some(row) = factor.iter().position(|&f| f < 0.0) {
            return Err(TableError::InvalidValue {
                table: "derating curve",
                row,
                value: factor[row],
            });
        }
        Ok(Self { temperature, factor })
    }

    /// Highest tabulated temperature.
    #[must_use]
    pub fn max_temperature(&self) -> Scalar {
        self.temperature[self.temperature.len() - 1]
    }
}

/// Derating factor at `ambient` °C.
#[must_use]
pub fn temperature_current_derating(ambient: Scalar, curve: &DeratingCurve, policy: ClampPolicy) -> Scalar {
    if policy == ClampPolicy::ZeroAboveRange && ambient > curve.max_temperature() {
        return 0.0;
    }
    interp(ambient, &curve.temperature, &curve.factor).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn curve() -> DeratingCurve {
        DeratingCurve::new(vec![70.0, 85.0, 105.0], vec![1.0, 0.9, 0.5]).unwrap()
    }

    #[test]
    fn interpolates_inside_table() {
        assert_relative_eq!(temperature_current_derating(95.0, &curve(), ClampPolicy::Boundary), 0.7);
    }

    #[test]
    fn clamp_policies_differ_only_above_table() {
        let c = curve();
        assert_relative_eq!(temperature_current_derating(20.0, &c, ClampPolicy::Boundary), 1.0);
        assert_relative_eq!(temperature_current_derating(20.0, &c, ClampPolicy::ZeroAboveRange), 1.0);
        assert_relative_eq!(temperature_current_derating(120.0, &c, ClampPolicy::Boundary), 0.5);
        assert_relative_eq!(temperature_current_derating(120.0, &c, ClampPolicy::ZeroAboveRange), 0.0);
        assert_relative_eq!(temperature_current_derating(105.0, &c, ClampPolicy::ZeroAboveRange), 0.5);
    }

    #[test]
    fn rejects_unsorted_or_negative_tables() {
        assert!(DeratingCurve::new(vec![85.0, 70.0], vec![1.0, 1.0]).is_err());
        assert!(DeratingCurve::new(vec![70.0, 85.0], vec![1.0, -0.1]).is_err());
        assert_eq!(DeratingCurve::new(vec![], vec![]), Err(TableError::Empty("derating curve")));
    }
}
