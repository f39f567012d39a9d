//! Lifetime-driven voltage derating.
//!
//! Datasheets give lifetime-versus-voltage curves for a handful of hotspot
//! temperatures. Voltage is close to linear in `log10(lifetime)`, so each curve is
//! held as a [`SemiLogCurve`]. A curve for an intermediate temperature is obtained
//! by bisecting the bracketing pair: the pointwise geometric mean of two curves is
//! taken as the curve at the arithmetic mean of their temperatures.

use tracing::warn;

use crate::catalogue::TableError;
use crate::derating::LookupMiss;
use crate::math::{geometric_mean, interp, same_key, Scalar};

/// Lifetime curve of one rated voltage at one temperature.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LifetimeCurve {
    /// Rated voltage (V) of the parts the curve applies to.
    pub rated_voltage: Scalar,
    /// Hotspot temperature in °C.
    pub temperature: Scalar,
    points: Vec<(Scalar, Scalar)>,
}

impl LifetimeCurve {
    /// Creates a curve from `(lifetime_hours, voltage)` points.
    pub fn new(rated_voltage: Scalar, temperature: Scalar, points: Vec<(Scalar, Scalar)>) -> Result<Self, TableError> {
        if points.len() < 2 {
            return Err(TableError::Empty("lifetime curve"));
        }
        if let Some(row) = points
            .iter()
            .position(|&(n, v)| !(n.is_finite() && n > 0.0 && v.is_finite() && v > 0.0))
        {
            return Err(TableError::InvalidValue {
                table: "lifetime curve",
                row,
                value: points[row].0,
            });
        }
        Ok(Self {
            rated_voltage,
            temperature,
            points,
        })
    }

    /// `(lifetime_hours, voltage)` points.
    #[must_use]
    pub fn points(&self) -> &[(Scalar, Scalar)] {
        &self.points
    }
}

/// Voltage/lifetime relation interpolated linearly over `log10(lifetime)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SemiLogCurve {
    log_lifetime: Vec<Scalar>,
    voltage: Vec<Scalar>,
}

impl SemiLogCurve {
    /// Builds the curve from `(lifetime_hours, voltage)` points in any order.
    pub fn new(points: &[(Scalar, Scalar)]) -> Result<Self, TableError> {
        let mut sorted: Vec<(Scalar, Scalar)> = points.iter().map(|&(n, v)| (n.log10(), v)).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (log_lifetime, voltage): (Vec<_>, Vec<_>) = sorted.into_iter().unzip();
        crate::catalogue::validate_columns("semi-log curve", &log_lifetime, &voltage)?;
        Ok(Self { log_lifetime, voltage })
    }

    /// Permitted voltage for `lifetime` hours, or `None` outside the tabulated lifetimes.
    #[must_use]
    pub fn voltage_at(&self, lifetime: Scalar) -> Option<Scalar> {
        let x = lifetime.log10();
        let (lo, hi) = (self.log_lifetime[0], self.log_lifetime[self.log_lifetime.len() - 1]);
        if !(lo..=hi).contains(&x) {
            return None;
        }
        interp(x, &self.log_lifetime, &self.voltage)
    }

    /// Expected lifetime in hours at `voltage`, or `None` outside the tabulated voltages.
    #[must_use]
    pub fn lifetime_at(&self, voltage: Scalar) -> Option<Scalar> {
        let mut pairs: Vec<(Scalar, Scalar)> = self.voltage.iter().copied().zip(self.log_lifetime.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (v, n): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        if !(v[0]..=v[v.len() - 1]).contains(&voltage) {
            return None;
        }
        interp(voltage, &v, &n).map(|log_n| 10f64.powf(log_n))
    }
}

/// Termination criteria of the temperature bisection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendCriteria {
    /// Stop once the temperature bracket is narrower than this (°C).
    pub tolerance: Scalar,
    /// Hard iteration limit.
    pub max_iterations: usize,
}

impl Default for BlendCriteria {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            max_iterations: 64,
        }
    }
}

/// Result of [`lifetime_voltage_derating`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifetimeDerating {
    /// Permitted voltage (V) for the target lifetime.
    pub voltage: Scalar,
    /// Temperature (°C) of the blended curve actually used.
    pub curve_temperature: Scalar,
    /// Bisection steps taken.
    pub iterations: usize,
    /// Whether the bracket shrank below the tolerance.
    pub converged: bool,
}

fn pick<'a>(curves: &[&'a LifetimeCurve], temperature: Scalar) -> Result<&'a LifetimeCurve, LookupMiss> {
    let mut at = curves.iter().copied().filter(|c| c.temperature == temperature);
    match (at.next(), at.count()) {
        (Some(c), 0) => Ok(c),
        (Some(_), rest) => Err(LookupMiss::Ambiguous {
            table: "lifetime curve",
            matches: rest + 1,
        }),
        (None, _) => Err(LookupMiss::NotFound("lifetime curve")),
    }
}

fn blend(a: &[(Scalar, Scalar)], b: &[(Scalar, Scalar)]) -> Vec<(Scalar, Scalar)> {
    a.iter()
        .zip(b)
        .map(|(&(na, va), &(nb, vb))| (geometric_mean(na, nb), geometric_mean(va, vb)))
        .collect()
}

/// Permitted voltage for `target_lifetime` hours at `operating_temperature` °C for parts
/// rated at `rated_voltage`.
pub fn lifetime_voltage_derating(
    target_lifetime: Scalar,
    operating_temperature: Scalar,
    rated_voltage: Scalar,
    curves: &[LifetimeCurve],
    criteria: &BlendCriteria,
) -> Result<LifetimeDerating, LookupMiss> {
    let matching: Vec<&LifetimeCurve> = curves
        .iter()
        .filter(|c| same_key(c.rated_voltage, rated_voltage))
        .collect();

    let below = matching
        .iter()
        .map(|c| c.temperature)
        .filter(|&t| t <= operating_temperature)
        .reduce(Scalar::max);
    let above = matching
        .iter()
        .map(|c| c.temperature)
        .filter(|&t| t >= operating_temperature)
        .reduce(Scalar::min);
    let (t_low, t_high) = match (below, above) {
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(t), None) | (None, Some(t)) => (t, t),
        (None, None) => return Err(LookupMiss::NotFound("lifetime curve")),
    };
    let lower = pick(&matching, t_low)?;
    let upper = pick(&matching, t_high)?;
    if lower.points.len() != upper.points.len() {
        warn!(
            rated_voltage,
            t_low, t_high, "lifetime curves of one rated voltage differ in length"
        );
        return Err(LookupMiss::Inconsistent("lifetime curve"));
    }

    let mut low = (t_low, lower.points.clone());
    let mut high = (t_high, upper.points.clone());
    let mut iterations = 0;
    let mut converged = true;
    while high.0 - low.0 >= criteria.tolerance {
        if iterations == criteria.max_iterations {
            converged = false;
            break;
        }
        let mid = (0.5 * (low.0 + high.0), blend(&low.1, &high.1));
        if mid.0 <= operating_temperature {
            low = mid;
        } else {
            high = mid;
        }
        iterations += 1;
    }

    let curve_temperature = 0.5 * (low.0 + high.0);
    let points = if low.0 == high.0 { low.1 } else { blend(&low.1, &high.1) };
    let curve = SemiLogCurve::new(&points).map_err(|_| LookupMiss::Inconsistent("lifetime curve"))?;
    let voltage = curve.voltage_at(target_lifetime).ok_or(LookupMiss::OutOfDomain {
        table: "lifetime curve",
        value: target_lifetime,
    })?;
    Ok(LifetimeDerating {
        voltage,
        curve_temperature,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn curves() -> Vec<LifetimeCurve> {
        vec![
            LifetimeCurve::new(800.0, 70.0, vec![(1.0e3, 1000.0), (1.0e6, 800.0)]).unwrap(),
            LifetimeCurve::new(800.0, 90.0, vec![(1.0e2, 1000.0), (1.0e5, 800.0)]).unwrap(),
            LifetimeCurve::new(1100.0, 70.0, vec![(1.0e3, 1300.0), (1.0e6, 1100.0)]).unwrap(),
        ]
    }

    #[test]
    fn semilog_curve_is_linear_in_log_lifetime() {
        let c = SemiLogCurve::new(&[(1.0e6, 800.0), (1.0e3, 1000.0)]).unwrap();
        assert_relative_eq!(c.voltage_at(1.0e4).unwrap(), 1000.0 - 200.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(c.lifetime_at(900.0).unwrap(), 10f64.powf(4.5), max_relative = 1e-12);
        assert!(c.voltage_at(10.0).is_none());
    }

    #[test]
    fn exact_temperature_uses_single_curve() {
        let d = lifetime_voltage_derating(1.0e4, 70.0, 800.0, &curves(), &BlendCriteria::default()).unwrap();
        assert_eq!(d.iterations, 0);
        assert_relative_eq!(d.voltage, 1000.0 - 200.0 / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn midpoint_temperature_blends_geometrically() {
        // 80 °C is the first midpoint; the 1 °C bracket then converges around it
        let d = lifetime_voltage_derating(1.0e4, 80.0, 800.0, &curves(), &BlendCriteria::default()).unwrap();
        assert!(d.converged);
        assert!((d.curve_temperature - 80.0).abs() < 1.0);
        // the 80 °C curve runs from (10^2.5 h, 1000 V) to (10^5.5 h, 800 V)
        let expected = 1000.0 - 200.0 * (4.0 - 2.5) / 3.0;
        assert_relative_eq!(d.voltage, expected, max_relative = 1e-2);
    }

    #[test]
    fn single_sided_bracket_falls_back() {
        let d = lifetime_voltage_derating(1.0e4, 95.0, 800.0, &curves(), &BlendCriteria::default()).unwrap();
        assert_relative_eq!(d.curve_temperature, 90.0);
        assert_relative_eq!(d.voltage, 1000.0 - 200.0 * 2.0 / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn misses_are_typed() {
        let c = curves();
        assert_eq!(
            lifetime_voltage_derating(1.0e4, 80.0, 450.0, &c, &BlendCriteria::default()),
            Err(LookupMiss::NotFound("lifetime curve"))
        );
        assert!(matches!(
            lifetime_voltage_derating(1.0e9, 70.0, 800.0, &c, &BlendCriteria::default()),
            Err(LookupMiss::OutOfDomain { .. })
        ));
    }

    #[test]
    fn iteration_limit_is_reported() {
        let criteria = BlendCriteria {
            tolerance: 1.0,
            max_iterations: 2,
        };
        let d = lifetime_voltage_derating(1.0e4, 73.0, 800.0, &curves(), &criteria).unwrap();
        assert!(!d.converged);
        assert_eq!(d.iterations, 2);
    }
}
