//! Component cost models.
//!
//! Prices follow the regressions of Burkart and Kolar, "Component Cost Models for
//! Multi-Objective Optimizations of Switched-Mode Power Converters":
//!
//! ```text
//! film:          cost = a + b·V + c·C
//! electrolytic:  cost =     b·V + d·C·V²
//! ```
//!
//! [`CostModel::fit`] re-derives the coefficients from distributor price samples.

use nalgebra::{DMatrix, DVector};

use crate::catalogue::Technology;
use crate::math::Scalar;

/// Errors raised while fitting a cost model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CostFitError {
    /// Not enough samples to determine every coefficient.
    #[error("need at least {needed} price samples, got {got}")]
    TooFewSamples {
        /// Number of regressors.
        needed: usize,
        /// Number of samples supplied.
        got: usize,
    },
    /// A sample contains NaN or infinite values.
    #[error("price sample {0} is not finite")]
    NonFinite(usize),
    /// The least-squares system has no unique solution.
    #[error("price samples do not determine the model: {0}")]
    Singular(&'static str),
}

/// Unit price regression `a + b·V + c·C + d·C·V²` (V in volts, C in farads).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Fixed cost `a`.
    pub intercept: Scalar,
    /// Voltage coefficient `b`.
    pub per_volt: Scalar,
    /// Capacitance coefficient `c`.
    pub per_farad: Scalar,
    /// Stored-energy coefficient `d`.
    pub per_farad_volt2: Scalar,
}

/// One observed unit price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSample {
    /// Rated voltage in V.
    pub voltage: Scalar,
    /// Rated capacitance in F.
    pub capacitance: Scalar,
    /// Observed unit price.
    pub cost: Scalar,
}

impl CostModel {
    /// Published film capacitor regression.
    #[must_use]
    pub const fn film() -> Self {
        Self {
            intercept: -1.022,
            per_volt: 2.426e-3,
            per_farad: 54.956e-9,
            per_farad_volt2: 0.0,
        }
    }

    /// Published electrolytic capacitor regression.
    #[must_use]
    pub const fn electrolytic() -> Self {
        Self {
            intercept: 0.0,
            per_volt: 1.437e-3,
            per_farad: 0.0,
            per_farad_volt2: 24.757e-15,
        }
    }

    /// Published regression for `technology`.
    #[must_use]
    pub const fn for_technology(technology: Technology) -> Self {
        match technology {
            Technology::Film => Self::film(),
            Technology::Electrolytic => Self::electrolytic(),
        }
    }

    /// Unit price of a part rated `voltage` V and `capacitance` F.
    #[must_use]
    pub fn unit_cost(&self, voltage: Scalar, capacitance: Scalar) -> Scalar {
        self.intercept
            + self.per_volt * voltage
            + self.per_farad * capacitance
            + self.per_farad_volt2 * capacitance * voltage * voltage
    }

    /// Least-squares fit of the regressors used by `technology`.
    pub fn fit(technology: Technology, samples: &[CostSample]) -> Result<Self, CostFitError> {
        let columns = regressor_count(technology);
        if samples.len() < columns {
            return Err(CostFitError::TooFewSamples {
                needed: columns,
                got: samples.len(),
            });
        }
        if let Some(i) = samples
            .iter()
            .position(|s| !(s.voltage.is_finite() && s.capacitance.is_finite() && s.cost.is_finite()))
        {
            return Err(CostFitError::NonFinite(i));
        }

        let mut design = DMatrix::from_fn(samples.len(), columns, |r, c| regressor(technology, &samples[r], c));
        // columns span many decades (1 vs. V vs. C·V²); equilibrate before the SVD
        let scales: Vec<Scalar> = design
            .column_iter()
            .map(|col| col.amax())
            .map(|m| if m > 0.0 { m } else { 1.0 })
            .collect();
        for (mut col, &s) in design.column_iter_mut().zip(&scales) {
            col /= s;
        }
        let prices = DVector::from_iterator(samples.len(), samples.iter().map(|s| s.cost));
        let svd = design.svd(true, true);
        if svd.rank(1e-10) < columns {
            return Err(CostFitError::Singular("regressors are linearly dependent"));
        }
        let scaled = svd.solve(&prices, 1e-12).map_err(CostFitError::Singular)?;
        let coeff: Vec<Scalar> = scaled.iter().zip(&scales).map(|(x, s)| x / s).collect();

        Ok(match technology {
            Technology::Film => Self {
                intercept: coeff[0],
                per_volt: coeff[1],
                per_farad: coeff[2],
                per_farad_volt2: 0.0,
            },
            Technology::Electrolytic => Self {
                intercept: 0.0,
                per_volt: coeff[0],
                per_farad: 0.0,
                per_farad_volt2: coeff[1],
            },
        })
    }
}

const fn regressor_count(technology: Technology) -> usize {
    match technology {
        Technology::Film => 3,
        Technology::Electrolytic => 2,
    }
}

fn regressor(technology: Technology, sample: &CostSample, column: usize) -> Scalar {
    let CostSample {
        voltage: v,
        capacitance: c,
        ..
    } = *sample;
    match (technology, column) {
        (Technology::Film, 0) => 1.0,
        (Technology::Film, 1) | (Technology::Electrolytic, 0) => v,
        (Technology::Film, _) => c,
        (Technology::Electrolytic, _) => c * v * v,
    }
}
