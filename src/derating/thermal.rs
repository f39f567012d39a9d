//! Self-heating coefficients by housing size.

use tracing::warn;

use crate::catalogue::{Dimensions, TableError};
use crate::derating::LookupMiss;
use crate::math::{same_key, Scalar};

/// One row of a thermal table.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalRow {
    /// Housing the coefficient applies to.
    pub dimensions: Dimensions,
    /// Thermal conductance to ambient in W/°C.
    pub coefficient: Scalar,
}

/// Datasheet table of equivalent self-heating coefficients.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThermalTable {
    rows: Vec<ThermalRow>,
}

impl ThermalTable {
    /// Creates a table; coefficients must be positive and finite.
    pub fn new(rows: Vec<ThermalRow>) -> Result<Self, TableError> {
        if let Some(row) = rows
            .iter()
            .position(|r| !(r.coefficient.is_finite() && r.coefficient > 0.0))
        {
            return Err(TableError::InvalidValue {
                table: "thermal table",
                row,
                value: rows[row].coefficient,
            });
        }
        Ok(Self { rows })
    }

    /// Rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[ThermalRow] {
        &self.rows
    }
}

fn same_housing(a: &Dimensions, b: &Dimensions) -> bool {
    same_key(a.width, b.width) && same_key(a.length, b.length) && same_key(a.height, b.height)
}

/// Self-heating coefficient (W/°C) of the housing `dimensions`.
///
/// Exactly one row must match. Several matching rows point at a broken table and
/// are logged as such.
pub fn self_heating_coefficient(dimensions: &Dimensions, table: &ThermalTable) -> Result<Scalar, LookupMiss> {
    let mut matches = table.rows.iter().filter(|r| same_housing(&r.dimensions, dimensions));
    match (matches.next(), matches.count()) {
        (Some(row), 0) => Ok(row.coefficient),
        (None, _) => Err(LookupMiss::NotFound("thermal coefficient")),
        (Some(_), rest) => {
            warn!(?dimensions, rows = rest + 1, "thermal table has duplicate housings");
            Err(LookupMiss::Ambiguous {
                table: "thermal coefficient",
                matches: rest + 1,
            })
        }
    }
}
