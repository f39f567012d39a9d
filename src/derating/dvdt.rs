//! Voltage slew-rate limits.
//!
//! A device of capacitance `C` with permitted slew rate `dv/dt` carries at most
//! `C · dv/dt` of peak current, which bounds the parallel count from below.

use tracing::warn;

use crate::catalogue::TableError;
use crate::derating::LookupMiss;
use crate::math::{ceil_count, same_key, Scalar};

/// One row of a dv/dt table.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DvdtRow {
    /// Series fragment contained in the ordering codes the row applies to.
    pub series: String,
    /// Rated voltage in V.
    pub rated_voltage: Scalar,
    /// Permitted slew rate in V/s.
    pub dvdt_max: Scalar,
}

/// Datasheet table of permitted slew rates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DvdtTable {
    rows: Vec<DvdtRow>,
}

impl DvdtTable {
    /// Creates a table; slew rates must be positive and finite.
    pub fn new(rows: Vec<DvdtRow>) -> Result<Self, TableError> {
        if let Some(row) = rows.iter().position(|r| !(r.dvdt_max.is_finite() && r.dvdt_max > 0.0)) {
            return Err(TableError::InvalidValue {
                table: "dv/dt table",
                row,
                value: rows[row].dvdt_max,
            });
        }
        Ok(Self { rows })
    }

    /// Permitted slew rate (V/s) for a part.
    pub fn max_dvdt(&self, ordering_code: &str, rated_voltage: Scalar) -> Result<Scalar, LookupMiss> {
        let mut matches = self
            .rows
            .iter()
            .filter(|r| ordering_code.contains(r.series.as_str()) && same_key(r.rated_voltage, rated_voltage));
        match (matches.next(), matches.count()) {
            (Some(row), 0) => Ok(row.dvdt_max),
            (None, _) => Err(LookupMiss::NotFound("dv/dt limit")),
            (Some(_), rest) => {
                warn!(ordering_code, rated_voltage, rows = rest + 1, "dv/dt table has overlapping rows");
                Err(LookupMiss::Ambiguous {
                    table: "dv/dt limit",
                    matches: rest + 1,
                })
            }
        }
    }
}

/// Parallel devices needed so that no device exceeds its slew-rate limit.
#[must_use]
pub fn parallel_count_dvdt(peak_current: Scalar, dvdt_max: Scalar, capacitance: Scalar) -> Option<u32> {
    ceil_count(peak_current / dvdt_max / capacitance)
}
