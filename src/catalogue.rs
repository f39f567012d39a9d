//! Candidate component records and the per-series lookup tables that accompany them.
//!
//! Loading and column normalisation happen elsewhere; the types here only hold
//! already parsed SI values and refuse obviously malformed tables.

use std::collections::HashMap;

use crate::constants::{FILM_DELTA_T_LIMIT, REFERENCE_TEMPERATURES};
use crate::derating::dvdt::DvdtTable;
use crate::derating::lifetime::LifetimeCurve;
use crate::derating::temperature::DeratingCurve;
use crate::derating::thermal::ThermalTable;
use crate::math::{interp, Scalar};

/// Errors raised while building lookup tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// The table has no rows.
    #[error("{0} is empty")]
    Empty(&'static str),
    /// Column lengths differ.
    #[error("{table}: column lengths differ ({left} vs {right})")]
    LengthMismatch {
        /// Table name.
        table: &'static str,
        /// Length of the first column.
        left: usize,
        /// Length of the second column.
        right: usize,
    },
    /// A key column is not strictly increasing.
    #[error("{table}: keys must be strictly increasing (row {row})")]
    Unsorted {
        /// Table name.
        table: &'static str,
        /// First offending row.
        row: usize,
    },
    /// A value is NaN, infinite or out of its physical range.
    #[error("{table}: invalid value {value} in row {row}")]
    InvalidValue {
        /// Table name.
        table: &'static str,
        /// Row index.
        row: usize,
        /// Offending value.
        value: Scalar,
    },
}

/// Checks that `keys` is finite and strictly increasing and `values` finite.
pub(crate) fn validate_columns(table: &'static str, keys: &[Scalar], values: &[Scalar]) -> Result<(), TableError> {
    if keys.is_empty() {
        return Err(TableError::Empty(table));
    }
    if keys.len() != values.len() {
        return Err(TableError::LengthMismatch {
            table,
            left: keys.len(),
            right: values.len(),
        });
    }
    for (row, (&k, &v)) in keys.iter().zip(values).enumerate() {
        if !k.is_finite() {
            return Err(TableError::InvalidValue { table, row, value: k });
        }
        if !v.is_finite() {
            return Err(TableError::InvalidValue { table, row, value: v });
        }
    }
    if let Some(row) = keys.windows(2).position(|w| w[1] <= w[0]) {
        return Err(TableError::Unsorted { table, row: row + 1 });
    }
    Ok(())
}

/// Capacitor technology; selects the cost model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Technology {
    /// Metallised polypropylene film capacitors.
    Film,
    /// Aluminium electrolytic capacitors.
    Electrolytic,
}

/// Outer housing dimensions in metres.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width in m.
    pub width: Scalar,
    /// Length in m.
    pub length: Scalar,
    /// Height in m.
    pub height: Scalar,
}

impl Dimensions {
    /// Creates a dimension triplet.
    #[must_use]
    pub const fn new(width: Scalar, length: Scalar, height: Scalar) -> Self {
        Self { width, length, height }
    }

    /// Box volume in m³.
    #[must_use]
    pub fn volume(&self) -> Scalar {
        self.width * self.length * self.height
    }
}

/// A single catalogue entry.
///
/// Fields that catalogues frequently leave blank are optional; see [`CandidateComponent::ratings`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateComponent {
    /// Manufacturer ordering code.
    pub ordering_code: String,
    /// Rated capacitance in F.
    pub capacitance: Scalar,
    /// Rated DC voltage at 85 °C in V.
    pub rated_voltage_85: Scalar,
    /// Permitted DC voltage at 105 °C in V.
    pub rated_voltage_105: Option<Scalar>,
    /// Permitted DC voltage at 125 °C in V.
    pub rated_voltage_125: Option<Scalar>,
    /// Nominal equivalent series resistance in Ω.
    pub esr: Option<Scalar>,
    /// Equivalent series inductance in H.
    pub esl: Option<Scalar>,
    /// Housing dimensions.
    pub dimensions: Dimensions,
    /// Rated RMS current at 85 °C in A.
    pub rated_rms_current_85: Option<Scalar>,
}

/// Fields of a candidate that synthesis cannot do without.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratings {
    /// Rated capacitance in F.
    pub capacitance: Scalar,
    /// Rated voltages at 85/105/125 °C in V.
    pub voltages: [Scalar; 3],
    /// Equivalent series inductance in H (0 when unknown).
    pub esl: Scalar,
    /// Housing volume in m³.
    pub volume: Scalar,
}

impl Ratings {
    /// Permitted voltage at `temperature`, interpolated between the reference points.
    #[must_use]
    pub fn voltage_at(&self, temperature: Scalar) -> Scalar {
        interp(temperature, &REFERENCE_TEMPERATURES, &self.voltages).unwrap_or(self.voltages[0])
    }
}

impl CandidateComponent {
    /// Creates a candidate with only the mandatory fields set.
    #[must_use]
    pub fn new(
        ordering_code: impl Into<String>,
        capacitance: Scalar,
        rated_voltage_85: Scalar,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            ordering_code: ordering_code.into(),
            capacitance,
            rated_voltage_85,
            rated_voltage_105: None,
            rated_voltage_125: None,
            esr: None,
            esl: None,
            dimensions,
            rated_rms_current_85: None,
        }
    }

    /// Sets the derated voltages at 105 °C and 125 °C.
    #[must_use]
    pub fn with_derated_voltages(mut self, at_105: Scalar, at_125: Scalar) -> Self {
        self.rated_voltage_105 = Some(at_105);
        self.rated_voltage_125 = Some(at_125);
        self
    }

    /// Sets nominal ESR and ESL.
    #[must_use]
    pub fn with_parasitics(mut self, esr: Scalar, esl: Scalar) -> Self {
        self.esr = Some(esr);
        self.esl = Some(esl);
        self
    }

    /// Sets the rated RMS current at 85 °C.
    #[must_use]
    pub fn with_rated_current(mut self, amps: Scalar) -> Self {
        self.rated_rms_current_85 = Some(amps);
        self
    }

    /// Key used to look up frequency-dependent curves for this part.
    #[must_use]
    pub fn ordering_key(&self) -> String {
        ordering_key(&self.ordering_code)
    }

    /// Extracts the fields synthesis needs, naming the first one that is missing or unusable.
    pub fn ratings(&self) -> Result<Ratings, &'static str> {
        let positive = |name: &'static str, v: Option<Scalar>| match v {
            Some(x) if x.is_finite() && x > 0.0 => Ok(x),
            _ => Err(name),
        };
        let capacitance = positive("capacitance", Some(self.capacitance))?;
        let v85 = positive("rated_voltage_85", Some(self.rated_voltage_85))?;
        let v105 = positive("rated_voltage_105", self.rated_voltage_105)?;
        let v125 = positive("rated_voltage_125", self.rated_voltage_125)?;
        let volume = positive("dimensions", Some(self.dimensions.volume()))?;
        let esl = positive("esl", self.esl)?;
        Ok(Ratings {
            capacitance,
            voltages: [v85, v105, v125],
            esl,
            volume,
        })
    }
}

/// Normalises an ordering code for curve lookup: `'+'` becomes `'K'` and `'*'` is dropped.
#[must_use]
pub fn ordering_key(code: &str) -> String {
    code.chars()
        .filter(|&c| c != '*')
        .map(|c| if c == '+' { 'K' } else { c })
        .collect()
}

/// Frequency-dependent ESR and RMS current capability of one part.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyCurve {
    frequency: Vec<Scalar>,
    esr: Vec<Scalar>,
    rms_current: Vec<Scalar>,
}

impl FrequencyCurve {
    /// Creates a curve; frequencies must be strictly increasing.
    pub fn new(frequency: Vec<Scalar>, esr: Vec<Scalar>, rms_current: Vec<Scalar>) -> Result<Self, TableError> {
        validate_columns("frequency curve (esr)", &frequency, &esr)?;
        validate_columns("frequency curve (current)", &frequency, &rms_current)?;
        if let Some(row) = esr.iter().position(|&r| r < 0.0) {
            return Err(TableError::InvalidValue {
                table: "frequency curve (esr)",
                row,
                value: esr[row],
            });
        }
        Ok(Self {
            frequency,
            esr,
            rms_current,
        })
    }

    /// ESR in Ω at `frequency`, clamped to the measured range.
    #[must_use]
    pub fn esr_at(&self, frequency: Scalar) -> Scalar {
        interp(frequency, &self.frequency, &self.esr).unwrap_or(0.0)
    }

    /// RMS current capability in A at `frequency`, clamped to the measured range.
    #[must_use]
    pub fn rms_current_at(&self, frequency: Scalar) -> Scalar {
        interp(frequency, &self.frequency, &self.rms_current).unwrap_or(0.0)
    }
}

/// Everything the engine needs to evaluate one technology series.
#[derive(Debug, Clone)]
pub struct SeriesData {
    /// Series name, e.g. `"B3271*P"`.
    pub name: String,
    /// Technology of every part in the series.
    pub technology: Technology,
    /// Allowed self-heating (°C) before temperature derating.
    pub delta_t_limit: Scalar,
    /// Parts of the series.
    pub candidates: Vec<CandidateComponent>,
    /// Current derating over ambient temperature.
    pub derating_curve: DeratingCurve,
    /// Self-heating coefficients by housing.
    pub thermal_table: ThermalTable,
    /// Lifetime curves; may be empty.
    pub lifetime_curves: Vec<LifetimeCurve>,
    /// Frequency curves keyed by [`ordering_key`].
    pub frequency_curves: HashMap<String, FrequencyCurve>,
    /// Optional dv/dt limits.
    pub dvdt_table: Option<DvdtTable>,
}

impl SeriesData {
    /// Creates a series with the default film ΔT limit and no optional tables.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        technology: Technology,
        candidates: Vec<CandidateComponent>,
        derating_curve: DeratingCurve,
        thermal_table: ThermalTable,
    ) -> Self {
        Self {
            name: name.into(),
            technology,
            delta_t_limit: FILM_DELTA_T_LIMIT,
            candidates,
            derating_curve,
            thermal_table,
            lifetime_curves: Vec::new(),
            frequency_curves: HashMap::new(),
            dvdt_table: None,
        }
    }

    /// Replaces the allowed self-heating.
    #[must_use]
    pub fn with_delta_t_limit(mut self, celsius: Scalar) -> Self {
        self.delta_t_limit = celsius;
        self
    }

    /// Attaches lifetime curves.
    #[must_use]
    pub fn with_lifetime_curves(mut self, curves: Vec<LifetimeCurve>) -> Self {
        self.lifetime_curves = curves;
        self
    }

    /// Attaches a frequency curve for `ordering_code`.
    #[must_use]
    pub fn with_frequency_curve(mut self, ordering_code: &str, curve: FrequencyCurve) -> Self {
        self.frequency_curves.insert(ordering_key(ordering_code), curve);
        self
    }

    /// Attaches a dv/dt table.
    #[must_use]
    pub fn with_dvdt_table(mut self, table: DvdtTable) -> Self {
        self.dvdt_table = Some(table);
        self
    }

    /// Frequency curve of `candidate`, if one was supplied.
    #[must_use]
    pub fn frequency_curve(&self, candidate: &CandidateComponent) -> Option<&FrequencyCurve> {
        self.frequency_curves.get(&candidate.ordering_key())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn part() -> CandidateComponent {
        CandidateComponent::new("B32716J8205+000", 2.0e-6, 1000.0, Dimensions::new(0.011, 0.0315, 0.021))
    }

    #[test]
    fn ordering_key_normalises_catalogue_codes() {
        assert_eq!(ordering_key("B32716J8205+000"), "B32716J8205K000");
        assert_eq!(ordering_key("B3271*P"), "B3271P");
    }

    #[test]
    fn ratings_name_first_missing_field() {
        assert_eq!(part().ratings(), Err("rated_voltage_105"));
        let derated = part().with_derated_voltages(800.0, 600.0);
        assert_eq!(derated.ratings(), Err("esl"));
        assert_eq!(derated.clone().with_parasitics(5.0e-3, 0.0).ratings(), Err("esl"));
        let r = derated.with_parasitics(5.0e-3, 12.0e-9).ratings().unwrap();
        assert_relative_eq!(r.volume, 0.011 * 0.0315 * 0.021);
        assert_relative_eq!(r.esl, 12.0e-9);
        assert_relative_eq!(r.voltage_at(115.0), 700.0);
        assert_relative_eq!(r.voltage_at(40.0), 1000.0);
    }

    #[test]
    fn frequency_curve_interpolates_and_validates() {
        let c = FrequencyCurve::new(vec![1e3, 1e4], vec![0.010, 0.006], vec![5.0, 9.0]).unwrap();
        assert_relative_eq!(c.esr_at(5.5e3), 0.008);
        assert_relative_eq!(c.rms_current_at(1e6), 9.0);
        assert!(matches!(
            FrequencyCurve::new(vec![1e4, 1e3], vec![0.0; 2], vec![1.0; 2]),
            Err(TableError::Unsorted { row: 1, .. })
        ));
    }

    #[test]
    fn series_finds_curve_by_normalised_code() {
        let curve = FrequencyCurve::new(vec![1e3], vec![0.01], vec![4.0]).unwrap();
        let series = SeriesData::new(
            "B3271*P",
            Technology::Film,
            vec![part()],
            DeratingCurve::new(vec![85.0], vec![1.0]).unwrap(),
            ThermalTable::default(),
        )
        .with_frequency_curve("B32716J8205K000", curve);
        assert!(series.frequency_curve(&series.candidates[0]).is_some());
    }
}
