//! Convenience re-exports for running a capacitor selection.

pub use crate::catalogue::{
    ordering_key, CandidateComponent, Dimensions, FrequencyCurve, Ratings, SeriesData, TableError, Technology,
};
pub use crate::config::EngineConfig;
pub use crate::constants::*;
pub use crate::cost::{CostFitError, CostModel, CostSample};
pub use crate::derating::{
    lifetime_voltage_derating, parallel_count_dvdt, self_heating_coefficient, temperature_current_derating,
    BlendCriteria, ClampPolicy, DeratingContext, DeratingCurve, DvdtRow, DvdtTable, LifetimeCurve, LifetimeDerating,
    LookupMiss, SemiLogCurve, ThermalRow, ThermalTable,
};
pub use crate::errors::CapselError;
pub use crate::math::{linspace, Scalar};
pub use crate::pareto::{band, pareto_front, BandConfig, Frontier, Objectives};
pub use crate::requirements::{
    analyze, minimum_capacitance, rms_current, CapacitanceEstimate, CapacitanceSearch, OperatingPoint,
    Requirement, RequirementAnalysis, RequirementError,
};
pub use crate::spectrum::{decompose, DecompositionConfig, Harmonic, HarmonicFilter, HarmonicSet, SpectrumError};
pub use crate::synthesis::{
    evaluate_catalogue, evaluate_series, synthesize, ParallelCounts, Rejection, RejectedCandidate, SeriesEvaluation,
    SynthesisContext, SynthesizedDesign,
};
pub use crate::waveform::{TimeAxis, Waveform, WaveformError};
