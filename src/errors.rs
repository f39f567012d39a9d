//! Shared error types used across submodules.

use thiserror::Error;

use crate::catalogue::TableError;
use crate::cost::CostFitError;
use crate::requirements::RequirementError;
use crate::spectrum::SpectrumError;
use crate::waveform::WaveformError;

/// Top-level error type for the crate.
///
/// Per-candidate lookup misses are not errors at this level; they surface as
/// [`Rejection`](crate::synthesis::Rejection)s inside a series evaluation.
#[derive(Debug, Error)]
pub enum CapselError {
    /// Wraps waveform construction errors.
    #[error(transparent)]
    Waveform(#[from] WaveformError),
    /// Wraps harmonic decomposition errors.
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
    /// Wraps requirement validation and analysis errors.
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    /// Wraps malformed catalogue tables.
    #[error(transparent)]
    Table(#[from] TableError),
    /// Wraps cost-model fitting errors.
    #[error(transparent)]
    CostFit(#[from] CostFitError),
    /// Raised when numerical procedures fail to converge.
    #[error("solver convergence failure: {0}")]
    Convergence(String),
}
