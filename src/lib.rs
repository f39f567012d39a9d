#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Reference temperatures, engine defaults and small physical helpers.
pub mod constants;
/// Shared numerical utilities (grids, interpolation, counts).
pub mod math;
/// Validated one-period current waveforms.
pub mod waveform;
/// FFT-based harmonic decomposition.
pub mod spectrum;
/// Requirements, minimum capacitance and RMS current.
pub mod requirements;
/// Candidate parts and per-series catalogue tables.
pub mod catalogue;
/// Temperature, thermal, lifetime and dv/dt derating.
pub mod derating;
/// Unit price regressions.
pub mod cost;
/// Series/parallel bank synthesis.
pub mod synthesis;
/// Pareto frontier and tolerance band.
pub mod pareto;
/// Immutable engine configuration.
pub mod config;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
