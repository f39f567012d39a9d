//! Immutable engine configuration.

use crate::catalogue::Technology;
use crate::cost::CostModel;
use crate::derating::{BlendCriteria, ClampPolicy};
use crate::pareto::BandConfig;
use crate::requirements::CapacitanceSearch;
use crate::spectrum::DecompositionConfig;

/// Numeric settings and technology coefficients shared by every evaluation.
///
/// The record is built once and passed by reference; nothing in the engine reads
/// global state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Harmonic decomposition settings.
    pub decomposition: DecompositionConfig,
    /// Minimum-capacitance bisection settings.
    pub capacitance_search: CapacitanceSearch,
    /// Lifetime-curve blending settings.
    pub blend: BlendCriteria,
    /// Behaviour of the current derating curve outside its table.
    pub clamp_policy: ClampPolicy,
    /// Cost regression for film parts.
    pub film_cost: CostModel,
    /// Cost regression for electrolytic parts.
    pub electrolytic_cost: CostModel,
    /// Tolerance band around the Pareto frontier.
    pub band: BandConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decomposition: DecompositionConfig::default(),
            capacitance_search: CapacitanceSearch::default(),
            blend: BlendCriteria::default(),
            clamp_policy: ClampPolicy::default(),
            film_cost: CostModel::film(),
            electrolytic_cost: CostModel::electrolytic(),
            band: BandConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Replaces the decomposition settings.
    #[must_use]
    pub fn with_decomposition(mut self, decomposition: DecompositionConfig) -> Self {
        self.decomposition = decomposition;
        self
    }

    /// Replaces the derating clamp policy.
    #[must_use]
    pub fn with_clamp_policy(mut self, policy: ClampPolicy) -> Self {
        self.clamp_policy = policy;
        self
    }

    /// Replaces the cost model of `technology`.
    #[must_use]
    pub fn with_cost_model(mut self, technology: Technology, model: CostModel) -> Self {
        match technology {
            Technology::Film => self.film_cost = model,
            Technology::Electrolytic => self.electrolytic_cost = model,
        }
        self
    }

    /// Cost model used for `technology`.
    #[must_use]
    pub const fn cost_model(&self, technology: Technology) -> &CostModel {
        match technology {
            Technology::Film => &self.film_cost,
            Technology::Electrolytic => &self.electrolytic_cost,
        }
    }
}
