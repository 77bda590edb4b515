//! The `Layout` record spec.md §3 defines: a complete, scored set of
//! placements produced by one solver run, plus the human-facing summary
//! the scorer attaches to it.

use serde::{Deserialize, Serialize};

use crate::placement::Placement;
use crate::strategy::Strategy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub total_cost_cents: i64,
    pub furniture_count: usize,
    pub coverage_ratio: f64,
    pub flow_score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub strategy: Strategy,
    pub placements: Vec<Placement>,
    pub score: f64,
    pub rationale: String,
    pub violations: Vec<String>,
    pub metrics: LayoutMetrics,
}
