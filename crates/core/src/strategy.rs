//! Named objective-weight triples and the N=3 variant generator
//! (spec.md §4.4 objective table, §4.6).

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::catalog::CatalogItem;
use crate::geometry::Rotation;
use crate::grid::DroppedItem;
use crate::model::{ModelConstraints, PlacementModel, SoftPairTarget};
use crate::placement::Placement;
use crate::room::Room;
use crate::solver::{SolveBudget, SolveOutcome, solve};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Conversation,
    Work,
    Entertainment,
}

impl Strategy {
    pub const ALL: [Strategy; 3] =
        [Strategy::Conversation, Strategy::Work, Strategy::Entertainment];

    /// `(coverage, budget, flow)` weights, per spec.md §4.4's table.
    pub fn weights(self) -> (f64, f64, f64) {
        match self {
            Strategy::Conversation => (1.0, 0.4, 0.3),
            Strategy::Work => (0.8, 0.5, 0.4),
            Strategy::Entertainment => (1.0, 0.3, 0.5),
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Strategy::Conversation => "conversation",
            Strategy::Work => "work",
            Strategy::Entertainment => "entertainment",
        }
    }
}

pub struct StrategyResult {
    pub strategy: Strategy,
    pub placements: Vec<Placement>,
    pub outcome_kind: OutcomeKind,
    /// The filtered candidate set the model was actually built from (after
    /// grid-fit dropping), so callers can score without rebuilding the model.
    pub items: Vec<CatalogItem>,
    pub soft_pairs: Vec<SoftPairTarget>,
    pub dropped: Vec<DroppedItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Optimal,
    Feasible,
    Infeasible,
    Timeout,
}

/// Runs the solver once per strategy (sequentially, per spec.md §5, to
/// reuse the model builder's cached footprints) and deduplicates results by
/// a hash of `{(item_id, x_cm, y_cm, rotation)}`.
pub fn generate_variants(
    room: &Room,
    items: Vec<crate::catalog::CatalogItem>,
    constraints: &ModelConstraints,
    budget: SolveBudget,
) -> Vec<StrategyResult> {
    let mut results = Vec::new();
    let mut seen_hashes = Vec::new();

    for strategy in Strategy::ALL {
        let model = PlacementModel::build(room, items.clone(), strategy, constraints);
        let outcome = solve(&model, budget);
        let (placements, kind) = match outcome {
            SolveOutcome::Optimal(assignments) => {
                (extract_placements(&model, &assignments, 0.9), OutcomeKind::Optimal)
            }
            SolveOutcome::Feasible(assignments) => {
                (extract_placements(&model, &assignments, 0.9), OutcomeKind::Feasible)
            }
            SolveOutcome::Timeout(assignments) => {
                (extract_placements(&model, &assignments, 0.8), OutcomeKind::Timeout)
            }
            SolveOutcome::Infeasible => (Vec::new(), OutcomeKind::Infeasible),
        };

        let hash = hash_placements(&placements);
        if seen_hashes.contains(&hash) {
            continue;
        }
        seen_hashes.push(hash);
        results.push(StrategyResult {
            strategy,
            placements,
            outcome_kind: kind,
            items: model.items,
            soft_pairs: model.soft_pairs,
            dropped: model.dropped,
        });
    }

    results
}

fn extract_placements(
    model: &PlacementModel,
    assignments: &[crate::solver::Assignment],
    confidence: f64,
) -> Vec<Placement> {
    assignments
        .iter()
        .filter(|a| a.placed)
        .map(|a| Placement {
            item_id: model.items[a.item_index].id.clone(),
            x_cm: model.grid.grid_to_cm(a.x),
            y_cm: model.grid.grid_to_cm(a.y),
            rotation: a.rotation,
            confidence,
        })
        .collect()
}

fn hash_placements(placements: &[Placement]) -> u64 {
    let mut sorted: Vec<&Placement> = placements.iter().collect();
    sorted.sort_by(|a, b| a.item_id.cmp(&b.item_id));
    let mut bytes = Vec::new();
    for p in sorted {
        bytes.extend(p.item_id.as_bytes());
        bytes.extend(p.x_cm.to_le_bytes());
        bytes.extend(p.y_cm.to_le_bytes());
        bytes.push(
            match p.rotation {
                Rotation::Deg0 => 0u8,
                Rotation::Deg90 => 1,
                Rotation::Deg180 => 2,
                Rotation::Deg270 => 3,
            },
        );
    }
    xxh3_64(&bytes)
}
