//! The finite-domain placement search (spec.md §4.4-4.5): assigns each
//! candidate item a grid position, a quarter-turn rotation, and whether it
//! is placed at all, subject to boundary, non-overlap, clearance, door and
//! window constraints, maximizing the strategy's weighted objective.
//!
//! No CP-SAT/OR-Tools binding exists in the reachable dependency set, so
//! this is a deterministic seeded randomized-restart greedy search: several
//! independent restarts (one per worker, run concurrently with `rayon`)
//! place items most-constrained-first, scoring each candidate position
//! before committing to it. The restart with the best objective wins ties
//! broken by worker index, matching the teacher's seed-stream-per-branch
//! determinism in `mapgen::seed::mix_seed_stream`.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::geometry::{GridRect, Rotation};
use crate::model::PlacementModel;

#[derive(Clone, Copy, Debug)]
pub struct SolveBudget {
    pub time_budget: Duration,
    pub workers: usize,
    pub random_seed: u64,
}

impl Default for SolveBudget {
    fn default() -> Self {
        // Falls back to a fixed constant when the caller supplies no seed,
        // so "no seed given" still reproduces within a process.
        Self { time_budget: Duration::from_secs(30), workers: 4, random_seed: 0x5EED_0000_0001 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    pub item_index: usize,
    pub placed: bool,
    pub x: i64,
    pub y: i64,
    pub rotation: Rotation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    Optimal(Vec<Assignment>),
    Feasible(Vec<Assignment>),
    Infeasible,
    Timeout(Vec<Assignment>),
}

/// Same splitmix64-style bit mixer the teacher uses for floor seeding
/// (`mapgen::seed::mix_seed_stream`), re-derived here since that helper is
/// private to the map generator.
fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

struct Rng {
    seed: u64,
    stream: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    fn next_u64(&mut self) -> u64 {
        self.stream += 1;
        mix_seed_stream(self.seed, self.stream)
    }

    fn next_in_range(&mut self, max_exclusive: i64) -> i64 {
        if max_exclusive <= 0 { 0 } else { (self.next_u64() % max_exclusive as u64) as i64 }
    }
}

const CANDIDATES_PER_ROTATION: usize = 6;

struct RestartResult {
    assignments: Vec<Assignment>,
    objective: f64,
    timed_out: bool,
}

pub fn solve(model: &PlacementModel, budget: SolveBudget) -> SolveOutcome {
    if model.items.is_empty() {
        return SolveOutcome::Infeasible;
    }

    let workers = budget.workers.max(1);
    let deadline = Instant::now() + budget.time_budget;

    let results: Vec<RestartResult> = (0..workers)
        .into_par_iter()
        .map(|worker| run_restart(model, mix_seed_stream(budget.random_seed, worker as u64), deadline))
        .collect();

    let any_completed = results.iter().any(|r| !r.timed_out);
    let pool: Vec<&RestartResult> = if any_completed {
        results.iter().filter(|r| !r.timed_out).collect()
    } else {
        results.iter().collect()
    };

    let best = pool
        .into_iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            a.objective.partial_cmp(&b.objective).unwrap().then(ib.cmp(ia))
        })
        .map(|(_, r)| r)
        .expect("at least one worker always runs");

    if best.timed_out {
        return SolveOutcome::Timeout(best.assignments.clone());
    }

    let all_placed = best.assignments.iter().all(|a| a.placed);
    let none_placed = best.assignments.iter().all(|a| !a.placed);

    if none_placed {
        return SolveOutcome::Infeasible;
    }
    if all_placed {
        SolveOutcome::Optimal(best.assignments.clone())
    } else {
        SolveOutcome::Feasible(best.assignments.clone())
    }
}

fn run_restart(model: &PlacementModel, seed: u64, deadline: Instant) -> RestartResult {
    let mut rng = Rng::new(seed);
    let mut assignments: Vec<Assignment> = (0..model.items.len())
        .map(|item_index| Assignment { item_index, placed: false, x: 0, y: 0, rotation: Rotation::Deg0 })
        .collect();

    let (wc, wb, wf) = model.strategy.weights();
    let center_x = model.grid.width as i64 / 2;
    let center_y = model.grid.height as i64 / 2;

    let mut order: Vec<usize> = (0..model.items.len()).collect();
    order.sort_by_key(|&i| {
        let item = &model.items[i];
        std::cmp::Reverse((item.width_cm as u64) * (item.depth_cm as u64))
    });

    let mut timed_out = false;
    let mut objective = 0.0;

    for item_index in order {
        if Instant::now() >= deadline {
            timed_out = true;
            break;
        }

        let placed_so_far: Vec<GridRect> = assignments
            .iter()
            .filter(|a| a.placed)
            .map(|a| model.footprint_rect(a.item_index, a.x, a.y, a.rotation))
            .collect();

        let mut best_candidate: Option<(i64, i64, Rotation, f64)> = None;

        for rotation in Rotation::ALL {
            let (w_g, d_g) = model.grid.footprint(&model.items[item_index], rotation);
            let (w_g, d_g) = (w_g as i64, d_g as i64);
            let max_x = model.grid.width as i64 - w_g;
            let max_y = model.grid.height as i64 - d_g;
            if max_x < 0 || max_y < 0 {
                continue;
            }

            for _ in 0..CANDIDATES_PER_ROTATION {
                let x = rng.next_in_range(max_x + 1);
                let y = rng.next_in_range(max_y + 1);
                let rect = GridRect { x, y, w: w_g, d: d_g };

                if !hard_constraints_satisfied(model, item_index, rect, &placed_so_far) {
                    continue;
                }

                let score = candidate_score(model, item_index, rect, wc, wb, wf, center_x, center_y, &assignments);
                if best_candidate.map_or(true, |(_, _, _, best_score)| score > best_score) {
                    best_candidate = Some((x, y, rotation, score));
                }
            }
        }

        if let Some((x, y, rotation, score)) = best_candidate {
            assignments[item_index] = Assignment { item_index, placed: true, x, y, rotation };
            objective += score;
        }
    }

    RestartResult { assignments, objective, timed_out }
}

fn hard_constraints_satisfied(
    model: &PlacementModel,
    item_index: usize,
    rect: GridRect,
    placed_so_far: &[GridRect],
) -> bool {
    for (other_index, other_rect) in placed_so_far.iter().enumerate() {
        if rect.intersects(*other_rect) {
            return false;
        }
        let clearance_g = model.pairwise_clearance_g(item_index, other_index);
        if rect.corner_manhattan_distance(*other_rect) < clearance_g {
            return false;
        }
    }

    for door in &model.doors {
        let dist = (rect.x - door.x).abs() + (rect.y - door.y).abs();
        if dist < door.radius_g {
            return false;
        }
    }

    if model.window_clearance_applies(item_index) {
        for window in &model.windows {
            let dist = (rect.x - window.x).abs() + (rect.y - window.y).abs();
            if dist < window.radius_g {
                return false;
            }
        }
    }

    true
}

#[allow(clippy::too_many_arguments)]
fn candidate_score(
    model: &PlacementModel,
    item_index: usize,
    rect: GridRect,
    wc: f64,
    wb: f64,
    wf: f64,
    center_x: i64,
    center_y: i64,
    assignments: &[Assignment],
) -> f64 {
    let item = &model.items[item_index];
    let center_dist = ((rect.x + rect.w / 2) - center_x).abs() + ((rect.y + rect.d / 2) - center_y).abs();

    let mut score = wc - wb * item.price_cents as f64 + wf * center_dist as f64;

    for pair in &model.soft_pairs {
        let other_index = if pair.item_a == item_index {
            pair.item_b
        } else if pair.item_b == item_index {
            pair.item_a
        } else {
            continue;
        };
        if let Some(other) = assignments.get(other_index).filter(|a| a.placed) {
            let other_rect = model.footprint_rect(other.item_index, other.x, other.y, other.rotation);
            if soft_pair_satisfied(&pair.rule.target, rect, other_rect) {
                score += 1.0;
            }
        }
    }

    score
}

fn soft_pair_satisfied(
    target: &crate::functional_pairs::PairTargetKind,
    rect: GridRect,
    other: GridRect,
) -> bool {
    use crate::functional_pairs::PairTargetKind;
    let manhattan = rect.corner_manhattan_distance(other);
    match target {
        PairTargetKind::ManhattanRange { min_cm, max_cm } => {
            let resolution = 2;
            let dist_cm = manhattan * resolution;
            dist_cm >= *min_cm && dist_cm <= *max_cm
        }
        PairTargetKind::ForwardOffsetBand { offset_cm, band_cm } => {
            let resolution = 2;
            let dist_cm = manhattan * resolution;
            (dist_cm - offset_cm).abs() <= *band_cm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, CatalogItem, Clearances};
    use crate::model::ModelConstraints;
    use crate::room::{AABB, Room};
    use crate::strategy::Strategy;

    fn room() -> Room {
        Room {
            bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 4.0 },
            walls: vec![],
            doors: vec![],
            windows: vec![],
            area_sqm: 20.0,
        }
    }

    fn item(id: &str, w: u32, d: u32) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Seating,
            width_cm: w,
            depth_cm: d,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority: 0,
            price_cents: 1000,
            style_tags: vec![],
        }
    }

    #[test]
    fn single_item_in_empty_room_gets_placed() {
        let model = PlacementModel::build(
            &room(),
            vec![item("chair", 60, 60)],
            Strategy::Conversation,
            &ModelConstraints::default(),
        );
        let outcome = solve(&model, SolveBudget { workers: 2, ..SolveBudget::default() });
        match outcome {
            SolveOutcome::Optimal(assignments) => assert!(assignments[0].placed),
            other => panic!("expected Optimal, got {other:?}"),
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let model = PlacementModel::build(
            &room(),
            vec![item("sofa", 200, 90), item("chair", 60, 60)],
            Strategy::Conversation,
            &ModelConstraints::default(),
        );
        let budget = SolveBudget { workers: 1, ..SolveBudget::default() };
        let a = solve(&model, budget);
        let b = solve(&model, budget);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_catalog_is_infeasible() {
        let model =
            PlacementModel::build(&room(), vec![], Strategy::Conversation, &ModelConstraints::default());
        assert_eq!(solve(&model, SolveBudget::default()), SolveOutcome::Infeasible);
    }

    #[test]
    fn overlapping_required_items_yield_feasible_not_all_placed() {
        // A room too small to fit two large items without overlap: one
        // should be dropped (placed = false) rather than the search failing.
        let tiny_room = Room {
            bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: 1.2, max_y: 1.0 },
            walls: vec![],
            doors: vec![],
            windows: vec![],
            area_sqm: 1.2,
        };
        let model = PlacementModel::build(
            &tiny_room,
            vec![item("a", 100, 90), item("b", 100, 90)],
            Strategy::Conversation,
            &ModelConstraints::default(),
        );
        let outcome = solve(&model, SolveBudget { workers: 2, ..SolveBudget::default() });
        match outcome {
            SolveOutcome::Feasible(assignments) => {
                assert!(assignments.iter().filter(|a| a.placed).count() <= 1);
            }
            SolveOutcome::Optimal(_) => panic!("two overlapping-sized items should not both fit"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
