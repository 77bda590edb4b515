//! Property tests for the solver/validator invariants of spec.md §8
//! (1-4, 6, 7), run over randomly generated rooms and catalogs.

use proptest::prelude::*;

use layout_core::catalog::{Category, CatalogItem, Clearances};
use layout_core::model::ModelConstraints;
use layout_core::room::{AABB, Room};
use layout_core::solver::{SolveBudget, SolveOutcome, solve};
use layout_core::strategy::Strategy as LayoutStrategy;
use layout_core::validator::validate;
use layout_core::{Placement, PlacementModel};

fn arb_room() -> impl Strategy<Value = Room> {
    (3.0..8.0_f64, 3.0..8.0_f64).prop_map(|(width, height)| Room {
        bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: width, max_y: height },
        walls: vec![],
        doors: vec![],
        windows: vec![],
        area_sqm: width * height,
    })
}

fn arb_catalog() -> impl Strategy<Value = Vec<CatalogItem>> {
    prop::collection::vec((40_u32..180, 40_u32..180), 1..4).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(id, (w, d))| CatalogItem {
                id: format!("item-{id}"),
                name: format!("item-{id}"),
                category: Category::Seating,
                width_cm: w,
                depth_cm: d,
                height_cm: 80,
                clearances: Clearances { all_cm: Some(30), ..Clearances::default() },
                placement_rules: vec![],
                priority: 0,
                price_cents: 1000,
                style_tags: vec![],
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Invariants 1-3: every placement stays in bounds, no pair overlaps,
    /// and every pair keeps at least its declared clearance.
    #[test]
    fn solved_layouts_respect_bounds_overlap_and_clearance(room in arb_room(), items in arb_catalog()) {
        let model = PlacementModel::build(&room, items.clone(), LayoutStrategy::Conversation, &ModelConstraints::default());
        let outcome = solve(&model, SolveBudget { workers: 1, ..SolveBudget::default() });

        let assignments = match outcome {
            SolveOutcome::Optimal(a) | SolveOutcome::Feasible(a) => a,
            _ => return Ok(()),
        };

        let placed: Vec<_> = assignments.iter().filter(|a| a.placed).collect();

        let room_rect = layout_core::Rect { x: room.bounds.min_x, y: room.bounds.min_y, w: room.bounds.width(), h: room.bounds.height() };
        for assignment in &placed {
            let rect = model.footprint_rect(assignment.item_index, assignment.x, assignment.y, assignment.rotation);
            let rect_m = layout_core::Rect {
                x: room.bounds.min_x + model.grid.grid_to_cm(rect.x) as f64 / 100.0,
                y: room.bounds.min_y + model.grid.grid_to_cm(rect.y) as f64 / 100.0,
                w: model.grid.grid_to_cm(rect.w) as f64 / 100.0,
                h: model.grid.grid_to_cm(rect.d) as f64 / 100.0,
            };
            prop_assert!(room_rect.contains_rect(rect_m));
        }

        // The solver's non-overlap and clearance constraints are both
        // defined on the integer grid in Manhattan terms (model.rs /
        // solver.rs), not on real-valued Euclidean rectangles -- so that's
        // what we check here, mirroring the S2 scenario test.
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                let a = placed[i];
                let b = placed[j];
                let rect_a = model.footprint_rect(a.item_index, a.x, a.y, a.rotation);
                let rect_b = model.footprint_rect(b.item_index, b.x, b.y, b.rotation);
                prop_assert!(!rect_a.intersects(rect_b));

                let clearance_g = model.pairwise_clearance_g(a.item_index, b.item_index);
                prop_assert!(rect_a.corner_manhattan_distance(rect_b) >= clearance_g);
            }
        }
    }

    /// Invariant 6/7: validator score stays in [0,1] and every heatmap cell
    /// is either -1 or in [0,1], regardless of room/catalog shape.
    #[test]
    fn validator_output_stays_in_range(room in arb_room(), items in arb_catalog()) {
        let model = PlacementModel::build(&room, items.clone(), LayoutStrategy::Conversation, &ModelConstraints::default());
        let outcome = solve(&model, SolveBudget { workers: 1, ..SolveBudget::default() });
        let assignments = match outcome {
            SolveOutcome::Optimal(a) | SolveOutcome::Feasible(a) => a,
            _ => vec![],
        };
        let placements: Vec<Placement> = assignments
            .iter()
            .filter(|a| a.placed)
            .map(|a| Placement {
                item_id: model.items[a.item_index].id.clone(),
                x_cm: model.grid.grid_to_cm(a.x),
                y_cm: model.grid.grid_to_cm(a.y),
                rotation: a.rotation,
                confidence: 0.9,
            })
            .collect();

        let report = validate(&room, &items, &placements);
        prop_assert!((0.0..=1.0).contains(&report.overall_score));
        for &v in &report.heatmap.cells {
            prop_assert!(v == -1.0 || (0.0..=1.0).contains(&v));
        }
    }
}
