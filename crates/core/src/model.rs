//! Builds the finite-domain placement model the solver searches: per-item
//! domains plus the boundary, non-overlap, clearance, door, window and
//! functional soft-pair constraints of spec.md §4.4.

use crate::catalog::CatalogItem;
use crate::functional_pairs::{self, FunctionalPairRule, FunctionalRole};
use crate::geometry::{GridRect, Rotation};
use crate::grid::{DroppedItem, GridSpec, partition_by_fit};
use crate::room::Room;
use crate::strategy::Strategy;

/// A door or window clearance point on the solver grid, with its required
/// clearance radius (Manhattan) in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearancePoint {
    pub x: i64,
    pub y: i64,
    pub radius_g: i64,
}

/// A soft functional-pair target between two candidate items, referenced by
/// index into `PlacementModel::items`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftPairTarget {
    pub item_a: usize,
    pub item_b: usize,
    pub rule: FunctionalPairRule,
}

pub struct PlacementModel {
    pub grid: GridSpec,
    pub items: Vec<CatalogItem>,
    pub dropped: Vec<DroppedItem>,
    pub doors: Vec<ClearancePoint>,
    pub windows: Vec<ClearancePoint>,
    pub soft_pairs: Vec<SoftPairTarget>,
    pub strategy: Strategy,
}

pub struct ModelConstraints {
    pub min_door_clearance_cm: u32,
    pub min_window_access_cm: u32,
}

impl Default for ModelConstraints {
    fn default() -> Self {
        Self { min_door_clearance_cm: 80, min_window_access_cm: 60 }
    }
}

impl PlacementModel {
    pub fn build(
        room: &Room,
        items: Vec<CatalogItem>,
        strategy: Strategy,
        constraints: &ModelConstraints,
    ) -> Self {
        let grid = GridSpec::for_room(room);
        let (kept, dropped) = partition_by_fit(&grid, &items);
        let kept: Vec<CatalogItem> = kept.into_iter().cloned().collect();

        let door_radius_g = (constraints.min_door_clearance_cm / grid.resolution_cm) as i64;
        let doors = room
            .doors
            .iter()
            .map(|door| {
                let (px, py) = door.position;
                ClearancePoint {
                    x: grid.cm_to_grid((px * 100.0) as i64),
                    y: grid.cm_to_grid((py * 100.0) as i64),
                    radius_g: door_radius_g,
                }
            })
            .collect();

        let window_radius_g = (constraints.min_window_access_cm / grid.resolution_cm) as i64;
        let windows = room
            .windows
            .iter()
            .map(|window| {
                let (px, py) = window.position;
                ClearancePoint {
                    x: grid.cm_to_grid((px * 100.0) as i64),
                    y: grid.cm_to_grid((py * 100.0) as i64),
                    radius_g: window_radius_g,
                }
            })
            .collect();

        let soft_pairs = find_soft_pairs(&kept);

        PlacementModel { grid, items: kept, dropped, doors, windows, soft_pairs, strategy }
    }

    /// Grid footprint rectangle for item `index` at `rotation`, anchored at
    /// `(x, y)`.
    pub fn footprint_rect(&self, index: usize, x: i64, y: i64, rotation: Rotation) -> GridRect {
        let (w_g, d_g) = self.grid.footprint(&self.items[index], rotation);
        GridRect { x, y, w: w_g as i64, d: d_g as i64 }
    }

    /// Whether a window-clearance constraint applies to item `index`
    /// (spec.md §4.4: only items taller than 100cm).
    pub fn window_clearance_applies(&self, index: usize) -> bool {
        self.items[index].height_cm > 100
    }

    /// The Manhattan clearance (in grid units) required between items
    /// `i` and `j`.
    pub fn pairwise_clearance_g(&self, i: usize, j: usize) -> i64 {
        let a = self.items[i].clearances.solver_all_cm() as i64;
        let b = self.items[j].clearances.solver_all_cm() as i64;
        a.max(b) / self.grid.resolution_cm as i64
    }
}

fn find_soft_pairs(items: &[CatalogItem]) -> Vec<SoftPairTarget> {
    let roles: Vec<Option<FunctionalRole>> =
        items.iter().map(|item| functional_pairs::role_for_name(&item.name)).collect();

    let mut pairs = Vec::new();
    for i in 0..items.len() {
        let Some(role_i) = roles[i] else { continue };
        for j in (i + 1)..items.len() {
            let Some(role_j) = roles[j] else { continue };
            for rule in functional_pairs::rules_for(role_i, role_j) {
                let (item_a, item_b) = if rule.a == role_i { (i, j) } else { (j, i) };
                pairs.push(SoftPairTarget { item_a, item_b, rule: *rule });
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Clearances};
    use crate::room::AABB;

    fn room() -> Room {
        Room {
            bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 4.0 },
            walls: vec![],
            doors: vec![],
            windows: vec![],
            area_sqm: 20.0,
        }
    }

    fn item(id: &str, name: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            category: Category::Seating,
            width_cm: 120,
            depth_cm: 60,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority: 0,
            price_cents: 0,
            style_tags: vec![],
        }
    }

    #[test]
    fn finds_sofa_coffee_soft_pair() {
        let items = vec![item("1", "Sofa 3 Seat"), item("2", "Coffee Table")];
        let model = PlacementModel::build(&room(), items, Strategy::Conversation, &ModelConstraints::default());
        assert_eq!(model.soft_pairs.len(), 1);
        assert_eq!(model.soft_pairs[0].item_a, 0);
        assert_eq!(model.soft_pairs[0].item_b, 1);
    }

    #[test]
    fn window_clearance_applies_only_to_tall_items() {
        let mut tall = item("1", "Bookshelf");
        tall.height_cm = 180;
        let short = item("2", "Side Table");
        let model = PlacementModel::build(
            &room(),
            vec![tall, short],
            Strategy::Conversation,
            &ModelConstraints::default(),
        );
        assert!(model.window_clearance_applies(0));
        assert!(!model.window_clearance_applies(1));
    }
}
