//! Maps real-valued room bounds and catalog dimensions onto the integer
//! solver grid.

use crate::catalog::CatalogItem;
use crate::geometry::Rotation;
use crate::room::Room;

/// Solver grid resolution: 2cm per grid unit.
pub const RESOLUTION_CM: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub resolution_cm: u32,
    pub width: u32,
    pub height: u32,
}

impl GridSpec {
    pub fn for_room(room: &Room) -> Self {
        let width_cm = (room.bounds.max_x - room.bounds.min_x) * 100.0;
        let height_cm = (room.bounds.max_y - room.bounds.min_y) * 100.0;
        GridSpec {
            resolution_cm: RESOLUTION_CM,
            width: (width_cm / RESOLUTION_CM as f64).floor() as u32,
            height: (height_cm / RESOLUTION_CM as f64).floor() as u32,
        }
    }

    pub fn cm_to_grid(&self, cm: i64) -> i64 {
        cm / self.resolution_cm as i64
    }

    pub fn grid_to_cm(&self, grid: i64) -> i64 {
        grid * self.resolution_cm as i64
    }

    /// Footprint of `item` at `rotation`, in grid units.
    pub fn footprint(&self, item: &CatalogItem, rotation: Rotation) -> (u32, u32) {
        let (w_cm, d_cm) = rotation.footprint_for(item.width_cm, item.depth_cm);
        (w_cm / self.resolution_cm, d_cm / self.resolution_cm)
    }

    /// Whether `item` fits the grid in at least one of the four rotations.
    pub fn fits_any_rotation(&self, item: &CatalogItem) -> bool {
        Rotation::ALL.iter().any(|&r| {
            let (w_g, d_g) = self.footprint(item, r);
            w_g <= self.width && d_g <= self.height
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NoFittingRotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    pub item_id: String,
    pub reason: DropReason,
}

/// Partitions `items` into those that fit the grid in some rotation and the
/// ones dropped (with a reason), so a caller can see why an item vanished
/// instead of silently losing it.
pub fn partition_by_fit<'a>(
    grid: &GridSpec,
    items: &'a [CatalogItem],
) -> (Vec<&'a CatalogItem>, Vec<DroppedItem>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for item in items {
        if grid.fits_any_rotation(item) {
            kept.push(item);
        } else {
            dropped.push(DroppedItem {
                item_id: item.id.clone(),
                reason: DropReason::NoFittingRotation,
            });
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Clearances};
    use crate::room::{AABB, Room};

    fn room(width_m: f64, height_m: f64) -> Room {
        Room {
            bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: width_m, max_y: height_m },
            walls: vec![],
            doors: vec![],
            windows: vec![],
            area_sqm: width_m * height_m,
        }
    }

    fn item(id: &str, width_cm: u32, depth_cm: u32) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Seating,
            width_cm,
            depth_cm,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority: 0,
            price_cents: 0,
            style_tags: vec![],
        }
    }

    #[test]
    fn grid_spec_dimensions_match_spec_formula() {
        let r = room(5.0, 4.0);
        let grid = GridSpec::for_room(&r);
        assert_eq!(grid.width, 250);
        assert_eq!(grid.height, 200);
    }

    #[test]
    fn footprint_swaps_on_quarter_turn() {
        let grid = GridSpec::for_room(&room(5.0, 4.0));
        let sofa = item("sofa", 228, 95);
        assert_eq!(grid.footprint(&sofa, Rotation::Deg0), (114, 47));
        assert_eq!(grid.footprint(&sofa, Rotation::Deg90), (47, 114));
    }

    #[test]
    fn oversized_item_is_dropped() {
        let grid = GridSpec::for_room(&room(1.0, 1.0));
        let huge = item("huge", 500, 500);
        let (kept, dropped) = partition_by_fit(&grid, std::slice::from_ref(&huge));
        assert!(kept.is_empty());
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].reason, DropReason::NoFittingRotation);
    }

    #[test]
    fn item_that_only_fits_rotated_is_kept() {
        let grid = GridSpec::for_room(&room(1.0, 3.0));
        let long_item = item("bench", 280, 40);
        assert!(grid.fits_any_rotation(&long_item));
    }
}
