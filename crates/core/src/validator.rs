//! Independent geometric verification of a finalized layout (spec.md §4.8).
//! Operates entirely in real-valued meters, deliberately never sharing code
//! with the solver's integer grid reasoning (spec.md §9: the two clearance
//! notions, Manhattan in the solver and Euclidean here, must not mix).

use crate::catalog::CatalogItem;
use crate::geometry::{self, Rect, union_area};
use crate::placement::Placement;
use crate::room::Room;

const HEATMAP_CELL_M: f64 = 0.2;
const NEAR_FURNITURE_M: f64 = 0.3;
const FAR_FURNITURE_M: f64 = 1.5;
const DOOR_BLOCK_RADIUS_M: f64 = 0.8;
const WINDOW_BLOCK_RADIUS_M: f64 = 0.6;
const HIGH_SEVERITY_AREA_M2: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionDetail {
    pub item_a: String,
    pub item_b: String,
    pub overlap_area: f64,
    pub severity: Severity,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collisions {
    pub total_collisions: usize,
    pub details: Vec<CollisionDetail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClearanceIssue {
    pub item_a: String,
    pub item_b: String,
    pub required_m: f64,
    pub actual_m: f64,
    pub deficit_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorAccess {
    pub door_id: String,
    pub blocked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowAccess {
    pub window_id: String,
    pub blocked: bool,
}

/// A flattened `width * height` grid of per-cell clearance scores, mirroring
/// the teacher's flattened `tiles: Vec<TileKind>` + `width`/`height`
/// convention rather than a nested `Vec<Vec<f64>>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Heatmap {
    pub width: usize,
    pub height: usize,
    pub cell_size_m: f64,
    pub cells: Vec<f64>,
}

impl Heatmap {
    pub fn at(&self, col: usize, row: usize) -> f64 {
        self.cells[row * self.width + col]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    pub collisions: Collisions,
    pub clearance_issues: Vec<ClearanceIssue>,
    pub door_accessibility: Vec<DoorAccess>,
    pub window_accessibility: Vec<WindowAccess>,
    pub flow_efficiency: f64,
    pub accessibility_score: f64,
    pub heatmap: Heatmap,
    pub overall_score: f64,
    pub recommendations: Vec<String>,
}

pub fn validate(room: &Room, items: &[CatalogItem], placements: &[Placement]) -> ValidationReport {
    let footprints: Vec<(&Placement, Rect)> = placements
        .iter()
        .filter_map(|p| items.iter().find(|i| i.id == p.item_id).map(|item| (p, p.footprint_m(item))))
        .collect();

    let collisions = find_collisions(&footprints);
    let boundary_violations = find_boundary_violations(room, &footprints);
    let clearance_issues = find_clearance_issues(&footprints, items);
    let door_accessibility = check_door_accessibility(room, &footprints);
    let window_accessibility = check_window_accessibility(room, &footprints);
    let flow_efficiency = compute_flow_efficiency(room, &footprints);

    let door_fraction = fraction_unblocked(&door_accessibility.iter().map(|d| d.blocked).collect::<Vec<_>>());
    let window_fraction =
        fraction_unblocked(&window_accessibility.iter().map(|w| w.blocked).collect::<Vec<_>>());
    let accessibility_score = 0.5 * door_fraction + 0.3 * window_fraction + 0.2 * flow_efficiency;

    let overall_score = (accessibility_score
        * (1.0 - (0.2 * collisions.total_collisions as f64).min(1.0))
        * (1.0 - (0.1 * clearance_issues.len() as f64).min(1.0)))
        .clamp(0.0, 1.0);

    let heatmap = build_heatmap(room, &footprints);
    let recommendations = build_recommendations(
        &collisions,
        &boundary_violations,
        &clearance_issues,
        &door_accessibility,
        &window_accessibility,
        flow_efficiency,
    );

    ValidationReport {
        collisions,
        clearance_issues,
        door_accessibility,
        window_accessibility,
        flow_efficiency,
        accessibility_score,
        heatmap,
        overall_score,
        recommendations,
    }
}

fn fraction_unblocked(blocked_flags: &[bool]) -> f64 {
    if blocked_flags.is_empty() {
        return 1.0;
    }
    let unblocked = blocked_flags.iter().filter(|b| !**b).count();
    unblocked as f64 / blocked_flags.len() as f64
}

fn find_collisions(footprints: &[(&Placement, Rect)]) -> Collisions {
    let mut details = Vec::new();
    for i in 0..footprints.len() {
        for j in (i + 1)..footprints.len() {
            let (pa, ra) = footprints[i];
            let (pb, rb) = footprints[j];
            let overlap_area = ra.intersection_area(rb);
            if overlap_area > crate::geometry::EPS {
                let severity = if overlap_area > HIGH_SEVERITY_AREA_M2 { Severity::High } else { Severity::Medium };
                details.push(CollisionDetail {
                    item_a: pa.item_id.clone(),
                    item_b: pb.item_id.clone(),
                    overlap_area,
                    severity,
                });
            }
        }
    }
    Collisions { total_collisions: details.len(), details }
}

fn find_boundary_violations(room: &Room, footprints: &[(&Placement, Rect)]) -> Vec<String> {
    let boundary = room.boundary_polygon();
    footprints
        .iter()
        .filter(|(_, rect)| !geometry::contains(&boundary, *rect))
        .map(|(p, _)| p.item_id.clone())
        .collect()
}

fn find_clearance_issues(footprints: &[(&Placement, Rect)], items: &[CatalogItem]) -> Vec<ClearanceIssue> {
    let mut issues = Vec::new();
    for i in 0..footprints.len() {
        for j in (i + 1)..footprints.len() {
            let (pa, ra) = footprints[i];
            let (pb, rb) = footprints[j];
            let Some(item_a) = items.iter().find(|it| it.id == pa.item_id) else { continue };
            let Some(item_b) = items.iter().find(|it| it.id == pb.item_id) else { continue };
            let required = item_a.clearances.validator_all_m().max(item_b.clearances.validator_all_m());
            let actual = ra.distance(rb);
            if actual < required {
                issues.push(ClearanceIssue {
                    item_a: pa.item_id.clone(),
                    item_b: pb.item_id.clone(),
                    required_m: required,
                    actual_m: actual,
                    deficit_m: required - actual,
                });
            }
        }
    }
    issues
}

fn check_door_accessibility(room: &Room, footprints: &[(&Placement, Rect)]) -> Vec<DoorAccess> {
    room.doors
        .iter()
        .map(|door| {
            let (dx, dy) = door.position;
            let blocked = footprints.iter().any(|(_, rect)| {
                let (cx, cy) = rect.center();
                ((cx - dx).powi(2) + (cy - dy).powi(2)).sqrt() < DOOR_BLOCK_RADIUS_M
            });
            DoorAccess { door_id: door.id.clone(), blocked }
        })
        .collect()
}

fn check_window_accessibility(room: &Room, footprints: &[(&Placement, Rect)]) -> Vec<WindowAccess> {
    room.windows
        .iter()
        .map(|window| {
            let (wx, wy) = window.position;
            let blocked = footprints.iter().any(|(_, rect)| {
                let (cx, cy) = rect.center();
                ((cx - wx).powi(2) + (cy - wy).powi(2)).sqrt() < WINDOW_BLOCK_RADIUS_M
            });
            WindowAccess { window_id: window.id.clone(), blocked }
        })
        .collect()
}

/// `min(1, walkable_area / (0.4 * room_area))`, where walkable area is the
/// room area not covered by furniture footprints.
fn compute_flow_efficiency(room: &Room, footprints: &[(&Placement, Rect)]) -> f64 {
    if room.area_sqm <= f64::EPSILON {
        return 0.0;
    }
    let rects: Vec<Rect> = footprints.iter().map(|(_, r)| *r).collect();
    let covered = union_area(&rects);
    let walkable_area = (room.area_sqm - covered).max(0.0);
    (walkable_area / (0.4 * room.area_sqm)).min(1.0)
}

fn build_heatmap(room: &Room, footprints: &[(&Placement, Rect)]) -> Heatmap {
    let boundary = room.boundary_polygon();
    // Sample points span the room inclusive of both boundaries, so a 5m
    // room at 0.2m resolution yields 26 columns (25 cells + 1), not 25.
    let width = (room.bounds.width() / HEATMAP_CELL_M).round() as usize + 1;
    let height = (room.bounds.height() / HEATMAP_CELL_M).round() as usize + 1;

    let mut cells = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let cx = room.bounds.min_x + col as f64 * HEATMAP_CELL_M;
            let cy = room.bounds.min_y + row as f64 * HEATMAP_CELL_M;
            cells.push(if !boundary.contains_point(cx, cy) {
                -1.0
            } else {
                let nearest = footprints
                    .iter()
                    .map(|(_, rect)| rect.distance_to_point(cx, cy))
                    .fold(f64::INFINITY, f64::min);
                clearance_value(nearest)
            });
        }
    }

    Heatmap { width, height, cell_size_m: HEATMAP_CELL_M, cells }
}

fn clearance_value(nearest_m: f64) -> f64 {
    if !nearest_m.is_finite() || nearest_m > FAR_FURNITURE_M {
        1.0
    } else if nearest_m < NEAR_FURNITURE_M {
        0.0
    } else {
        (nearest_m - NEAR_FURNITURE_M) / (FAR_FURNITURE_M - NEAR_FURNITURE_M)
    }
}

fn build_recommendations(
    collisions: &Collisions,
    boundary_violations: &[String],
    clearance_issues: &[ClearanceIssue],
    doors: &[DoorAccess],
    windows: &[WindowAccess],
    flow_efficiency: f64,
) -> Vec<String> {
    let mut recs = Vec::new();
    if collisions.total_collisions > 0 {
        recs.push("Move overlapping furniture to eliminate collisions.".to_string());
    }
    if !boundary_violations.is_empty() {
        recs.push("Move out-of-bounds furniture back inside the room.".to_string());
    }
    if !clearance_issues.is_empty() {
        recs.push("Increase spacing between items to meet clearance requirements.".to_string());
    }
    if doors.iter().any(|d| d.blocked) {
        recs.push("Clear pathways to doors.".to_string());
    }
    if windows.iter().any(|w| w.blocked) {
        recs.push("Clear pathways to windows.".to_string());
    }
    if flow_efficiency < 0.3 {
        recs.push("Reduce furniture density to improve walkability.".to_string());
    }
    recs
}
