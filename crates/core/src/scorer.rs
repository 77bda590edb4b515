//! Post-process scoring (spec.md §4.7): rescores a solver-produced
//! placement set into the four `[0,1]` sub-scores and a weighted final
//! score, plus a rationale string drawn from a fixed strategy/bucket table
//! -- the same const-table-plus-lookup idiom as `functional_pairs.rs`.

use crate::catalog::CatalogItem;
use crate::functional_pairs::PairTargetKind;
use crate::geometry::{Rect, buffer_line, union_area};
use crate::model::SoftPairTarget;
use crate::placement::Placement;
use crate::room::{AABB, Room};
use crate::strategy::Strategy;

const WALKWAY_BAND_WIDTH_M: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredLayout {
    pub placement: f64,
    pub flow: f64,
    pub function: f64,
    pub aesthetic: f64,
    pub final_score: f64,
}

/// Strategy-keyed opening line, suffixed by a score bucket.
const RATIONALE_OPENING: &[(Strategy, &str)] = &[
    (Strategy::Conversation, "A conversation-focused layout that clusters seating around a shared center."),
    (Strategy::Work, "A work-focused layout prioritizing desk access and budget discipline."),
    (Strategy::Entertainment, "An entertainment-focused layout built around sightlines to the screen."),
];

fn rationale_opening(strategy: Strategy) -> &'static str {
    RATIONALE_OPENING
        .iter()
        .find(|(s, _)| *s == strategy)
        .map(|(_, text)| *text)
        .unwrap_or("A balanced furniture layout.")
}

fn rationale_bucket_suffix(score: f64) -> &'static str {
    if score >= 0.85 {
        "Excellent spatial efficiency and flow."
    } else if score >= 0.75 {
        "Good balance of function and aesthetics."
    } else {
        "Functional arrangement with room for optimization."
    }
}

pub fn rationale(strategy: Strategy, final_score: f64) -> String {
    format!("{} {}", rationale_opening(strategy), rationale_bucket_suffix(final_score))
}

pub fn score(
    placements: &[Placement],
    items: &[CatalogItem],
    room: &Room,
    soft_pairs: &[SoftPairTarget],
    door_points_m: &[(f64, f64)],
) -> ScoredLayout {
    let placement = placement_subscore(items, soft_pairs, placements);
    let flow = flow_subscore(placements, items, room, door_points_m);
    let function = function_subscore(items, soft_pairs, placements);
    let aesthetic = aesthetic_subscore(placements, items, room);

    let final_score = 0.30 * placement + 0.30 * flow + 0.25 * function + 0.15 * aesthetic;
    ScoredLayout { placement, flow, function, aesthetic, final_score: final_score.clamp(0.0, 1.0) }
}

fn placement_of<'a>(placements: &'a [Placement], item_id: &str) -> Option<&'a Placement> {
    placements.iter().find(|p| p.item_id == item_id)
}

/// Mean of `(1 - violations_i)` where `violations_i` counts how many soft
/// functional targets item `i` misses (spec.md §4.7).
fn placement_subscore(items: &[CatalogItem], soft_pairs: &[SoftPairTarget], placements: &[Placement]) -> f64 {
    if items.is_empty() {
        return 1.0;
    }
    let mut total = 0.0;
    for (index, _) in items.iter().enumerate() {
        let violations = soft_pairs
            .iter()
            .filter(|pair| pair.item_a == index || pair.item_b == index)
            .filter(|pair| !pair_satisfied(pair, items, placements))
            .count();
        total += (1.0 - violations as f64).max(0.0);
    }
    total / items.len() as f64
}

fn pair_satisfied(pair: &SoftPairTarget, items: &[CatalogItem], placements: &[Placement]) -> bool {
    let Some(a) = placement_of(placements, &items[pair.item_a].id) else { return false };
    let Some(b) = placement_of(placements, &items[pair.item_b].id) else { return false };
    let dist_cm = (a.x_cm - b.x_cm).abs() + (a.y_cm - b.y_cm).abs();
    match pair.rule.target {
        PairTargetKind::ManhattanRange { min_cm, max_cm } => dist_cm >= min_cm && dist_cm <= max_cm,
        PairTargetKind::ForwardOffsetBand { offset_cm, band_cm } => (dist_cm - offset_cm).abs() <= band_cm,
    }
}

/// `1 - overlap_area(footprints, walkway_band) / walkway_band_area`, where
/// the band is a 60cm strip running from each door straight across the
/// room to the facing wall.
fn flow_subscore(placements: &[Placement], items: &[CatalogItem], room: &Room, door_points_m: &[(f64, f64)]) -> f64 {
    if door_points_m.is_empty() {
        return 1.0;
    }

    let bands: Vec<Rect> = door_points_m.iter().map(|&(x, y)| walkway_band(room.bounds, x, y)).collect();
    let band_area = union_area(&bands);
    if band_area <= f64::EPSILON {
        return 1.0;
    }

    let footprints: Vec<Rect> = placements
        .iter()
        .filter_map(|p| items.iter().find(|i| i.id == p.item_id).map(|item| p.footprint_m(item)))
        .collect();

    let mut clipped = Vec::new();
    for band in &bands {
        for footprint in &footprints {
            if let Some(overlap) = band.intersection_rect(*footprint) {
                clipped.push(overlap);
            }
        }
    }
    let overlap_area = union_area(&clipped);

    (1.0 - overlap_area / band_area).clamp(0.0, 1.0)
}

/// The 60cm-wide strip from `(door_x, door_y)` straight across the room to
/// the opposite wall, via `buffer_line` as a centerline Minkowski buffer.
fn walkway_band(bounds: AABB, door_x: f64, door_y: f64) -> Rect {
    let dist_left = door_x - bounds.min_x;
    let dist_right = bounds.max_x - door_x;
    let dist_bottom = door_y - bounds.min_y;
    let dist_top = bounds.max_y - door_y;
    let nearest = dist_left.min(dist_right).min(dist_bottom).min(dist_top);

    let half = WALKWAY_BAND_WIDTH_M / 2.0;
    if nearest == dist_left || nearest == dist_right {
        buffer_line(bounds.min_x, door_y, bounds.max_x, door_y, half)
    } else {
        buffer_line(door_x, bounds.min_y, door_x, bounds.max_y, half)
    }
}

/// Fraction of functional soft pairs actually matched within tolerance.
fn function_subscore(items: &[CatalogItem], soft_pairs: &[SoftPairTarget], placements: &[Placement]) -> f64 {
    if soft_pairs.is_empty() {
        return 1.0;
    }
    let matched = soft_pairs.iter().filter(|pair| pair_satisfied(pair, items, placements)).count();
    matched as f64 / soft_pairs.len() as f64
}

/// `1 - mean_item_centroid_imbalance / half_room_diagonal`, where imbalance
/// is each item's centroid distance from the room centroid.
fn aesthetic_subscore(placements: &[Placement], items: &[CatalogItem], room: &Room) -> f64 {
    if placements.is_empty() {
        return 1.0;
    }
    let center_x = (room.bounds.min_x + room.bounds.max_x) / 2.0;
    let center_y = (room.bounds.min_y + room.bounds.max_y) / 2.0;
    let half_diagonal = (room.bounds.width().powi(2) + room.bounds.height().powi(2)).sqrt() / 2.0;
    if half_diagonal <= f64::EPSILON {
        return 1.0;
    }

    let mut total_offset = 0.0;
    let mut count = 0;
    for placement in placements {
        let Some(item) = items.iter().find(|i| i.id == placement.item_id) else { continue };
        let (cx, cy) = placement.center_m(item);
        total_offset += ((cx - center_x).powi(2) + (cy - center_y).powi(2)).sqrt();
        count += 1;
    }
    if count == 0 {
        return 1.0;
    }
    let mean_offset = total_offset / count as f64;
    (1.0 - mean_offset / half_diagonal).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Clearances};
    use crate::functional_pairs::{FunctionalPairRule, FunctionalRole};
    use crate::geometry::Rotation;

    fn room() -> Room {
        Room {
            bounds: AABB { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 4.0 },
            walls: vec![],
            doors: vec![],
            windows: vec![],
            area_sqm: 20.0,
        }
    }

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Seating,
            width_cm: 100,
            depth_cm: 100,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority: 0,
            price_cents: 1000,
            style_tags: vec![],
        }
    }

    #[test]
    fn empty_layout_scores_perfectly_on_placement_and_function() {
        let s = score(&[], &[], &room(), &[], &[]);
        assert_eq!(s.placement, 1.0);
        assert_eq!(s.function, 1.0);
    }

    #[test]
    fn matched_soft_pair_yields_full_function_score() {
        let items = vec![item("sofa"), item("coffee")];
        let soft_pairs = vec![SoftPairTarget {
            item_a: 0,
            item_b: 1,
            rule: FunctionalPairRule {
                a: FunctionalRole::Sofa,
                b: FunctionalRole::CoffeeTable,
                target: PairTargetKind::ForwardOffsetBand { offset_cm: 50, band_cm: 20 },
            },
        }];
        let placements = vec![
            Placement { item_id: "sofa".into(), x_cm: 0, y_cm: 0, rotation: Rotation::Deg0, confidence: 0.9 },
            Placement { item_id: "coffee".into(), x_cm: 50, y_cm: 0, rotation: Rotation::Deg0, confidence: 0.9 },
        ];
        let s = score(&placements, &items, &room(), &soft_pairs, &[]);
        assert_eq!(s.function, 1.0);
    }

    #[test]
    fn final_score_is_clamped_to_unit_range() {
        let s = score(&[], &[], &room(), &[], &[]);
        assert!((0.0..=1.0).contains(&s.final_score));
    }

    #[test]
    fn rationale_bucket_matches_score() {
        assert!(rationale(Strategy::Conversation, 0.9).ends_with("Excellent spatial efficiency and flow."));
        assert!(rationale(Strategy::Work, 0.5).ends_with("Functional arrangement with room for optimization."));
    }
}
