//! Job records and the two synchronous entry points (spec.md §6 / §9):
//! typed ingress/egress records plus the `ProgressSink` / `OutputSink`
//! capability traits that replace a global message-bus client with
//! explicit collaborators passed in by the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogItem, StyleTag, filter_catalog};
use crate::layout::{Layout, LayoutMetrics};
use crate::model::ModelConstraints;
use crate::room::Room;
use crate::scorer;
use crate::solver::SolveBudget;
use crate::strategy::{OutcomeKind, generate_variants};
use crate::validator::{self, ValidationReport};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_walkway_width_m: f64,
    pub min_door_clearance_m: f64,
    pub min_window_access_m: f64,
    pub tv_viewing_distance_min_m: f64,
    pub tv_viewing_distance_max_m: f64,
    pub tv_viewing_angle_max_deg: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_walkway_width_m: 0.8,
            min_door_clearance_m: 0.8,
            min_window_access_m: 0.6,
            tv_viewing_distance_min_m: 1.5,
            tv_viewing_distance_max_m: 4.0,
            tv_viewing_angle_max_deg: 30.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutJob {
    pub id: String,
    pub room_id: String,
    pub floor_plan: Room,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub style_prefs: Vec<StyleTag>,
    pub budget_cents: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationJob {
    pub id: String,
    pub layout_id: String,
    pub room_id: String,
    pub floor_plan: Room,
    pub layout: Layout,
    #[serde(default)]
    pub constraints: Constraints,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobResult<T> {
    pub id: String,
    pub status: JobStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> JobResult<T> {
    fn completed(id: String, data: T) -> Self {
        Self { id, status: JobStatus::Completed, data: Some(data), error: None }
    }

    fn failed(id: String, error: String) -> Self {
        Self { id, status: JobStatus::Failed, data: None, error: Some(error) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub job_id: String,
    pub progress: f64,
    pub message: String,
    pub timestamp_unix_s: u64,
}

fn now_unix_s() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Publishes progress for a job. Implementations are responsible for
/// enforcing that `progress` is monotonically non-decreasing within a job
/// (spec.md §6); the core only calls `report` in increasing order itself.
pub trait ProgressSink {
    fn report(&mut self, record: ProgressRecord);
}

pub trait OutputSink<T> {
    fn publish(&mut self, result: JobResult<T>);
}

fn report(sink: &mut impl ProgressSink, job_id: &str, progress: f64, message: &str) {
    sink.report(ProgressRecord {
        job_id: job_id.to_string(),
        progress,
        message: message.to_string(),
        timestamp_unix_s: now_unix_s(),
    });
}

/// Solves a layout job: validates the room, filters the catalog, runs the
/// solver once per strategy, and scores each resulting variant.
///
/// `catalog` is supplied by the caller rather than embedded in `job` --
/// spec.md §6's layout job record carries only room/constraints/budget, the
/// candidate catalog is sourced from a separate catalog service that is out
/// of this core's scope.
pub fn solve_layout_job(
    job: LayoutJob,
    catalog: Vec<CatalogItem>,
    progress: &mut impl ProgressSink,
) -> JobResult<Vec<Layout>> {
    report(progress, &job.id, 0.0, "validating room");

    let room = match job.floor_plan.clone().validated() {
        Ok(room) => room,
        Err(err) => return JobResult::failed(job.id, err.to_string()),
    };

    for item in &catalog {
        if let Err(err) = item.clone().validated() {
            return JobResult::failed(job.id, err.to_string());
        }
    }

    report(progress, &job.id, 0.2, "filtering catalog");
    let filtered = filter_catalog(catalog, &job.style_prefs, job.budget_cents, room.area_sqm);
    if filtered.is_empty() {
        report(progress, &job.id, 1.0, "done");
        info!(job_id = %job.id, "catalog empty after filtering, completing with no layouts");
        return JobResult::completed(job.id, Vec::new());
    }

    let model_constraints = ModelConstraints {
        min_door_clearance_cm: (job.constraints.min_door_clearance_m * 100.0).round() as u32,
        min_window_access_cm: (job.constraints.min_window_access_m * 100.0).round() as u32,
    };

    report(progress, &job.id, 0.4, "solving");
    debug!(job_id = %job.id, candidates = filtered.len(), "starting solve");
    let variants = generate_variants(&room, filtered, &model_constraints, SolveBudget::default());

    report(progress, &job.id, 0.8, "scoring");
    let door_points_m: Vec<(f64, f64)> = room.doors.iter().map(|d| d.position).collect();

    let mut layouts = Vec::new();
    for (index, variant) in variants.into_iter().enumerate() {
        if variant.outcome_kind == OutcomeKind::Infeasible {
            continue;
        }

        let scored = scorer::score(&variant.placements, &variant.items, &room, &variant.soft_pairs, &door_points_m);
        let rationale = scorer::rationale(variant.strategy, scored.final_score);

        let mut violations: Vec<String> = variant
            .dropped
            .iter()
            .map(|d| format!("item {} dropped: no fitting rotation on the solver grid", d.item_id))
            .collect();
        if variant.outcome_kind == OutcomeKind::Timeout {
            violations.push("solver timed out".to_string());
        }

        let total_cost_cents: i64 = variant
            .placements
            .iter()
            .filter_map(|p| variant.items.iter().find(|i| i.id == p.item_id))
            .map(|item| item.price_cents)
            .sum();
        let coverage_ratio = variant
            .placements
            .iter()
            .filter_map(|p| variant.items.iter().find(|i| i.id == p.item_id).map(|item| p.footprint_m(item).area()))
            .sum::<f64>()
            / room.area_sqm;
        let furniture_count = variant.placements.len();

        layouts.push(Layout {
            id: format!("{}-{}-{index}", job.id, variant.strategy.slug()),
            strategy: variant.strategy,
            placements: variant.placements,
            score: scored.final_score,
            rationale,
            violations,
            metrics: LayoutMetrics {
                total_cost_cents,
                furniture_count,
                coverage_ratio,
                flow_score: scored.flow,
            },
        });
    }

    report(progress, &job.id, 1.0, "done");
    info!(job_id = %job.id, layouts = layouts.len(), "solve complete");
    JobResult::completed(job.id, layouts)
}

/// Validates a finalized layout against its room. `catalog` is supplied
/// separately for the same reason as in `solve_layout_job`.
pub fn validate_layout_job(
    job: ValidationJob,
    catalog: Vec<CatalogItem>,
    progress: &mut impl ProgressSink,
) -> JobResult<ValidationReport> {
    report(progress, &job.id, 0.0, "validating room");

    let room = match job.floor_plan.clone().validated() {
        Ok(room) => room,
        Err(err) => return JobResult::failed(job.id, err.to_string()),
    };

    report(progress, &job.id, 0.5, "checking geometry");
    let report_data = validator::validate(&room, &catalog, &job.layout.placements);

    report(progress, &job.id, 1.0, "done");
    JobResult::completed(job.id, report_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Clearances};
    use crate::room::AABB;

    struct RecordingSink {
        records: Vec<ProgressRecord>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&mut self, record: ProgressRecord) {
            self.records.push(record);
        }
    }

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
            depth_cm: 60,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority: 0,
            price_cents: 1000,
            style_tags: vec![],
        }
    }

    #[test]
    fn empty_catalog_after_filter_completes_with_no_layouts() {
        let job = LayoutJob {
            id: "job-1".into(),
            room_id: "room-1".into(),
            floor_plan: room(),
            constraints: Constraints::default(),
            style_prefs: vec![],
            budget_cents: Some(0),
        };
        let mut sink = RecordingSink { records: vec![] };
        let result = solve_layout_job(job, vec![item("chair")], &mut sink);
        assert_eq!(result.status, JobStatus::Completed);
        assert!(result.data.unwrap().is_empty());
    }

    #[test]
    fn empty_input_catalog_completes_with_no_layouts() {
        let job = LayoutJob {
            id: "job-1b".into(),
            room_id: "room-1".into(),
            floor_plan: room(),
            constraints: Constraints::default(),
            style_prefs: vec![],
            budget_cents: None,
        };
        let mut sink = RecordingSink { records: vec![] };
        let result = solve_layout_job(job, vec![], &mut sink);
        assert_eq!(result.status, JobStatus::Completed);
        assert!(result.data.unwrap().is_empty());
    }

    #[test]
    fn zero_area_room_fails_the_job() {
        let mut bad_room = room();
        bad_room.area_sqm = 0.0;
        let job = LayoutJob {
            id: "job-2".into(),
            room_id: "room-1".into(),
            floor_plan: bad_room,
            constraints: Constraints::default(),
            style_prefs: vec![],
            budget_cents: None,
        };
        let mut sink = RecordingSink { records: vec![] };
        let result = solve_layout_job(job, vec![item("chair")], &mut sink);
        assert_eq!(result.status, JobStatus::Failed);
    }

    #[test]
    fn progress_is_monotonically_non_decreasing() {
        let job = LayoutJob {
            id: "job-3".into(),
            room_id: "room-1".into(),
            floor_plan: room(),
            constraints: Constraints::default(),
            style_prefs: vec![],
            budget_cents: None,
        };
        let mut sink = RecordingSink { records: vec![] };
        solve_layout_job(job, vec![item("chair")], &mut sink);
        let mut last = -1.0;
        for record in &sink.records {
            assert!(record.progress >= last);
            last = record.progress;
        }
    }

    #[test]
    fn successful_job_produces_at_least_one_layout() {
        let job = LayoutJob {
            id: "job-4".into(),
            room_id: "room-1".into(),
            floor_plan: room(),
            constraints: Constraints::default(),
            style_prefs: vec![],
            budget_cents: None,
        };
        let mut sink = RecordingSink { records: vec![] };
        let result = solve_layout_job(job, vec![item("chair")], &mut sink);
        assert_eq!(result.status, JobStatus::Completed);
        assert!(!result.data.unwrap().is_empty());
    }
}
