//! Error taxonomy for the layout core.
//!
//! Only genuine failures live here. Solver infeasibility/timeout and an
//! empty catalog (after input, or after filtering) are not errors from the
//! caller's perspective -- they surface as a completed job with an empty or
//! partial layout list -- and are modeled as data on `SolveOutcome` /
//! `JobResult`, not as `CoreError` variants.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("room has non-positive area: {area_sqm} sqm")]
    ZeroAreaRoom { area_sqm: f64 },
    #[error("room polygon is degenerate (fewer than 3 distinct wall endpoints)")]
    DegenerateRoomPolygon,
    #[error("catalog item {item_id:?} has non-positive dimensions")]
    InvalidItemDimensions { item_id: String },
    #[error("catalog item {item_id:?} has negative price_cents: {price_cents}")]
    NegativePrice { item_id: String, price_cents: i64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("internal precondition violated: {0}")]
    Internal(String),
}
