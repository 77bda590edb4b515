//! Public crate surface for the spatial layout core: constraint solver,
//! post-process scorer, and geometry validator.

pub mod catalog;
pub mod error;
pub mod functional_pairs;
pub mod geometry;
pub mod grid;
pub mod job;
pub mod layout;
pub mod model;
pub mod placement;
pub mod room;
pub mod scorer;
pub mod solver;
pub mod strategy;
pub mod validator;

pub use catalog::{CatalogItem, Category, Clearances, PlacementRule, StyleTag, filter_catalog};
pub use error::{CoreError, InputError};
pub use geometry::{GridRect, Rect, Rotation};
pub use job::{
    Constraints, JobResult, JobStatus, LayoutJob, OutputSink, ProgressRecord, ProgressSink, ValidationJob,
    solve_layout_job, validate_layout_job,
};
pub use layout::{Layout, LayoutMetrics};
pub use model::{ModelConstraints, PlacementModel};
pub use placement::Placement;
pub use room::{AABB, Door, DoorSwing, Room, Wall, Window};
pub use solver::{SolveBudget, SolveOutcome};
pub use strategy::Strategy;
pub use validator::{ValidationReport, validate};
