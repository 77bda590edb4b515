//! Room, wall, door and window data model. Rooms arrive immutable from the
//! floor-plan acquisition pipeline (out of scope here); this module only
//! validates and holds them.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geometry::{Polygon, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl AABB {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DoorSwing {
    Inward,
    Outward,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub thickness_m: f64,
    pub height_m: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub wall_id: String,
    pub position: (f64, f64),
    pub width_m: f64,
    /// Carried as data only; swing-arc enforcement is an explicit
    /// non-goal per spec.md's Open Questions.
    pub swing: DoorSwing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: String,
    pub wall_id: String,
    pub position: (f64, f64),
    pub width_m: f64,
    pub height_m: f64,
    pub sill_height_m: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub bounds: AABB,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub area_sqm: f64,
}

impl Room {
    /// Validates the invariants spec.md §3 requires before the room is
    /// handed to the grid/model builder: positive area, non-degenerate
    /// bounds.
    pub fn validated(self) -> Result<Self, InputError> {
        if self.area_sqm <= 0.0 || self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return Err(InputError::ZeroAreaRoom { area_sqm: self.area_sqm });
        }
        Ok(self)
    }

    /// The room's true boundary, not just its bounding box: the convex hull
    /// of the wall outline when at least 3 walls are given (so an L-shaped
    /// or notched room is honored), falling back to the AABB rectangle for
    /// a boxy room with no wall detail.
    pub fn boundary_polygon(&self) -> Polygon {
        if self.walls.len() >= 3 {
            let points: Vec<(f64, f64)> = self.walls.iter().flat_map(|w| [w.start, w.end]).collect();
            Polygon::convex_hull(&points)
        } else {
            Polygon::rect(Rect {
                x: self.bounds.min_x,
                y: self.bounds.min_y,
                w: self.bounds.width(),
                h: self.bounds.height(),
            })
        }
    }
}
