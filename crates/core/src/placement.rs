//! A chosen position/rotation for a catalog item.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::geometry::{Rect, Rotation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub item_id: String,
    pub x_cm: i64,
    pub y_cm: i64,
    pub rotation: Rotation,
    pub confidence: f64,
}

impl Placement {
    /// The real-valued footprint of this placement, in meters, given the
    /// catalog item it refers to. Used by the validator.
    pub fn footprint_m(&self, item: &CatalogItem) -> Rect {
        let (w_cm, d_cm) = self.rotation.footprint_for(item.width_cm, item.depth_cm);
        Rect { x: self.x_cm as f64 / 100.0, y: self.y_cm as f64 / 100.0, w: w_cm as f64 / 100.0, h: d_cm as f64 / 100.0 }
    }

    pub fn center_m(&self, item: &CatalogItem) -> (f64, f64) {
        self.footprint_m(item).center()
    }
}
