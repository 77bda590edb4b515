//! Rectangle and rotation primitives shared by the solver (integer, grid
//! units) and the validator (floating point, meters).
//!
//! This module does not own room or catalog semantics. It only knows how to
//! compare, rotate, and measure rectangles.

use serde::{Deserialize, Serialize};

/// Tolerance used by the validator when distinguishing "touching" from
/// "overlapping" rectangles. The solver never needs this: its grid is
/// integer-exact.
pub const EPS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] =
        [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

    pub fn as_degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Swaps width/depth for the quarter-turn rotations.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub fn footprint_for(self, width: u32, depth: u32) -> (u32, u32) {
        if self.swaps_axes() { (depth, width) } else { (width, depth) }
    }
}

impl Serialize for Rotation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.as_degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let degrees = u16::deserialize(deserializer)?;
        Rotation::from_degrees(degrees)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid rotation degrees: {degrees}")))
    }
}

/// An axis-aligned rectangle on the integer solver grid. `(x, y)` is the
/// lower-left corner; `w`/`d` are the footprint width/depth in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub d: i64,
}

impl GridRect {
    pub fn right(self) -> i64 {
        self.x + self.w
    }

    pub fn top(self) -> i64 {
        self.y + self.d
    }

    pub fn intersects(self, other: GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    pub fn contains_rect(self, other: GridRect) -> bool {
        self.x <= other.x && self.y <= other.y && self.right() >= other.right()
            && self.top() >= other.top()
    }

    /// Manhattan distance between the two rects' lower-left corners. The
    /// solver's clearance constraint is intentionally Manhattan, not
    /// Euclidean (cheaper, adequate at 2cm resolution).
    pub fn corner_manhattan_distance(self, other: GridRect) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A floating-point rectangle in meters, used by the validator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(self) -> f64 {
        self.x + self.w
    }

    pub fn top(self) -> f64 {
        self.y + self.h
    }

    pub fn center(self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn area(self) -> f64 {
        self.w * self.h
    }

    pub fn intersects(self, other: Rect) -> bool {
        self.intersection_area(other) > EPS
    }

    pub fn intersection_area(self, other: Rect) -> f64 {
        let overlap_w = self.right().min(other.right()) - self.x.max(other.x);
        let overlap_h = self.top().min(other.top()) - self.y.max(other.y);
        if overlap_w > 0.0 && overlap_h > 0.0 { overlap_w * overlap_h } else { 0.0 }
    }

    /// The overlap rectangle itself, or `None` when the two rects don't
    /// overlap. Used by callers that need the clipped region, not just its
    /// area (e.g. unioning several clipped regions together).
    pub fn intersection_rect(self, other: Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if right - x > EPS && top - y > EPS {
            Some(Rect { x, y, w: right - x, h: top - y })
        } else {
            None
        }
    }

    pub fn contains_rect(self, other: Rect) -> bool {
        self.x <= other.x + EPS
            && self.y <= other.y + EPS
            && self.right() + EPS >= other.right()
            && self.top() + EPS >= other.top()
    }

    /// Minimum Euclidean distance between the boundaries of two rectangles.
    /// Zero when they touch or overlap.
    pub fn distance(self, other: Rect) -> f64 {
        let dx = if self.right() < other.x {
            other.x - self.right()
        } else if other.right() < self.x {
            self.x - other.right()
        } else {
            0.0
        };
        let dy = if self.top() < other.y {
            other.y - self.top()
        } else if other.top() < self.y {
            self.y - other.top()
        } else {
            0.0
        };
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_to_point(self, px: f64, py: f64) -> f64 {
        let dx = if px < self.x {
            self.x - px
        } else if px > self.right() {
            px - self.right()
        } else {
            0.0
        };
        let dy = if py < self.y {
            self.y - py
        } else if py > self.top() {
            py - self.top()
        } else {
            0.0
        };
        (dx * dx + dy * dy).sqrt()
    }

    pub fn contains_point(self, px: f64, py: f64) -> bool {
        px >= self.x - EPS && px <= self.right() + EPS && py >= self.y - EPS && py <= self.top() + EPS
    }
}

/// Area of the union of a set of rectangles, computed by coordinate-sweep
/// over the distinct x/y breakpoints (adequate for the small furniture
/// counts this core reasons about; not meant for large-N polygon work).
pub fn union_area(rects: &[Rect]) -> f64 {
    if rects.is_empty() {
        return 0.0;
    }
    let mut xs: Vec<f64> = rects.iter().flat_map(|r| [r.x, r.right()]).collect();
    let mut ys: Vec<f64> = rects.iter().flat_map(|r| [r.y, r.top()]).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    xs.dedup_by(|a, b| (*a - *b).abs() < EPS);
    ys.dedup_by(|a, b| (*a - *b).abs() < EPS);

    let mut total = 0.0;
    for xw in xs.windows(2) {
        let (x0, x1) = (xw[0], xw[1]);
        let cell_w = x1 - x0;
        if cell_w <= EPS {
            continue;
        }
        for yw in ys.windows(2) {
            let (y0, y1) = (yw[0], yw[1]);
            let cell_h = y1 - y0;
            if cell_h <= EPS {
                continue;
            }
            let cx = (x0 + x1) / 2.0;
            let cy = (y0 + y1) / 2.0;
            if rects.iter().any(|r| r.contains_point(cx, cy)) {
                total += cell_w * cell_h;
            }
        }
    }
    total
}

/// Bounding rect of a line segment buffered by radius `r` (Minkowski sum
/// with a disk, approximated as its axis-aligned bounding box -- sufficient
/// for the wall-clearance checks this core performs).
pub fn buffer_line(x0: f64, y0: f64, x1: f64, y1: f64, r: f64) -> Rect {
    let min_x = x0.min(x1) - r;
    let max_x = x0.max(x1) + r;
    let min_y = y0.min(y1) - r;
    let max_y = y0.max(y1) + r;
    Rect { x: min_x, y: min_y, w: max_x - min_x, h: max_y - min_y }
}

/// A simple room boundary, wound counter-clockwise. Rooms need not be
/// rectangular: `Room::boundary_polygon` builds this from the wall outline,
/// falling back to the bounding rectangle when no walls are given.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<(f64, f64)>,
}

impl Polygon {
    pub fn rect(rect: Rect) -> Self {
        Polygon {
            points: vec![
                (rect.x, rect.y),
                (rect.right(), rect.y),
                (rect.right(), rect.top()),
                (rect.x, rect.top()),
            ],
        }
    }

    /// Convex hull of `points` via the monotone chain algorithm. Used to
    /// turn an unordered set of wall endpoints into a boundary polygon, the
    /// same fallback the layout-worker's room-geometry parser uses.
    pub fn convex_hull(points: &[(f64, f64)]) -> Self {
        let mut pts = points.to_vec();
        pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        pts.dedup();
        if pts.len() < 3 {
            return Polygon { points: pts };
        }

        fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
            (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
        }

        let mut lower: Vec<(f64, f64)> = Vec::new();
        for &p in &pts {
            while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<(f64, f64)> = Vec::new();
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Polygon { points: lower }
    }

    /// Even-odd ray-casting point-in-polygon test, with `EPS` slack on
    /// vertices/edges so grid-resolution rounding doesn't flip a point just
    /// inside the boundary to "outside".
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];
            if (yi > py) != (yj > py) {
                let x_intersect = xi + (py - yi) * (xj - xi) / (yj - yi);
                if px < x_intersect + EPS {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// spec.md §4.1's `contains(polygon, rect)` primitive: true when every
/// corner of `rect` lies inside `polygon`.
pub fn contains(polygon: &Polygon, rect: Rect) -> bool {
    let corners =
        [(rect.x, rect.y), (rect.right(), rect.y), (rect.right(), rect.top()), (rect.x, rect.top())];
    corners.iter().all(|&(x, y)| polygon.contains_point(x, y))
}
