//! Plane geometry for floor plans: points, segments, axis-aligned rectangles.
//!
//! All coordinates are metres in a y-up frame: a rectangle's origin is its
//! min corner and its [`Side::Top`] is the max-y edge.
//!
//! Equality between computed coordinates goes through a single
//! quantization function, [`quantize`]. [`fuzzy_eq`] and [`GridPoint`]
//! (used as a hash key) are both defined on top of it, so two coordinates
//! that compare equal always hash equally.

use serde::{Deserialize, Serialize};

use crate::constants::FUZZ_CELLS_PER_UNIT;
use crate::error::{GenerationError, Result};

/// Snap a coordinate to the fuzzy-equality grid.
pub fn quantize(v: f32) -> i64 {
    (v * FUZZ_CELLS_PER_UNIT).round() as i64
}

/// Fuzzy float equality (same grid cell).
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    quantize(a) == quantize(b)
}

/// `a <= b` up to the fuzzy grid.
pub fn fuzzy_le(a: f32, b: f32) -> bool {
    quantize(a) <= quantize(b)
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn fuzzy_eq(self, other: Point) -> bool {
        GridPoint::from(self) == GridPoint::from(other)
    }
}

/// A point snapped to the fuzzy grid. Usable as a hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl From<Point> for GridPoint {
    fn from(p: Point) -> Self {
        Self {
            x: quantize(p.x),
            y: quantize(p.y),
        }
    }
}

/// One of the four walls of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Top and bottom walls run along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.a.x + self.b.x) / 2.0, (self.a.y + self.b.y) / 2.0)
    }

    /// True when both endpoints share a y coordinate (fuzzy).
    pub fn is_horizontal(&self) -> bool {
        fuzzy_eq(self.a.y, self.b.y)
    }

    /// Sub-segment of `len` centred on this one (clamped to the full length).
    pub fn centered(&self, len: f32) -> Segment {
        let total = self.length();
        if total <= 0.0 || len >= total {
            return *self;
        }
        let t0 = (total - len) / (2.0 * total);
        let t1 = 1.0 - t0;
        Segment::new(self.lerp(t0), self.lerp(t1))
    }

    fn lerp(&self, t: f32) -> Point {
        Point::new(
            self.a.x + (self.b.x - self.a.x) * t,
            self.a.y + (self.b.y - self.a.y) * t,
        )
    }
}

/// Axis-aligned working rectangle (origin = min corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Extent of a wall on `side`.
    pub fn side_length(&self, side: Side) -> f32 {
        if side.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    /// Four corners, counter-clockwise from the min corner.
    pub fn to_polygon(&self) -> Vec<Point> {
        vec![
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    /// Bounding rectangle of a polygon.
    pub fn from_polygon(points: &[Point]) -> Result<Rect> {
        if points.len() < 3 {
            return Err(GenerationError::DegenerateShape(points.len()));
        }
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Ok(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// The wall on `side`, oriented from the lower to the higher coordinate.
    pub fn side_segment(&self, side: Side) -> Segment {
        match side {
            Side::Top => Segment::new(
                Point::new(self.min_x(), self.max_y()),
                Point::new(self.max_x(), self.max_y()),
            ),
            Side::Bottom => Segment::new(
                Point::new(self.min_x(), self.min_y()),
                Point::new(self.max_x(), self.min_y()),
            ),
            Side::Left => Segment::new(
                Point::new(self.min_x(), self.min_y()),
                Point::new(self.min_x(), self.max_y()),
            ),
            Side::Right => Segment::new(
                Point::new(self.max_x(), self.min_y()),
                Point::new(self.max_x(), self.max_y()),
            ),
        }
    }

    /// Coordinate of the line a side lies on (y for top/bottom, x otherwise).
    pub fn side_coord(&self, side: Side) -> f32 {
        match side {
            Side::Top => self.max_y(),
            Side::Bottom => self.min_y(),
            Side::Left => self.min_x(),
            Side::Right => self.max_x(),
        }
    }

    /// Span `(lo, hi)` of a side along its own axis.
    pub fn side_span(&self, side: Side) -> (f32, f32) {
        if side.is_horizontal() {
            (self.min_x(), self.max_x())
        } else {
            (self.min_y(), self.max_y())
        }
    }

    /// Strip of `thickness` hugging `side`.
    pub fn strip(&self, side: Side, thickness: f32) -> Rect {
        match side {
            Side::Left => Rect::new(self.x, self.y, thickness, self.height),
            Side::Right => Rect::new(self.max_x() - thickness, self.y, thickness, self.height),
            Side::Bottom => Rect::new(self.x, self.y, self.width, thickness),
            Side::Top => Rect::new(self.x, self.max_y() - thickness, self.width, thickness),
        }
    }

    /// What remains after removing [`Rect::strip`] on `side`.
    pub fn shrink(&self, side: Side, thickness: f32) -> Rect {
        match side {
            Side::Left => Rect::new(self.x + thickness, self.y, self.width - thickness, self.height),
            Side::Right => Rect::new(self.x, self.y, self.width - thickness, self.height),
            Side::Bottom => Rect::new(self.x, self.y + thickness, self.width, self.height - thickness),
            Side::Top => Rect::new(self.x, self.y, self.width, self.height - thickness),
        }
    }

    /// True when this rectangle's `side` lies on `outer`'s boundary.
    pub fn side_on_boundary(&self, side: Side, outer: &Rect) -> bool {
        fuzzy_eq(self.side_coord(side), outer.side_coord(side))
    }

    /// Fuzzy containment.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        fuzzy_le(self.min_x(), other.min_x())
            && fuzzy_le(self.min_y(), other.min_y())
            && fuzzy_le(other.max_x(), self.max_x())
            && fuzzy_le(other.max_y(), self.max_y())
    }

    /// Interior overlap beyond the fuzzy grid (touching edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        quantize(self.min_x()) < quantize(other.max_x())
            && quantize(other.min_x()) < quantize(self.max_x())
            && quantize(self.min_y()) < quantize(other.max_y())
            && quantize(other.min_y()) < quantize(self.max_y())
    }

    /// Clip to `bounds`.
    pub fn intersect(&self, bounds: &Rect) -> Rect {
        let x0 = self.min_x().max(bounds.min_x());
        let y0 = self.min_y().max(bounds.min_y());
        let x1 = self.max_x().min(bounds.max_x());
        let y1 = self.max_y().min(bounds.max_y());
        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }
}

/// Find the wall `a` shares with `b`, if any.
///
/// Returns the side of `a` that touches `b` and the overlap along it.
/// Corner contact (zero-length overlap) is not a shared wall.
pub fn shared_wall(a: &Rect, b: &Rect) -> Option<(Side, Segment)> {
    for side in Side::ALL {
        if !fuzzy_eq(a.side_coord(side), b.side_coord(side.opposite())) {
            continue;
        }
        let (a_lo, a_hi) = a.side_span(side);
        let (b_lo, b_hi) = b.side_span(side);
        let lo = a_lo.max(b_lo);
        let hi = a_hi.min(b_hi);
        if quantize(hi) <= quantize(lo) {
            continue;
        }
        let c = a.side_coord(side);
        let overlap = if side.is_horizontal() {
            Segment::new(Point::new(lo, c), Point::new(hi, c))
        } else {
            Segment::new(Point::new(c, lo), Point::new(c, hi))
        };
        return Some((side, overlap));
    }
    None
}
