//! Splitting the selected rooms across floors and carving stair shafts.
//!
//! Rooms are stacked onto the current floor until the next one would
//! overflow its usable area. At that point a shaft is cut from one side
//! of the current floor's usable rectangle and the same rectangle is
//! reserved on the floor above. Consecutive shafts never use the same side.
//!
//! ```text
//!   floor k              floor k+1
//!   ┌──────────┬──┐      ┌──────────┬──┐
//!   │  rooms   │▓▓│      │  rooms   │▓▓│   ▓ shared shaft
//!   │          │▓▓│      │          │▓▓│
//!   └──────────┴──┘      └──────────┴──┘
//! ```
//!
//! The next floor's usable rectangle is the footprint minus a full-length
//! strip on the shaft's side. When the shaft is shorter than that strip
//! (the current floor was already cut by a perpendicular shaft), the rest
//! of the strip becomes a landing.

use std::ops::Range;

use rand::Rng;

use crate::config::HouseSpec;
use crate::constants::{AREA_EPSILON, MAX_STAIR_FRACTION};
use crate::geometry::{quantize, Rect, Side};

/// One stair shaft, shared by `lower_floor` and the floor above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairShaft {
    pub side: Side,
    pub rect: Rect,
    pub lower_floor: usize,
}

/// Space allocation for one floor.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlan {
    /// Rectangle left for catalog rooms.
    pub usable: Rect,
    /// Shaft arriving from the floor below.
    pub stairs_below: Option<Rect>,
    /// Shaft leading to the floor above.
    pub stairs_above: Option<Rect>,
    /// Leftover pieces of the shaft strip on this floor.
    pub landings: Vec<Rect>,
    /// Indices into the selected room list placed on this floor.
    pub rooms: Range<usize>,
}

impl FloorPlan {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Floors and shafts for one house.
#[derive(Debug, Clone, PartialEq)]
pub struct StairLayout {
    pub floors: Vec<FloorPlan>,
    pub shafts: Vec<StairShaft>,
}

impl StairLayout {
    /// Usable rectangle of every floor, bottom-up.
    pub fn usable_rects(&self) -> Vec<Rect> {
        self.floors.iter().map(|f| f.usable).collect()
    }
}

/// Shaft thickness before clamping to the floor it is cut from.
pub fn stair_thickness(house: &HouseSpec) -> f32 {
    (MAX_STAIR_FRACTION * house.width.max(house.height)).min(house.stair_width)
}

fn roll_side<R: Rng + ?Sized>(previous: Option<Side>, rng: &mut R) -> Side {
    loop {
        let side = Side::ALL[rng.gen_range(0..Side::ALL.len())];
        if Some(side) != previous {
            return side;
        }
    }
}

/// Parts of `strip` not covered by `shaft` (both hug the same side).
fn landings_for(strip: Rect, shaft: Rect, side: Side) -> Vec<Rect> {
    let mut out = Vec::new();
    if side.is_horizontal() {
        if quantize(shaft.min_x()) > quantize(strip.min_x()) {
            out.push(Rect::new(strip.min_x(), strip.y, shaft.min_x() - strip.min_x(), strip.height));
        }
        if quantize(shaft.max_x()) < quantize(strip.max_x()) {
            out.push(Rect::new(shaft.max_x(), strip.y, strip.max_x() - shaft.max_x(), strip.height));
        }
    } else {
        if quantize(shaft.min_y()) > quantize(strip.min_y()) {
            out.push(Rect::new(strip.x, strip.min_y(), strip.width, shaft.min_y() - strip.min_y()));
        }
        if quantize(shaft.max_y()) < quantize(strip.max_y()) {
            out.push(Rect::new(strip.x, shaft.max_y(), strip.width, strip.max_y() - shaft.max_y()));
        }
    }
    out
}

/// Assign rooms (by area, in selection order) to floors and carve shafts.
pub fn layout_stairs<R: Rng + ?Sized>(areas: &[f32], house: &HouseSpec, rng: &mut R) -> StairLayout {
    let footprint = house.footprint();
    let requested = stair_thickness(house);

    let mut floors = Vec::new();
    let mut shafts = Vec::new();

    let mut usable = footprint;
    let mut stairs_below: Option<Rect> = None;
    let mut landings: Vec<Rect> = Vec::new();
    let mut previous_side: Option<Side> = None;

    let mut start = 0;
    let mut filled = 0.0;
    let mut i = 0;
    while i < areas.len() {
        if i == start || filled + areas[i] <= usable.area() + AREA_EPSILON {
            filled += areas[i];
            i += 1;
            continue;
        }

        // Floor is full and rooms are still pending.
        let side = roll_side(previous_side, rng);
        let across = if side.is_horizontal() {
            usable.height
        } else {
            usable.width
        };
        let thickness = requested.min(across / 2.0);
        let shaft = usable.strip(side, thickness);
        usable = usable.shrink(side, thickness);

        let mut fit = 0;
        let mut sum = 0.0;
        for &a in &areas[start..i] {
            if sum + a > usable.area() + AREA_EPSILON {
                break;
            }
            sum += a;
            fit += 1;
        }
        // Overflow is absorbed when the partitioner scales areas to fit.
        let fit = fit.max(1);

        let level = floors.len();
        log::debug!(
            "floor {}: {} rooms, shaft on {:?} ({:.2} thick)",
            level,
            fit,
            side,
            thickness
        );
        floors.push(FloorPlan {
            usable,
            stairs_below,
            stairs_above: Some(shaft),
            landings: std::mem::take(&mut landings),
            rooms: start..start + fit,
        });
        shafts.push(StairShaft {
            side,
            rect: shaft,
            lower_floor: level,
        });

        let strip = footprint.strip(side, thickness);
        landings = landings_for(strip, shaft, side);
        usable = footprint.shrink(side, thickness);
        stairs_below = Some(shaft);
        previous_side = Some(side);

        start += fit;
        i = start;
        filled = 0.0;
    }

    floors.push(FloorPlan {
        usable,
        stairs_below,
        stairs_above: None,
        landings,
        rooms: start..areas.len(),
    });

    StairLayout { floors, shafts }
}
