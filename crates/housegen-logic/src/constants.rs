//! Sentinel names and layout tuning constants.
//!
//! Adjacency lists in a [`RoomSpec`](crate::config::RoomSpec) name other
//! room types by string. Two extra names are reserved and never appear as
//! catalog entries: [`OUTSIDE`] and [`STAIRS`].

/// Adjacency sentinel: the room may open onto the street.
pub const OUTSIDE: &str = "Outside";

/// Adjacency sentinel: the room may open onto a stair shaft.
pub const STAIRS: &str = "Stairs";

/// Display name used for carved corridors and stair landings.
pub const HALLWAY: &str = "Hallway";

/// Fuzzy-equality grid, in cells per unit length.
///
/// Coordinates that round to the same 1/1024 cell compare equal and hash
/// equally (see [`crate::geometry::quantize`]).
pub const FUZZ_CELLS_PER_UNIT: f32 = 1024.0;

/// Float slack tolerated when comparing accumulated areas.
pub const AREA_EPSILON: f32 = 1e-3;

/// Shaft thickness never exceeds this fraction of the house's longer side.
pub const MAX_STAIR_FRACTION: f32 = 0.25;

/// Rooms whose longer/shorter side ratio exceeds this get a validation warning.
pub const MAX_ASPECT_RATIO: f32 = 10.0;

pub mod defaults {
    pub const HOUSE_WIDTH: f32 = 12.0;
    pub const HOUSE_HEIGHT: f32 = 10.0;
    pub const NUM_ROOMS: usize = 6;
    pub const STAIR_WIDTH: f32 = 2.0;
    pub const HALLWAY_WIDTH: f32 = 1.2;
    pub const DOOR_SIZE: f32 = 0.9;
    pub const WINDOW_SIZE: f32 = 1.2;
}
