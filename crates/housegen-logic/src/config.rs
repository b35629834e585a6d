//! Caller-facing inputs: the room catalog and the house specification.
//!
//! Both are read-only for the whole generation run. They derive serde so
//! catalogs can be kept as JSON next to whatever tool drives the generator.
//!
//! ```
//! use housegen_logic::config::{default_catalog, validate_catalog, validate_house, HouseSpec};
//!
//! let house = HouseSpec::default();
//! assert!(validate_house(&house).is_empty());
//! assert!(validate_catalog(&default_catalog()).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, OUTSIDE};
use crate::error::Result;
use crate::geometry::Rect;

/// One room type the generator may place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Type name, e.g. "Kitchen".
    pub name: String,
    /// Room types this one may open onto. May include the `Outside` and
    /// `Stairs` sentinels. Not required to be symmetric.
    pub adjacent: Vec<String>,
    /// Requested floor area in m².
    pub area: f32,
    /// Upper bound on instances in one house.
    pub max_instances: u32,
    /// Higher priority types are offered instances first.
    #[serde(default)]
    pub priority: i32,
}

impl RoomSpec {
    pub fn new(name: &str, adjacent: &[&str], area: f32, max_instances: u32, priority: i32) -> Self {
        Self {
            name: name.to_string(),
            adjacent: adjacent.iter().map(|s| s.to_string()).collect(),
            area,
            max_instances,
            priority,
        }
    }

    /// Whether this type lists `other` as adjacency-compatible.
    pub fn can_border(&self, other: &str) -> bool {
        self.adjacent.iter().any(|a| a == other)
    }

    pub fn borders_outside(&self) -> bool {
        self.can_border(OUTSIDE)
    }
}

/// Ordered collection of room specs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCatalog {
    specs: Vec<RoomSpec>,
}

impl RoomCatalog {
    pub fn new(specs: Vec<RoomSpec>) -> Self {
        Self { specs }
    }

    /// Parse a JSON array of room specs.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<RoomSpec> = serde_json::from_str(json)?;
        Ok(Self::new(specs))
    }

    pub fn specs(&self) -> &[RoomSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&RoomSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Sum of `max_instances` across the catalog.
    pub fn total_capacity(&self) -> usize {
        self.specs.iter().map(|s| s.max_instances as usize).sum()
    }
}

/// House-level generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseSpec {
    /// Footprint extent along x, metres.
    pub width: f32,
    /// Footprint extent along y, metres.
    pub height: f32,
    /// Total rooms to place across all floors (stairs and hallways excluded).
    pub num_rooms: usize,
    /// Requested stair shaft thickness.
    pub stair_width: f32,
    /// Corridor thickness used by the hallway router.
    pub hallway_width: f32,
    /// Minimum wall overlap that fits a door.
    pub door_size: f32,
    /// Glazing width on exterior walls.
    #[serde(default = "default_window_size")]
    pub window_size: f32,
    /// Seed for [`crate::generation::generate_building_seeded`] callers.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_window_size() -> f32 {
    defaults::WINDOW_SIZE
}

impl Default for HouseSpec {
    fn default() -> Self {
        Self {
            width: defaults::HOUSE_WIDTH,
            height: defaults::HOUSE_HEIGHT,
            num_rooms: defaults::NUM_ROOMS,
            stair_width: defaults::STAIR_WIDTH,
            hallway_width: defaults::HALLWAY_WIDTH,
            door_size: defaults::DOOR_SIZE,
            window_size: defaults::WINDOW_SIZE,
            seed: None,
        }
    }
}

impl HouseSpec {
    /// The footprint, anchored at the origin.
    pub fn footprint(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Footprint width or height is not positive.
    NonPositiveFootprint { width: f32, height: f32 },
    /// Zero rooms requested.
    NoRooms,
    /// Stair, hallway, door or window size is not positive.
    NonPositiveSize(&'static str),
    /// Door cannot fit on any wall of the footprint.
    DoorTooWide(f32),
    /// Catalog has no entries.
    EmptyCatalog,
    /// Two catalog entries share a name.
    DuplicateRoomType(String),
    /// A catalog entry has a non-positive area.
    NonPositiveRoomArea(String),
    /// A catalog entry uses a reserved sentinel as its name.
    ReservedName(String),
}

/// Validate a house spec, returning all errors found.
pub fn validate_house(house: &HouseSpec) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(house.width > 0.0 && house.height > 0.0) {
        errors.push(ConfigError::NonPositiveFootprint {
            width: house.width,
            height: house.height,
        });
    }
    if house.num_rooms == 0 {
        errors.push(ConfigError::NoRooms);
    }
    for (label, v) in [
        ("stair_width", house.stair_width),
        ("hallway_width", house.hallway_width),
        ("door_size", house.door_size),
        ("window_size", house.window_size),
    ] {
        if !(v > 0.0) {
            errors.push(ConfigError::NonPositiveSize(label));
        }
    }
    if house.door_size > house.width.max(house.height) {
        errors.push(ConfigError::DoorTooWide(house.door_size));
    }

    errors
}

/// Validate a catalog, returning all errors found.
pub fn validate_catalog(catalog: &RoomCatalog) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if catalog.is_empty() {
        errors.push(ConfigError::EmptyCatalog);
    }
    let mut seen = std::collections::HashSet::new();
    for spec in catalog.specs() {
        if !seen.insert(spec.name.as_str()) {
            errors.push(ConfigError::DuplicateRoomType(spec.name.clone()));
        }
        if !(spec.area > 0.0) {
            errors.push(ConfigError::NonPositiveRoomArea(spec.name.clone()));
        }
        if crate::model::is_reserved_name(&spec.name) {
            errors.push(ConfigError::ReservedName(spec.name.clone()));
        }
    }

    errors
}

/// A small catalog covering a typical family house.
pub fn default_catalog() -> RoomCatalog {
    RoomCatalog::new(vec![
        RoomSpec::new(
            "Living Room",
            &["Outside", "Stairs", "Kitchen", "Dining Room", "Office", "Bathroom"],
            24.0,
            1,
            10,
        ),
        RoomSpec::new(
            "Kitchen",
            &["Outside", "Living Room", "Dining Room", "Stairs"],
            14.0,
            1,
            9,
        ),
        RoomSpec::new(
            "Dining Room",
            &["Kitchen", "Living Room", "Stairs"],
            14.0,
            1,
            5,
        ),
        RoomSpec::new(
            "Bedroom",
            &["Stairs", "Bathroom", "Closet", "Living Room"],
            13.0,
            4,
            8,
        ),
        RoomSpec::new(
            "Bathroom",
            &["Bedroom", "Stairs", "Living Room"],
            6.0,
            3,
            7,
        ),
        RoomSpec::new(
            "Office",
            &["Living Room", "Stairs", "Outside"],
            10.0,
            1,
            3,
        ),
        RoomSpec::new("Closet", &["Bedroom", "Outside", "Closet"], 3.0, 2, 1),
    ])
}
