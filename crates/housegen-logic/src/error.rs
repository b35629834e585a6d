//! Error types for floor-plan generation.

use crate::config::ConfigError;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while generating a building.
///
/// Generation is all-or-nothing: every builder owns its partial state, so
/// returning one of these drops whatever was assembled so far.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// More rooms were requested than the catalog can supply.
    #[error("requested {requested} rooms but the catalog allows at most {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// No room type in the catalog may border the outside.
    #[error("no room type in the catalog can border \"Outside\"")]
    NoOutsideRoom,

    /// A selected name has no catalog entry.
    #[error("unknown room type: {0}")]
    UnknownRoomType(String),

    /// Squarify needs at least two areas; single-room floors bypass it.
    #[error("squarify needs at least 2 areas, got {0}")]
    TooFewAreas(usize),

    /// An area handed to the partitioner was zero, negative or NaN.
    #[error("room areas must be positive")]
    NonPositiveArea,

    /// A shape had too few points to bound a rectangle.
    #[error("shape has {0} points, at least 3 are required")]
    DegenerateShape(usize),

    /// The search frontier ran dry before reaching the goal.
    #[error("no path between the requested vertices")]
    NoPath,

    /// A room shares no wall with anything on its floor.
    #[error("room {room} on floor {floor} cannot be connected")]
    Unreachable { floor: usize, room: u32 },

    /// House or catalog configuration was rejected.
    #[error("invalid configuration: {0:?}")]
    InvalidConfig(Vec<ConfigError>),

    /// Catalog JSON failed to parse.
    #[error("catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),
}
