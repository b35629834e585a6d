//! Procedural multi-floor house floor plans.
//!
//! Given a catalog of room types and a rectangular footprint, the crate
//! picks rooms, packs them into floors with a squarified treemap, links
//! floors with stair shafts, and makes every room reachable from the front
//! door through doors and carved hallways. Everything is plain data with
//! deterministic output for a given seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`astar`] | A* shortest path over any graph with a heuristic |
//! | [`config`] | Room catalog, house spec, input validation |
//! | [`connectivity`] | Shared-wall graph, door fit, disconnected rooms |
//! | [`constants`] | Tolerances, sentinel room types, defaults |
//! | [`doors`] | Door spanning tree, front door, windows |
//! | [`error`] | `GenerationError` and the crate `Result` |
//! | [`generation`] | End-to-end pipeline and seeded entry points |
//! | [`geometry`] | Points, segments, rectangles, fuzzy comparison |
//! | [`graph`] | Identity-keyed directed graph with per-vertex marks |
//! | [`hallway`] | Wall-endpoint graph and hallway routing |
//! | [`heap`] | Indexed min-heap with decrease-key |
//! | [`model`] | Rooms, doors, windows, floors, buildings |
//! | [`pathfinding`] | BFS routes through a finished building |
//! | [`selector`] | Priority-weighted room type selection |
//! | [`stairs`] | Rooms per floor and stair shaft placement |
//! | [`treemap`] | Squarified treemap layout |
//! | [`validation`] | Layout checks (bounds, overlap, doors, reachability) |

pub mod astar;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod doors;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod graph;
pub mod hallway;
pub mod heap;
pub mod model;
pub mod pathfinding;
pub mod selector;
pub mod stairs;
pub mod treemap;
pub mod validation;

pub use config::{default_catalog, HouseSpec, RoomCatalog, RoomSpec};
pub use error::{GenerationError, Result};
pub use generation::{generate, generate_building, generate_building_seeded};
pub use model::{Building, Door, Floor, Room, RoomId, RoomKind, StairLink, Window};
