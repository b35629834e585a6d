//! The generation pipeline.
//!
//!   1. validate inputs        -- `validate_house` + `validate_catalog`
//!   2. choose_rooms           -- which catalog types, entry first
//!   3. layout_stairs          -- rooms per floor, shared stair shafts
//!   4. per floor:
//!      a. squarify            -- room rectangles tiling the usable area
//!      b. build_conn_graph    -- shared walls, door fit, compatibility
//!      c. find_disconnected   -- rooms without a door-wide wall
//!      d. place_doors         -- door tree from the entry
//!      e. route_hallways      -- corridors for whatever is still unreached
//!      f. front door, windows
//!   5. stair links, final validation report
//!
//! Each floor is assembled in a [`FloorBuilder`] and only turned into a
//! [`Floor`] once every step succeeded; the [`Building`] is only created
//! after every floor committed. Any error drops the partial work.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{validate_catalog, validate_house, HouseSpec, RoomCatalog};
use crate::connectivity::{build_conn_graph, find_disconnected};
use crate::doors::{front_door, place_doors, place_windows};
use crate::error::{GenerationError, Result};
use crate::geometry::{Rect, Side};
use crate::hallway::route_hallways;
use crate::model::{Building, Door, Floor, Room, RoomId, RoomKind, StairLink, Window};
use crate::selector::choose_rooms;
use crate::stairs::{layout_stairs, FloorPlan};
use crate::treemap::{fit_areas, squarify};
use crate::validation::{validate_building, Severity};

/// Generate a building from `rng`.
pub fn generate_building<R: Rng + ?Sized>(
    catalog: &RoomCatalog,
    house: &HouseSpec,
    rng: &mut R,
) -> Result<Building> {
    let mut problems = validate_house(house);
    problems.extend(validate_catalog(catalog));
    if !problems.is_empty() {
        return Err(GenerationError::InvalidConfig(problems));
    }

    let names = choose_rooms(catalog.specs(), house.num_rooms, rng)?;
    log::info!("selected {} rooms: {:?}", names.len(), names);

    let areas = names
        .iter()
        .map(|n| {
            catalog
                .get(n)
                .map(|s| s.area)
                .ok_or_else(|| GenerationError::UnknownRoomType(n.clone()))
        })
        .collect::<Result<Vec<f32>>>()?;

    let layout = layout_stairs(&areas, house, rng);
    log::info!("{} rooms over {} floors", names.len(), layout.floors.len());

    let footprint = house.footprint();
    let mut floors = Vec::with_capacity(layout.floors.len());
    let mut upward: Vec<Option<RoomId>> = Vec::with_capacity(layout.floors.len());
    for (level, plan) in layout.floors.iter().enumerate() {
        let mut builder = FloorBuilder::new(level, footprint, plan.usable);
        builder.lay_out(plan, &names, &areas)?;
        builder.connect(catalog, house)?;
        upward.push(builder.stairs_above);
        floors.push(builder.commit());
    }

    let mut stairs = Vec::with_capacity(layout.shafts.len());
    for shaft in &layout.shafts {
        let Some(lower_room) = upward.get(shaft.lower_floor).copied().flatten() else {
            continue;
        };
        stairs.push(StairLink {
            lower_floor: shaft.lower_floor,
            lower_room,
            upper_room: RoomId(0),
            rect: shaft.rect,
        });
    }

    let building = Building {
        footprint,
        floors,
        stairs,
    };
    report(&building);
    Ok(building)
}

/// Generate with a ChaCha8 stream seeded from `seed`.
///
/// The same catalog, house and seed always produce the same building.
pub fn generate_building_seeded(catalog: &RoomCatalog, house: &HouseSpec, seed: u64) -> Result<Building> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_building(catalog, house, &mut rng)
}

/// Generate using `house.seed`, or a fresh random seed when unset.
pub fn generate(catalog: &RoomCatalog, house: &HouseSpec) -> Result<Building> {
    let seed = house.seed.unwrap_or_else(rand::random);
    log::debug!("generating with seed {}", seed);
    generate_building_seeded(catalog, house, seed)
}

fn report(building: &Building) {
    for finding in validate_building(building) {
        match finding.severity {
            Severity::Error => log::warn!("[{}] {}", finding.category, finding.message),
            Severity::Warning => log::debug!("[{}] {}", finding.category, finding.message),
        }
    }
}

/// One floor under construction.
pub struct FloorBuilder {
    level: usize,
    footprint: Rect,
    usable: Rect,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    windows: Vec<Window>,
    stairs_above: Option<RoomId>,
}

impl FloorBuilder {
    pub fn new(level: usize, footprint: Rect, usable: Rect) -> Self {
        Self {
            level,
            footprint,
            usable,
            rooms: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            stairs_above: None,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn push_room(&mut self, kind: RoomKind, rect: Rect) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Room::new(id, kind, rect));
        id
    }

    /// Record a door on the floor and on the rooms it joins.
    pub fn add_door(&mut self, door: Door) {
        for id in std::iter::once(door.room).chain(door.other) {
            if let Some(room) = self.rooms.get_mut(id.index()) {
                room.doors.push(door.segment.a);
                room.doors.push(door.segment.b);
            }
        }
        self.doors.push(door);
    }

    pub fn add_window(&mut self, window: Window) {
        if let Some(room) = self.rooms.get_mut(window.room.index()) {
            room.windows.push(window.segment.a);
            room.windows.push(window.segment.b);
        }
        self.windows.push(window);
    }

    /// Place the entry, the catalog rooms, stairs and landings.
    pub fn lay_out(&mut self, plan: &FloorPlan, names: &[String], areas: &[f32]) -> Result<()> {
        if self.level > 0 {
            if let Some(below) = plan.stairs_below {
                self.push_room(RoomKind::Stairs, below);
            }
        }

        let rects = match plan.room_count() {
            0 => Vec::new(),
            1 => vec![plan.usable],
            _ => {
                let fitted = fit_areas(&areas[plan.rooms.clone()], plan.usable.area());
                squarify(plan.usable, &fitted)?
            }
        };
        for (k, (idx, rect)) in plan.rooms.clone().zip(rects).enumerate() {
            let name = names[idx].clone();
            let kind = if self.level == 0 && k == 0 {
                RoomKind::OutsideConnector(name)
            } else {
                RoomKind::Named(name)
            };
            self.push_room(kind, rect);
        }
        log::debug!(
            "floor {}: {} rooms in {:.1} m²",
            self.level,
            plan.room_count(),
            plan.usable.area()
        );

        if let Some(above) = plan.stairs_above {
            self.stairs_above = Some(self.push_room(RoomKind::Stairs, above));
        }
        for landing in &plan.landings {
            self.push_room(RoomKind::Hallway, *landing);
        }
        Ok(())
    }

    /// Doors, hallways and windows.
    pub fn connect(&mut self, catalog: &RoomCatalog, house: &HouseSpec) -> Result<()> {
        let entry = RoomId(0);
        let mut conn = build_conn_graph(&self.rooms, catalog, house.door_size)?;
        let disconnected = find_disconnected(&mut conn, entry);
        let tree = place_doors(&conn, entry, house.door_size);
        let corridors = route_hallways(
            self.level,
            &self.rooms,
            &conn,
            &disconnected,
            &tree,
            &self.footprint,
            house,
        )?;

        for door in tree {
            self.add_door(door);
        }
        for rect in &corridors.rooms {
            self.push_room(RoomKind::Hallway, *rect);
        }
        for door in corridors.doors {
            self.add_door(door);
        }

        let mut skip: Option<(RoomId, Side)> = None;
        if self.level == 0 {
            let front = self
                .rooms
                .first()
                .and_then(|r| front_door(r, &self.footprint, house.door_size));
            match front {
                Some((side, door)) => {
                    skip = Some((entry, side));
                    self.add_door(door);
                }
                None => log::warn!("ground floor entry has no exterior wall"),
            }
        }
        for window in place_windows(&self.rooms, &self.footprint, house.window_size, skip) {
            self.add_window(window);
        }
        Ok(())
    }

    pub fn commit(self) -> Floor {
        Floor {
            level: self.level,
            rooms: self.rooms,
            polygon: self.footprint.to_polygon(),
            usable: self.usable,
            doors: self.doors,
            windows: self.windows,
        }
    }
}
