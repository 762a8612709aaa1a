//! The externally-loaded room record.
//!
//! Room records arrive from a loader collaborator (a file, a server, a
//! test fixture) and are immutable once validated. The terrain grid is
//! column-major: `terrain[x][y]` is the integer height of the cell at
//! `(x, y)`, with `x` growing east and `y` growing south.

use crate::compass::Compass;
use crate::error::{Error, Result};
use crate::ids::RoomId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-room physics overrides.
///
/// When present, these replace the world defaults for the room.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicsSpec {
    /// Downward impulse applied to airborne entities each tick.
    pub gravity: f64,
    /// Per-tick velocity decay coefficient, `0.0..1.0`.
    pub friction: f64,
}

/// Declared neighbor rooms, one optional slot per compass direction.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Neighbors {
    /// Room to the north.
    pub n: Option<RoomId>,
    /// Room to the northeast.
    pub ne: Option<RoomId>,
    /// Room to the east.
    pub e: Option<RoomId>,
    /// Room to the southeast.
    pub se: Option<RoomId>,
    /// Room to the south.
    pub s: Option<RoomId>,
    /// Room to the southwest.
    pub sw: Option<RoomId>,
    /// Room to the west.
    pub w: Option<RoomId>,
    /// Room to the northwest.
    pub nw: Option<RoomId>,
}

impl Neighbors {
    /// Returns the declared neighbor in a direction, if any.
    #[must_use]
    pub fn get(&self, dir: Compass) -> Option<&RoomId> {
        match dir {
            Compass::N => self.n.as_ref(),
            Compass::NE => self.ne.as_ref(),
            Compass::E => self.e.as_ref(),
            Compass::SE => self.se.as_ref(),
            Compass::S => self.s.as_ref(),
            Compass::SW => self.sw.as_ref(),
            Compass::W => self.w.as_ref(),
            Compass::NW => self.nw.as_ref(),
        }
    }

    /// Sets the neighbor in a direction.
    pub fn set(&mut self, dir: Compass, id: RoomId) {
        let slot = match dir {
            Compass::N => &mut self.n,
            Compass::NE => &mut self.ne,
            Compass::E => &mut self.e,
            Compass::SE => &mut self.se,
            Compass::S => &mut self.s,
            Compass::SW => &mut self.sw,
            Compass::W => &mut self.w,
            Compass::NW => &mut self.nw,
        };
        *slot = Some(id);
    }

    /// Iterates over the declared neighbors in canonical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Compass, &RoomId)> {
        Compass::ALL
            .into_iter()
            .filter_map(|dir| self.get(dir).map(|id| (dir, id)))
    }
}

/// A complete room record as consumed from an external loader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomData {
    /// Unique identifier for the room.
    pub id: RoomId,
    /// Terrain grid width in cells.
    pub width: u32,
    /// Terrain grid height in cells.
    pub height: u32,
    /// Column-major cell heights: `terrain[x][y]`.
    pub terrain: Vec<Vec<i32>>,
    /// Optional physics overrides for this room.
    #[cfg_attr(feature = "serde", serde(default))]
    pub physics: Option<PhysicsSpec>,
    /// Declared neighbor rooms by compass direction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub neighbors: Neighbors,
}

impl RoomData {
    /// Creates a flat (all-zero terrain) room record, mostly for tests
    /// and fixtures.
    #[must_use]
    pub fn flat(id: impl Into<RoomId>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            terrain: vec![vec![0; height as usize]; width as usize],
            physics: None,
            neighbors: Neighbors::default(),
        }
    }

    /// Declares a neighbor room; chainable.
    #[must_use]
    pub fn with_neighbor(mut self, dir: Compass, id: impl Into<RoomId>) -> Self {
        self.neighbors.set(dir, id.into());
        self
    }

    /// Sets the physics overrides; chainable.
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsSpec) -> Self {
        self.physics = Some(physics);
        self
    }

    /// Sets the height of one terrain cell; chainable. Out-of-grid cells
    /// are ignored.
    #[must_use]
    pub fn with_cell(mut self, x: u32, y: u32, height: i32) -> Self {
        if let Some(cell) = self
            .terrain
            .get_mut(x as usize)
            .and_then(|column| column.get_mut(y as usize))
        {
            *cell = height;
        }
        self
    }

    /// Checks that the record is internally consistent.
    ///
    /// # Errors
    /// Returns an error if the grid is empty or the terrain does not
    /// match the declared dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::bad_room_data(
                self.id.clone(),
                format!("grid dimensions must be positive, got {}x{}", self.width, self.height),
            ));
        }
        if self.terrain.len() != self.width as usize {
            return Err(Error::bad_room_data(
                self.id.clone(),
                format!(
                    "terrain has {} columns, expected {}",
                    self.terrain.len(),
                    self.width
                ),
            ));
        }
        for (x, column) in self.terrain.iter().enumerate() {
            if column.len() != self.height as usize {
                return Err(Error::bad_room_data(
                    self.id.clone(),
                    format!(
                        "terrain column {x} has {} cells, expected {}",
                        column.len(),
                        self.height
                    ),
                ));
            }
        }
        Ok(())
    }
}
