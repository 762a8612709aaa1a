//! Cross-cutting modules.
//!
//! A module is the explicit registration seam for concerns that span
//! rooms: terrain construction, physics defaults, render bootstrap,
//! input wiring. The embedder passes its module list to the world at
//! setup (`World::with_module`); nothing registers itself as a side
//! effect of being linked in.

use warren_foundation::Result;

use crate::physics::Physics;
use crate::room::Room;
use crate::terrain::TerrainGrid;
use crate::world::World;

/// A cross-cutting engine extension.
///
/// All hooks default to no-ops; a module implements the ones it needs.
/// Hooks run in module registration order.
pub trait Module {
    /// The module's name, for logs.
    fn name(&self) -> &'static str;

    /// Runs once during [`World::init`], before the starting room is
    /// activated.
    ///
    /// # Errors
    /// A failure aborts world initialization.
    fn init(&mut self, world: &mut World) -> Result<()> {
        let _ = world;
        Ok(())
    }

    /// Runs while a room is initialized, giving the module a chance to
    /// derive room-scoped state from the room record.
    ///
    /// # Errors
    /// A failure aborts that room's initialization.
    fn room_init(&mut self, room: &mut Room) -> Result<()> {
        let _ = room;
        Ok(())
    }

    /// Runs when a room becomes the active room.
    fn room_enter(&mut self, room: &mut Room) {
        let _ = room;
    }

    /// Runs when the active room is deactivated.
    fn room_leave(&mut self, room: &mut Room) {
        let _ = room;
    }
}

/// Stock module: builds each room's terrain grid from its record.
#[derive(Debug, Default)]
pub struct TerrainModule;

impl Module for TerrainModule {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn room_init(&mut self, room: &mut Room) -> Result<()> {
        let grid = TerrainGrid::from_data(room.data());
        room.set_terrain(grid);
        Ok(())
    }
}

/// Stock module: applies physics constants to each room.
///
/// Rooms that declare an override use it; every other room gets this
/// module's defaults. The defaults are one immutable value shared by
/// configuration, not a mutable singleton shared by entities.
#[derive(Debug, Default)]
pub struct PhysicsModule {
    defaults: Physics,
}

impl PhysicsModule {
    /// Creates the module with explicit default constants.
    #[must_use]
    pub fn new(defaults: Physics) -> Self {
        Self { defaults }
    }
}

impl Module for PhysicsModule {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn room_init(&mut self, room: &mut Room) -> Result<()> {
        let physics = room
            .data()
            .physics
            .map_or(self.defaults, Physics::from_spec);
        room.set_physics(physics);
        Ok(())
    }
}
