//! Rooms: bounded areas of the world with their own terrain and live
//! entity set.

use std::sync::Arc;

use warren_foundation::{Compass, GobId, HandleId, Result, RoomData, RoomId};

use crate::event::{self, TickCtx, TransitionRequest};
use crate::gob::Gob;
use crate::module::Module;
use crate::physics::Physics;
use crate::terrain::TerrainGrid;

/// A bounded area of the game world.
///
/// A room owns its live entities outright: membership in `entities` *is*
/// the entity-to-room association, so an entity belongs to at most one
/// room by construction. Terrain dimensions are immutable once the grid
/// is built during [`Room::init`].
pub struct Room {
    id: RoomId,
    data: Arc<RoomData>,
    terrain: TerrainGrid,
    physics: Physics,
    entities: Vec<Gob>,
    /// Visual handle for the room's render tree, installed by a render
    /// module.
    pub visual: Option<HandleId>,
    initialized: bool,
}

impl Room {
    /// Creates an uninitialized room from its record.
    ///
    /// Terrain and physics stay at their empty/default values until
    /// [`Room::init`] lets the registered modules derive them from the
    /// record.
    #[must_use]
    pub fn new(data: Arc<RoomData>) -> Self {
        Self {
            id: data.id.clone(),
            data,
            terrain: TerrainGrid::EMPTY,
            physics: Physics::default(),
            entities: Vec::new(),
            visual: None,
            initialized: false,
        }
    }

    /// The room's identifier.
    #[must_use]
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// The room record this room was built from.
    #[must_use]
    pub fn data(&self) -> &Arc<RoomData> {
        &self.data
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.data.height
    }

    /// Whether [`Room::init`] has run.
    #[must_use]
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// The declared neighbor in a direction, if any.
    #[must_use]
    pub fn neighbor(&self, dir: Compass) -> Option<&RoomId> {
        self.data.neighbors.get(dir)
    }

    /// The terrain height field.
    #[must_use]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Installs the terrain height field. Called by terrain modules
    /// during `room_init`; the grid is not replaced after that.
    pub fn set_terrain(&mut self, terrain: TerrainGrid) {
        self.terrain = terrain;
    }

    /// The room's physics constants.
    #[must_use]
    pub fn physics(&self) -> Physics {
        self.physics
    }

    /// Installs the physics constants. Called by physics modules during
    /// `room_init`.
    pub fn set_physics(&mut self, physics: Physics) {
        self.physics = physics;
    }

    /// Initializes the room: every module's `room_init` runs in
    /// registration order, then `room-enter` fires on every
    /// already-present entity, then the room is marked initialized.
    ///
    /// # Errors
    /// Propagates the first module failure; the room stays
    /// uninitialized in that case.
    pub fn init(&mut self, modules: &mut [Box<dyn Module>]) -> Result<()> {
        for module in modules.iter_mut() {
            module.room_init(self)?;
        }
        let mut transitions = Vec::new();
        self.fire_event(event::ROOM_ENTER, 0, &mut transitions);
        self.initialized = true;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Entities
    // -------------------------------------------------------------------------

    /// The live entities, in membership order.
    #[must_use]
    pub fn entities(&self) -> &[Gob] {
        &self.entities
    }

    /// Looks up a top-level entity by id.
    #[must_use]
    pub fn entity(&self, id: GobId) -> Option<&Gob> {
        self.entities.iter().find(|g| g.id() == id)
    }

    /// Looks up a top-level entity by id, mutably.
    pub fn entity_mut(&mut self, id: GobId) -> Option<&mut Gob> {
        self.entities.iter_mut().find(|g| g.id() == id)
    }

    /// Whether an entity with this id is a member.
    #[must_use]
    pub fn contains(&self, id: GobId) -> bool {
        self.entities.iter().any(|g| g.id() == id)
    }

    /// Adds an entity to the room. Fires `room-enter` on it when the
    /// room is already initialized.
    pub fn add_entity(&mut self, mut gob: Gob) -> GobId {
        if self.initialized {
            let mut transitions = Vec::new();
            let mut ctx = TickCtx::new(&self.terrain, self.physics, 0, &mut transitions);
            ctx.parent_visual = self.visual;
            gob.fire_event(event::ROOM_ENTER, &mut ctx);
        }
        let id = gob.id();
        self.entities.push(gob);
        id
    }

    /// Removes an entity, firing `become-orphan` on it first, and
    /// returns it. Idempotent: `None` and no events when the id is not
    /// a member.
    pub fn remove_entity(&mut self, id: GobId) -> Option<Gob> {
        let pos = self.entities.iter().position(|g| g.id() == id)?;

        let mut transitions = Vec::new();
        let mut ctx = TickCtx::new(&self.terrain, self.physics, 0, &mut transitions);
        ctx.parent_visual = self.visual;
        self.entities[pos].fire_event(event::BECOME_ORPHAN, &mut ctx);

        Some(self.entities.remove(pos))
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Fires an event across every entity tree in membership order.
    /// Entities with no steps for the event are skipped silently.
    pub fn fire_event(
        &mut self,
        event: &str,
        tick: u64,
        transitions: &mut Vec<TransitionRequest>,
    ) {
        let mut ctx = TickCtx::new(&self.terrain, self.physics, tick, transitions);
        ctx.parent_visual = self.visual;
        for gob in &mut self.entities {
            gob.fire_event(event, &mut ctx);
        }
    }

    /// Runs one `update` phase across the room.
    pub fn update(&mut self, tick: u64, transitions: &mut Vec<TransitionRequest>) {
        self.fire_event(event::UPDATE, tick, transitions);
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("size", &(self.width(), self.height()))
            .field("entities", &self.entities.len())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
