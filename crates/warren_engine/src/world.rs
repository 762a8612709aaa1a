//! The world: owner of the room bucket, the active room, and the tick
//! protocol.
//!
//! Exactly one room is active at a time. Inactive rooms keep their
//! entities but are never ticked; they wait in the bucket until the
//! active room changes. Neighbor rooms load lazily through the
//! [`RoomSource`](crate::source::RoomSource) seam, and completions are
//! drained at the top of each tick (see [`crate::tick`]).

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use warren_foundation::{Compass, Error, GobId, Result, RoomData, RoomId};

use crate::event::{self, TransitionRequest};
use crate::gob::Gob;
use crate::module::Module;
use crate::room::Room;
use crate::source::{NullSource, RoomSource};

/// Observable state of a room load.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoadStatus {
    /// The room is in the bucket and usable.
    Ready,
    /// The room has been requested and has not resolved yet (or has not
    /// been requested at all): not yet available.
    Pending,
    /// The loader reported a failure; the slot stays unavailable until
    /// the load is explicitly retried.
    Failed,
}

/// In-flight bookkeeping for a requested room.
#[derive(Clone, Debug)]
pub(crate) enum LoadState {
    Pending,
    Failed(String),
}

/// Placeholder occupying a module's slot while its `init` hook runs
/// with access to the world.
struct InertModule;

impl Module for InertModule {
    fn name(&self) -> &'static str {
        "inert"
    }
}

/// Top-level owner of rooms, modules, and the tick loop state.
pub struct World {
    pub(crate) rooms: HashMap<RoomId, Room>,
    pub(crate) active: Option<RoomId>,
    start_room: Option<RoomId>,
    pub(crate) phases: Vec<String>,
    pub(crate) tick_count: u64,
    pub(crate) modules: Vec<Box<dyn Module>>,
    pub(crate) source: Box<dyn RoomSource>,
    pub(crate) loads: HashMap<RoomId, LoadState>,
    pub(crate) failures: Vec<(RoomId, String)>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with a single `update` phase and no room
    /// source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            active: None,
            start_room: None,
            phases: vec![event::UPDATE.to_owned()],
            tick_count: 0,
            modules: Vec::new(),
            source: Box::new(NullSource::default()),
            loads: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Replaces the per-tick phase list (fired in order each tick).
    #[must_use]
    pub fn with_phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phases = phases.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a module. Hooks run in registration order.
    #[must_use]
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Installs the room source.
    #[must_use]
    pub fn with_source(mut self, source: impl RoomSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Declares the room [`World::init`] activates.
    #[must_use]
    pub fn with_start_room(mut self, id: impl Into<RoomId>) -> Self {
        self.start_room = Some(id.into());
        self
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The configured per-tick phases.
    #[must_use]
    pub fn phases(&self) -> &[String] {
        &self.phases
    }

    /// Runs every module's `init` in registration order, then activates
    /// the configured starting room.
    ///
    /// Each init hook gets the world with every *other* module still in
    /// place, so a module that seeds rooms during init still gives
    /// earlier-registered modules their `room_init` pass.
    ///
    /// # Errors
    /// Propagates the first module failure, or the activation failure
    /// when the starting room is not in the bucket.
    pub fn init(&mut self) -> Result<()> {
        for slot in 0..self.modules.len() {
            let mut module = mem::replace(&mut self.modules[slot], Box::new(InertModule));
            tracing::debug!(module = module.name(), "module init");
            let outcome = module.init(self);
            self.modules[slot] = module;
            outcome?;
        }

        if let Some(start) = self.start_room.clone() {
            self.set_active_room(&start)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Rooms
    // -------------------------------------------------------------------------

    /// Validates a room record, builds and initializes the room, and
    /// puts it in the bucket. Replaces any previous room with the same
    /// id.
    ///
    /// # Errors
    /// Returns the validation or module-init failure; the bucket is
    /// untouched in that case.
    pub fn insert_room(&mut self, data: RoomData) -> Result<RoomId> {
        data.validate()?;
        let id = data.id.clone();
        let mut room = Room::new(Arc::new(data));

        let mut modules = mem::take(&mut self.modules);
        let outcome = room.init(&mut modules);
        self.modules = modules;
        outcome?;

        self.loads.remove(&id);
        self.rooms.insert(id.clone(), room);
        Ok(id)
    }

    /// Looks up a room in the bucket.
    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Looks up a room in the bucket, mutably.
    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    /// The active room's id.
    #[must_use]
    pub fn active_id(&self) -> Option<&RoomId> {
        self.active.as_ref()
    }

    /// The active room.
    #[must_use]
    pub fn active_room(&self) -> Option<&Room> {
        self.active.as_ref().and_then(|id| self.rooms.get(id))
    }

    /// The active room, mutably.
    pub fn active_room_mut(&mut self) -> Option<&mut Room> {
        let id = self.active.clone()?;
        self.rooms.get_mut(&id)
    }

    /// Activates a room from the bucket.
    ///
    /// The outgoing room's `room_leave` module hooks run first; then the
    /// switch happens, every declared neighbor of the new room is
    /// lazily requested, the `room_enter` hooks run, and `room-enter`
    /// fires across the new room for bookkeeping.
    ///
    /// # Errors
    /// Fails without side effects when the room is not in the bucket.
    pub fn set_active_room(&mut self, id: &RoomId) -> Result<()> {
        if !self.rooms.contains_key(id) {
            return Err(Error::room_not_loaded(id.clone()));
        }

        let mut modules = mem::take(&mut self.modules);
        if let Some(prev) = self.active.clone() {
            if prev != *id {
                if let Some(room) = self.rooms.get_mut(&prev) {
                    for module in &mut modules {
                        module.room_leave(room);
                    }
                }
            }
        }
        self.active = Some(id.clone());
        self.modules = modules;

        let neighbors: Vec<RoomId> = self
            .rooms
            .get(id)
            .map(|room| {
                room.data()
                    .neighbors
                    .iter()
                    .map(|(_, rid)| rid.clone())
                    .collect()
            })
            .unwrap_or_default();
        for neighbor in neighbors {
            let _ = self.load_room(&neighbor);
        }

        let mut modules = mem::take(&mut self.modules);
        if let Some(room) = self.rooms.get_mut(id) {
            for module in &mut modules {
                module.room_enter(room);
            }
            let mut transitions = Vec::new();
            room.fire_event(event::ROOM_ENTER, self.tick_count, &mut transitions);
        }
        self.modules = modules;

        tracing::info!(room = %id, "room activated");
        Ok(())
    }

    /// Resolves a room: already-cached rooms are `Ready` immediately,
    /// anything else is requested from the source and reported
    /// `Pending`. A previously failed load is re-requested.
    pub fn load_room(&mut self, id: &RoomId) -> LoadStatus {
        if self.rooms.contains_key(id) {
            return LoadStatus::Ready;
        }
        if matches!(self.loads.get(id), Some(LoadState::Pending)) {
            return LoadStatus::Pending;
        }
        self.loads.insert(id.clone(), LoadState::Pending);
        self.source.request(id);
        tracing::debug!(room = %id, "room load requested");
        LoadStatus::Pending
    }

    /// Reports a room's load state without requesting anything.
    #[must_use]
    pub fn load_status(&self, id: &RoomId) -> LoadStatus {
        if self.rooms.contains_key(id) {
            LoadStatus::Ready
        } else {
            match self.loads.get(id) {
                Some(LoadState::Failed(_)) => LoadStatus::Failed,
                _ => LoadStatus::Pending,
            }
        }
    }

    /// Reports the active room's neighbor slot in a direction: `None`
    /// when no neighbor is declared, otherwise that room's load state.
    #[must_use]
    pub fn neighbor_status(&self, dir: Compass) -> Option<LoadStatus> {
        let neighbor = self.active_room()?.neighbor(dir)?.clone();
        Some(self.load_status(&neighbor))
    }

    /// Drains the load failures recorded since the last call.
    pub fn take_load_failures(&mut self) -> Vec<(RoomId, String)> {
        mem::take(&mut self.failures)
    }

    // -------------------------------------------------------------------------
    // Entities
    // -------------------------------------------------------------------------

    /// Adds an entity to the active room.
    ///
    /// # Errors
    /// Fails when there is no active room.
    pub fn add_entity(&mut self, gob: Gob) -> Result<GobId> {
        let active = self.active.clone().ok_or_else(Error::no_active_room)?;
        self.add_entity_to(gob, &active)
    }

    /// Adds an entity to a specific room in the bucket.
    ///
    /// # Errors
    /// Fails when the room is not in the bucket.
    pub fn add_entity_to(&mut self, gob: Gob, room: &RoomId) -> Result<GobId> {
        let room = self
            .rooms
            .get_mut(room)
            .ok_or_else(|| Error::room_not_loaded(room.clone()))?;
        Ok(room.add_entity(gob))
    }

    /// Removes an entity from whichever room holds it.
    pub fn remove_entity(&mut self, id: GobId) -> Option<Gob> {
        for room in self.rooms.values_mut() {
            if let Some(gob) = room.remove_entity(id) {
                return Some(gob);
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Room-boundary transitions
    // -------------------------------------------------------------------------

    /// Moves an entity across the active room's boundary in a
    /// direction, atomically from the caller's perspective.
    ///
    /// With a loaded neighbor in that direction: the entity leaves the
    /// source room, the crossed axis wraps to the destination's opposite
    /// edge (velocity untouched), the entity joins the destination, and
    /// the destination becomes the active room. Without one (undeclared,
    /// pending, or failed), the entity's position is clamped to the
    /// source extent and membership does not change.
    ///
    /// # Errors
    /// Fails when there is no active room or the entity is not a
    /// top-level member of it.
    pub fn transition(&mut self, gob: GobId, toward: Compass) -> Result<()> {
        let src_id = self.active.clone().ok_or_else(Error::no_active_room)?;
        let src = self
            .rooms
            .get(&src_id)
            .ok_or_else(|| Error::unknown_room(src_id.clone()))?;
        if !src.contains(gob) {
            return Err(Error::entity_not_found(gob).with_context("transition source"));
        }
        let src_extent = (f64::from(src.width()), f64::from(src.height()));
        let dest_id = src.neighbor(toward).cloned();

        let dest_extent = dest_id
            .as_ref()
            .and_then(|id| self.rooms.get(id))
            .map(|room| (f64::from(room.width()), f64::from(room.height())));

        match (dest_id, dest_extent) {
            (Some(dest_id), Some((dest_w, dest_h))) => {
                let Some(mut traveller) = self
                    .rooms
                    .get_mut(&src_id)
                    .and_then(|room| room.remove_entity(gob))
                else {
                    return Err(Error::entity_not_found(gob));
                };

                let (dx, dy) = toward.grid_delta();
                if dx > 0 {
                    traveller.x = 0.0;
                } else if dx < 0 {
                    traveller.x = dest_w - 1.0;
                }
                if dy > 0 {
                    traveller.y = 0.0;
                } else if dy < 0 {
                    traveller.y = dest_h - 1.0;
                }

                match self.rooms.get_mut(&dest_id) {
                    Some(dest) => {
                        dest.add_entity(traveller);
                    }
                    None => {
                        // Keep the entity owned somewhere even if the
                        // bucket changed underneath us.
                        if let Some(src) = self.rooms.get_mut(&src_id) {
                            src.add_entity(traveller);
                        }
                        return Err(Error::internal("transition target vanished"));
                    }
                }
                self.set_active_room(&dest_id)?;
                tracing::info!(gob = %gob, from = %src_id, to = %dest_id, dir = %toward, "room transition");
            }
            (declared, _) => {
                if let Some(entity) = self
                    .rooms
                    .get_mut(&src_id)
                    .and_then(|room| room.entity_mut(gob))
                {
                    entity.x = entity.x.clamp(0.0, src_extent.0 - 1.0);
                    entity.y = entity.y.clamp(0.0, src_extent.1 - 1.0);
                }
                if let Some(pending) = declared {
                    tracing::debug!(gob = %gob, neighbor = %pending, dir = %toward, "neighbor not available; clamped");
                }
            }
        }
        Ok(())
    }

    /// Resolves queued transition requests in order. Requests for
    /// entities that are no longer top-level members of the active room
    /// are dropped silently.
    pub(crate) fn resolve_transitions(&mut self, requests: Vec<TransitionRequest>) -> usize {
        let mut resolved = 0;
        for request in requests {
            let present = self
                .active_room()
                .is_some_and(|room| room.contains(request.gob));
            if !present {
                continue;
            }
            match self.transition(request.gob, request.toward) {
                Ok(()) => resolved += 1,
                Err(err) => {
                    tracing::warn!(gob = %request.gob, error = %err, "transition failed");
                }
            }
        }
        resolved
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("rooms", &self.rooms.len())
            .field("active", &self.active)
            .field("tick", &self.tick_count)
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}
