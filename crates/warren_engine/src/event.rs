//! Event steps and the per-dispatch context.
//!
//! An event step is a callback registered against a named event on a gob.
//! Firing an event runs the steps registered for that name in
//! registration order, then recurses into child gobs (see
//! [`Gob::fire_event`](crate::gob::Gob::fire_event)).
//!
//! Steps carry an identity so the same callback can be registered more
//! than once (each registration fires) and removed again without relying
//! on pointer comparisons.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use warren_foundation::{Compass, GobId, HandleId};

use crate::gob::Gob;
use crate::physics::Physics;
use crate::terrain::TerrainGrid;

/// The main update phase, fired once per tick by default.
pub const UPDATE: &str = "update";
/// The render phase; fired per tick when configured as a loop phase.
pub const DRAW: &str = "draw";
/// Fired on a gob when it gains a parent.
pub const BECOME_CHILD: &str = "become-child";
/// Fired on a gob just before it loses its parent or room.
pub const BECOME_ORPHAN: &str = "become-orphan";
/// Fired on a gob when it enters an initialized room, and across a room
/// when that room becomes active.
pub const ROOM_ENTER: &str = "room-enter";

static NEXT_STEP_ID: AtomicU64 = AtomicU64::new(1);

// Backing terrain for contexts created outside any room.
static DETACHED_TERRAIN: TerrainGrid = TerrainGrid::EMPTY;

/// Identity of a registered step, stable across clones of the [`Step`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StepId(u64);

/// A callback that can be registered for a named event on a gob.
///
/// Cloning a step preserves its identity: the clone registers, fires,
/// and removes as the same callback.
#[derive(Clone)]
pub struct Step {
    id: StepId,
    run: Rc<dyn Fn(&mut Gob, &mut TickCtx<'_>)>,
}

impl Step {
    /// Wraps a callback as a step with a fresh identity.
    #[must_use]
    pub fn new(f: impl Fn(&mut Gob, &mut TickCtx<'_>) + 'static) -> Self {
        Self {
            id: StepId(NEXT_STEP_ID.fetch_add(1, Ordering::Relaxed)),
            run: Rc::new(f),
        }
    }

    /// Returns this step's identity.
    #[must_use]
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Invokes the callback.
    pub fn call(&self, gob: &mut Gob, ctx: &mut TickCtx<'_>) {
        (self.run)(gob, ctx);
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Step({})", self.id.0)
    }
}

/// Ordered, duplicate-preserving registry of steps per event name.
#[derive(Debug, Default)]
pub(crate) struct EventSteps {
    steps: HashMap<String, Vec<Step>>,
}

impl EventSteps {
    /// Appends a registration for an event.
    pub fn add(&mut self, event: &str, step: Step) {
        self.steps.entry(event.to_owned()).or_default().push(step);
    }

    /// Removes the first registration matching the step's identity.
    /// No-op when the step was never registered.
    pub fn remove(&mut self, event: &str, step: &Step) {
        if let Some(registered) = self.steps.get_mut(event) {
            if let Some(pos) = registered.iter().position(|s| s.id == step.id) {
                registered.remove(pos);
            }
            if registered.is_empty() {
                self.steps.remove(event);
            }
        }
    }

    /// Clones out the registrations for an event, in order.
    ///
    /// The snapshot keeps dispatch well-defined when a step mutates the
    /// registry it was called from.
    pub fn snapshot(&self, event: &str) -> Vec<Step> {
        self.steps.get(event).cloned().unwrap_or_default()
    }

    /// Number of registrations for an event.
    pub fn count(&self, event: &str) -> usize {
        self.steps.get(event).map_or(0, Vec::len)
    }
}

/// A request, raised from a step, to move a gob across a room boundary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransitionRequest {
    /// The gob asking to cross.
    pub gob: GobId,
    /// The edge it crossed.
    pub toward: Compass,
}

/// Per-dispatch environment handed to every event step.
///
/// Carries the active room's terrain and physics, the current tick, and
/// the queue of boundary-transition requests. During child- and
/// room-entry events, `parent_visual` exposes the enclosing visual
/// handle so render features can attach to it.
pub struct TickCtx<'a> {
    /// The active room's terrain height field.
    pub terrain: &'a TerrainGrid,
    /// The active room's physics constants.
    pub physics: Physics,
    /// The current tick number.
    pub tick: u64,
    /// Visual handle of the enclosing gob or room, when known.
    pub parent_visual: Option<HandleId>,
    transitions: &'a mut Vec<TransitionRequest>,
}

impl<'a> TickCtx<'a> {
    /// Creates a context for dispatch within a room.
    #[must_use]
    pub fn new(
        terrain: &'a TerrainGrid,
        physics: Physics,
        tick: u64,
        transitions: &'a mut Vec<TransitionRequest>,
    ) -> Self {
        Self {
            terrain,
            physics,
            tick,
            parent_visual: None,
            transitions,
        }
    }

    /// Creates a context for dispatch outside any room (reparenting a
    /// detached gob, tests). Terrain is empty and transition requests go
    /// nowhere.
    #[must_use]
    pub fn detached(transitions: &'a mut Vec<TransitionRequest>) -> Self {
        Self::new(&DETACHED_TERRAIN, Physics::default(), 0, transitions)
    }

    /// Queues a room-boundary transition request for the world to
    /// resolve after the current phase.
    pub fn request_transition(&mut self, gob: GobId, toward: Compass) {
        self.transitions.push(TransitionRequest { gob, toward });
    }
}
