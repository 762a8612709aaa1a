//! The Gob: a positioned, composable game object.
//!
//! Gobs own their children outright. There are no parent pointers and no
//! shared ownership of the entity tree: a gob has exactly one parent (or
//! none) because it is *stored* in exactly one place. Reparenting moves
//! the value; the engine's "belongs to at most one container" invariants
//! are structural rather than policed.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use warren_foundation::{GobId, HandleId, Result};

use crate::event::{self, EventSteps, Step, TickCtx};
use crate::feature::Feature;

static NEXT_GOB_ID: AtomicU64 = AtomicU64::new(1);

/// A positioned, composable game object.
///
/// Behavior is attached through [`Feature`]s, which register event steps
/// and stash per-entity state in the gob's typed state bag. Position is
/// in room-local grid units.
pub struct Gob {
    id: GobId,
    /// Eastward position in grid units.
    pub x: f64,
    /// Southward position in grid units.
    pub y: f64,
    /// Height above the room floor in grid units.
    pub z: f64,
    /// Extent in grid units, consumed by render backends.
    pub width: f64,
    /// Extent in grid units, consumed by render backends.
    pub height: f64,
    /// Visual handle installed by a render feature, if any.
    pub visual: Option<HandleId>,
    children: Vec<Gob>,
    steps: EventSteps,
    attached: Vec<&'static str>,
    state: HashMap<TypeId, Box<dyn Any>>,
}

impl Gob {
    /// Creates a detached gob at a position, with a 1x1 extent.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            id: GobId::new(NEXT_GOB_ID.fetch_add(1, Ordering::Relaxed)),
            x,
            y,
            z,
            width: 1.0,
            height: 1.0,
            visual: None,
            children: Vec::new(),
            steps: EventSteps::default(),
            attached: Vec::new(),
            state: HashMap::new(),
        }
    }

    /// Sets the extent; chainable at construction.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns this gob's identifier.
    #[must_use]
    pub fn id(&self) -> GobId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// The child gobs, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Gob] {
        &self.children
    }

    /// Looks up a direct child by id.
    #[must_use]
    pub fn child(&self, id: GobId) -> Option<&Gob> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Looks up a direct child by id, mutably.
    pub fn child_mut(&mut self, id: GobId) -> Option<&mut Gob> {
        self.children.iter_mut().find(|c| c.id == id)
    }

    /// Adopts a gob as the last child, firing `become-child` on it.
    ///
    /// The incoming gob must be detached; ownership transfer is what
    /// guarantees it appears at most once in the tree. The event runs
    /// with this gob's visual handle exposed as the parent visual.
    pub fn add_child(&mut self, mut child: Gob) -> GobId {
        let mut scratch = Vec::new();
        let mut ctx = TickCtx::detached(&mut scratch);
        ctx.parent_visual = self.visual;
        child.fire_event(event::BECOME_CHILD, &mut ctx);

        let id = child.id;
        self.children.push(child);
        id
    }

    /// Detaches a direct child, firing `become-orphan` on it first, and
    /// returns it. `None` (and no events) when the id is not a child.
    pub fn remove_child(&mut self, id: GobId) -> Option<Gob> {
        let pos = self.children.iter().position(|c| c.id == id)?;

        let mut scratch = Vec::new();
        let mut ctx = TickCtx::detached(&mut scratch);
        ctx.parent_visual = self.visual;
        self.children[pos].fire_event(event::BECOME_ORPHAN, &mut ctx);

        Some(self.children.remove(pos))
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Registers a step for a named event; chainable.
    ///
    /// Registration order is invocation order. Registering the same step
    /// (clone) again is allowed; it fires once per registration.
    pub fn add_event_step(&mut self, event: &str, step: Step) -> &mut Self {
        self.steps.add(event, step);
        self
    }

    /// Unregisters one registration of a step; chainable. No-op when the
    /// step was never registered for the event.
    pub fn remove_event_step(&mut self, event: &str, step: &Step) -> &mut Self {
        self.steps.remove(event, step);
        self
    }

    /// Number of registrations for an event.
    #[must_use]
    pub fn event_step_count(&self, event: &str) -> usize {
        self.steps.count(event)
    }

    /// Fires an event: this gob's steps for `event` run in registration
    /// order, then every child fires the same event, depth-first
    /// pre-order. A gob with no steps for the event is a silent skip.
    ///
    /// While recursing, the context's parent visual is this gob's, so
    /// attach-style steps always see their immediate parent's handle.
    pub fn fire_event(&mut self, event: &str, ctx: &mut TickCtx<'_>) {
        for step in self.steps.snapshot(event) {
            step.call(self, ctx);
        }

        let own_visual = self.visual;
        let saved = ctx.parent_visual;
        ctx.parent_visual = own_visual;
        for child in &mut self.children {
            child.fire_event(event, ctx);
        }
        ctx.parent_visual = saved;
    }

    // -------------------------------------------------------------------------
    // Features
    // -------------------------------------------------------------------------

    /// Attaches a feature; chainable.
    ///
    /// Double attach is idempotent: if a feature with this name is
    /// already attached the call is an `Ok` no-op.
    ///
    /// # Errors
    /// Propagates the feature's config validation error; the feature is
    /// not recorded as attached in that case.
    pub fn add_feature<F: Feature>(
        &mut self,
        feature: &F,
        config: &F::Config,
    ) -> Result<&mut Self> {
        if self.has_feature(feature.name()) {
            tracing::debug!(gob = %self.id, feature = feature.name(), "already attached; ignoring");
            return Ok(self);
        }
        feature.attach(self, config)?;
        self.attached.push(feature.name());
        Ok(self)
    }

    /// Detaches a feature; chainable. No-op when it is not attached.
    pub fn remove_feature<F: Feature>(&mut self, feature: &F) -> &mut Self {
        if let Some(pos) = self.attached.iter().position(|n| *n == feature.name()) {
            self.attached.remove(pos);
            feature.detach(self);
        }
        self
    }

    /// Whether a feature with this name is attached.
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.attached.iter().any(|n| *n == name)
    }

    /// Attached feature names, in attach order.
    #[must_use]
    pub fn features(&self) -> &[&'static str] {
        &self.attached
    }

    // -------------------------------------------------------------------------
    // Per-entity feature state
    // -------------------------------------------------------------------------

    /// Deposits a typed value in the state bag, replacing any previous
    /// value of the same type.
    pub fn put_state<T: 'static>(&mut self, value: T) {
        self.state.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Borrows a typed value from the state bag.
    #[must_use]
    pub fn state<T: 'static>(&self) -> Option<&T> {
        self.state
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Mutably borrows a typed value from the state bag.
    pub fn state_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.state
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Removes and returns a typed value from the state bag.
    ///
    /// Steps that need `&mut` access to both their state and the gob
    /// take the state out, work, and put it back.
    pub fn take_state<T: 'static>(&mut self) -> Option<T> {
        self.state
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for Gob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gob")
            .field("id", &self.id)
            .field("pos", &(self.x, self.y, self.z))
            .field("children", &self.children.len())
            .field("features", &self.attached)
            .finish_non_exhaustive()
    }
}
