//! The render feature and the visual-backend collaborator seam.
//!
//! The engine never inspects pixels. A [`VisualBackend`] turns entity
//! positions and sprite frames into whatever visual representation it
//! likes; the feature only threads opaque handles back into the backend
//! that issued them. [`HeadlessBackend`] is the shipped no-op backend:
//! it records the calls it receives, which is all tests and headless
//! embedders need.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use warren_engine::{event, Feature, Gob, Module, Room, Step};
use warren_foundation::{HandleId, Result};

use crate::sprite::{Frame, Sprite};

/// A render collaborator.
///
/// Handles are opaque and backend-issued. The feature guarantees it
/// only passes back handles the backend created and has not released.
pub trait VisualBackend {
    /// The backend's own root handle; room handles attach here while
    /// their room is active.
    fn stage(&mut self) -> HandleId;

    /// Creates a fresh, unattached handle.
    fn create_handle(&mut self) -> HandleId;

    /// Refreshes a handle from an entity's position and current sprite
    /// frame.
    fn update_handle(&mut self, handle: HandleId, x: f64, y: f64, z: f64, frame: Option<&Frame>);

    /// Attaches a handle under a parent handle.
    fn attach_handle(&mut self, parent: HandleId, child: HandleId);

    /// Detaches a handle from its parent, keeping it alive.
    fn detach_handle(&mut self, handle: HandleId);

    /// Releases a handle for good.
    fn release_handle(&mut self, handle: HandleId);
}

struct RenderState {
    handle: HandleId,
    draw: Step,
    attach: Step,
    orphan: Step,
}

/// The render feature: gives an entity a visual handle and keeps it in
/// sync with the entity's position and sprite.
///
/// On attach it creates a handle, records it as the gob's visual, and
/// registers steps: `draw` refreshes the handle (advancing the sprite
/// if one is present), `become-child`/`room-enter` attach the handle to
/// the parent's, and `become-orphan` detaches it. Detaching the feature
/// unregisters the steps and releases the handle.
pub struct Render<B: VisualBackend> {
    backend: Rc<RefCell<B>>,
}

impl<B: VisualBackend> Render<B> {
    /// Creates the feature around a shared backend.
    #[must_use]
    pub fn new(backend: Rc<RefCell<B>>) -> Self {
        Self { backend }
    }
}

impl<B: VisualBackend + 'static> Feature for Render<B> {
    type Config = ();

    fn name(&self) -> &'static str {
        "render"
    }

    fn attach(&self, gob: &mut Gob, _config: &()) -> Result<()> {
        let handle = self.backend.borrow_mut().create_handle();
        gob.visual = Some(handle);

        let backend = Rc::clone(&self.backend);
        let draw = Step::new(move |gob, _ctx| {
            let frame = gob
                .state_mut::<Sprite>()
                .and_then(|sprite| sprite.tick().frame_data().cloned());
            backend
                .borrow_mut()
                .update_handle(handle, gob.x, gob.y, gob.z, frame.as_ref());
        });

        let backend = Rc::clone(&self.backend);
        let attach = Step::new(move |_gob, ctx| {
            if let Some(parent) = ctx.parent_visual {
                backend.borrow_mut().attach_handle(parent, handle);
            }
        });

        let backend = Rc::clone(&self.backend);
        let orphan = Step::new(move |_gob, _ctx| {
            backend.borrow_mut().detach_handle(handle);
        });

        gob.add_event_step(event::DRAW, draw.clone());
        gob.add_event_step(event::BECOME_CHILD, attach.clone());
        gob.add_event_step(event::ROOM_ENTER, attach.clone());
        gob.add_event_step(event::BECOME_ORPHAN, orphan.clone());
        gob.put_state(RenderState {
            handle,
            draw,
            attach,
            orphan,
        });
        Ok(())
    }

    fn detach(&self, gob: &mut Gob) {
        if let Some(state) = gob.take_state::<RenderState>() {
            gob.remove_event_step(event::DRAW, &state.draw);
            gob.remove_event_step(event::BECOME_CHILD, &state.attach);
            gob.remove_event_step(event::ROOM_ENTER, &state.attach);
            gob.remove_event_step(event::BECOME_ORPHAN, &state.orphan);
            self.backend.borrow_mut().release_handle(state.handle);
            gob.visual = None;
        }
    }
}

/// Stock module wiring rooms into the render tree: each room gets a
/// handle at init, attached to the stage while the room is active.
pub struct RenderModule<B: VisualBackend> {
    backend: Rc<RefCell<B>>,
}

impl<B: VisualBackend> RenderModule<B> {
    /// Creates the module around a shared backend.
    #[must_use]
    pub fn new(backend: Rc<RefCell<B>>) -> Self {
        Self { backend }
    }
}

impl<B: VisualBackend + 'static> Module for RenderModule<B> {
    fn name(&self) -> &'static str {
        "render"
    }

    fn room_init(&mut self, room: &mut Room) -> Result<()> {
        let handle = self.backend.borrow_mut().create_handle();
        room.visual = Some(handle);
        Ok(())
    }

    fn room_enter(&mut self, room: &mut Room) {
        if let Some(handle) = room.visual {
            let mut backend = self.backend.borrow_mut();
            let stage = backend.stage();
            backend.attach_handle(stage, handle);
        }
    }

    fn room_leave(&mut self, room: &mut Room) {
        if let Some(handle) = room.visual {
            self.backend.borrow_mut().detach_handle(handle);
        }
    }
}

/// What a [`HeadlessBackend`] saw.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualEvent {
    /// A handle was created.
    Created(HandleId),
    /// A handle was refreshed.
    Updated {
        /// The refreshed handle.
        handle: HandleId,
        /// Entity position at refresh time.
        position: (f64, f64, f64),
        /// The sprite frame shown, if any.
        frame: Option<Frame>,
    },
    /// A handle was attached under a parent.
    Attached {
        /// The parent handle.
        parent: HandleId,
        /// The attached handle.
        child: HandleId,
    },
    /// A handle was detached from its parent.
    Detached(HandleId),
    /// A handle was released.
    Released(HandleId),
}

/// A backend that renders nothing and remembers everything.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next: u64,
    /// Every call received, in order.
    pub log: Vec<VisualEvent>,
    parents: HashMap<HandleId, HandleId>,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared backend ready to hand to features and modules.
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The recorded parent of a handle, if attached.
    #[must_use]
    pub fn parent_of(&self, handle: HandleId) -> Option<HandleId> {
        self.parents.get(&handle).copied()
    }
}

impl VisualBackend for HeadlessBackend {
    fn stage(&mut self) -> HandleId {
        HandleId::new(0)
    }

    fn create_handle(&mut self) -> HandleId {
        self.next += 1;
        let handle = HandleId::new(self.next);
        self.log.push(VisualEvent::Created(handle));
        handle
    }

    fn update_handle(&mut self, handle: HandleId, x: f64, y: f64, z: f64, frame: Option<&Frame>) {
        self.log.push(VisualEvent::Updated {
            handle,
            position: (x, y, z),
            frame: frame.cloned(),
        });
    }

    fn attach_handle(&mut self, parent: HandleId, child: HandleId) {
        self.parents.insert(child, parent);
        self.log.push(VisualEvent::Attached { parent, child });
    }

    fn detach_handle(&mut self, handle: HandleId) {
        self.parents.remove(&handle);
        self.log.push(VisualEvent::Detached(handle));
    }

    fn release_handle(&mut self, handle: HandleId) {
        self.parents.remove(&handle);
        self.log.push(VisualEvent::Released(handle));
    }
}
