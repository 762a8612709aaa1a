//! Input binding: raw input codes to named action states.
//!
//! The binding feature never runs anything when a key goes down. It
//! only tracks boolean action states on each entity; movement features
//! poll those states during their own update steps.
//!
//! Routing is explicit: the embedder owns an [`InputDispatcher`], hands
//! it (shared) to the [`InputBinding`] feature at setup, and feeds raw
//! down/up events into [`InputDispatcher::dispatch`]. Controllers are
//! registered weakly, so detaching a feature (or dropping an entity)
//! unregisters its controller without further ceremony.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use warren_engine::{Feature, Gob};
use warren_foundation::{Error, Result};

/// Action polled by the motor feature: move north.
pub const UP: &str = "up";
/// Action polled by the motor feature: move south.
pub const DOWN: &str = "down";
/// Action polled by the motor feature: move west.
pub const LEFT: &str = "left";
/// Action polled by the motor feature: move east.
pub const RIGHT: &str = "right";
/// Action polled by the jump feature.
pub const JUMP: &str = "jump";

/// A raw input code: whatever identifier the platform layer reports for
/// a physical control (key code, button index).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct InputCode(pub u32);

/// A raw-input-code to action-name table. Several codes may map to the
/// same action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputMap {
    map: HashMap<InputCode, String>,
}

impl InputMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a code to an action; chainable. Rebinding a code replaces
    /// its action.
    #[must_use]
    pub fn bind(mut self, code: u32, action: impl Into<String>) -> Self {
        self.map.insert(InputCode(code), action.into());
        self
    }

    /// The action a code maps to, if any.
    #[must_use]
    pub fn action_for(&self, code: InputCode) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    /// Whether the map has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the bound actions (with repeats for multi-bound
    /// actions).
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(String::as_str)
    }
}

/// Per-entity action states, installed by the [`InputBinding`] feature.
#[derive(Debug)]
pub struct Controller {
    map: InputMap,
    states: HashMap<String, bool>,
}

impl Controller {
    /// Creates a controller with every mapped action inactive.
    #[must_use]
    pub fn new(map: InputMap) -> Self {
        let states = map.actions().map(|a| (a.to_owned(), false)).collect();
        Self { map, states }
    }

    /// The state of an action. Unknown actions are simply inactive.
    #[must_use]
    pub fn get_state(&self, action: &str) -> bool {
        self.states.get(action).copied().unwrap_or(false)
    }

    /// Sets an action state. Returns whether the state actually
    /// changed; repeated identical writes are ignored (debounce).
    pub fn set_state(&mut self, action: &str, value: bool) -> bool {
        match self.states.get_mut(action) {
            Some(state) if *state != value => {
                *state = value;
                true
            }
            Some(_) => false,
            None => {
                self.states.insert(action.to_owned(), value);
                value
            }
        }
    }

    /// Routes a raw input event through the map. Returns whether any
    /// action state changed.
    pub fn handle_input(&mut self, code: InputCode, pressed: bool) -> bool {
        match self.map.action_for(code) {
            Some(action) => {
                let action = action.to_owned();
                self.set_state(&action, pressed)
            }
            None => false,
        }
    }
}

/// Shared handle to an entity's controller, stored in the gob state
/// bag.
#[derive(Clone, Debug)]
pub struct ControllerHandle(pub Rc<RefCell<Controller>>);

impl ControllerHandle {
    /// Convenience: the state of an action on a gob's controller, or
    /// false when the gob has no controller.
    #[must_use]
    pub fn state_on(gob: &Gob, action: &str) -> bool {
        gob.state::<Self>()
            .is_some_and(|handle| handle.0.borrow().get_state(action))
    }
}

/// Routes raw input events to every live controller whose map
/// recognizes the code.
///
/// This replaces a process-global binding list: the embedder owns one
/// dispatcher and shares it with the binding feature explicitly.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    bindings: Vec<Weak<RefCell<Controller>>>,
}

impl InputDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller. Registration is weak; dead controllers
    /// are pruned during dispatch.
    pub fn register(&mut self, controller: &Rc<RefCell<Controller>>) {
        self.bindings.push(Rc::downgrade(controller));
    }

    /// Number of live registered controllers.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Routes one raw down/up event to every live controller. Returns
    /// the number of controllers whose state changed; repeats of an
    /// identical event return 0.
    pub fn dispatch(&mut self, code: InputCode, pressed: bool) -> usize {
        self.bindings.retain(|weak| weak.strong_count() > 0);
        let mut changed = 0;
        for weak in &self.bindings {
            if let Some(controller) = weak.upgrade() {
                if controller.borrow_mut().handle_input(code, pressed) {
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// The input-binding feature: installs a controller on each entity it
/// is attached to and registers it with the shared dispatcher.
///
/// The attach config is the entity's input map, so different entities
/// can carry different bindings through one feature instance.
pub struct InputBinding {
    dispatcher: Rc<RefCell<InputDispatcher>>,
}

impl InputBinding {
    /// Creates the feature around a shared dispatcher.
    #[must_use]
    pub fn new(dispatcher: Rc<RefCell<InputDispatcher>>) -> Self {
        Self { dispatcher }
    }
}

impl Feature for InputBinding {
    type Config = InputMap;

    fn name(&self) -> &'static str {
        "input-binding"
    }

    fn attach(&self, gob: &mut Gob, config: &InputMap) -> Result<()> {
        if config.is_empty() {
            return Err(Error::missing_config("input-binding", "keymap"));
        }
        let controller = Rc::new(RefCell::new(Controller::new(config.clone())));
        self.dispatcher.borrow_mut().register(&controller);
        gob.put_state(ControllerHandle(controller));
        Ok(())
    }

    fn detach(&self, gob: &mut Gob) {
        // Dropping the handle kills the weak registration; the
        // dispatcher prunes it on its next dispatch.
        let _ = gob.take_state::<ControllerHandle>();
    }
}
