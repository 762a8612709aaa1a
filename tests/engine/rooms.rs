//! Integration tests for room initialization and dispatch.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use warren_engine::{event, Gob, Module, PhysicsModule, Physics, Room, Step, TerrainModule};
use warren_foundation::{PhysicsSpec, Result, RoomData};

/// A module that records which hooks ran.
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
    tag: &'static str,
}

impl Module for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn room_init(&mut self, room: &mut Room) -> Result<()> {
        self.log
            .borrow_mut()
            .push(format!("{}:room_init:{}", self.tag, room.id()));
        Ok(())
    }
}

#[test]
fn init_runs_modules_in_registration_order_then_marks_initialized() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut modules: Vec<Box<dyn Module>> = vec![
        Box::new(Recorder {
            log: Rc::clone(&log),
            tag: "first",
        }),
        Box::new(Recorder {
            log: Rc::clone(&log),
            tag: "second",
        }),
    ];

    let mut room = Room::new(Arc::new(RoomData::flat("hall", 4, 4)));
    assert!(!room.initialized());
    room.init(&mut modules).unwrap();

    assert!(room.initialized());
    assert_eq!(
        *log.borrow(),
        vec!["first:room_init:hall", "second:room_init:hall"]
    );
}

#[test]
fn stock_modules_derive_terrain_and_physics_from_the_record() {
    let data = RoomData::flat("icy-ledge", 6, 3)
        .with_cell(2, 1, 4)
        .with_physics(PhysicsSpec {
            gravity: 0.3,
            friction: 0.02,
        });
    let mut modules: Vec<Box<dyn Module>> = vec![
        Box::new(TerrainModule),
        Box::new(PhysicsModule::new(Physics::default())),
    ];

    let mut room = Room::new(Arc::new(data));
    room.init(&mut modules).unwrap();

    assert_eq!(room.terrain().ground_height(2.0, 1.0), 2.0);
    assert_eq!(room.physics().friction, 0.02);
    assert_eq!(room.physics().gravity, 0.3);
}

#[test]
fn update_walks_entities_in_membership_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut room = Room::new(Arc::new(RoomData::flat("queue", 4, 4)));

    for tag in ["a", "b", "c"] {
        let order = Rc::clone(&order);
        let mut gob = Gob::new(0.0, 0.0, 0.0);
        gob.add_event_step(event::UPDATE, Step::new(move |_, _| order.borrow_mut().push(tag)));
        room.add_entity(gob);
    }

    let mut transitions = Vec::new();
    room.update(0, &mut transitions);
    assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn room_entry_events_fire_for_late_arrivals_only_after_init() {
    let mut room = Room::new(Arc::new(RoomData::flat("r", 4, 4)));
    let entries = Rc::new(RefCell::new(0u32));

    let make_listener = || {
        let entries = Rc::clone(&entries);
        let mut gob = Gob::new(0.0, 0.0, 0.0);
        gob.add_event_step(
            event::ROOM_ENTER,
            Step::new(move |_, _| *entries.borrow_mut() += 1),
        );
        gob
    };

    room.add_entity(make_listener());
    assert_eq!(*entries.borrow(), 0);

    room.init(&mut []).unwrap();
    assert_eq!(*entries.borrow(), 1);

    room.add_entity(make_listener());
    assert_eq!(*entries.borrow(), 2);
}

#[test]
fn removal_is_idempotent_and_fires_orphan_once() {
    let orphaned = Rc::new(RefCell::new(0u32));
    let orphaned2 = Rc::clone(&orphaned);

    let mut room = Room::new(Arc::new(RoomData::flat("r", 4, 4)));
    let mut gob = Gob::new(0.0, 0.0, 0.0);
    gob.add_event_step(
        event::BECOME_ORPHAN,
        Step::new(move |_, _| *orphaned2.borrow_mut() += 1),
    );
    let id = room.add_entity(gob);

    assert!(room.remove_entity(id).is_some());
    assert!(room.remove_entity(id).is_none());
    assert_eq!(*orphaned.borrow(), 1);
}
