//! Input flows end to end: dispatcher -> controller -> motor.

use std::cell::RefCell;
use std::rc::Rc;

use warren_engine::{Gob, TerrainModule, World};
use warren_features::binding::{self, InputBinding, InputCode, InputDispatcher, InputMap};
use warren_features::{Motor, MotorConfig};
use warren_foundation::{RoomData, RoomId};

fn world_with_room() -> World {
    let mut world = World::new().with_module(TerrainModule);
    world.insert_room(RoomData::flat("r", 10, 10)).unwrap();
    world.set_active_room(&RoomId::from("r")).unwrap();
    world
}

fn wasd() -> InputMap {
    InputMap::new()
        .bind(87, binding::UP)
        .bind(65, binding::LEFT)
        .bind(83, binding::DOWN)
        .bind(68, binding::RIGHT)
}

#[test]
fn a_held_key_steers_the_entity_until_released() {
    let dispatcher = Rc::new(RefCell::new(InputDispatcher::new()));
    let input = InputBinding::new(Rc::clone(&dispatcher));

    let mut world = world_with_room();
    let mut gob = Gob::new(5.0, 5.0, 0.0);
    gob.add_feature(&input, &wasd()).unwrap();
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    let id = world.add_entity(gob).unwrap();

    dispatcher.borrow_mut().dispatch(InputCode(68), true);
    for _ in 0..10 {
        world.tick();
    }
    let x_after_hold = world.active_room().unwrap().entity(id).unwrap().x;
    assert!(x_after_hold > 5.0);

    dispatcher.borrow_mut().dispatch(InputCode(68), false);
    for _ in 0..200 {
        world.tick();
    }
    let resting = world.active_room().unwrap().entity(id).unwrap();
    // Friction brought it to a stop somewhere east of the start.
    let velocity = resting.state::<warren_features::Velocity>().unwrap().0;
    assert_eq!(velocity.ground_magnitude(), 0.0);
    assert!(resting.x > x_after_hold);
}

#[test]
fn opposite_actions_cancel_out() {
    let dispatcher = Rc::new(RefCell::new(InputDispatcher::new()));
    let input = InputBinding::new(Rc::clone(&dispatcher));

    let mut world = world_with_room();
    let mut gob = Gob::new(5.0, 5.0, 0.0);
    gob.add_feature(&input, &wasd()).unwrap();
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    let id = world.add_entity(gob).unwrap();

    dispatcher.borrow_mut().dispatch(InputCode(65), true);
    dispatcher.borrow_mut().dispatch(InputCode(68), true);
    for _ in 0..10 {
        world.tick();
    }

    let gob = world.active_room().unwrap().entity(id).unwrap();
    assert_eq!(gob.x, 5.0);
    assert_eq!(gob.y, 5.0);
}

#[test]
fn one_dispatcher_drives_every_bound_entity() {
    let dispatcher = Rc::new(RefCell::new(InputDispatcher::new()));
    let input = InputBinding::new(Rc::clone(&dispatcher));

    let mut world = world_with_room();
    let mut ids = Vec::new();
    for x in [2.0, 4.0, 6.0] {
        let mut gob = Gob::new(x, 5.0, 0.0);
        gob.add_feature(&input, &wasd()).unwrap();
        gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
        ids.push(world.add_entity(gob).unwrap());
    }

    dispatcher.borrow_mut().dispatch(InputCode(83), true);
    for _ in 0..5 {
        world.tick();
    }

    let room = world.active_room().unwrap();
    for (id, start_x) in ids.iter().zip([2.0, 4.0, 6.0]) {
        let gob = room.entity(*id).unwrap();
        assert!(gob.y > 5.0, "everyone moved south");
        assert_eq!(gob.x, start_x, "nobody drifted sideways");
    }
}

#[test]
fn detached_entities_stop_hearing_input() {
    let dispatcher = Rc::new(RefCell::new(InputDispatcher::new()));
    let input = InputBinding::new(Rc::clone(&dispatcher));

    let mut world = world_with_room();
    let mut gob = Gob::new(5.0, 5.0, 0.0);
    gob.add_feature(&input, &wasd()).unwrap();
    let id = world.add_entity(gob).unwrap();
    assert_eq!(dispatcher.borrow().binding_count(), 1);

    // Dropping the entity drops its controller.
    world.remove_entity(id).unwrap();
    assert_eq!(dispatcher.borrow_mut().dispatch(InputCode(87), true), 0);
    assert_eq!(dispatcher.borrow().binding_count(), 0);
}
