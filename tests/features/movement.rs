//! Motor and jump behavior through whole worlds.

use std::cell::RefCell;
use std::rc::Rc;

use warren_engine::{Physics, PhysicsModule, Gob, TerrainModule, World};
use warren_features::binding::{self, InputBinding, InputCode, InputDispatcher, InputMap};
use warren_features::{Jump, JumpConfig, Motor, MotorConfig, Velocity};
use warren_foundation::{PhysicsSpec, RoomData, Vec3};

fn world_with(data: RoomData) -> World {
    let id = data.id.clone();
    let mut world = World::new()
        .with_module(TerrainModule)
        .with_module(PhysicsModule::new(Physics::default()));
    world.insert_room(data).unwrap();
    world.set_active_room(&id).unwrap();
    world
}

#[test]
fn coasting_velocity_decays_strictly_until_rest() {
    let mut world = world_with(RoomData::flat("r", 20, 20));
    let mut gob = Gob::new(10.0, 10.0, 0.0);
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(4.0, -3.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    let magnitude = |world: &World| {
        world
            .active_room()
            .unwrap()
            .entity(id)
            .unwrap()
            .state::<Velocity>()
            .unwrap()
            .0
            .ground_magnitude()
    };

    let mut previous = magnitude(&world);
    for _ in 0..100 {
        world.tick();
        let current = magnitude(&world);
        if previous > 0.0 {
            assert!(current < previous);
        }
        previous = current;
    }

    for _ in 0..3000 {
        world.tick();
    }
    assert_eq!(magnitude(&world), 0.0);
    // And it stays there.
    world.tick();
    assert_eq!(magnitude(&world), 0.0);
}

#[test]
fn room_friction_overrides_change_the_decay_rate() {
    let slippery = RoomData::flat("ice", 20, 20).with_physics(PhysicsSpec {
        gravity: 0.5,
        friction: 0.01,
    });
    let mut icy_world = world_with(slippery);
    let mut rough_world = world_with(RoomData::flat("carpet", 20, 20));

    let launch = |world: &mut World| {
        let mut gob = Gob::new(10.0, 10.0, 0.0);
        gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
        gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(5.0, 0.0, 0.0);
        let id = world.add_entity(gob).unwrap();
        for _ in 0..50 {
            world.tick();
        }
        world
            .active_room()
            .unwrap()
            .entity(id)
            .unwrap()
            .state::<Velocity>()
            .unwrap()
            .0
            .x
    };

    let on_ice = launch(&mut icy_world);
    let on_carpet = launch(&mut rough_world);
    assert!(on_ice > on_carpet);
}

#[test]
fn a_full_jump_arc_leaves_and_returns_to_the_ground() {
    let dispatcher = Rc::new(RefCell::new(InputDispatcher::new()));
    let input = InputBinding::new(Rc::clone(&dispatcher));

    let mut world = world_with(RoomData::flat("pad", 10, 10));
    let mut gob = Gob::new(5.0, 5.0, 0.0);
    gob.add_feature(&input, &InputMap::new().bind(32, binding::JUMP))
        .unwrap();
    gob.add_feature(&Jump, &JumpConfig::default()).unwrap();
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    let id = world.add_entity(gob).unwrap();

    // Tap jump for one tick.
    dispatcher.borrow_mut().dispatch(InputCode(32), true);
    world.tick();
    dispatcher.borrow_mut().dispatch(InputCode(32), false);

    let mut peak: f64 = 0.0;
    let mut airborne_ticks = 0u32;
    for _ in 0..2000 {
        world.tick();
        let z = world.active_room().unwrap().entity(id).unwrap().z;
        peak = peak.max(z);
        if z > 0.0 {
            airborne_ticks += 1;
        }
    }

    let gob = world.active_room().unwrap().entity(id).unwrap();
    assert!(peak > 0.0, "the jump left the ground");
    assert!(airborne_ticks > 1, "the arc took time");
    assert_eq!(gob.z, 0.0, "and it came back down");
    assert_eq!(gob.state::<Velocity>().unwrap().0.z, 0.0);
}

#[test]
fn jumping_onto_a_ledge_settles_at_the_ledge_height() {
    let data = RoomData::flat("ledge", 10, 10).with_cell(5, 5, 2);
    let mut world = world_with(data);

    let mut gob = Gob::new(5.0, 5.0, 5.0); // dropped from above
    gob.add_feature(&Jump, &JumpConfig::default()).unwrap();
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    let id = world.add_entity(gob).unwrap();

    for _ in 0..2000 {
        world.tick();
    }
    assert_eq!(world.active_room().unwrap().entity(id).unwrap().z, 1.0);
}

#[test]
fn defaulted_speed_never_produces_nan_positions() {
    let mut world = world_with(RoomData::flat("r", 10, 10));
    let mut gob = Gob::new(5.0, 5.0, 0.0);
    // No speed configured at all.
    gob.add_feature(&Motor, &MotorConfig { speed: None }).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(1.0, 1.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    for _ in 0..100 {
        world.tick();
    }
    let gob = world.active_room().unwrap().entity(id).unwrap();
    assert!(gob.x.is_finite() && gob.y.is_finite() && gob.z.is_finite());
    assert!(gob.x > 5.0 && gob.y > 5.0);
}
