//! Room-boundary transitions, end to end: motor ticks push an entity
//! over an edge, the world moves it atomically.

use warren_engine::{Gob, Physics, PhysicsModule, TerrainModule, World};
use warren_features::{Motor, MotorConfig, Velocity};
use warren_foundation::{Compass, RoomData, RoomId, Vec3};

fn two_room_world() -> World {
    let mut world = World::new()
        .with_module(TerrainModule)
        .with_module(PhysicsModule::new(Physics::default()));
    world
        .insert_room(RoomData::flat("a", 15, 8).with_neighbor(Compass::E, "r2"))
        .unwrap();
    world
        .insert_room(RoomData::flat("r2", 15, 8).with_neighbor(Compass::W, "a"))
        .unwrap();
    world.set_active_room(&RoomId::from("a")).unwrap();
    world
}

#[test]
fn an_entity_walking_east_crosses_into_the_neighbor() {
    let mut world = two_room_world();

    // The reference scenario: 15x8 room, entity at (14.6, 3, 0) with
    // x-velocity 2 and an east neighbor.
    let mut gob = Gob::new(14.6, 3.0, 0.0);
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(2.0, 0.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    world.tick();

    assert_eq!(world.active_id(), Some(&RoomId::from("r2")));
    assert!(!world.room(&RoomId::from("a")).unwrap().contains(id));
    let arrived = world.room(&RoomId::from("r2")).unwrap().entity(id).unwrap();
    assert_eq!(arrived.x, 0.0, "wrapped to the opposite edge");
    assert_eq!(arrived.y, 3.0, "the other axis is untouched");

    // The wrap itself did not touch the velocity; only that tick's
    // friction did.
    let velocity = arrived.state::<Velocity>().unwrap().0;
    assert!((velocity.x - 2.0 * 0.9).abs() < 1e-9);
}

#[test]
fn walking_back_west_returns_through_the_same_seam() {
    let mut world = two_room_world();
    world.set_active_room(&RoomId::from("r2")).unwrap();

    let mut gob = Gob::new(0.4, 3.0, 0.0);
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(-50.0, 0.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    world.tick();

    assert_eq!(world.active_id(), Some(&RoomId::from("a")));
    assert_eq!(
        world.room(&RoomId::from("a")).unwrap().entity(id).unwrap().x,
        14.0,
        "west exits arrive at the east edge"
    );
}

#[test]
fn an_edge_without_a_neighbor_is_a_wall() {
    let mut world = two_room_world();

    // South has no neighbor declared.
    let mut gob = Gob::new(7.0, 7.9, 0.0);
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(0.0, 60.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    world.tick();

    assert_eq!(world.active_id(), Some(&RoomId::from("a")));
    let gob = world.room(&RoomId::from("a")).unwrap().entity(id).unwrap();
    assert_eq!(gob.y, 7.0, "clamped to the room extent");
    assert!(world.room(&RoomId::from("a")).unwrap().contains(id));
}

#[test]
fn membership_is_never_doubled_or_dropped_across_many_crossings() {
    let mut world = two_room_world();

    let mut gob = Gob::new(14.5, 3.0, 0.0);
    gob.add_feature(&Motor, &MotorConfig::default()).unwrap();
    gob.state_mut::<Velocity>().unwrap().0 = Vec3::new(80.0, 0.0, 0.0);
    let id = world.add_entity(gob).unwrap();

    for _ in 0..300 {
        world.tick();
        let in_a = world.room(&RoomId::from("a")).unwrap().contains(id);
        let in_r2 = world.room(&RoomId::from("r2")).unwrap().contains(id);
        assert!(
            in_a != in_r2,
            "exactly one room owns the entity at all times"
        );
    }
}
