//! Full tick cycles through the runtime driver.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use warren_engine::{event, Gob, Physics, PhysicsModule, Step, TerrainModule, World};
use warren_features::{HeadlessBackend, Render, RenderModule};
use warren_foundation::{RoomData, RoomId};
use warren_runtime::{GameLoop, MemorySource};

fn instant_loop(ticks: u64) -> GameLoop {
    GameLoop::new()
        .with_interval(Duration::from_millis(0))
        .with_tick_budget(ticks)
}

#[test]
fn the_driver_initializes_then_ticks_the_world() {
    let ticks_seen = Rc::new(RefCell::new(Vec::new()));
    let ticks_seen2 = Rc::clone(&ticks_seen);

    let mut world = World::new()
        .with_module(TerrainModule)
        .with_module(PhysicsModule::new(Physics::default()))
        .with_start_room("den");
    world.insert_room(RoomData::flat("den", 6, 6)).unwrap();

    let mut observer = Gob::new(0.0, 0.0, 0.0);
    observer.add_event_step(
        event::UPDATE,
        Step::new(move |_, ctx| ticks_seen2.borrow_mut().push(ctx.tick)),
    );
    world.add_entity_to(observer, &RoomId::from("den")).unwrap();

    instant_loop(4).run(&mut world).unwrap();

    assert_eq!(*ticks_seen.borrow(), vec![0, 1, 2, 3]);
    assert_eq!(world.tick_count(), 4);
}

#[test]
fn steps_observe_room_physics_through_the_context() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen2 = Rc::clone(&seen);

    let mut world = World::new()
        .with_module(TerrainModule)
        .with_module(PhysicsModule::new(Physics {
            gravity: 0.7,
            friction: 0.25,
        }))
        .with_start_room("den");
    world.insert_room(RoomData::flat("den", 6, 6)).unwrap();

    let mut prober = Gob::new(0.0, 0.0, 0.0);
    prober.add_event_step(
        event::UPDATE,
        Step::new(move |_, ctx| seen2.borrow_mut().push((ctx.physics.gravity, ctx.physics.friction))),
    );
    world.add_entity_to(prober, &RoomId::from("den")).unwrap();

    instant_loop(1).run(&mut world).unwrap();
    assert_eq!(*seen.borrow(), vec![(0.7, 0.25)]);
}

#[test]
fn a_whole_session_loads_draws_and_stops() {
    let backend = HeadlessBackend::shared();
    let render = Render::new(Rc::clone(&backend));

    let source = MemorySource::new()
        .with_room(RoomData::flat("annex", 6, 6))
        .with_latency(1);

    let mut world = World::new()
        .with_module(TerrainModule)
        .with_module(PhysicsModule::new(Physics::default()))
        .with_module(RenderModule::new(Rc::clone(&backend)))
        .with_source(source)
        .with_phases([event::UPDATE, event::DRAW])
        .with_start_room("lobby");
    world
        .insert_room(
            RoomData::flat("lobby", 6, 6)
                .with_neighbor(warren_foundation::Compass::N, "annex"),
        )
        .unwrap();

    let mut decoration = Gob::new(2.0, 2.0, 0.0);
    decoration.add_feature(&render, &()).unwrap();
    world
        .add_entity_to(decoration, &RoomId::from("lobby"))
        .unwrap();

    instant_loop(5).run(&mut world).unwrap();

    // The neighbor arrived during the run.
    assert!(world.room(&RoomId::from("annex")).is_some());
    // The decoration was drawn every tick.
    let draws = backend
        .borrow()
        .log
        .iter()
        .filter(|e| matches!(e, warren_features::VisualEvent::Updated { .. }))
        .count();
    assert_eq!(draws, 5);
}

#[test]
fn ticks_never_overlap_even_at_zero_interval() {
    // Reentrancy guard: a step that inspects the tick counter sees a
    // strictly increasing sequence, one per tick.
    let order = Rc::new(RefCell::new(Vec::new()));
    let order2 = Rc::clone(&order);

    let mut world = World::new()
        .with_module(TerrainModule)
        .with_start_room("den");
    world.insert_room(RoomData::flat("den", 4, 4)).unwrap();

    let mut gob = Gob::new(0.0, 0.0, 0.0);
    gob.add_event_step(
        event::UPDATE,
        Step::new(move |_, ctx| order2.borrow_mut().push(ctx.tick)),
    );
    world.add_entity_to(gob, &RoomId::from("den")).unwrap();

    instant_loop(50).run(&mut world).unwrap();

    let observed = order.borrow();
    assert_eq!(observed.len(), 50);
    assert!(observed.windows(2).all(|w| w[1] == w[0] + 1));
}
