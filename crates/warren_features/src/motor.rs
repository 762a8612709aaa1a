//! The motor feature: directional movement with friction and terrain
//! collision.

use warren_engine::{event, Feature, Gob, Step, TickCtx};
use warren_foundation::{Compass, Error, Result, Vec3};

use crate::binding::{self, ControllerHandle};

/// Velocity state shared by the physics features, in velocity units
/// (grid units per 100 ticks).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec3);

/// Grid units moved per velocity unit per tick.
const VELOCITY_SCALE: f64 = 0.01;

/// Speed used when the config leaves it unset.
const DEFAULT_SPEED: f64 = 1.0;

/// Velocity components smaller than this collapse to zero after
/// friction, so a coasting entity comes to an actual stop.
const REST_THRESHOLD: f64 = 1e-6;

/// Attach-time configuration for [`Motor`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MotorConfig {
    /// Impulse per active directional action per tick. Unset resolves
    /// to `1.0`; a set value must be finite and positive.
    pub speed: Option<f64>,
}

impl MotorConfig {
    /// Config with an explicit speed.
    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        Self { speed: Some(speed) }
    }
}

struct MotorState {
    speed: f64,
    step: Step,
}

/// Directional movement for entities with a controller.
///
/// Each `update` tick the motor adds a speed-sized impulse per active
/// directional action, applies the room's friction decay, integrates
/// position from velocity, rejects the ground-plane delta when the
/// terrain rises above the entity, and requests a room transition when
/// the entity leaves the grid.
#[derive(Debug, Default)]
pub struct Motor;

impl Feature for Motor {
    type Config = MotorConfig;

    fn name(&self) -> &'static str {
        "motor"
    }

    fn attach(&self, gob: &mut Gob, config: &MotorConfig) -> Result<()> {
        let speed = match config.speed {
            None => DEFAULT_SPEED,
            Some(speed) if speed.is_finite() && speed > 0.0 => speed,
            Some(bad) => {
                return Err(Error::invalid_config(
                    "motor",
                    "speed",
                    format!("must be finite and positive, got {bad}"),
                ));
            }
        };

        if gob.state::<Velocity>().is_none() {
            gob.put_state(Velocity::default());
        }
        let step = Step::new(motor_update);
        gob.add_event_step(event::UPDATE, step.clone());
        gob.put_state(MotorState { speed, step });
        Ok(())
    }

    fn detach(&self, gob: &mut Gob) {
        if let Some(state) = gob.take_state::<MotorState>() {
            gob.remove_event_step(event::UPDATE, &state.step);
        }
        // The velocity state stays: it is shared with the jump feature.
    }
}

fn motor_update(gob: &mut Gob, ctx: &mut TickCtx<'_>) {
    let speed = match gob.state::<MotorState>() {
        Some(state) => state.speed,
        None => return,
    };
    let Some(Velocity(mut velocity)) = gob.take_state::<Velocity>() else {
        return;
    };

    // Impulses from the controller, one per active directional action.
    let up = ControllerHandle::state_on(gob, binding::UP);
    let down = ControllerHandle::state_on(gob, binding::DOWN);
    let left = ControllerHandle::state_on(gob, binding::LEFT);
    let right = ControllerHandle::state_on(gob, binding::RIGHT);
    if up {
        velocity += Vec3::new(0.0, -speed, 0.0);
    }
    if down {
        velocity += Vec3::new(0.0, speed, 0.0);
    }
    if left {
        velocity += Vec3::new(-speed, 0.0, 0.0);
    }
    if right {
        velocity += Vec3::new(speed, 0.0, 0.0);
    }

    // Ground-plane friction decay. Vertical decay is gravity's job.
    let friction = ctx.physics.friction;
    velocity.x -= velocity.x * friction;
    velocity.y -= velocity.y * friction;
    if velocity.x.abs() < REST_THRESHOLD {
        velocity.x = 0.0;
    }
    if velocity.y.abs() < REST_THRESHOLD {
        velocity.y = 0.0;
    }

    // Integrate.
    let delta = velocity.scale(VELOCITY_SCALE);
    gob.x += delta.x;
    gob.y += delta.y;
    gob.z += delta.z;

    // Terrain collision: reject the ground-plane delta when the target
    // cell's surface is above the entity.
    let ground = ctx.terrain.ground_height(gob.x, gob.y);
    if ground > gob.z {
        gob.x -= delta.x;
        velocity.x = 0.0;
        gob.y -= delta.y;
        velocity.y = 0.0;
    }

    // Room-boundary exits, x before y; one request per tick.
    if !ctx.terrain.is_empty() {
        let max_x = f64::from(ctx.terrain.width()) - 1.0;
        let max_y = f64::from(ctx.terrain.height()) - 1.0;
        if gob.x > max_x {
            ctx.request_transition(gob.id(), Compass::E);
        } else if gob.x < 0.0 {
            ctx.request_transition(gob.id(), Compass::W);
        } else if gob.y > max_y {
            ctx.request_transition(gob.id(), Compass::S);
        } else if gob.y < 0.0 {
            ctx.request_transition(gob.id(), Compass::N);
        }
    }

    gob.put_state(Velocity(velocity));
}
