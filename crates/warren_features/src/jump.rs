//! The jump feature: the three-state vertical movement rule.

use warren_engine::{event, Feature, Gob, Step, TickCtx};
use warren_foundation::{Error, Result};

use crate::binding::{self, ControllerHandle};
use crate::motor::Velocity;

/// Jump strength used when the config leaves it unset.
const DEFAULT_POWER: f64 = 3.0;

/// Attach-time configuration for [`Jump`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JumpConfig {
    /// Upward impulse applied when a grounded entity jumps. Unset
    /// resolves to `3.0`; a set value must be finite and positive.
    pub power: Option<f64>,
}

impl JumpConfig {
    /// Config with an explicit power.
    #[must_use]
    pub fn with_power(power: f64) -> Self {
        Self { power: Some(power) }
    }
}

struct JumpState {
    power: f64,
    step: Step,
}

/// Vertical movement against the terrain height field.
///
/// Each `update` tick exactly one of three things happens: a grounded
/// entity holding the jump action gets an upward impulse; an airborne
/// entity gets a gravity impulse; a grounded (or sunken) entity is
/// clamped to the ground with its vertical velocity zeroed.
#[derive(Debug, Default)]
pub struct Jump;

impl Feature for Jump {
    type Config = JumpConfig;

    fn name(&self) -> &'static str {
        "jump"
    }

    fn attach(&self, gob: &mut Gob, config: &JumpConfig) -> Result<()> {
        let power = match config.power {
            None => DEFAULT_POWER,
            Some(power) if power.is_finite() && power > 0.0 => power,
            Some(bad) => {
                return Err(Error::invalid_config(
                    "jump",
                    "power",
                    format!("must be finite and positive, got {bad}"),
                ));
            }
        };

        if gob.state::<Velocity>().is_none() {
            gob.put_state(Velocity::default());
        }
        let step = Step::new(jump_update);
        gob.add_event_step(event::UPDATE, step.clone());
        gob.put_state(JumpState { power, step });
        Ok(())
    }

    fn detach(&self, gob: &mut Gob) {
        if let Some(state) = gob.take_state::<JumpState>() {
            gob.remove_event_step(event::UPDATE, &state.step);
        }
    }
}

fn jump_update(gob: &mut Gob, ctx: &mut TickCtx<'_>) {
    let power = match gob.state::<JumpState>() {
        Some(state) => state.power,
        None => return,
    };
    let Some(Velocity(mut velocity)) = gob.take_state::<Velocity>() else {
        return;
    };

    let ground = ctx.terrain.ground_height(gob.x, gob.y);
    let jumping = ControllerHandle::state_on(gob, binding::JUMP);

    if jumping && gob.z <= ground {
        velocity.z += power;
    } else if gob.z > ground {
        velocity.z -= ctx.physics.gravity;
    } else {
        gob.z = ground;
        velocity.z = 0.0;
    }

    gob.put_state(Velocity(velocity));
}
