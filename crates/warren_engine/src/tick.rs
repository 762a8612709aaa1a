//! Tick orchestration.
//!
//! A tick is the fundamental unit of engine time. Each tick:
//! 1. Drains room-load completions from the source
//! 2. Fires each configured phase across the active room's entity tree
//! 3. Resolves queued room-boundary transitions
//! 4. Advances the tick counter
//!
//! A tick always runs to completion before the next is scheduled; the
//! runtime driver owns the schedule, the world owns the protocol.

use warren_foundation::RoomId;

use crate::world::{LoadState, World};

/// Summary of one executed tick.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// The tick number that was just executed (pre-increment).
    pub tick: u64,
    /// Rooms that finished loading during this tick.
    pub rooms_loaded: Vec<RoomId>,
    /// Rooms whose load failed during this tick, with reasons.
    pub rooms_failed: Vec<(RoomId, String)>,
    /// Boundary transitions resolved this tick.
    pub transitions: usize,
}

impl World {
    /// Executes one tick.
    ///
    /// Nothing in the tick protocol is fatal: load failures are
    /// recorded and reported, failed transitions are logged and
    /// skipped, and a world with no active room simply advances its
    /// counter.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport {
            tick: self.tick_count,
            ..TickReport::default()
        };

        // Phase 1: loader completions. These arrive out-of-band
        // relative to ticks but run on the tick's own thread of
        // control. The active room may have changed since the request
        // was made, so completions only populate the bucket; nothing
        // here assumes the loaded room is (still) wanted.
        for (id, result) in self.source.poll() {
            match result.and_then(|data| self.insert_room(data)) {
                Ok(loaded) => {
                    tracing::info!(room = %loaded, "room loaded");
                    report.rooms_loaded.push(loaded);
                }
                Err(err) => {
                    let reason = err.to_string();
                    tracing::warn!(room = %id, error = %reason, "room load failed");
                    self.loads
                        .insert(id.clone(), LoadState::Failed(reason.clone()));
                    self.failures.push((id.clone(), reason.clone()));
                    report.rooms_failed.push((id, reason));
                }
            }
        }

        // Phase 2: fire the configured phases across the active room.
        let mut transitions = Vec::new();
        if let Some(active) = self.active.clone() {
            let phases = self.phases.clone();
            if let Some(room) = self.rooms.get_mut(&active) {
                for phase in &phases {
                    room.fire_event(phase, self.tick_count, &mut transitions);
                }
            }
        }

        // Phase 3: room-boundary transitions requested by steps.
        report.transitions = self.resolve_transitions(transitions);

        // Phase 4: advance.
        self.tick_count += 1;
        report
    }
}
