//! The room-loading seam.
//!
//! Room records come from outside the engine: a directory of files, a
//! server, a test fixture. Loading is modeled as request/poll rather
//! than callbacks: the world requests an id, and completions are
//! drained at the top of each tick on the same logical thread as the
//! tick itself. A source is free to resolve requests immediately, on a
//! later poll, or never.

use warren_foundation::{Error, Result, RoomData, RoomId};

/// An external origin of room records.
pub trait RoomSource {
    /// Begins loading a room. Requesting an id that is already in
    /// flight is harmless.
    fn request(&mut self, id: &RoomId);

    /// Drains finished loads. Each completed request yields exactly one
    /// entry, successful or failed; pending requests stay in flight.
    fn poll(&mut self) -> Vec<(RoomId, Result<RoomData>)>;
}

/// The default source for worlds that never load rooms dynamically:
/// every request fails on the next poll.
#[derive(Debug, Default)]
pub struct NullSource {
    requested: Vec<RoomId>,
}

impl RoomSource for NullSource {
    fn request(&mut self, id: &RoomId) {
        self.requested.push(id.clone());
    }

    fn poll(&mut self) -> Vec<(RoomId, Result<RoomData>)> {
        self.requested
            .drain(..)
            .map(|id| {
                let err = Error::load_failed(id.clone(), "no room source configured");
                (id, Err(err))
            })
            .collect()
    }
}
