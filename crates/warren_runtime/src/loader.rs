//! Room sources: where room records actually come from.
//!
//! Both sources here resolve requests on the *next poll*, never inside
//! `request` itself, so the pending state is always observable and
//! completions land at the top of a tick the way a remote fetch would.

use std::collections::HashMap;
use std::path::PathBuf;

use warren_engine::RoomSource;
use warren_foundation::{Error, Result, RoomData, RoomId};

/// Decodes one JSON room record, checks it describes the expected room,
/// and validates it.
///
/// # Errors
/// Returns a bad-room-data error for JSON that does not parse, a record
/// whose id is not `expected`, or a record that fails validation.
pub fn decode_room(expected: &RoomId, json: &str) -> Result<RoomData> {
    let data: RoomData = serde_json::from_str(json)
        .map_err(|err| Error::bad_room_data(expected.clone(), err.to_string()))?;
    if data.id != *expected {
        return Err(Error::bad_room_data(
            expected.clone(),
            format!("record describes room {}", data.id),
        ));
    }
    data.validate()?;
    Ok(data)
}

/// An in-memory room source.
///
/// Requests resolve after a configurable number of polls (default: the
/// next one), so tests can hold a load in the pending state for as many
/// ticks as they need. Failures can be scripted per room.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: HashMap<RoomId, RoomData>,
    failures: HashMap<RoomId, String>,
    in_flight: Vec<(RoomId, usize)>,
    latency: usize,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a servable room record; chainable.
    #[must_use]
    pub fn with_room(mut self, data: RoomData) -> Self {
        self.records.insert(data.id.clone(), data);
        self
    }

    /// Scripts a failure for a room id; chainable.
    #[must_use]
    pub fn with_failure(mut self, id: impl Into<RoomId>, reason: impl Into<String>) -> Self {
        self.failures.insert(id.into(), reason.into());
        self
    }

    /// Sets how many extra polls a request stays in flight; chainable.
    #[must_use]
    pub fn with_latency(mut self, polls: usize) -> Self {
        self.latency = polls;
        self
    }

    /// Number of requests still in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn resolve(&self, id: &RoomId) -> Result<RoomData> {
        if let Some(reason) = self.failures.get(id) {
            return Err(Error::load_failed(id.clone(), reason.clone()));
        }
        match self.records.get(id) {
            Some(data) => Ok(data.clone()),
            None => Err(Error::load_failed(id.clone(), "no such room record")),
        }
    }
}

impl RoomSource for MemorySource {
    fn request(&mut self, id: &RoomId) {
        self.in_flight.push((id.clone(), self.latency));
    }

    fn poll(&mut self) -> Vec<(RoomId, Result<RoomData>)> {
        let in_flight: Vec<(RoomId, usize)> = self.in_flight.drain(..).collect();
        let mut completions = Vec::new();
        let mut still_waiting = Vec::new();
        for (id, remaining) in in_flight {
            if remaining == 0 {
                let outcome = self.resolve(&id);
                completions.push((id, outcome));
            } else {
                still_waiting.push((id, remaining - 1));
            }
        }
        self.in_flight = still_waiting;
        completions
    }
}

/// Room records as `<dir>/<room id>.json` files.
#[derive(Debug)]
pub struct FileSource {
    dir: PathBuf,
    in_flight: Vec<RoomId>,
}

impl FileSource {
    /// Creates a source over a directory of room files.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            in_flight: Vec::new(),
        }
    }

    fn load(&self, id: &RoomId) -> Result<RoomData> {
        if id.as_str().contains(['/', '\\']) {
            return Err(Error::load_failed(id.clone(), "room id is not a file name"));
        }
        let path = self.dir.join(format!("{id}.json"));
        let json = std::fs::read_to_string(&path)
            .map_err(|err| Error::load_failed(id.clone(), err.to_string()))?;
        decode_room(id, &json)
    }
}

impl RoomSource for FileSource {
    fn request(&mut self, id: &RoomId) {
        self.in_flight.push(id.clone());
    }

    fn poll(&mut self) -> Vec<(RoomId, Result<RoomData>)> {
        let requested: Vec<RoomId> = self.in_flight.drain(..).collect();
        requested
            .into_iter()
            .map(|id| {
                let outcome = self.load(&id);
                if let Err(err) = &outcome {
                    tracing::warn!(room = %id, error = %err, "file load failed");
                }
                (id, outcome)
            })
            .collect()
    }
}
