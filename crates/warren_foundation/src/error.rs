//! Error types for the Warren engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use thiserror::Error;

use crate::ids::{GobId, RoomId};

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Warren operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a missing-config error for a required feature option.
    #[must_use]
    pub fn missing_config(feature: &'static str, option: &'static str) -> Self {
        Self::new(ErrorKind::MissingConfig { feature, option })
    }

    /// Creates an invalid-config error for a feature option that was
    /// present but unusable.
    #[must_use]
    pub fn invalid_config(
        feature: &'static str,
        option: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidConfig {
            feature,
            option,
            reason: reason.into(),
        })
    }

    /// Creates an unknown-room error.
    #[must_use]
    pub fn unknown_room(id: RoomId) -> Self {
        Self::new(ErrorKind::UnknownRoom(id))
    }

    /// Creates a room-not-loaded error.
    #[must_use]
    pub fn room_not_loaded(id: RoomId) -> Self {
        Self::new(ErrorKind::RoomNotLoaded(id))
    }

    /// Creates a load-failed error.
    #[must_use]
    pub fn load_failed(id: RoomId, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoadFailed {
            room: id,
            reason: reason.into(),
        })
    }

    /// Creates an entity-not-found error.
    #[must_use]
    pub fn entity_not_found(id: GobId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a malformed-room-data error.
    #[must_use]
    pub fn bad_room_data(id: RoomId, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRoomData {
            room: id,
            reason: reason.into(),
        })
    }

    /// Creates a no-active-room error.
    #[must_use]
    pub fn no_active_room() -> Self {
        Self::new(ErrorKind::NoActiveRoom)
    }

    /// Creates an internal error (should not happen).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A required feature config option was absent.
    #[error("feature {feature}: missing required option {option}")]
    MissingConfig {
        /// The feature being attached.
        feature: &'static str,
        /// The option that was missing.
        option: &'static str,
    },

    /// A feature config option was present but unusable.
    #[error("feature {feature}: invalid option {option}: {reason}")]
    InvalidConfig {
        /// The feature being attached.
        feature: &'static str,
        /// The offending option.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// No room with this identifier is known to the world.
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),

    /// The room is declared but its data has not arrived yet.
    #[error("room not loaded: {0}")]
    RoomNotLoaded(RoomId),

    /// The external loader reported a failure for this room.
    #[error("failed to load room {room}: {reason}")]
    LoadFailed {
        /// The room that was requested.
        room: RoomId,
        /// The loader's failure description.
        reason: String,
    },

    /// A room record failed validation.
    #[error("malformed data for room {room}: {reason}")]
    BadRoomData {
        /// The room the record claimed to describe.
        room: RoomId,
        /// What was wrong with it.
        reason: String,
    },

    /// An entity was not found where the caller expected it.
    #[error("entity not found: {0}")]
    EntityNotFound(GobId),

    /// The world has no active room to operate on.
    #[error("no active room")]
    NoActiveRoom,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
