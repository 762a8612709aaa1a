//! Core types for the Warren engine.
//!
//! This crate provides:
//! - [`Vec3`] - 3D motion vector used by the physics features
//! - [`Compass`] - Eight-way directions for room neighbor slots
//! - [`RoomData`] - The externally-loaded room record
//! - [`Error`] - Rich error types with context
//! - Identifier newtypes ([`GobId`], [`RoomId`], [`HandleId`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod compass;
mod error;
mod ids;
mod room_data;
mod vector;

pub use compass::Compass;
pub use error::{Error, ErrorKind, Result};
pub use ids::{GobId, HandleId, RoomId};
pub use room_data::{Neighbors, PhysicsSpec, RoomData};
pub use vector::Vec3;
