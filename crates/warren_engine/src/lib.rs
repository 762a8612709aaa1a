//! Entity/feature composition, event dispatch, rooms, and the world tick
//! protocol for Warren.
//!
//! This crate provides:
//! - [`Gob`] - The composable, positioned game object
//! - [`Feature`] - The pluggable behavior protocol
//! - [`Step`] / [`TickCtx`] - Event-step callbacks and their per-dispatch
//!   environment
//! - [`Room`] - A bounded area with terrain and a live entity set
//! - [`World`] - Owner of the active room, the room bucket, and the tick
//!   protocol
//! - [`Module`] - The explicit cross-cutting registration seam
//! - [`RoomSource`] - The asynchronous room-loading seam

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod event;
pub mod feature;
pub mod gob;
pub mod module;
pub mod physics;
pub mod room;
pub mod source;
pub mod terrain;
pub mod tick;
pub mod world;

pub use event::{Step, TickCtx, TransitionRequest};
pub use feature::Feature;
pub use gob::Gob;
pub use module::{Module, PhysicsModule, TerrainModule};
pub use physics::Physics;
pub use room::Room;
pub use source::{NullSource, RoomSource};
pub use terrain::TerrainGrid;
pub use tick::TickReport;
pub use world::{LoadStatus, World};
