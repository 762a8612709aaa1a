//! Drivers for the Warren engine.
//!
//! This crate provides:
//! - [`GameLoop`] - Fixed-interval tick scheduling with an explicit
//!   stop flag
//! - [`MemorySource`] - An in-memory room source with queued
//!   completions and scriptable failures
//! - [`FileSource`] - Room records as JSON files on disk
//! - [`decode_room`] - JSON decoding for a single room record

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod game_loop;
pub mod loader;

pub use game_loop::{GameLoop, StopHandle};
pub use loader::{decode_room, FileSource, MemorySource};
