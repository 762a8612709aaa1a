//! Warren - Room-based 2.5D game engine
//!
//! This crate re-exports all layers of the Warren engine for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: warren_runtime    — Game loop driver, room sources
//! Layer 2: warren_features   — Motor, jump, input binding, render, sprites
//! Layer 1: warren_engine     — Gobs, events, features, rooms, world, ticks
//! Layer 0: warren_foundation — Core types (Vec3, Compass, RoomData, Error)
//! ```

pub use warren_engine as engine;
pub use warren_features as features;
pub use warren_foundation as foundation;
pub use warren_runtime as runtime;
