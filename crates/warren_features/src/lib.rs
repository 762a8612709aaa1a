//! Stock feature library for Warren.
//!
//! This crate provides:
//! - [`Motor`] - Directional movement with friction and terrain collision
//! - [`Jump`] - The three-state vertical movement rule
//! - [`InputBinding`] / [`InputDispatcher`] - Raw input codes to named
//!   action states
//! - [`Render`] / [`VisualBackend`] - The render collaborator seam
//! - [`Sprite`] - Frame sequences advancing on a tick timer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod jump;
pub mod motor;
pub mod render;
pub mod sprite;

pub use binding::{Controller, ControllerHandle, InputBinding, InputCode, InputDispatcher, InputMap};
pub use jump::{Jump, JumpConfig};
pub use motor::{Motor, MotorConfig, Velocity};
pub use render::{HeadlessBackend, Render, RenderModule, VisualBackend, VisualEvent};
pub use sprite::{Frame, Sprite};
