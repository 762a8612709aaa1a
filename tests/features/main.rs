//! Integration tests for Layer 2: Features
//!
//! Tests for input-driven movement, the vertical rule, and rendering,
//! run through whole rooms and worlds rather than single gobs.

mod controls;
mod movement;
