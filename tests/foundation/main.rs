//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Vec3, Compass, RoomData, and Error.
