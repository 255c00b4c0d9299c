//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of threads,
//! rendering and platform dependencies:
//! - Wall-clock time is passed in, never read
//! - Geometry is an immutable value rebuilt on every resize
//! - Entities iterate in spawn order

pub mod geometry;
pub mod hit;
pub mod state;
pub mod tick;

pub use geometry::{CoverGeometry, Layout, Rect, Slot, SpriteSize, TapTolerance};
pub use hit::hit_test;
pub use state::{GameEvent, GamePhase, GameState, Man};
pub use tick::tick;
