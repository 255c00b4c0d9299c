//! Manhole - a minimalist arcade game about closing manhole covers
//!
//! Core modules:
//! - `sim`: Game state machine, cover geometry, hit-testing and entity update
//! - `game_loop`: Render/update thread synchronized with host surface and input
//! - `renderer`: Frame composition onto a host canvas
//! - `platform`: Host collaborator traits (surface, assets) and an in-memory surface
//! - `persistence`: Save/restore snapshots of the running game
//! - `settings`: Tunables loaded from JSON

pub mod game_loop;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{GameThread, LoopError, SharedGameState};
pub use settings::{AutoplaySettings, Settings, SettingsError};

/// Game configuration constants
///
/// Positions are ratios of the reference background (800x506) so the layout
/// scales with whatever surface the host hands us.
pub mod consts {
    /// Left cover column (reference line X1)
    pub const COVER_RATIO_X1: f32 = 216.5 / 800.0;
    /// Right cover column (reference line X2)
    pub const COVER_RATIO_X2: f32 = 539.0 / 800.0;
    /// Upper cover row (reference line Y1)
    pub const COVER_RATIO_Y1: f32 = 132.0 / 506.0;
    /// Lower cover row (reference line Y2)
    pub const COVER_RATIO_Y2: f32 = 370.0 / 506.0;
    /// Cover width relative to surface width
    pub const COVER_RATIO_WIDTH: f32 = 43.0 / 800.0;
    /// Cover height relative to surface height
    pub const COVER_RATIO_HEIGHT: f32 = 10.0 / 506.0;

    /// Man sprite width relative to surface width
    pub const MAN_RATIO_WIDTH: f32 = 43.0 / 800.0;
    /// Man sprite height relative to surface height
    pub const MAN_RATIO_HEIGHT: f32 = 130.0 / 800.0;

    /// Horizontal walk step per tick, relative to surface width
    pub const STEP_RATIO_X: f32 = 30.0 / 800.0;

    /// Tap tolerance is one eighth of the surface on each axis
    pub const TOLERANCE_DIVISOR: f32 = 8.0;

    /// Grace period after start/unpause before anything moves
    pub const WARMUP_MS: u64 = 100;
}
