//! Save/restore snapshots
//!
//! A snapshot carries what is needed to put the scene back:
//! - Game phase
//! - Which slot's cover is closed
//! - Where every man stands
//!
//! Encoded as a versioned JSON document. Restoring a game that was running
//! brings it back paused.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{GamePhase, GameState, Slot};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("man {index} has a non-finite position")]
    NonFinitePosition { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManSnapshot {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub phase: GamePhase,
    pub active_slot: Option<Slot>,
    pub men: Vec<ManSnapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

/// Capture the persistent part of `state`
pub fn save_state(state: &GameState) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        phase: state.phase,
        active_slot: state.active_cover,
        men: state.men.iter().map(|m| ManSnapshot { x: m.pos.x, y: m.pos.y }).collect(),
    }
}

/// Replace the persistent part of `state` with `snapshot`
///
/// Layout is left alone: it belongs to the current surface, not the save.
pub fn restore_state(state: &mut GameState, snapshot: Snapshot) -> Result<(), PersistenceError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    if let Some(index) = snapshot.men.iter().position(|m| !(m.x.is_finite() && m.y.is_finite())) {
        return Err(PersistenceError::NonFinitePosition { index });
    }

    state.active_cover = snapshot.active_slot;
    state.replace_men(snapshot.men.iter().map(|m| Vec2::new(m.x, m.y)));
    state.clear_resume();

    let phase = match snapshot.phase {
        GamePhase::Running => GamePhase::Paused,
        other => other,
    };
    state.set_phase(phase, Some("restored"));
    log::info!("Restored {} men, phase {}", state.men.len(), phase.as_str());
    Ok(())
}
