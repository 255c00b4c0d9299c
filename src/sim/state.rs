//! Game state and core simulation types
//!
//! `GameState` is the single aggregate the game loop and the input side share:
//! phase, layout, open cover and the men walking across the scene.

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Layout, Rect, Slot};
use super::hit::hit_test;
use crate::consts::WARMUP_MS;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first touch, nothing moves
    #[default]
    Ready,
    /// Simulation frozen, last frame keeps being drawn
    Paused,
    /// Active gameplay
    Running,
    /// Terminal display state
    Win,
    /// Terminal display state
    Lose,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "Ready",
            GamePhase::Paused => "Paused",
            GamePhase::Running => "Running",
            GamePhase::Win => "Win",
            GamePhase::Lose => "Lose",
        }
    }
}

/// A walking man
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Man {
    pub id: u32,
    /// Top-left corner of the sprite, surface pixels
    pub pos: Vec2,
}

/// Notifications for the host, drained by the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
        message: Option<String>,
    },
    CoverOpened(Slot),
    ManSpawned {
        id: u32,
    },
}

/// Complete mutable game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Geometry for the current surface size
    pub layout: Layout,
    /// Slot closed by the most recent successful touch
    pub active_cover: Option<Slot>,
    /// Men in spawn order
    pub men: Vec<Man>,
    /// Simulation holds still until this instant
    resume_at: Option<Instant>,
    warmup: Duration,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_warmup(Duration::from_millis(WARMUP_MS))
    }

    /// Create a state whose start/unpause grace period is `warmup`
    pub fn with_warmup(warmup: Duration) -> Self {
        Self {
            phase: GamePhase::Ready,
            layout: Layout::default(),
            active_cover: None,
            men: Vec::new(),
            resume_at: None,
            warmup,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a man at `pos`, returning its id
    pub fn spawn_man(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.men.push(Man { id, pos });
        self.events.push(GameEvent::ManSpawned { id });
        id
    }

    /// Enter Running from any phase and drop in a new man
    pub fn start(&mut self, now: Instant) {
        self.resume_at = Some(now + self.warmup);
        self.set_phase(GamePhase::Running, None);
        let spawn = self.layout.spawn_point();
        let id = self.spawn_man(spawn);
        log::debug!("Started, man {} at ({}, {})", id, spawn.x, spawn.y);
    }

    /// Freeze the simulation; only has an effect while Running
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.set_phase(GamePhase::Paused, None);
        }
    }

    /// Enter Running from any phase after the warm-up delay
    pub fn unpause(&mut self, now: Instant) {
        self.resume_at = Some(now + self.warmup);
        self.set_phase(GamePhase::Running, None);
    }

    /// Unconditionally switch phase, optionally with a message for the host
    pub fn set_phase(&mut self, phase: GamePhase, message: Option<&str>) {
        let from = self.phase;
        self.phase = phase;
        if let Some(message) = message {
            log::info!("{} -> {}: {}", from.as_str(), phase.as_str(), message);
        } else if from != phase {
            log::info!("{} -> {}", from.as_str(), phase.as_str());
        }
        if from != phase || message.is_some() {
            self.events.push(GameEvent::PhaseChanged {
                from,
                to: phase,
                message: message.map(str::to_owned),
            });
        }
    }

    /// Swap in the layout for a new surface size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_layout(Layout::recompute(width, height));
    }

    /// Swap in a layout computed ahead of time (e.g. outside a lock)
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        log::debug!("Surface resized to {}x{}", layout.width, layout.height);
    }

    /// Handle a touch-down at `point`
    ///
    /// Starts the game if it isn't running, then closes the cover of the
    /// touched slot. A miss leaves the open cover untouched.
    pub fn touch(&mut self, point: Vec2, now: Instant) -> Option<Slot> {
        if self.phase != GamePhase::Running {
            self.start(now);
        }

        let slot = hit_test(point, &self.layout)?;
        let rect = self.layout.cover_rect(slot);
        log::debug!("Setting cover {} to ({}, {})", slot.index(), rect.left, rect.top);
        self.active_cover = Some(slot);
        self.events.push(GameEvent::CoverOpened(slot));
        Some(slot)
    }

    /// Rectangle of the closed cover on the current layout
    pub fn active_cover_rect(&self) -> Option<Rect> {
        self.active_cover.map(|slot| self.layout.cover_rect(slot))
    }

    /// True once the warm-up delay set by start/unpause has elapsed
    pub fn warmed_up(&self, now: Instant) -> bool {
        self.resume_at.is_none_or(|at| at <= now)
    }

    /// Replace every man with fresh ones at `positions`
    pub(crate) fn replace_men(&mut self, positions: impl IntoIterator<Item = Vec2>) {
        self.men.clear();
        for pos in positions {
            let id = self.next_entity_id();
            self.men.push(Man { id, pos });
        }
    }

    pub(crate) fn clear_resume(&mut self) {
        self.resume_at = None;
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
