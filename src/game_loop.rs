//! Game loop thread and host callbacks
//!
//! Two flows of control share one `SharedGameState` behind one mutex:
//! - the loop thread: lock canvas, lock state, tick, draw, post
//! - the host: surface lifecycle, touches and focus changes
//!
//! Stopping is cooperative: the host clears the running flag and joins the
//! thread before tearing the surface down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;
use thiserror::Error;

use crate::persistence::{self, PersistenceError, Snapshot};
use crate::platform::{AssetProvider, Surface, lock, with_canvas};
use crate::renderer::{Color, SpriteSet, draw_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Layout, Slot, tick};

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("game loop is already running")]
    AlreadyRunning,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Everything both flows touch, guarded as one unit
#[derive(Debug, Default)]
pub struct SharedGameState {
    pub game: GameState,
    /// Sprites scaled for `game.layout`
    pub sprites: SpriteSet,
    /// Host end of the event channel, once someone asked for it
    events: Option<Sender<GameEvent>>,
}

impl SharedGameState {
    pub fn new(game: GameState) -> Self {
        Self {
            game,
            sprites: SpriteSet::default(),
            events: None,
        }
    }

    /// Forward pending game events to the host
    ///
    /// Events are always drained; without a listener they are dropped.
    fn flush_events(&mut self) {
        let pending = self.game.drain_events();
        let Some(events) = &self.events else {
            return;
        };
        for event in pending {
            if events.send(event).is_err() {
                log::debug!("Event receiver dropped");
                self.events = None;
                return;
            }
        }
    }
}

/// One loop iteration: advance (if running) and paint a frame
///
/// When the surface can't be locked the frame is skipped but the simulation
/// still advances.
pub fn run_frame<S: Surface + ?Sized>(
    surface: &S,
    shared: &Mutex<SharedGameState>,
    cover_color: Color,
    now: Instant,
) {
    let drawn = with_canvas(surface, |canvas| {
        let mut shared = lock(shared);
        tick(&mut shared.game, now);
        draw_frame(canvas, &shared.game, &shared.sprites, cover_color);
        shared.flush_events();
    });

    if drawn.is_none() {
        let mut shared = lock(shared);
        tick(&mut shared.game, now);
        shared.flush_events();
    }
}

/// Owns the loop thread and exposes the host-facing callbacks
pub struct GameThread<S: Surface, A: AssetProvider> {
    surface: Arc<S>,
    assets: A,
    shared: Arc<Mutex<SharedGameState>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    cover_color: Color,
    frame_interval: Option<Duration>,
}

impl<S: Surface, A: AssetProvider> GameThread<S, A> {
    pub fn new(surface: Arc<S>, assets: A, settings: &Settings) -> Self {
        Self {
            surface,
            assets,
            shared: Arc::new(Mutex::new(SharedGameState::new(GameState::with_warmup(settings.warmup())))),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            cover_color: settings.cover_color,
            frame_interval: settings.frame_interval(),
        }
    }

    /// Open the event channel and hand back its receiving end
    ///
    /// Returns None if a channel is already open; a dropped receiver is
    /// noticed on the next send. Events raised before the channel is opened
    /// are not kept.
    pub fn events(&self) -> Option<Receiver<GameEvent>> {
        let mut shared = lock(&self.shared);
        if shared.events.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::channel();
        shared.events = Some(tx);
        Some(rx)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Inspect the shared state under the lock
    pub fn read<R>(&self, exec: impl FnOnce(&SharedGameState) -> R) -> R {
        let shared = lock(&self.shared);
        exec(&shared)
    }

    /// Mutate the shared state under the lock
    pub fn write<R>(&self, exec: impl FnOnce(&mut SharedGameState) -> R) -> R {
        let mut shared = lock(&self.shared);
        let result = exec(&mut shared);
        shared.flush_events();
        result
    }

    pub fn phase(&self) -> GamePhase {
        self.read(|shared| shared.game.phase)
    }

    //////////////////////////////////////////////////
    // Surface lifecycle

    /// Surface is ready: start the loop thread
    pub fn surface_created(&mut self) -> Result<(), LoopError> {
        if self.handle.is_some() {
            return Err(LoopError::AlreadyRunning);
        }

        self.running.store(true, Ordering::Release);
        let surface = Arc::clone(&self.surface);
        let shared = Arc::clone(&self.shared);
        let running = Arc::clone(&self.running);
        let cover_color = self.cover_color;
        let frame_interval = self.frame_interval;

        let handle = thread::Builder::new()
            .name("manhole-loop".to_string())
            .spawn(move || {
                log::info!("Game loop started");
                while running.load(Ordering::Acquire) {
                    run_frame(&*surface, &shared, cover_color, Instant::now());
                    if let Some(interval) = frame_interval {
                        thread::sleep(interval);
                    }
                }
                log::info!("Game loop stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                LoopError::Spawn(e)
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Surface changed size: rebuild layout and sprites, swap both in at once
    pub fn surface_changed(&self, width: u32, height: u32) {
        let layout = Layout::recompute(width, height);
        let sprites = SpriteSet {
            background: Some(self.assets.background(layout.background_size)),
            man: Some(self.assets.man(layout.man_size)),
        };

        self.write(|shared| {
            shared.game.set_layout(layout);
            shared.sprites = sprites;
        });
        log::info!("Surface changed to {}x{}", width, height);
    }

    /// Surface is going away: stop the loop and wait for it to finish
    pub fn surface_destroyed(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Game loop thread panicked");
            }
        }
    }

    //////////////////////////////////////////////////
    // Input

    /// Touch-down at surface pixel (x, y)
    pub fn touch_down(&self, x: f32, y: f32) -> Option<Slot> {
        log::debug!("Touched: {}, {}", x, y);
        let now = Instant::now();
        self.write(|shared| shared.game.touch(Vec2::new(x, y), now))
    }

    pub fn focus_changed(&self, has_focus: bool) {
        if !has_focus {
            self.pause();
        }
    }

    //////////////////////////////////////////////////
    // State machine

    pub fn start(&self) {
        let now = Instant::now();
        self.write(|shared| shared.game.start(now));
    }

    pub fn pause(&self) {
        self.write(|shared| shared.game.pause());
    }

    pub fn unpause(&self) {
        let now = Instant::now();
        self.write(|shared| shared.game.unpause(now));
    }

    pub fn set_phase(&self, phase: GamePhase, message: Option<&str>) {
        self.write(|shared| shared.game.set_phase(phase, message));
    }

    //////////////////////////////////////////////////
    // Persistence

    pub fn save_state(&self) -> Snapshot {
        self.read(|shared| persistence::save_state(&shared.game))
    }

    pub fn restore_state(&self, snapshot: Snapshot) -> Result<(), PersistenceError> {
        self.write(|shared| persistence::restore_state(&mut shared.game, snapshot))
    }
}

impl<S: Surface, A: AssetProvider> Drop for GameThread<S, A> {
    fn drop(&mut self) {
        self.surface_destroyed();
    }
}
