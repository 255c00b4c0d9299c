//! Manhole entry point
//!
//! Native headless run: drives the game loop against an in-memory surface
//! with a seeded autoplayer standing in for the player's taps.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use manhole::platform::{FrameBuffer, SolidAssets};
use manhole::sim::{GameEvent, Layout, Slot};
use manhole::{GameThread, Settings};

/// Reference background size
const SURFACE_WIDTH: u32 = 800;
const SURFACE_HEIGHT: u32 = 506;

/// Pick the next tap: usually on a random slot, sometimes dead center
fn autoplay_tap(rng: &mut Pcg32, layout: &Layout, miss_chance: f32) -> (f32, f32) {
    let center = (layout.width as f32 / 2.0, layout.height as f32 / 2.0);
    if rng.random::<f32>() < miss_chance {
        return center;
    }
    let Some(slot) = Slot::from_index(rng.random_range(1..=4)) else {
        return center;
    };
    let anchor = layout.covers.anchor(slot);
    // Land somewhere inside the tolerance window
    let jitter_x = rng.random_range(-0.5..0.5) * layout.tolerance.x;
    let jitter_y = rng.random_range(-0.5..0.5) * layout.tolerance.y;
    (anchor.x + jitter_x, anchor.y + jitter_y)
}

fn main() {
    env_logger::init();
    log::info!("Manhole (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let surface = Arc::new(FrameBuffer::new(SURFACE_WIDTH, SURFACE_HEIGHT));
    let mut game = GameThread::new(Arc::clone(&surface), SolidAssets::default(), &settings);
    let events = game.events();

    if let Err(e) = game.surface_created() {
        log::error!("Could not start game loop: {}", e);
        std::process::exit(1);
    }
    game.surface_changed(SURFACE_WIDTH, SURFACE_HEIGHT);

    let autoplay = &settings.autoplay;
    let mut rng = Pcg32::seed_from_u64(autoplay.seed);
    let mut layout = game.read(|shared| shared.game.layout);
    let started = Instant::now();
    let deadline = started + Duration::from_millis(autoplay.duration_ms);
    let halfway = started + Duration::from_millis(autoplay.duration_ms / 2);
    let tap_interval = Duration::from_millis(autoplay.tap_interval_ms.max(1));
    let mut resized = false;

    while Instant::now() < deadline {
        // Host shrinks the window halfway through
        if !resized && Instant::now() >= halfway {
            let (width, height) = (SURFACE_WIDTH / 2, SURFACE_HEIGHT / 2);
            surface.resize(width, height);
            game.surface_changed(width, height);
            layout = game.read(|shared| shared.game.layout);
            resized = true;
        }

        let (x, y) = autoplay_tap(&mut rng, &layout, autoplay.miss_chance);
        match game.touch_down(x, y) {
            Some(slot) => log::info!("Tap ({:.0}, {:.0}) closed cover {}", x, y, slot.index()),
            None => log::info!("Tap ({:.0}, {:.0}) missed", x, y),
        }
        thread::sleep(tap_interval);
    }

    // Host loses focus: the game must pause
    game.focus_changed(false);

    let snapshot = game.save_state();
    match snapshot.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not encode snapshot: {}", e),
    }

    game.surface_destroyed();
    log::info!("{} frames posted", surface.frames_posted());

    if let Some(events) = events {
        for event in events.try_iter() {
            if let GameEvent::PhaseChanged { from, to, message } = event {
                log::debug!("Phase {} -> {} ({})", from.as_str(), to.as_str(), message.unwrap_or_default());
            }
        }
    }
}
