//! Simulation tick
//!
//! One call per loop iteration. Men only walk right by one step; falling and
//! turning around are not part of the game yet.

use std::time::Instant;

use super::state::{GamePhase, GameState};

/// Advance the game state by one tick at wall-clock time `now`
///
/// Returns whether anything moved. Nothing happens outside Running or while
/// the start/unpause warm-up is still pending.
pub fn tick(state: &mut GameState, now: Instant) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    if !state.warmed_up(now) {
        return false;
    }

    let step = state.layout.step_x;
    for man in &mut state.men {
        man.pos.x += step;
    }
    !state.men.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn running_state(t0: Instant) -> GameState {
        let mut state = GameState::new();
        state.resize(800, 506);
        state.start(t0);
        state
    }

    #[test]
    fn test_warmup_suppresses_motion() {
        let t0 = Instant::now();
        let mut state = running_state(t0);
        let start_x = state.men[0].pos.x;

        assert!(!tick(&mut state, t0 + Duration::from_millis(50)));
        assert_eq!(state.men[0].pos.x, start_x);

        assert!(tick(&mut state, t0 + Duration::from_millis(150)));
        assert!((state.men[0].pos.x - (start_x + state.layout.step_x)).abs() < 1e-4);
        assert!((state.layout.step_x - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_one_step_per_tick() {
        let t0 = Instant::now();
        let mut state = running_state(t0);
        let later = t0 + Duration::from_secs(1);
        for _ in 0..3 {
            tick(&mut state, later);
        }
        assert!((state.men[0].pos.x - 90.0).abs() < 1e-3);
        // No vertical motion
        assert!((state.men[0].pos.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_paused_state_is_frozen() {
        let t0 = Instant::now();
        let mut state = running_state(t0);
        state.pause();
        assert!(!tick(&mut state, t0 + Duration::from_secs(1)));
        assert_eq!(state.men[0].pos.x, 0.0);
    }

    #[test]
    fn test_unpause_restarts_warmup() {
        let t0 = Instant::now();
        let mut state = running_state(t0);
        let t1 = t0 + Duration::from_secs(1);
        tick(&mut state, t1);
        state.pause();
        state.unpause(t1);

        assert!(!tick(&mut state, t1 + Duration::from_millis(50)));
        assert!(tick(&mut state, t1 + Duration::from_millis(150)));
        assert!((state.men[0].pos.x - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_ready_state_does_not_tick() {
        let mut state = GameState::new();
        state.resize(800, 506);
        state.spawn_man(glam::Vec2::ZERO);
        assert!(!tick(&mut state, Instant::now()));
        assert_eq!(state.men[0].pos.x, 0.0);
    }

    #[test]
    fn test_all_men_advance_in_order() {
        let t0 = Instant::now();
        let mut state = running_state(t0);
        state.start(t0);
        assert_eq!(state.men.len(), 2);
        tick(&mut state, t0 + Duration::from_secs(1));
        assert!(state.men.iter().all(|m| (m.pos.x - 30.0).abs() < 1e-3));
        assert!(state.men[0].id < state.men[1].id);
    }
}
