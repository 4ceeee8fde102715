//! Window-less driver: runs the frame loop against a synthetic clock.

use log::{debug, info};
use rand::Rng;

use crate::game::{FrameOutcome, Game};
use crate::hud::{Hud, HudElement};
use crate::input::{InputState, KeyCode};

/// How a headless session is paced and what the "player" holds down.
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Upper bound on simulated frames.
    pub frames: u32,
    /// Frames per simulated second.
    pub frame_rate: f64,
    /// Keys held for the whole session.
    pub held_keys: Vec<KeyCode>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_rate: 60.0,
            held_keys: Vec::new(),
        }
    }
}

/// Notable transitions reported while the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessEvent {
    RoundStarted { round: u32 },
    Scored { frame: u32, score: u32 },
    TimedOut { frame: u32, final_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessReport {
    pub frames_run: u32,
    pub score: u32,
    /// Set when the round ended by running out of time.
    pub final_score: Option<u32>,
    /// Synthetic time of the last simulated frame, in seconds.
    pub elapsed: f64,
}

/// Runs `game` until time runs out or the frame cap is reached.
///
/// A timed game is started at t = 0 as if the menu had been clicked.
pub fn run_headless<R, E, F>(
    game: &mut Game<R>,
    hud: &mut Hud<E>,
    options: &HeadlessOptions,
    mut on_event: F,
) -> HeadlessReport
where
    R: Rng,
    E: HudElement,
    F: FnMut(HeadlessEvent),
{
    let input = InputState::new();
    for &key in &options.held_keys {
        input.set_key_down(key);
    }

    if game.start_round(0.0, hud) {
        on_event(HeadlessEvent::RoundStarted {
            round: game.round().rounds_played(),
        });
    }

    let frame_rate = options.frame_rate.max(f64::EPSILON);
    let mut report = HeadlessReport {
        frames_run: 0,
        score: game.round().score(),
        final_score: None,
        elapsed: 0.0,
    };

    for frame in 1..=options.frames {
        let now = f64::from(frame) / frame_rate;
        report.frames_run = frame;
        report.elapsed = now;

        match game.frame(now, &input, hud) {
            FrameOutcome::Started => on_event(HeadlessEvent::RoundStarted {
                round: game.round().rounds_played(),
            }),
            FrameOutcome::Scored { score } => {
                on_event(HeadlessEvent::Scored { frame, score });
            }
            FrameOutcome::TimedOut { final_score } => {
                report.final_score = Some(final_score);
                on_event(HeadlessEvent::TimedOut { frame, final_score });
                break;
            }
            FrameOutcome::Idle | FrameOutcome::Running { .. } => {}
        }
    }

    report.score = game.round().score();
    if report.final_score.is_none() {
        info!("frame cap of {} reached", options.frames);
    }
    debug!("headless session finished: {report:?}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controls::{GROW_X, MOVE_RIGHT};

    fn options(frames: u32, held_keys: Vec<KeyCode>) -> HeadlessOptions {
        HeadlessOptions {
            frames,
            frame_rate: 10.0,
            held_keys,
        }
    }

    #[test]
    fn timed_round_stops_once_budget_is_exceeded() {
        let config = GameConfig {
            time_budget: 1.0,
            ..GameConfig::default()
        };
        let mut game = Game::seeded(config, 3).unwrap();
        let mut hud = Hud::in_memory();
        let mut events = Vec::new();

        let report = run_headless(&mut game, &mut hud, &options(100, vec![]), |event| {
            events.push(event)
        });

        // 1.1s is the first frame strictly past the budget at 10 fps.
        assert_eq!(report.frames_run, 11);
        assert_eq!(report.final_score, Some(0));
        assert_eq!(
            events,
            vec![
                HeadlessEvent::RoundStarted { round: 1 },
                HeadlessEvent::TimedOut {
                    frame: 11,
                    final_score: 0
                },
            ]
        );
        assert!(!game.is_running());
        assert!(!hud.result.is_hidden());
        assert_eq!(hud.final_score.text(), "0");
    }

    #[test]
    fn held_keys_move_and_scale_the_cube() {
        let mut game = Game::seeded(GameConfig::default(), 3).unwrap();
        let mut hud = Hud::in_memory();

        let report = run_headless(
            &mut game,
            &mut hud,
            &options(10, vec![MOVE_RIGHT, GROW_X]),
            |_| {},
        );

        assert_eq!(report.frames_run, 10);
        assert_eq!(report.final_score, None);
        assert!((game.cube().position.x - 0.2).abs() < 1e-4);
        assert!((game.cube().scale.x - 1.2).abs() < 1e-4);
    }

    #[test]
    fn free_play_runs_to_the_frame_cap() {
        let config = GameConfig {
            enable_timer: false,
            time_budget: 0.1,
            ..GameConfig::default()
        };
        let mut game = Game::seeded(config, 9).unwrap();
        let mut hud = Hud::in_memory();
        let mut events = Vec::new();

        let report = run_headless(&mut game, &mut hud, &options(50, vec![]), |event| {
            events.push(event)
        });

        assert_eq!(report.frames_run, 50);
        assert_eq!(report.final_score, None);
        assert!(events.is_empty());
        assert!(game.is_running());
    }
}
