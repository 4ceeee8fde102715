//! The game session: owns the cube, the target and the round, and advances
//! them one frame at a time.

use glam::Vec2;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, GameConfig};
use crate::controls;
use crate::hud::{Hud, HudElement};
use crate::input::InputState;
use crate::matching;
use crate::round::RoundState;
use crate::target::generate_target;
use crate::transform::{BoxTransform, TargetBox};

/// Everything that changes while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub cube: BoxTransform,
    pub target: TargetBox,
    pub round: RoundState,
    last_mouse: Option<Vec2>,
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Between rounds, nothing to do.
    Idle,
    /// The start key began a new round.
    Started,
    /// A round (or free play) is in progress.
    Running { matched: bool },
    /// The target was matched and replaced.
    Scored { score: u32 },
    /// Time ran out; the driver should stop scheduling frames.
    TimedOut { final_score: u32 },
}

/// One game session: configuration, state and the random source for targets.
#[derive(Debug)]
pub struct Game<R = StdRng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl Game<StdRng> {
    pub fn from_entropy(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R> Game<R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cube(&self) -> &BoxTransform {
        &self.state.cube
    }

    pub fn target(&self) -> &TargetBox {
        &self.state.target
    }

    pub fn round(&self) -> &RoundState {
        &self.state.round
    }

    pub fn is_running(&self) -> bool {
        self.state.round.is_running()
    }

    /// Seconds left in the current round, if a timed round is running.
    pub fn countdown(&self, now: f64) -> Option<f64> {
        (self.config.enable_timer && self.is_running()).then(|| self.state.round.remaining(now))
    }
}

impl<R: Rng> Game<R> {
    /// Validates `config` and places the first target.
    ///
    /// Without a timer the game starts in free play immediately.
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let target = generate_target(
            &mut rng,
            config.target_max_size,
            config.target_position_bound,
        );
        let mut round = RoundState::new(config.time_budget);
        if !config.enable_timer {
            round.start(0.0);
        }
        Ok(Self {
            state: GameState {
                cube: BoxTransform::default(),
                target,
                round,
                last_mouse: None,
            },
            config,
            rng,
        })
    }

    /// Begins a round from the idle state. Returns false if one is running.
    pub fn start_round<E: HudElement>(&mut self, now: f64, hud: &mut Hud<E>) -> bool {
        if self.is_running() {
            return false;
        }
        self.state.round.start(now);
        self.state.last_mouse = None;
        self.reset_board();
        hud.show_round_started(Some(self.config.time_budget));
        info!(
            "round {} started, target size={} position={}",
            self.state.round.rounds_played(),
            self.state.target.size,
            self.state.target.position
        );
        true
    }

    /// Advances the game by one frame at time `now`.
    pub fn frame<E: HudElement>(
        &mut self,
        now: f64,
        input: &InputState,
        hud: &mut Hud<E>,
    ) -> FrameOutcome {
        if !self.is_running() {
            if controls::start_requested(input) && self.start_round(now, hud) {
                return FrameOutcome::Started;
            }
            return FrameOutcome::Idle;
        }

        controls::apply_frame(
            &mut self.state.cube,
            &mut self.state.last_mouse,
            input,
            &self.config,
        );

        if !self.config.enable_timer {
            return FrameOutcome::Running {
                matched: self.cube_matches_target(),
            };
        }

        if self.state.round.is_expired(now) {
            let final_score = self.state.round.finish();
            hud.show_result(final_score);
            info!("round over, final score {final_score}");
            return FrameOutcome::TimedOut { final_score };
        }

        let outcome = if self.cube_matches_target() {
            let score = self
                .state
                .round
                .record_match(now, self.config.refill_clock_on_match);
            self.reset_board();
            hud.show_score(score);
            info!("target matched, score {score}");
            debug!(
                "next target size={} position={}",
                self.state.target.size, self.state.target.position
            );
            FrameOutcome::Scored { score }
        } else {
            FrameOutcome::Running { matched: false }
        };

        hud.show_countdown(self.state.round.remaining(now));
        outcome
    }

    pub fn cube_matches_target(&self) -> bool {
        matching::matches(
            &self.state.cube,
            &self.state.target.transform(),
            self.config.match_threshold,
        )
    }

    fn reset_board(&mut self) {
        self.state.cube.reset();
        self.state.target = generate_target(
            &mut self.rng,
            self.config.target_max_size,
            self.config.target_position_bound,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::controls::{MOVE_RIGHT, START_ROUND};
    use crate::hud::TextSlot;
    use crate::round::RoundPhase;

    fn timed(budget: f64) -> GameConfig {
        GameConfig {
            time_budget: budget,
            ..GameConfig::default()
        }
    }

    /// Moves the cube onto the current target so the next frame scores.
    fn snap_cube_to_target<R: Rng>(game: &mut Game<R>) {
        let target = game.state.target;
        game.state.cube = BoxTransform {
            position: target.position,
            rotation: Quat::IDENTITY,
            scale: target.size,
        };
    }

    /// Reads state without naming the random source's bounds.
    fn summary<R>(game: &Game<R>) -> (bool, u32, BoxTransform) {
        (game.is_running(), game.round().score(), *game.cube())
    }

    #[test]
    fn accessors_do_not_need_an_rng_bound() {
        let game = Game::seeded(GameConfig::default(), 1).unwrap();
        assert_eq!(summary(&game), (false, 0, BoxTransform::default()));
        assert_eq!(game.config(), &GameConfig::default());
    }

    #[test]
    fn new_game_waits_for_start() {
        let game = Game::seeded(GameConfig::default(), 1).unwrap();
        assert!(!game.is_running());
        assert_eq!(game.countdown(0.0), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            scale_step: -1.0,
            ..GameConfig::default()
        };
        assert!(Game::seeded(config, 1).is_err());
    }

    #[test]
    fn start_resets_cube_score_and_target() {
        let mut game = Game::seeded(timed(100.0), 42).unwrap();
        let mut hud = Hud::in_memory();
        game.state.cube.position = Vec3::new(3.0, 0.0, 0.0);
        game.state.round.start(0.0);
        game.state.round.record_match(1.0, false);
        game.state.round.finish();

        let sentinel = TargetBox {
            size: Vec3::splat(99.0),
            position: Vec3::splat(99.0),
        };
        game.state.target = sentinel;

        assert!(game.start_round(5.0, &mut hud));
        assert_eq!(game.round().score(), 0);
        assert_eq!(game.round().phase(), RoundPhase::Running { started_at: 5.0 });
        assert_eq!(*game.cube(), BoxTransform::default());
        assert_ne!(*game.target(), sentinel);
        assert!(hud.menu.is_hidden());
        assert_eq!(hud.score.text(), "0");
    }

    #[test]
    fn start_is_ignored_while_running() {
        let mut game = Game::seeded(timed(100.0), 2).unwrap();
        let mut hud = Hud::in_memory();
        assert!(game.start_round(0.0, &mut hud));
        let target = *game.target();
        assert!(!game.start_round(1.0, &mut hud));
        assert_eq!(*game.target(), target);
        assert_eq!(game.round().phase(), RoundPhase::Running { started_at: 0.0 });
    }

    #[test]
    fn start_key_begins_round_from_idle() {
        let mut game = Game::seeded(timed(100.0), 3).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        assert_eq!(game.frame(0.0, &input, &mut hud), FrameOutcome::Idle);
        input.set_key_down(START_ROUND);
        assert_eq!(game.frame(0.5, &input, &mut hud), FrameOutcome::Started);
        assert!(game.is_running());
        assert!(matches!(
            game.frame(0.6, &input, &mut hud),
            FrameOutcome::Running { .. }
        ));
    }

    #[test]
    fn match_increments_score_and_keeps_running() {
        let mut game = Game::seeded(timed(100.0), 4).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        game.start_round(0.0, &mut hud);

        snap_cube_to_target(&mut game);
        assert_eq!(
            game.frame(1.0, &input, &mut hud),
            FrameOutcome::Scored { score: 1 }
        );
        assert!(game.is_running());
        assert_eq!(*game.cube(), BoxTransform::default());
        assert_eq!(hud.score.text(), "1");
        assert_eq!(game.round().elapsed(2.0), 2.0);

        snap_cube_to_target(&mut game);
        assert_eq!(
            game.frame(2.0, &input, &mut hud),
            FrameOutcome::Scored { score: 2 }
        );
    }

    #[test]
    fn refill_restarts_the_clock() {
        let config = GameConfig {
            refill_clock_on_match: true,
            ..timed(10.0)
        };
        let mut game = Game::seeded(config, 5).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        game.start_round(0.0, &mut hud);
        snap_cube_to_target(&mut game);
        game.frame(8.0, &input, &mut hud);
        assert_eq!(game.countdown(9.0), Some(9.0));
    }

    #[test]
    fn timeout_ends_round_exactly_once() {
        let mut game = Game::seeded(timed(100.0), 6).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        input.set_key_down(MOVE_RIGHT);
        game.start_round(0.0, &mut hud);
        game.state.cube.position = Vec3::splat(50.0);

        let mut timeouts = 0;
        let mut frame = 0;
        while frame < 7_000 {
            let now = frame as f64 / 60.0;
            match game.frame(now, &input, &mut hud) {
                FrameOutcome::TimedOut { final_score } => {
                    timeouts += 1;
                    assert_eq!(final_score, 0);
                    assert!(now > 100.0);
                }
                FrameOutcome::Scored { .. } => panic!("no match expected"),
                _ => {}
            }
            frame += 1;
        }
        assert_eq!(timeouts, 1);
        assert!(!game.is_running());
        assert_eq!(game.round().score(), 0);
        assert!(!hud.result.is_hidden());
        assert_eq!(hud.final_score.text(), "0");
    }

    #[test]
    fn score_is_frozen_after_timeout() {
        let mut game = Game::seeded(timed(1.0), 7).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        game.start_round(0.0, &mut hud);
        snap_cube_to_target(&mut game);
        game.frame(0.5, &input, &mut hud);
        assert_eq!(
            game.frame(1.5, &input, &mut hud),
            FrameOutcome::TimedOut { final_score: 1 }
        );
        snap_cube_to_target(&mut game);
        assert_eq!(game.frame(2.0, &input, &mut hud), FrameOutcome::Idle);
        assert_eq!(game.round().score(), 1);
    }

    #[test]
    fn countdown_is_displayed_each_frame() {
        let mut game = Game::seeded(timed(10.0), 8).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        game.start_round(0.0, &mut hud);
        game.state.cube.position = Vec3::splat(50.0);
        game.frame(2.5, &input, &mut hud);
        assert_eq!(hud.countdown.text(), "Time: 7.50");
    }

    #[test]
    fn free_play_never_scores_or_times_out() {
        let config = GameConfig {
            enable_timer: false,
            time_budget: 1.0,
            ..GameConfig::default()
        };
        let mut game = Game::seeded(config, 9).unwrap();
        let mut hud = Hud::<TextSlot>::in_memory();
        let input = InputState::new();
        assert!(game.is_running());

        snap_cube_to_target(&mut game);
        assert_eq!(
            game.frame(500.0, &input, &mut hud),
            FrameOutcome::Running { matched: true }
        );
        assert_eq!(game.round().score(), 0);
        assert_eq!(game.countdown(500.0), None);
        assert_eq!(hud.countdown.text(), "");
    }

    #[test]
    fn held_keys_move_cube_during_round() {
        let mut game = Game::seeded(timed(100.0), 10).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        game.start_round(0.0, &mut hud);
        input.set_key_down(MOVE_RIGHT);
        for frame in 1..=10 {
            game.frame(frame as f64 / 60.0, &input, &mut hud);
        }
        // A unit cube never coincides with a half-integer sized target.
        assert_eq!(game.round().score(), 0);
        assert!((game.cube().position.x - 0.2).abs() < 1e-5);
    }
}
