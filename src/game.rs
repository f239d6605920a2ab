//! Session loop
//!
//! `Game` owns the state, the fixed-step clock and the resolved assets. The
//! host calls `frame` once per render callback with a timestamp and the
//! current key state; the game runs however many steps are due and renders
//! exactly once.

use crate::error::GameError;
use crate::highscores::HighScores;
use crate::platform::{Action, AssetLoader, Assets, KeyState, REQUIRED_ASSETS};
use crate::renderer::{FrameView, Renderer};
use crate::scheduler::FixedTimestep;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// A running game session
#[derive(Debug)]
pub struct Game {
    state: GameState,
    clock: FixedTimestep,
    assets: Assets,
    high_scores: HighScores,
    /// Key state seen on the previous frame, for edge detection
    prev_keys: KeyState,
    /// One-shot inputs waiting for the next step
    pending: TickInput,
    /// Events raised by every step of the last frame
    events: Vec<GameEvent>,
}

impl Game {
    /// Validate config and resolve every asset. Nothing runs if this fails.
    pub fn start(
        settings: &Settings,
        tuning: Tuning,
        loader: &mut dyn AssetLoader,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        tuning.validate()?;

        let assets = Assets::load_all(loader, REQUIRED_ASSETS)?;

        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!(
            "Starting game (seed {}, {:.1} Hz)",
            seed,
            settings.tick_rate_hz
        );

        Ok(Self {
            state: GameState::new(seed, tuning),
            clock: FixedTimestep::from_settings(settings),
            assets,
            high_scores: HighScores::new(),
            prev_keys: KeyState::default(),
            pending: TickInput::default(),
            events: Vec::new(),
        })
    }

    /// Handle one render callback at `now_ms`. Returns the number of steps run.
    pub fn frame(&mut self, now_ms: f64, keys: &KeyState, renderer: &mut dyn Renderer) -> u32 {
        self.latch_one_shots(keys);
        self.events.clear();

        let steps = self.clock.advance(now_ms);
        let step_ms = self.clock.step_ms();
        for _ in 0..steps {
            let mut input = keys.to_tick_input();
            input.pause = std::mem::take(&mut self.pending.pause);
            input.restart = std::mem::take(&mut self.pending.restart);
            input.bomb = std::mem::take(&mut self.pending.bomb);

            tick(&mut self.state, &input, step_ms);
            // A restart step returns before looking at pause
            if input.restart && input.pause {
                self.pending.pause = true;
            }
            self.record_events();
        }

        renderer.render(&FrameView {
            state: &self.state,
            alpha: self.clock.alpha(),
            assets: &self.assets,
        });

        steps
    }

    /// Edge-detect pause, restart and bomb so a tap is never lost between steps
    fn latch_one_shots(&mut self, keys: &KeyState) {
        let prev = self.prev_keys;
        self.pending.pause ^= keys.just_pressed(&prev, Action::Pause);
        self.pending.restart |= keys.just_pressed(&prev, Action::Restart);
        self.pending.bomb |= keys.just_pressed(&prev, Action::Bomb);
        self.prev_keys = *keys;
    }

    fn record_events(&mut self) {
        for event in &self.state.events {
            if let GameEvent::GameOver { score } = *event {
                match self
                    .high_scores
                    .add_score(score, self.state.time_ms, self.state.seed)
                {
                    Some(rank) => log::info!("New high score #{}: {}", rank, score),
                    None => log::debug!("Score {} did not make the table", score),
                }
            }
        }
        self.events.extend_from_slice(&self.state.events);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Events from every step run by the last `frame` call
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

/// Seed from the wall clock when none is configured
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
