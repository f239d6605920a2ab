//! Arcade Shooter - a side-scrolling shoot-'em-up simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `scheduler`: Fixed-timestep accumulator
//! - `game`: Frame-driven session loop that owns the state
//! - `platform`: Input and asset collaborators
//! - `renderer`: Render collaborator trait and a text renderer
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod error;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AssetError, ConfigError, GameError};
pub use game::Game;
pub use highscores::HighScores;
pub use scheduler::FixedTimestep;
pub use settings::Settings;
pub use tuning::{ContactPolicy, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the accumulator after a stall
    pub const MAX_FRAME_DELTA_MS: f64 = 1000.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_SHOOTING_POWER: i32 = 10;
    pub const SHOOT_COOLDOWN_MS: f64 = 250.0;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 10.0;
    pub const PROJECTILE_HEIGHT: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Live projectile cap (bullet pool size)
    pub const MAX_PROJECTILES: usize = 10;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_HEALTH: i32 = 20;
    pub const ENEMY_SPEED_MIN: f32 = 1.5;
    pub const ENEMY_SPEED_MAX: f32 = 3.5;
    pub const ENEMY_ATTACK_POWER: i32 = 5;
    pub const ENEMY_ATTACK_COOLDOWN_MS: f64 = 1000.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 2000.0;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_SPEED: f32 = 2.0;
    /// Chance per tick that a power-up appears
    pub const POWER_UP_CHANCE: f64 = 0.002;
    pub const HEAL_AMOUNT: i32 = 25;
    pub const SPEED_BOOST: f32 = 3.0;
    pub const POWER_BOOST: i32 = 10;
    pub const BOOST_DURATION_MS: f64 = 5000.0;

    /// Score awarded per enemy destroyed
    pub const KILL_SCORE: u64 = 10;
}
