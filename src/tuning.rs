//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a variant of the game is a
//! JSON file rather than a code change. Missing fields fall back to defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::read_config;

/// What happens when an enemy touches the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Damage on contact, then wait `cooldown_ms` before the same enemy can hit again
    Cooldown { cooldown_ms: f64 },
    /// Damage once and remove the enemy (no score)
    DestroyOnContact,
    /// Damage on every overlapping step
    EveryStep,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        ContactPolicy::Cooldown {
            cooldown_ms: ENEMY_ATTACK_COOLDOWN_MS,
        }
    }
}

/// Visible playfield in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start: Vec2,
    pub size: Vec2,
    pub max_health: i32,
    /// Pixels per tick
    pub speed: f32,
    pub shooting_power: i32,
    pub shoot_cooldown_ms: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start: Vec2::new(PLAYER_X, PLAYFIELD_HEIGHT / 2.0),
            size: Vec2::splat(PLAYER_SIZE),
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            shooting_power: PLAYER_SHOOTING_POWER,
            shoot_cooldown_ms: SHOOT_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub size: Vec2,
    /// Pixels per tick, rightwards
    pub speed: f32,
    /// Live projectile cap; `None` means unlimited
    pub max_live: Option<usize>,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            max_live: Some(MAX_PROJECTILES),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: Vec2,
    pub health: i32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub attack_power: i32,
    pub spawn_interval_ms: f64,
    pub contact: ContactPolicy,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: Vec2::splat(ENEMY_SIZE),
            health: ENEMY_HEALTH,
            speed_min: ENEMY_SPEED_MIN,
            speed_max: ENEMY_SPEED_MAX,
            attack_power: ENEMY_ATTACK_POWER,
            spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            contact: ContactPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub size: Vec2,
    pub speed: f32,
    /// Bernoulli probability per tick
    pub chance: f64,
    pub heal_amount: i32,
    pub speed_boost: f32,
    pub power_boost: i32,
    pub boost_duration_ms: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            size: Vec2::splat(POWER_UP_SIZE),
            speed: POWER_UP_SPEED,
            chance: POWER_UP_CHANCE,
            heal_amount: HEAL_AMOUNT,
            speed_boost: SPEED_BOOST,
            power_boost: POWER_BOOST,
            boost_duration_ms: BOOST_DURATION_MS,
        }
    }
}

/// Complete balance sheet for one game variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: Playfield,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub enemy: EnemyTuning,
    pub power_up: PowerUpTuning,
    pub kill_score: u64,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_config(path)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.playfield.width <= 0.0 || self.playfield.height <= 0.0 {
            return invalid("playfield must have a positive size");
        }
        if self.player.max_health <= 0 {
            return invalid("player.max_health must be positive");
        }
        if self.player.size.cmple(Vec2::ZERO).any() || self.enemy.size.cmple(Vec2::ZERO).any() {
            return invalid("entity sizes must be positive");
        }
        if self.player.size.x > self.playfield.width || self.player.size.y > self.playfield.height {
            return invalid("player does not fit on the playfield");
        }
        if self.enemy.size.y > self.playfield.height
            || self.power_up.size.y > self.playfield.height
        {
            return invalid("enemies and power-ups must fit vertically on the playfield");
        }
        if self.player.shooting_power <= 0 {
            return invalid("player.shooting_power must be positive");
        }
        if self.enemy.health <= 0 {
            return invalid("enemy.health must be positive");
        }
        if self.enemy.attack_power < 0 {
            return invalid("enemy.attack_power must not be negative");
        }
        if self.power_up.heal_amount < 0 || self.power_up.power_boost < 0 {
            return invalid("power-up amounts must not be negative");
        }
        if self.enemy.speed_min > self.enemy.speed_max || self.enemy.speed_min < 0.0 {
            return invalid("enemy speed range is empty or negative");
        }
        if self.enemy.spawn_interval_ms <= 0.0 {
            return invalid("enemy.spawn_interval_ms must be positive");
        }
        if !(0.0..=1.0).contains(&self.power_up.chance) {
            return invalid("power_up.chance must be within [0, 1]");
        }
        if let ContactPolicy::Cooldown { cooldown_ms } = self.enemy.contact
            && cooldown_ms < 0.0
        {
            return invalid("contact cooldown must not be negative");
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            enemy: EnemyTuning::default(),
            power_up: PowerUpTuning::default(),
            kill_score: KILL_SCORE,
        }
    }
}
