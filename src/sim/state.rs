//! Game state and core simulation types
//!
//! Everything a step reads or writes lives in `GameState`. The state is owned
//! by the session loop and handed to every operation explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounded, Rect};
use super::entities::EntityStore;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation suspended by the player
    Paused,
    /// Player died; waits for restart
    GameOver,
}

/// Something that happened during a tick, for render and audio hooks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { projectile_id: u32 },
    EnemyHit { enemy_id: u32, remaining_health: i32 },
    EnemyDestroyed { enemy_id: u32 },
    PlayerHit { damage: i32, health: i32 },
    PowerUpCollected { kind: PowerUpKind },
    BombDetonated { destroyed: usize },
    Paused,
    Resumed,
    Restarted,
    GameOver { score: u64 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Base movement speed (pixels per tick)
    pub speed: f32,
    /// Base damage dealt per projectile hit
    pub shooting_power: i32,
    /// Single-use screen-clearing bomb still available
    pub has_bomb: bool,
    /// Simulation time of the last shot
    pub last_shot_ms: Option<f64>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let p = &tuning.player;
        Self {
            pos: p.start,
            size: p.size,
            health: p.max_health,
            max_health: p.max_health,
            speed: p.speed,
            shooting_power: p.shooting_power,
            has_bomb: true,
            last_shot_ms: None,
        }
    }

    /// Apply damage, clamping health at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_sub(amount.max(0)).clamp(0, self.max_health);
        before - self.health
    }

    /// Restore health, clamping at `max_health`
    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount.max(0)).clamp(0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Whether the shoot cooldown has elapsed at `now_ms`
    pub fn can_shoot(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= cooldown_ms,
            None => true,
        }
    }

    /// Spawn point for a projectile of the given size: leading edge, vertically centred
    pub fn muzzle(&self, projectile_size: Vec2) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x,
            self.pos.y + self.size.y / 2.0 - projectile_size.y / 2.0,
        )
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}

/// Visual tag carried by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileTag {
    #[default]
    Standard,
    /// Fired while a power boost was active
    Powered,
}

/// A player projectile travelling right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (pixels per tick)
    pub speed: f32,
    pub tag: ProjectileTag,
}

/// An enemy drifting left toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    /// Leftward speed (pixels per tick)
    pub speed: f32,
    pub attack_power: i32,
    /// Simulation time of the last contact hit on the player
    pub last_attack_ms: Option<f64>,
}

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Heal,
    SpeedBoost,
    PowerBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Heal,
        PowerUpKind::SpeedBoost,
        PowerUpKind::PowerBoost,
    ];
}

/// A power-up drifting left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: PowerUpKind,
}

macro_rules! impl_bounded {
    ($($ty:ty),*) => {
        $(
            impl Bounded for $ty {
                fn bounds(&self) -> Rect {
                    Rect { pos: self.pos, size: self.size }
                }

                fn pos_mut(&mut self) -> &mut Vec2 {
                    &mut self.pos
                }
            }
        )*
    };
}

impl_bounded!(Projectile, Enemy, PowerUp);

/// Timed power-up effects (milliseconds remaining)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub speed_boost_ms: f64,
    pub power_boost_ms: f64,
}

impl ActiveEffects {
    /// Count down both timers by one step
    pub fn tick(&mut self, dt_ms: f64) {
        self.speed_boost_ms = (self.speed_boost_ms - dt_ms).max(0.0);
        self.power_boost_ms = (self.power_boost_ms - dt_ms).max(0.0);
    }

    pub fn speed_boosted(&self) -> bool {
        self.speed_boost_ms > 0.0
    }

    pub fn power_boosted(&self) -> bool {
        self.power_boost_ms > 0.0
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; not part of snapshots
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,
    /// Balance sheet this run uses
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated milliseconds since the run started
    pub time_ms: f64,
    /// Milliseconds accumulated toward the next enemy spawn
    pub enemy_spawn_timer_ms: f64,
    pub player: Player,
    /// Live projectiles, enemies and power-ups (spawn order)
    pub store: EntityStore,
    pub effects: ActiveEffects,
    /// Events raised by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new running game with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            tuning,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            time_ms: 0.0,
            enemy_spawn_timer_ms: 0.0,
            store: EntityStore::default(),
            effects: ActiveEffects::default(),
            events: Vec::new(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.store.allocate_id()
    }

    /// Full reset for a new run. The RNG keeps its stream so runs differ.
    pub fn restart(&mut self) {
        self.player = Player::new(&self.tuning);
        self.store.clear();
        self.effects = ActiveEffects::default();
        self.score = 0;
        self.time_ticks = 0;
        self.time_ms = 0.0;
        self.enemy_spawn_timer_ms = 0.0;
        self.phase = GamePhase::Running;
    }

    /// Movement speed including an active speed boost
    pub fn effective_speed(&self) -> f32 {
        if self.effects.speed_boosted() {
            self.player.speed + self.tuning.power_up.speed_boost
        } else {
            self.player.speed
        }
    }

    /// Damage per hit including an active power boost
    pub fn effective_power(&self) -> i32 {
        if self.effects.power_boosted() {
            self.player
                .shooting_power
                .saturating_add(self.tuning.power_up.power_boost)
        } else {
            self.player.shooting_power
        }
    }
}
