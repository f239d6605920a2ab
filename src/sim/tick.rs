//! Fixed timestep simulation tick
//!
//! Advances the game state by exactly one step. Only the `Running` phase moves
//! entities; pause and restart are handled first so they work in any phase.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, ProjectileTag};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire held (auto-fires at the cooldown rate)
    pub fire: bool,
    /// Detonate the bomb (one-shot)
    pub bomb: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Restart the run (one-shot)
    pub restart: bool,
}

impl TickInput {
    /// Unit movement direction from the held keys
    pub fn direction(&self) -> Vec2 {
        let x = (self.right as i32 - self.left as i32) as f32;
        let y = (self.down as i32 - self.up as i32) as f32;
        Vec2::new(x, y)
    }
}

/// Advance the game state by one fixed timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();

    if input.restart {
        state.restart();
        state.events.push(GameEvent::Restarted);
        log::info!("Run restarted (seed {})", state.seed);
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Running => {}
    }

    state.time_ticks += 1;
    state.time_ms += dt_ms;
    let now_ms = state.time_ms;

    move_player(state, input);

    if input.fire {
        try_shoot(state, now_ms);
    }

    if input.bomb && state.player.has_bomb {
        let playfield = state.tuning.playfield;
        let destroyed = state.store.detonate_bomb(&playfield, &mut state.events);
        state.player.has_bomb = false;
        let earned = (destroyed as u64).saturating_mul(state.tuning.kill_score);
        state.score = state.score.saturating_add(earned);
        state.events.push(GameEvent::BombDetonated { destroyed });
        log::info!("Bomb detonated, {} enemies destroyed", destroyed);
    }

    // Projectiles
    let playfield = state.tuning.playfield;
    state.store.advance_projectiles(&playfield);
    let power = state.effective_power();
    let kill_score = state.tuning.kill_score;
    let earned = state
        .store
        .resolve_projectile_hits(power, kill_score, &mut state.events);
    state.score = state.score.saturating_add(earned);

    // Enemies
    state.store.advance_enemies();
    let policy = state.tuning.enemy.contact;
    state.store.resolve_enemy_contacts(
        &mut state.player,
        policy,
        now_ms,
        &mut state.events,
    );

    // Power-ups
    state.store.advance_power_ups();
    state.store.resolve_pickups(
        &mut state.player,
        &mut state.effects,
        &state.tuning,
        &mut state.events,
    );

    state.effects.tick(dt_ms);

    run_spawners(state, dt_ms);

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: score {} after {} ticks",
            state.score,
            state.time_ticks
        );
    }
}

/// Apply movement from held keys, clamped to the playfield
fn move_player(state: &mut GameState, input: &TickInput) {
    let dir = input.direction();
    if dir == Vec2::ZERO {
        return;
    }
    let speed = state.effective_speed();
    let playfield = state.tuning.playfield;
    let player = &mut state.player;
    let max = Vec2::new(playfield.width, playfield.height) - player.size;
    player.pos = (player.pos + dir * speed).clamp(Vec2::ZERO, max.max(Vec2::ZERO));
}

/// Fire a projectile if the cooldown has elapsed
fn try_shoot(state: &mut GameState, now_ms: f64) {
    let cooldown = state.tuning.player.shoot_cooldown_ms;
    if !state.player.can_shoot(now_ms, cooldown) {
        return;
    }
    let tag = if state.effects.power_boosted() {
        ProjectileTag::Powered
    } else {
        ProjectileTag::Standard
    };
    let muzzle = state.player.muzzle(state.tuning.projectile.size);
    if let Some(projectile_id) = state.store.spawn_projectile(muzzle, &state.tuning, tag) {
        state.player.last_shot_ms = Some(now_ms);
        state.events.push(GameEvent::Fired { projectile_id });
    }
}

/// Enemy interval timer and power-up Bernoulli trial
fn run_spawners(state: &mut GameState, dt_ms: f64) {
    state.enemy_spawn_timer_ms += dt_ms;
    let interval = state.tuning.enemy.spawn_interval_ms;
    while state.enemy_spawn_timer_ms >= interval {
        state.enemy_spawn_timer_ms -= interval;
        state.store.spawn_enemy(&mut state.rng, &state.tuning);
    }
    state.store.maybe_spawn_power_up(&mut state.rng, &state.tuning);
}
