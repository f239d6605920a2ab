//! Demo autopilot
//!
//! Plays the game by producing the same `KeyState` a keyboard would. Used by
//! the headless binary and for attract/idle mode.

use glam::Vec2;

use crate::platform::{Action, KeyState};
use crate::sim::{Bounded, GamePhase, GameState};

/// Enemies closer than this (horizontally) count toward the bomb trigger
const BOMB_RANGE: f32 = 250.0;
/// Enemies inside `BOMB_RANGE` needed before the bomb is used
const BOMB_CROWD: usize = 3;
/// Enemies closer than this get dodged instead of shot
const DODGE_RANGE: f32 = 120.0;

/// Scripted player
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    last: KeyState,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys to hold for the next frame
    pub fn next_keys(&mut self, state: &GameState) -> KeyState {
        let mut keys = KeyState::default();

        match state.phase {
            GamePhase::GameOver => {
                // One-shots are edge triggered, so release between presses
                keys.set(Action::Restart, !self.last.is_down(Action::Restart));
            }
            GamePhase::Paused => {}
            GamePhase::Running => self.steer(state, &mut keys),
        }

        self.last = keys;
        keys
    }

    fn steer(&self, state: &GameState, keys: &mut KeyState) {
        let player = &state.player;
        let centre = player.bounds().center();
        keys.press(Action::Fire);

        // Drift back to the starting column
        if player.pos.x > state.tuning.player.start.x + player.speed {
            keys.press(Action::MoveLeft);
        }

        let ahead = state
            .store
            .enemies
            .iter()
            .filter(|e| e.pos.x + e.size.x > player.pos.x);

        let crowd = ahead
            .clone()
            .filter(|e| e.pos.x - player.pos.x < BOMB_RANGE)
            .count();
        if player.has_bomb && crowd >= BOMB_CROWD && !self.last.is_down(Action::Bomb) {
            keys.press(Action::Bomb);
        }

        let nearest = ahead.min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

        let threatened = nearest.is_some_and(|e| {
            let rect = e.bounds();
            rect.left() - player.bounds().right() < DODGE_RANGE
                && rect.bottom() > player.pos.y
                && rect.top() < player.pos.y + player.size.y
        });

        let target = match nearest {
            Some(enemy) if threatened => {
                // Slip past whichever side has more room
                let above = enemy.pos.y;
                let below = state.tuning.playfield.height - (enemy.pos.y + enemy.size.y);
                let y = if above > below {
                    enemy.pos.y - player.size.y
                } else {
                    enemy.pos.y + enemy.size.y + player.size.y
                };
                Some(y)
            }
            _ => state
                .store
                .power_ups
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(centre)
                        .total_cmp(&b.pos.distance_squared(centre))
                })
                .map(|p| p.bounds().center().y)
                .or_else(|| nearest.map(|e| e.bounds().center().y)),
        };

        if let Some(y) = target {
            track(keys, centre, y, player.speed);
        }
    }
}

/// Hold up/down toward `target_y`, with a dead zone of one step
fn track(keys: &mut KeyState, centre: Vec2, target_y: f32, speed: f32) {
    let dy = target_y - centre.y;
    if dy < -speed {
        keys.press(Action::MoveUp);
    } else if dy > speed {
        keys.press(Action::MoveDown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, PowerUp, PowerUpKind};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(5, Tuning::default())
    }

    fn enemy_at(state: &mut GameState, x: f32, y: f32) {
        let id = state.next_entity_id();
        state.store.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(40.0),
            health: 20,
            speed: 2.0,
            attack_power: 5,
            last_attack_ms: None,
        });
    }

    #[test]
    fn test_fires_while_running() {
        let keys = Autopilot::new().next_keys(&state());
        assert!(keys.is_down(Action::Fire));
        assert!(!keys.is_down(Action::Bomb));
    }

    #[test]
    fn test_lines_up_with_distant_enemy() {
        let mut state = state();
        enemy_at(&mut state, 700.0, 50.0);
        let keys = Autopilot::new().next_keys(&state);
        assert!(keys.is_down(Action::MoveUp));
        assert!(!keys.is_down(Action::MoveDown));
    }

    #[test]
    fn test_dodges_close_enemy() {
        let mut state = state();
        // Level with the player, just ahead, more room below
        enemy_at(&mut state, 150.0, 270.0);
        let keys = Autopilot::new().next_keys(&state);
        assert!(keys.is_down(Action::MoveDown));
    }

    #[test]
    fn test_prefers_power_up_when_safe() {
        let mut state = state();
        enemy_at(&mut state, 700.0, 50.0);
        state.store.power_ups.push(PowerUp {
            id: 99,
            pos: Vec2::new(400.0, 500.0),
            size: Vec2::splat(30.0),
            speed: 2.0,
            kind: PowerUpKind::Heal,
        });
        let keys = Autopilot::new().next_keys(&state);
        assert!(keys.is_down(Action::MoveDown));
    }

    #[test]
    fn test_bombs_a_crowd_once() {
        let mut state = state();
        for y in [50.0, 150.0, 450.0] {
            enemy_at(&mut state, 200.0, y);
        }
        let mut pilot = Autopilot::new();
        assert!(pilot.next_keys(&state).is_down(Action::Bomb));
        // Released on the next frame so the edge registers again later
        assert!(!pilot.next_keys(&state).is_down(Action::Bomb));

        state.player.has_bomb = false;
        pilot.next_keys(&state);
        assert!(!pilot.next_keys(&state).is_down(Action::Bomb));
    }

    #[test]
    fn test_restarts_after_game_over() {
        let mut state = state();
        state.phase = GamePhase::GameOver;
        let mut pilot = Autopilot::new();
        let first = pilot.next_keys(&state);
        let second = pilot.next_keys(&state);
        assert!(first.is_down(Action::Restart));
        assert!(!second.is_down(Action::Restart));
        assert!(!first.is_down(Action::Fire));
    }
}
