//! Entity store: spawn, advance, cull and collide
//!
//! Collections keep spawn order, which is also draw order. Removal always goes
//! through `Vec::retain` so no entity is skipped or touched after it is gone.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounded, collides};
use super::state::{
    ActiveEffects, Enemy, GameEvent, Player, PowerUp, PowerUpKind, Projectile, ProjectileTag,
};
use crate::tuning::{ContactPolicy, Playfield, Tuning};

/// Ordered collections of every live entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Last entity ID handed out
    next_id: u32,
}

/// Move every entity by its velocity, then drop the ones that satisfy
/// `offscreen`. Returns how many were removed.
pub fn advance_and_cull<T, V, O>(items: &mut Vec<T>, velocity: V, offscreen: O) -> usize
where
    T: Bounded,
    V: Fn(&T) -> Vec2,
    O: Fn(&T) -> bool,
{
    for item in items.iter_mut() {
        let v = velocity(item);
        *item.pos_mut() += v;
    }
    let before = items.len();
    items.retain(|item| !offscreen(item));
    before - items.len()
}

/// Fully past the left edge
pub fn off_left(item: &impl Bounded) -> bool {
    item.bounds().right() < 0.0
}

/// Fully past the right edge
pub fn off_right(item: &impl Bounded, playfield: &Playfield) -> bool {
    item.bounds().left() > playfield.width
}

impl EntityStore {
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.enemies.is_empty() && self.power_ups.is_empty()
    }

    /// Allocate a new entity ID (IDs start at 1 and are never reused)
    pub fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Drop every live entity
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.enemies.clear();
        self.power_ups.clear();
    }

    /// Append a projectile at `pos` unless the live cap is reached
    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        tuning: &Tuning,
        tag: ProjectileTag,
    ) -> Option<u32> {
        if let Some(cap) = tuning.projectile.max_live
            && self.projectiles.len() >= cap
        {
            return None;
        }
        let id = self.allocate_id();
        self.projectiles.push(Projectile {
            id,
            pos,
            size: tuning.projectile.size,
            speed: tuning.projectile.speed,
            tag,
        });
        Some(id)
    }

    /// Append an enemy at the right edge with a random height and speed
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> u32 {
        let enemy = &tuning.enemy;
        let max_y = (tuning.playfield.height - enemy.size.y).max(0.0);
        let y = if max_y > 0.0 {
            rng.random_range(0.0..=max_y)
        } else {
            0.0
        };
        let speed = if enemy.speed_max > enemy.speed_min {
            rng.random_range(enemy.speed_min..=enemy.speed_max)
        } else {
            enemy.speed_min
        };
        let id = self.allocate_id();
        log::debug!("Spawning enemy {} at y={:.1} speed={:.2}", id, y, speed);
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(tuning.playfield.width, y),
            size: enemy.size,
            health: enemy.health,
            speed,
            attack_power: enemy.attack_power,
            last_attack_ms: None,
        });
        id
    }

    /// Bernoulli trial for a power-up this tick
    pub fn maybe_spawn_power_up(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> Option<u32> {
        let power_up = &tuning.power_up;
        if !rng.random_bool(power_up.chance) {
            return None;
        }
        let max_y = (tuning.playfield.height - power_up.size.y).max(0.0);
        let y = if max_y > 0.0 {
            rng.random_range(0.0..=max_y)
        } else {
            0.0
        };
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let id = self.allocate_id();
        log::debug!("Spawning power-up {} ({:?}) at y={:.1}", id, kind, y);
        self.power_ups.push(PowerUp {
            id,
            pos: Vec2::new(tuning.playfield.width, y),
            size: power_up.size,
            speed: power_up.speed,
            kind,
        });
        Some(id)
    }

    pub fn advance_projectiles(&mut self, playfield: &Playfield) -> usize {
        advance_and_cull(
            &mut self.projectiles,
            |p| Vec2::new(p.speed, 0.0),
            |p| off_right(p, playfield),
        )
    }

    pub fn advance_enemies(&mut self) -> usize {
        advance_and_cull(&mut self.enemies, |e| Vec2::new(-e.speed, 0.0), |e| off_left(e))
    }

    pub fn advance_power_ups(&mut self) -> usize {
        advance_and_cull(&mut self.power_ups, |p| Vec2::new(-p.speed, 0.0), |p| off_left(p))
    }

    /// Projectiles against enemies. Each projectile hits at most one enemy
    /// (the earliest spawned it overlaps). Returns score earned.
    pub fn resolve_projectile_hits(
        &mut self,
        power: i32,
        kill_score: u64,
        events: &mut Vec<GameEvent>,
    ) -> u64 {
        let enemies = &mut self.enemies;
        self.projectiles.retain(|projectile| {
            let target = enemies
                .iter_mut()
                .find(|enemy| enemy.health > 0 && collides(projectile, &**enemy));
            match target {
                Some(enemy) => {
                    enemy.health = enemy.health.saturating_sub(power);
                    events.push(GameEvent::EnemyHit {
                        enemy_id: enemy.id,
                        remaining_health: enemy.health.max(0),
                    });
                    false
                }
                None => true,
            }
        });

        let mut earned: u64 = 0;
        self.enemies.retain(|enemy| {
            if enemy.health > 0 {
                return true;
            }
            events.push(GameEvent::EnemyDestroyed { enemy_id: enemy.id });
            earned = earned.saturating_add(kill_score);
            false
        });
        earned
    }

    /// Enemies touching the player apply damage according to `policy`.
    /// Returns total damage dealt.
    pub fn resolve_enemy_contacts(
        &mut self,
        player: &mut Player,
        policy: ContactPolicy,
        now_ms: f64,
        events: &mut Vec<GameEvent>,
    ) -> i32 {
        let mut dealt = 0;
        self.enemies.retain_mut(|enemy| {
            if !collides(&*player, &*enemy) {
                return true;
            }
            let (hits, keep) = match policy {
                ContactPolicy::Cooldown { cooldown_ms } => {
                    let ready = enemy
                        .last_attack_ms
                        .is_none_or(|last| now_ms - last >= cooldown_ms);
                    if ready {
                        enemy.last_attack_ms = Some(now_ms);
                    }
                    (ready, true)
                }
                ContactPolicy::DestroyOnContact => (true, false),
                ContactPolicy::EveryStep => (true, true),
            };
            if hits && !player.is_dead() {
                let damage = player.take_damage(enemy.attack_power);
                dealt += damage;
                events.push(GameEvent::PlayerHit {
                    damage,
                    health: player.health,
                });
            }
            keep
        });
        dealt
    }

    /// Power-ups touching the player apply their effect and disappear
    pub fn resolve_pickups(
        &mut self,
        player: &mut Player,
        effects: &mut ActiveEffects,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let before = self.power_ups.len();
        self.power_ups.retain(|power_up| {
            if !collides(&*player, power_up) {
                return true;
            }
            match power_up.kind {
                PowerUpKind::Heal => player.heal(tuning.power_up.heal_amount),
                PowerUpKind::SpeedBoost => {
                    effects.speed_boost_ms = tuning.power_up.boost_duration_ms;
                }
                PowerUpKind::PowerBoost => {
                    effects.power_boost_ms = tuning.power_up.boost_duration_ms;
                }
            }
            events.push(GameEvent::PowerUpCollected {
                kind: power_up.kind,
            });
            false
        });
        before - self.power_ups.len()
    }

    /// Destroy every enemy that is at least partly on the playfield.
    /// Returns the number destroyed.
    pub fn detonate_bomb(&mut self, playfield: &Playfield, events: &mut Vec<GameEvent>) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| {
            let b = enemy.bounds();
            let visible = b.left() < playfield.width && b.right() > 0.0;
            if visible {
                events.push(GameEvent::EnemyDestroyed { enemy_id: enemy.id });
            }
            !visible
        });
        before - self.enemies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(id: u32, x: f32, y: f32, health: i32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(40.0),
            health,
            speed: 2.0,
            attack_power: 5,
            last_attack_ms: None,
        }
    }

    fn projectile_at(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(10.0, 5.0),
            speed: 10.0,
            tag: ProjectileTag::Standard,
        }
    }

    #[test]
    fn test_spawn_enemy_at_right_edge() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut store = EntityStore::default();
        for _ in 0..50 {
            store.spawn_enemy(&mut rng, &tuning);
        }
        for enemy in &store.enemies {
            assert_eq!(enemy.pos.x, tuning.playfield.width);
            assert!(enemy.pos.y >= 0.0);
            assert!(enemy.pos.y + enemy.size.y <= tuning.playfield.height);
            assert!(enemy.speed >= tuning.enemy.speed_min && enemy.speed <= tuning.enemy.speed_max);
        }
        // Spawn order preserved
        let ids: Vec<u32> = store.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_power_up_spawn_probability_bounds() {
        let mut always = Tuning::default();
        always.power_up.chance = 1.0;
        let mut never = Tuning::default();
        never.power_up.chance = 0.0;

        let mut rng = Pcg32::seed_from_u64(9);
        let mut store = EntityStore::default();
        for _ in 0..20 {
            assert!(store.maybe_spawn_power_up(&mut rng, &never).is_none());
        }
        for _ in 0..20 {
            assert!(store.maybe_spawn_power_up(&mut rng, &always).is_some());
        }
        assert_eq!(store.power_ups.len(), 20);
        assert!(store.power_ups.iter().all(|p| p.pos.x == always.playfield.width));
    }

    #[test]
    fn test_projectile_cap() {
        let mut tuning = Tuning::default();
        tuning.projectile.max_live = Some(2);
        let mut store = EntityStore::default();
        let tag = ProjectileTag::Standard;
        assert_eq!(store.spawn_projectile(Vec2::ZERO, &tuning, tag), Some(1));
        assert_eq!(store.spawn_projectile(Vec2::ZERO, &tuning, tag), Some(2));
        assert_eq!(store.spawn_projectile(Vec2::ZERO, &tuning, tag), None);
        assert_eq!(store.projectiles.len(), 2);
    }

    #[test]
    fn test_cull_does_not_skip_adjacent_entities() {
        // Three consecutive offscreen enemies: forward splice would skip the second
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, -100.0, 0.0, 20));
        store.enemies.push(enemy_at(2, -100.0, 50.0, 20));
        store.enemies.push(enemy_at(3, -100.0, 100.0, 20));
        store.enemies.push(enemy_at(4, 300.0, 100.0, 20));

        let removed = store.advance_enemies();
        assert_eq!(removed, 3);
        assert_eq!(store.enemies.len(), 1);
        assert_eq!(store.enemies[0].id, 4);
        assert_eq!(store.enemies[0].pos.x, 298.0);
    }

    #[test]
    fn test_projectiles_culled_past_right_edge() {
        let playfield = Playfield::default();
        let mut store = EntityStore::default();
        store.projectiles.push(projectile_at(1, playfield.width - 5.0, 10.0));
        store.projectiles.push(projectile_at(2, 100.0, 10.0));
        store.advance_projectiles(&playfield);
        assert_eq!(store.projectiles.len(), 1);
        assert_eq!(store.projectiles[0].id, 2);
    }

    #[test]
    fn test_hits_to_kill_and_score_once() {
        // health 25, power 10 -> ceil(25/10) = 3 hits
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, 100.0, 100.0, 25));
        let mut events = Vec::new();
        let mut total = 0;
        for hit in 1..=3 {
            store.projectiles.push(projectile_at(10 + hit, 110.0, 110.0));
            total += store.resolve_projectile_hits(10, 10, &mut events);
            assert!(store.projectiles.is_empty(), "projectile consumed on hit");
            if hit < 3 {
                assert_eq!(store.enemies.len(), 1);
                assert_eq!(total, 0);
            }
        }
        assert!(store.enemies.is_empty());
        assert_eq!(total, 10);

        // Further projectiles find nothing to hit and earn nothing
        store.projectiles.push(projectile_at(99, 110.0, 110.0));
        assert_eq!(store.resolve_projectile_hits(10, 10, &mut events), 0);
        assert_eq!(store.projectiles.len(), 1);
    }

    #[test]
    fn test_huge_power_kills_without_overflow() {
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, 100.0, 100.0, 20));
        store.projectiles.push(projectile_at(5, 110.0, 110.0));
        let mut events = Vec::new();
        assert_eq!(store.resolve_projectile_hits(i32::MAX, u64::MAX, &mut events), u64::MAX);
        assert!(store.enemies.is_empty());
    }

    #[test]
    fn test_one_projectile_hits_one_enemy() {
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, 100.0, 100.0, 20));
        store.enemies.push(enemy_at(2, 100.0, 100.0, 20));
        store.projectiles.push(projectile_at(5, 110.0, 110.0));
        let mut events = Vec::new();
        store.resolve_projectile_hits(10, 10, &mut events);
        assert_eq!(store.enemies[0].health, 10);
        assert_eq!(store.enemies[1].health, 20);
    }

    #[test]
    fn test_contact_cooldown_policy() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, player.pos.x, player.pos.y, 20));
        let policy = ContactPolicy::Cooldown { cooldown_ms: 1000.0 };
        let mut events = Vec::new();

        assert_eq!(store.resolve_enemy_contacts(&mut player, policy, 0.0, &mut events), 5);
        assert_eq!(store.resolve_enemy_contacts(&mut player, policy, 500.0, &mut events), 0);
        assert_eq!(store.resolve_enemy_contacts(&mut player, policy, 1000.0, &mut events), 5);
        assert_eq!(player.health, 90);
        assert_eq!(store.enemies.len(), 1);
    }

    #[test]
    fn test_contact_destroy_policy() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, player.pos.x, player.pos.y, 20));
        let mut events = Vec::new();

        store.resolve_enemy_contacts(
            &mut player,
            ContactPolicy::DestroyOnContact,
            0.0,
            &mut events,
        );
        assert_eq!(player.health, 95);
        assert!(store.enemies.is_empty());
    }

    #[test]
    fn test_contact_every_step_policy() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, player.pos.x, player.pos.y, 20));
        let mut events = Vec::new();

        for step in 0..3 {
            store.resolve_enemy_contacts(
                &mut player,
                ContactPolicy::EveryStep,
                step as f64,
                &mut events,
            );
        }
        assert_eq!(player.health, 85);
    }

    #[test]
    fn test_pickups_apply_effects() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, tuning.clone());
        state.player.health = 90;
        let pos = state.player.pos;
        for (id, kind) in PowerUpKind::ALL.into_iter().enumerate() {
            state.store.power_ups.push(PowerUp {
                id: id as u32,
                pos,
                size: Vec2::splat(30.0),
                speed: 2.0,
                kind,
            });
        }
        let mut events = Vec::new();
        let collected = state.store.resolve_pickups(
            &mut state.player,
            &mut state.effects,
            &tuning,
            &mut events,
        );
        assert_eq!(collected, 3);
        // Heal clamps at max
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.effects.speed_boosted());
        assert!(state.effects.power_boosted());
        assert!(state.store.power_ups.is_empty());
    }

    #[test]
    fn test_bomb_only_hits_visible_enemies() {
        let playfield = Playfield::default();
        let mut store = EntityStore::default();
        store.enemies.push(enemy_at(1, 200.0, 0.0, 20));
        store.enemies.push(enemy_at(2, playfield.width, 0.0, 20));
        let mut events = Vec::new();
        assert_eq!(store.detonate_bomb(&playfield, &mut events), 1);
        assert_eq!(store.enemies.len(), 1);
        assert_eq!(store.enemies[0].id, 2);
    }

    proptest! {
        #[test]
        fn prop_culled_entities_never_return(
            xs in proptest::collection::vec(-200.0f32..900.0, 0..40),
            steps in 1usize..30,
        ) {
            let mut store = EntityStore::default();
            for (i, x) in xs.iter().enumerate() {
                store.enemies.push(enemy_at(i as u32, *x, 0.0, 20));
            }
            let mut removed_ids = Vec::new();
            for _ in 0..steps {
                let before: Vec<u32> = store.enemies.iter().map(|e| e.id).collect();
                store.advance_enemies();
                prop_assert!(store.enemies.iter().all(|e| e.pos.x + e.size.x >= 0.0));
                for id in before {
                    if !store.enemies.iter().any(|e| e.id == id) {
                        removed_ids.push(id);
                    }
                }
                prop_assert!(store.enemies.iter().all(|e| !removed_ids.contains(&e.id)));
            }
        }
    }
}
