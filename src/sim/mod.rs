//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod state;
pub mod tick;

pub use collision::{Bounded, Rect, aabb_overlap, collides};
pub use entities::{EntityStore, advance_and_cull};
pub use state::{
    ActiveEffects, Enemy, GameEvent, GamePhase, GameState, Player, PowerUp, PowerUpKind,
    Projectile, ProjectileTag,
};
pub use tick::{TickInput, tick};
