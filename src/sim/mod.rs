//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No audio, storage or clock dependencies

pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contact, in_contact, is_safe_approach, resolve_contacts};
pub use difficulty::DifficultyTier;
pub use generator::{generate_platforms, placement_ok};
pub use physics::{integrate_ship, spawn_explosion, update_particles, wrap_position};
pub use state::{
    GameEvent, GamePhase, GameState, MAX_PARTICLES, Particle, Platform, PlatformKind, Ship,
    ShipClass, ShipStats,
};
pub use tick::{TickInput, autopilot, tick};
