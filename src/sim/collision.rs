//! Landing detection and response
//!
//! The ship's footprint is an axis-aligned box around its position (legs
//! included). Every overlapping platform is classified on its own, in order:
//!
//! 1. Safe approach, unvisited pad - landing event, nothing else changes
//! 2. Safe approach, visited pad - ship comes to rest on top
//! 3. Anything else - bounce with energy loss
//!
//! Overlaps are not exclusive: one step can land on one pad and bounce off another.

use glam::Vec2;

use super::state::{GameEvent, Platform, Ship};
use crate::consts::*;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Footprint of the ship at its current position
    pub fn ship(ship: &Ship) -> Self {
        Self::new(
            Vec2::new(ship.pos.x - SHIP_HALF_WIDTH, ship.pos.y - SHIP_LEG_DEPTH),
            Vec2::new(ship.pos.x + SHIP_HALF_WIDTH, ship.pos.y + SHIP_LEG_DEPTH),
        )
    }

    /// Pad rectangle
    pub fn platform(platform: &Platform) -> Self {
        Self::new(
            Vec2::new(platform.x, platform.y),
            Vec2::new(platform.right(), platform.y + PLATFORM_HEIGHT),
        )
    }

    /// Strict horizontal overlap
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }
}

/// How a single ship/platform contact was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Landed,
    Resting,
    Bounced,
}

/// Whether the ship is touching the top of a platform while descending
pub fn in_contact(ship: &Ship, platform: &Platform) -> bool {
    let feet = Aabb::ship(ship);
    let pad = Aabb::platform(platform);

    feet.overlaps_x(&pad) && (feet.max.y - pad.min.y).abs() < CONTACT_TOLERANCE && ship.vel.y > 0.0
}

/// Slow enough and upright enough to touch down
pub fn is_safe_approach(ship: &Ship) -> bool {
    ship.speed() < MAX_LANDING_SPEED && ship.tilt() < MAX_LANDING_ANGLE
}

/// Check the ship against every platform and apply responses
///
/// Never marks a platform visited; that happens when the session accepts
/// the landing.
pub fn resolve_contacts(ship: &mut Ship, platforms: &[Platform], events: &mut Vec<GameEvent>) -> Vec<(u32, Contact)> {
    let mut contacts = Vec::new();

    for platform in platforms {
        if !in_contact(ship, platform) {
            continue;
        }

        let speed = ship.speed();
        let contact = if is_safe_approach(ship) {
            if !platform.visited {
                events.push(GameEvent::Landed {
                    platform_id: platform.id,
                });
                Contact::Landed
            } else {
                ship.vel = Vec2::ZERO;
                ship.pos.y = platform.y - REST_OFFSET;
                Contact::Resting
            }
        } else {
            ship.vel.y *= BOUNCE_RESTITUTION;
            ship.vel.x *= BOUNCE_FRICTION;
            // Lift clear of the surface so the next step can't tunnel
            ship.pos.y = platform.y - BOUNCE_OFFSET;
            events.push(GameEvent::Bounced {
                platform_id: platform.id,
                loud: speed > 1.0,
            });
            Contact::Bounced
        };

        contacts.push((platform.id, contact));
    }

    contacts
}
