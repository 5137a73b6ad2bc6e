//! Fixed timestep simulation tick
//!
//! Advances particles in every phase and flies the ship while Playing.

use std::cmp::Ordering;

use super::collision::resolve_contacts;
use super::physics::{PARTICLE_DECAY, PARTICLE_DECAY_EXPLODING, integrate_ship, update_particles};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::normalize_angle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    /// Demo mode - the autopilot flies the ship
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    let decay = if state.phase == GamePhase::Exploding {
        PARTICLE_DECAY_EXPLODING
    } else {
        PARTICLE_DECAY
    };
    update_particles(&mut state.particles, decay);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    let stats = state.ship_class.stats();
    integrate_ship(state, &input, &stats);

    let GameState {
        ship,
        platforms,
        events,
        ..
    } = state;
    resolve_contacts(ship, platforms, events);
}

/// Descent rate the autopilot aims for over a pad
const AUTOPILOT_SINK_RATE: f32 = 0.6;
/// Largest lean from upright the autopilot will use
const AUTOPILOT_MAX_LEAN: f32 = 0.2;

/// Crude lander AI: drift over the nearest unvisited pad, then sink onto it
pub fn autopilot(state: &GameState) -> TickInput {
    let ship = &state.ship;

    let target = state
        .platforms
        .iter()
        .filter(|p| !p.visited)
        .min_by(|a, b| {
            a.anchor()
                .distance(ship.pos)
                .partial_cmp(&b.anchor().distance(ship.pos))
                .unwrap_or(Ordering::Equal)
        });

    let (desired_vx, desired_vy) = match target {
        Some(pad) => {
            let dx = pad.anchor().x - ship.pos.x;
            let above = ship.pos.y + SHIP_LEG_DEPTH < pad.y;
            let over = dx.abs() < pad.width / 2.0 - SHIP_HALF_WIDTH / 2.0;

            let vy = if !above {
                // Climb back over the pad before sliding across
                -1.0
            } else if over {
                AUTOPILOT_SINK_RATE
            } else {
                0.0
            };
            ((dx * 0.02).clamp(-1.0, 1.0), vy)
        }
        None => (0.0, 0.0),
    };

    // Lean into the velocity error; positive lean pushes right
    let lean = ((desired_vx - ship.vel.x) * 0.5).clamp(-AUTOPILOT_MAX_LEAN, AUTOPILOT_MAX_LEAN);
    let error = normalize_angle(SHIP_SPAWN_ANGLE + lean - ship.angle);

    TickInput {
        rotate_left: error < -0.02,
        rotate_right: error > 0.02,
        thrust: ship.vel.y > desired_vy && ship.tilt() < 0.6,
        idle_mode: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GameEvent, Particle, Platform, PlatformKind};
    use glam::Vec2;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_menu_does_not_fly() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Menu);

        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.ship.pos, SHIP_SPAWN);
        assert_eq!(state.ship.fuel, INITIAL_FUEL);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_particles_update_outside_playing() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Exploding;
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            life: 1.0,
            color: crate::colors::DANGER,
        });

        tick(&mut state, &TickInput::default());

        assert_eq!(state.particles[0].pos, Vec2::new(1.0, 0.0));
        assert!((state.particles[0].life - (1.0 - PARTICLE_DECAY_EXPLODING)).abs() < 1e-6);
    }

    #[test]
    fn test_free_fall_lands_on_pad() {
        let mut state = playing(7);
        state.platforms.push(Platform::new(1, PlatformKind::Easy, 360.0, 340.0, 80.0));

        let mut landed = None;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            if let Some(GameEvent::Landed { platform_id }) = state
                .drain_events()
                .into_iter()
                .find(|e| matches!(e, GameEvent::Landed { .. }))
            {
                landed = Some(platform_id);
                break;
            }
        }
        // 40 px of free fall stays under the landing speed
        assert_eq!(landed, Some(1));
    }

    #[test]
    fn test_hard_fall_bounces() {
        let mut state = playing(7);
        state.platforms.push(Platform::new(1, PlatformKind::Easy, 360.0, 580.0, 80.0));
        state.ship.vel.y = 3.0;

        let mut bounced = false;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            let events = state.drain_events();
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
            if events.iter().any(|e| matches!(e, GameEvent::Bounced { loud: true, .. })) {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert!(state.ship.vel.y < 0.0);
    }

    #[test]
    fn test_autopilot_steers_toward_pad() {
        let mut state = playing(3);
        state.platforms.push(Platform::new(1, PlatformKind::Easy, 600.0, 400.0, 80.0));

        let input = autopilot(&state);
        // Pad is to the right, so lean right
        assert!(input.rotate_right);
        assert!(!input.rotate_left);
    }

    #[test]
    fn test_autopilot_sinks_over_pad() {
        let mut state = playing(21);
        state.platforms.push(Platform::new(1, PlatformKind::Easy, 350.0, 420.0, 100.0));

        // Directly above and falling fast: burn
        state.ship.vel = Vec2::new(0.0, 1.2);
        let input = autopilot(&state);
        assert!(input.thrust);
        assert!(!input.rotate_left && !input.rotate_right);

        // Slow descent: coast
        state.ship.vel = Vec2::new(0.0, 0.3);
        assert!(!autopilot(&state).thrust);
    }

    #[test]
    fn test_autopilot_climbs_when_below_pad() {
        let mut state = playing(21);
        state.platforms.push(Platform::new(1, PlatformKind::Easy, 350.0, 200.0, 100.0));
        state.ship.vel = Vec2::new(0.0, -0.5);
        assert!(autopilot(&state).thrust);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.phase = GamePhase::Playing;
        state2.phase = GamePhase::Playing;
        state1.regenerate_platforms(Vec::new());
        state2.regenerate_platforms(Vec::new());

        let inputs = [
            TickInput {
                thrust: true,
                rotate_left: true,
                ..Default::default()
            },
            TickInput {
                thrust: true,
                ..Default::default()
            },
            TickInput {
                rotate_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..30 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ship, state2.ship);
        assert_eq!(state1.particles.len(), state2.particles.len());
        assert_eq!(state1.platforms, state2.platforms);
    }
}
