//! Ship kinematics and particle effects
//!
//! Everything here runs once per fixed step; constants are per step.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Particle, ShipStats};
use super::tick::TickInput;
use crate::colors;
use crate::consts::*;
use crate::{heading, normalize_angle};

/// Plume particles emitted per thrusting step
const PLUME_PER_STEP: usize = 3;
/// Speed above which the faint movement trail appears
const TRAIL_MIN_SPEED: f32 = 1.0;
/// Per-step chance of a trail particle
const TRAIL_CHANCE: f64 = 0.3;
/// Particles in the explosion burst
const EXPLOSION_PARTICLES: usize = 100;

/// Particle life lost per step
pub const PARTICLE_DECAY: f32 = 0.05;
/// Slower decay while the explosion plays
pub const PARTICLE_DECAY_EXPLODING: f32 = 0.01;

/// Advance the ship by one step: rotate, thrust, gravity, integrate, wrap
pub fn integrate_ship(state: &mut GameState, input: &TickInput, stats: &ShipStats) {
    // Rotation
    state.ship.rotating_left = input.rotate_left;
    state.ship.rotating_right = input.rotate_right;
    if input.rotate_left {
        state.ship.angle -= stats.rotation_speed;
    }
    if input.rotate_right {
        state.ship.angle += stats.rotation_speed;
    }
    state.ship.angle = normalize_angle(state.ship.angle);

    // Thrust
    let was_thrusting = state.ship.thrusting;
    if input.thrust && state.ship.fuel > 0.0 {
        let dir = heading(state.ship.angle);
        state.ship.thrusting = true;
        state.ship.vel += dir * stats.thrust_power;
        state.ship.fuel = (state.ship.fuel - FUEL_CONSUMPTION).max(0.0);
        spawn_plume(state, dir);
    } else {
        state.ship.thrusting = false;
    }
    match (was_thrusting, state.ship.thrusting) {
        (false, true) => state.events.push(GameEvent::ThrustStarted),
        (true, false) => state.events.push(GameEvent::ThrustStopped),
        _ => {}
    }

    // Passive trail
    if state.ship.speed() > TRAIL_MIN_SPEED && state.rng.random_bool(TRAIL_CHANCE) {
        let jitter = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * 6.0;
        let life = 0.4 + state.rng.random::<f32>() * 0.2;
        let pos = state.ship.pos + jitter + Vec2::new(0.0, 5.0);
        state.spawn_particle(Particle {
            pos,
            vel: Vec2::ZERO,
            life,
            color: colors::TRAIL,
        });
    }

    // Gravity, capped at terminal velocity
    state.ship.vel.y = (state.ship.vel.y + GRAVITY).min(MAX_FALL_SPEED);

    state.ship.pos += state.ship.vel;
    state.ship.pos = wrap_position(state.ship.pos);
}

/// Toroidal wrap: leaving one edge re-enters at the opposite one
pub fn wrap_position(mut pos: Vec2) -> Vec2 {
    if pos.x > CANVAS_WIDTH {
        pos.x = 0.0;
    }
    if pos.x < 0.0 {
        pos.x = CANVAS_WIDTH;
    }
    if pos.y > CANVAS_HEIGHT {
        pos.y = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = CANVAS_HEIGHT;
    }
    pos
}

fn spawn_plume(state: &mut GameState, dir: Vec2) {
    let nozzle = state.ship.pos - dir * 10.0;
    for _ in 0..PLUME_PER_STEP {
        let kick = state.rng.random::<f32>() * 2.0 + 1.0;
        let color = if state.rng.random_bool(0.5) {
            colors::THRUST
        } else {
            colors::DANGER
        };
        let vel = state.ship.vel - dir * kick;
        state.spawn_particle(Particle {
            pos: nozzle,
            vel,
            life: 0.5,
            color,
        });
    }
}

/// One-shot burst at the ship's position
pub fn spawn_explosion(state: &mut GameState) {
    let origin = state.ship.pos;
    for _ in 0..EXPLOSION_PARTICLES {
        let vel = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * 12.0;
        let life = state.rng.random::<f32>() + 1.0;
        let color = if state.rng.random_bool(0.5) {
            colors::THRUST
        } else {
            colors::DANGER
        };
        state.spawn_particle(Particle {
            pos: origin,
            vel,
            life,
            color,
        });
    }
}

/// Move particles and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, decay: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= decay;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, ShipClass};

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_gravity_and_terminal_velocity() {
        let mut state = playing(1);
        let stats = ShipClass::Light.stats();
        integrate_ship(&mut state, &TickInput::default(), &stats);
        assert!((state.ship.vel.y - GRAVITY).abs() < 1e-6);
        assert!((state.ship.pos.y - (SHIP_SPAWN.y + GRAVITY)).abs() < 1e-4);

        state.ship.vel.y = MAX_FALL_SPEED;
        integrate_ship(&mut state, &TickInput::default(), &stats);
        assert_eq!(state.ship.vel.y, MAX_FALL_SPEED);
    }

    #[test]
    fn test_rotation_follows_input() {
        let mut state = playing(1);
        let stats = ShipClass::Heavy.stats();
        let start = state.ship.angle;

        let left = TickInput {
            rotate_left: true,
            ..Default::default()
        };
        integrate_ship(&mut state, &left, &stats);
        assert!((state.ship.angle - (start - stats.rotation_speed)).abs() < 1e-6);
        assert!(state.ship.rotating_left);

        let both = TickInput {
            rotate_left: true,
            rotate_right: true,
            ..Default::default()
        };
        let before = state.ship.angle;
        integrate_ship(&mut state, &both, &stats);
        assert!((state.ship.angle - before).abs() < 1e-6);

        let before = state.ship.angle;
        integrate_ship(&mut state, &TickInput::default(), &stats);
        assert_eq!(state.ship.angle, before);
        assert!(!state.ship.rotating_left && !state.ship.rotating_right);
    }

    #[test]
    fn test_angle_stays_wrapped_under_spin() {
        use std::f32::consts::PI;

        let mut state = playing(1);
        let stats = ShipClass::Light.stats();
        let spin = TickInput {
            rotate_right: true,
            ..Default::default()
        };
        // A dozen full turns
        let steps = (24.0 * PI / stats.rotation_speed) as usize;
        for _ in 0..steps {
            integrate_ship(&mut state, &spin, &stats);
            assert!((-PI..PI).contains(&state.ship.angle));
        }
        // Heading still tracks the accumulated turn
        let turned = normalize_angle(SHIP_SPAWN_ANGLE + steps as f32 * stats.rotation_speed);
        assert!((state.ship.angle - turned).abs() < 1e-2);
    }

    #[test]
    fn test_thrust_burns_fuel_and_lifts() {
        let mut state = playing(2);
        let stats = ShipClass::Light.stats();
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        integrate_ship(&mut state, &thrust, &stats);

        assert!((state.ship.fuel - (INITIAL_FUEL - FUEL_CONSUMPTION)).abs() < 1e-4);
        // Upright thrust beats gravity
        assert!((state.ship.vel.y - (GRAVITY - stats.thrust_power)).abs() < 1e-6);
        assert!(state.ship.thrusting);
        assert!(state.particles.len() >= PLUME_PER_STEP);
        assert_eq!(state.drain_events(), vec![GameEvent::ThrustStarted]);
    }

    #[test]
    fn test_fuel_never_negative() {
        let mut state = playing(3);
        let stats = ShipClass::Light.stats();
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        let mut last = state.ship.fuel;
        for _ in 0..400 {
            integrate_ship(&mut state, &thrust, &stats);
            assert!(state.ship.fuel <= last);
            assert!(state.ship.fuel >= 0.0);
            last = state.ship.fuel;
        }
        assert_eq!(state.ship.fuel, 0.0);
        assert!(!state.ship.thrusting);
        assert!(state.events.contains(&GameEvent::ThrustStopped));
    }

    #[test]
    fn test_empty_tank_gives_no_thrust() {
        let mut state = playing(4);
        state.ship.fuel = 0.0;
        let stats = ShipClass::Light.stats();
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        integrate_ship(&mut state, &thrust, &stats);
        assert!((state.ship.vel.y - GRAVITY).abs() < 1e-6);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_wrap_both_axes() {
        assert_eq!(wrap_position(Vec2::new(801.0, 10.0)), Vec2::new(0.0, 10.0));
        assert_eq!(wrap_position(Vec2::new(-1.0, 10.0)), Vec2::new(CANVAS_WIDTH, 10.0));
        assert_eq!(wrap_position(Vec2::new(10.0, 601.0)), Vec2::new(10.0, 0.0));
        assert_eq!(wrap_position(Vec2::new(10.0, -0.5)), Vec2::new(10.0, CANVAS_HEIGHT));
        assert_eq!(wrap_position(Vec2::new(400.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_particles_decay_and_die() {
        let mut particles = vec![
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::new(1.0, 2.0),
                life: 0.1,
                color: colors::THRUST,
            },
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                life: 1.0,
                color: colors::THRUST,
            },
        ];
        update_particles(&mut particles, PARTICLE_DECAY);
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].pos, Vec2::new(1.0, 2.0));
        update_particles(&mut particles, PARTICLE_DECAY);
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn test_explosion_burst() {
        let mut state = playing(5);
        spawn_explosion(&mut state);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.particles.iter().all(|p| p.life >= 1.0 && p.life <= 2.0));
    }
}
