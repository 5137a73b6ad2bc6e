//! Fusion Lander - A gravity lander arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, landing, platform generation)
//! - `session`: Game phase state machine and fixed timestep driver
//! - `quiz`: Arithmetic refuelling challenges
//! - `persistence`: Best-effort save/load of high scores and settings
//! - `audio`: Fire-and-forget sound cues
//! - `host`: Clock and key mapping for the embedding environment

pub mod audio;
pub mod highscores;
pub mod host;
pub mod persistence;
pub mod quiz;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timers;

pub use highscores::HighScores;
pub use session::{Session, Snapshot};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Motion constants are expressed per physics step, not per second.
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Largest frame time fed to the accumulator (avoids catch-up after suspend)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ship spawn point and heading (pointing up)
    pub const SHIP_SPAWN: Vec2 = Vec2::new(400.0, 300.0);
    pub const SHIP_SPAWN_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

    /// Downward acceleration per step
    pub const GRAVITY: f32 = 0.04;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 4.0;
    /// Touchdown limits
    pub const MAX_LANDING_SPEED: f32 = 1.5;
    pub const MAX_LANDING_ANGLE: f32 = 0.3; // ~17 degrees

    /// Fuel
    pub const INITIAL_FUEL: f32 = 100.0;
    pub const MAX_FUEL: f32 = 100.0;
    pub const FUEL_CONSUMPTION: f32 = 0.3;
    pub const FUEL_REWARD: f32 = 40.0;

    /// Ship footprint (legs included), half extents around the position
    pub const SHIP_HALF_WIDTH: f32 = 14.0;
    pub const SHIP_LEG_DEPTH: f32 = 14.0;
    /// Vertical window around a platform top that counts as contact
    pub const CONTACT_TOLERANCE: f32 = 15.0;
    /// Rest height above a visited platform
    pub const REST_OFFSET: f32 = 15.0;
    /// Height the ship is pushed to after a bounce
    pub const BOUNCE_OFFSET: f32 = 20.0;
    /// Vertical restitution (negative flips direction) and horizontal damping
    pub const BOUNCE_RESTITUTION: f32 = -0.6;
    pub const BOUNCE_FRICTION: f32 = 0.8;

    /// Platform generation
    pub const PLATFORM_TARGET_COUNT: usize = 5;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 60.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 120.0;
    pub const PLATFORM_MIN_Y: f32 = 50.0;
    pub const PLATFORM_MAX_Y: f32 = CANVAS_HEIGHT - 100.0;
    pub const MIN_PLATFORM_DIST: f32 = 150.0;
    pub const SHIP_SAFE_ZONE_RADIUS: f32 = 100.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 50;

    /// Session timing (seconds)
    pub const FUEL_OUT_GRACE: f64 = 0.1;
    pub const EXPLOSION_DURATION: f64 = 3.0;
    pub const GAME_OVER_DURATION: f64 = 2.0;

    /// Lift-off nudge after a successful refuel
    pub const LIFTOFF_RISE: f32 = 10.0;
    pub const LIFTOFF_SPEED: f32 = 0.5;
}

/// RGBA colors shared by the simulation snapshot
pub mod colors {
    pub const THRUST: [f32; 4] = [0.96, 0.62, 0.04, 1.0]; // Amber
    pub const DANGER: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const TRAIL: [f32; 4] = [0.05, 0.65, 0.91, 0.4]; // Faint blue
    pub const PLATFORM_EASY: [f32; 4] = [0.13, 0.77, 0.37, 1.0];
    pub const PLATFORM_MEDIUM: [f32; 4] = [0.92, 0.70, 0.03, 1.0];
    pub const PLATFORM_HARD: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const PLATFORM_VISITED: [f32; 4] = [0.32, 0.32, 0.36, 1.0];
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit heading vector for an angle
#[inline]
pub fn heading(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
