//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::colors;
use crate::consts::*;
use crate::quiz::Challenge;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a ship
    Menu,
    /// Flying; physics and landing checks run
    Playing,
    /// Touched down, refuel challenge on screen
    Landed,
    /// Ship destroyed, explosion playing out (3 seconds)
    Exploding,
    /// Caption screen before returning to the menu (2 seconds)
    GameOver,
}

/// Ship presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShipClass {
    /// Agile, low mass
    #[default]
    Light,
    /// Sluggish, but refuels twice as much per landing
    Heavy,
}

/// Handling numbers for a ship class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStats {
    pub name: &'static str,
    /// Velocity added per thrusting step
    pub thrust_power: f32,
    /// Radians turned per step while rotating
    pub rotation_speed: f32,
    /// Multiplier on the per-landing fuel reward
    pub fuel_reward_multiplier: f32,
}

impl ShipClass {
    pub fn stats(self) -> ShipStats {
        match self {
            ShipClass::Light => ShipStats {
                name: "LIGHT LANDER",
                thrust_power: 0.09,
                rotation_speed: 0.06,
                fuel_reward_multiplier: 1.0,
            },
            ShipClass::Heavy => ShipStats {
                name: "HEAVY LANDER",
                thrust_power: 0.075,
                rotation_speed: 0.03,
                fuel_reward_multiplier: 2.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Light => "light",
            ShipClass::Heavy => "heavy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(ShipClass::Light),
            "heavy" => Some(ShipClass::Heavy),
            _ => None,
        }
    }
}

/// The player's lander
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (-π/2 is upright)
    pub angle: f32,
    /// 0-100
    pub fuel: f32,
    pub thrusting: bool,
    pub rotating_left: bool,
    pub rotating_right: bool,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: SHIP_SPAWN,
            vel: Vec2::ZERO,
            angle: SHIP_SPAWN_ANGLE,
            fuel: INITIAL_FUEL,
            thrusting: false,
            rotating_left: false,
            rotating_right: false,
        }
    }
}

impl Ship {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Absolute deviation from upright, in [0, π]
    pub fn tilt(&self) -> f32 {
        crate::normalize_angle(self.angle - SHIP_SPAWN_ANGLE).abs()
    }

    /// Add refuel reward, capped at a full tank
    pub fn refuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).min(MAX_FUEL);
    }
}

/// Platform difficulty kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Easy,
    Medium,
    Hard,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 3] = [PlatformKind::Easy, PlatformKind::Medium, PlatformKind::Hard];

    /// Points awarded for a successful refuel here
    pub fn points(self) -> u64 {
        match self {
            PlatformKind::Easy => 10,
            PlatformKind::Medium => 40,
            PlatformKind::Hard => 70,
        }
    }

    /// 1-3 difficulty scale handed to the challenge source
    pub fn difficulty_level(self) -> u8 {
        match self {
            PlatformKind::Easy => 1,
            PlatformKind::Medium => 2,
            PlatformKind::Hard => 3,
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            PlatformKind::Easy => colors::PLATFORM_EASY,
            PlatformKind::Medium => colors::PLATFORM_MEDIUM,
            PlatformKind::Hard => colors::PLATFORM_HARD,
        }
    }
}

/// A landing pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Set once the pad has paid out; never cleared
    pub visited: bool,
    /// Pre-generated refuel challenge
    #[serde(default)]
    pub challenge: Option<Challenge>,
}

impl Platform {
    pub fn new(id: u32, kind: PlatformKind, x: f32, y: f32, width: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width,
            visited: false,
            challenge: None,
        }
    }

    /// Horizontal center of the top surface; used for spacing checks
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn points(&self) -> u64 {
        self.kind.points()
    }

    pub fn difficulty_level(&self) -> u8 {
        self.kind.difficulty_level()
    }

    /// Display color (greyed out once visited)
    pub fn color(&self) -> [f32; 4] {
        if self.visited {
            colors::PLATFORM_VISITED
        } else {
            self.kind.color()
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life; removed at or below zero
    pub life: f32,
    pub color: [f32; 4],
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Safe touchdown on an unvisited platform
    Landed { platform_id: u32 },
    /// Unsafe contact; `loud` when the impact warrants a crash cue
    Bounced { platform_id: u32, loud: bool },
    /// Engine lit this step
    ThrustStarted,
    /// Engine cut this step
    ThrustStopped,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub ship_class: ShipClass,
    pub ship: Ship,
    /// Active platforms (sorted by id)
    pub platforms: Vec<Platform>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Particle pool cap
    pub max_particles: usize,
    pub score: u64,
    /// Answer to the last solved challenge, kept out of the next ones
    pub last_answer: Option<u32>,
    /// Physics steps run this session
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    pub(super) next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed, sitting in the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            ship_class: ShipClass::Light,
            ship: Ship::default(),
            platforms: Vec::new(),
            particles: Vec::new(),
            max_particles: MAX_PARTICLES,
            score: 0,
            last_answer: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put everything back to the start-of-run state for a ship class
    pub fn reset_run(&mut self, class: ShipClass) {
        self.ship_class = class;
        self.ship = Ship::default();
        self.platforms.clear();
        self.particles.clear();
        self.events.clear();
        self.score = 0;
        self.last_answer = None;
    }

    pub fn platform(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: u32) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    /// Push a particle unless the pool is full
    pub fn spawn_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure platforms are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
    }
}

/// Default particle cap (overridden by the quality preset)
pub const MAX_PARTICLES: usize = 500;
