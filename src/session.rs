//! Game session: phase state machine and fixed timestep driver
//!
//! The host feeds frame time to [`Session::update`], sets held controls and
//! answers quizzes. Everything else (landing, scoring, refuelling, game over,
//! high scores, sound cues) is decided here.

use std::path::PathBuf;

use rand::Rng;

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::host::{Clock, Control, SystemClock};
use crate::persistence::{MemoryStore, ScoreStore};
use crate::quiz::{Challenge, ChallengeSource, MathChallenges};
use crate::settings::Settings;
use crate::sim::{
    DifficultyTier, GameEvent, GamePhase, GameState, Particle, Platform, PlatformKind, Ship,
    ShipClass, TickInput, spawn_explosion, tick,
};
use crate::timers::{Timers, Transition};

/// Captions shown on the game-over screen
pub const GAME_OVER_TEXTS: [&str; 3] = ["WASTED", "KABOOM", "GAME OVER"];

/// Salt so the challenge stream differs from the field stream
const CHALLENGE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The refuel question currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuiz {
    pub platform_id: u32,
    pub challenge: Challenge,
    /// Seconds left to answer
    pub remaining: f64,
    /// Seconds granted at landing
    pub budget: f64,
}

/// Result of [`Session::submit_answer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuizOutcome {
    Correct { points: u64, fuel_added: f32 },
    Wrong,
    /// No quiz was open
    Ignored,
}

/// Read-only view for rendering
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub ship: &'a Ship,
    pub ship_class: ShipClass,
    pub platforms: &'a [Platform],
    pub particles: &'a [Particle],
    pub score: u64,
    pub tier: DifficultyTier,
    pub quiz: Option<&'a ActiveQuiz>,
    pub game_over_message: Option<&'static str>,
    pub high_scores: &'a HighScores,
    pub music_enabled: bool,
}

pub struct Session {
    state: GameState,
    /// Held controls, sampled once per step
    controls: TickInput,
    accumulator: f64,
    timers: Timers,
    quiz: Option<ActiveQuiz>,
    high_scores: HighScores,
    store: Box<dyn ScoreStore>,
    audio: AudioManager,
    clock: Box<dyn Clock>,
    challenges: Box<dyn ChallengeSource>,
    settings: Settings,
    /// Where preference changes are written back, if anywhere
    settings_path: Option<PathBuf>,
    game_over_message: Option<&'static str>,
}

impl Session {
    /// A session sitting in the menu, with an in-memory score store
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = GameState::new(seed);
        state.max_particles = settings.max_particles();
        state.ship_class = settings.ship_class;

        let mut audio = AudioManager::default();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        if settings.music_enabled {
            audio.toggle_music();
        }

        Self {
            state,
            controls: TickInput::default(),
            accumulator: 0.0,
            timers: Timers::new(),
            quiz: None,
            high_scores: HighScores::new(),
            store: Box::new(MemoryStore::new()),
            audio,
            clock: Box::new(SystemClock),
            challenges: Box::new(MathChallenges::new(seed ^ CHALLENGE_SEED_SALT)),
            settings,
            settings_path: None,
            game_over_message: None,
        }
    }

    /// Use a persistent score store and load its leaderboard
    pub fn with_store(mut self, mut store: Box<dyn ScoreStore>) -> Self {
        self.high_scores = HighScores::load(store.as_mut());
        self.store = store;
        self
    }

    pub fn with_audio_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio.set_sink(sink);
        self
    }

    /// Persist preference changes (music toggle) to this file
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_challenges(mut self, challenges: Box<dyn ChallengeSource>) -> Self {
        self.challenges = challenges;
        self
    }

    // === Host-facing controls ===

    /// Leave the menu and begin a run with the chosen ship
    ///
    /// Returns false (and does nothing) outside the menu.
    pub fn start(&mut self, class: ShipClass) -> bool {
        if self.state.phase != GamePhase::Menu {
            log::warn!("start() ignored in {:?}", self.state.phase);
            return false;
        }

        self.audio.play(SoundEffect::Click);
        self.state.reset_run(class);
        self.accumulator = 0.0;
        self.quiz = None;
        self.game_over_message = None;
        self.settings.ship_class = class;

        self.state.regenerate_platforms(Vec::new());
        self.preload_challenges();

        log::info!(
            "Run started with {} ({} platforms)",
            class.stats().name,
            self.state.platforms.len()
        );
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Press or release a held control
    pub fn set_control(&mut self, control: Control, held: bool) {
        match control {
            Control::RotateLeft => self.controls.rotate_left = held,
            Control::RotateRight => self.controls.rotate_right = held,
            Control::Thrust => self.controls.thrust = held,
        }
    }

    /// Let the autopilot fly (demo mode)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.controls.idle_mode = enabled;
    }

    /// Flip background music; returns the new state
    pub fn toggle_music(&mut self) -> bool {
        let on = self.audio.toggle_music();
        self.settings.music_enabled = on;
        if let Some(path) = &self.settings_path
            && let Err(e) = self.settings.save_to(path)
        {
            log::warn!("Failed to save settings: {}", e);
        }
        on
    }

    /// Answer the open quiz
    pub fn submit_answer(&mut self, answer: u32) -> QuizOutcome {
        if self.state.phase != GamePhase::Landed {
            return QuizOutcome::Ignored;
        }
        let Some(quiz) = self.quiz.take() else {
            return QuizOutcome::Ignored;
        };

        if quiz.challenge.is_correct(answer) {
            self.refuel(quiz.platform_id, answer)
        } else {
            log::info!("Wrong answer {} (expected {})", answer, quiz.challenge.answer);
            self.game_over();
            QuizOutcome::Wrong
        }
    }

    // === Frame driver ===

    /// Advance by one frame of wall time (seconds)
    ///
    /// Physics sees at most [`MAX_FRAME_DT`] per frame; timers and the quiz
    /// clock see the real frame time. Anything armed during this frame starts
    /// counting down on the next one.
    pub fn update(&mut self, frame_dt: f64) {
        let frame_dt = frame_dt.max(0.0);

        self.timers.advance(frame_dt);
        while let Some(transition) = self.timers.pop_due() {
            self.fire(transition);
        }

        self.advance_quiz(frame_dt);

        self.accumulator += frame_dt.min(MAX_FRAME_DT);
        while self.accumulator >= SIM_DT {
            self.step();
            self.accumulator -= SIM_DT;
        }
    }

    /// One fixed physics step
    fn step(&mut self) {
        tick(&mut self.state, &self.controls);

        for event in self.state.drain_events() {
            self.handle_event(event);
        }

        if self.state.phase == GamePhase::Playing && self.state.ship.fuel <= 0.0 {
            self.timers.schedule(Transition::FuelExhausted, FUEL_OUT_GRACE);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Landed { platform_id } => {
                // Only the first landing of a step counts
                if self.state.phase == GamePhase::Playing {
                    self.begin_quiz(platform_id);
                }
            }
            GameEvent::Bounced { loud, .. } => {
                if loud {
                    self.audio.play(SoundEffect::Crash);
                }
            }
            GameEvent::ThrustStarted => self.audio.play(SoundEffect::ThrustOn),
            GameEvent::ThrustStopped => self.audio.play(SoundEffect::ThrustOff),
        }
    }

    fn advance_quiz(&mut self, dt: f64) {
        if self.state.phase != GamePhase::Landed {
            return;
        }
        let timed_out = match self.quiz.as_mut() {
            Some(quiz) => {
                quiz.remaining -= dt;
                quiz.remaining <= 0.0
            }
            None => false,
        };
        if timed_out {
            log::info!("Quiz timed out");
            self.quiz = None;
            self.game_over();
        }
    }

    fn fire(&mut self, transition: Transition) {
        match transition {
            Transition::FuelExhausted => {
                if self.state.phase == GamePhase::Playing && self.state.ship.fuel <= 0.0 {
                    log::info!("Out of fuel");
                    self.game_over();
                }
            }
            Transition::ExplosionFinished => {
                if self.state.phase == GamePhase::Exploding {
                    self.set_phase(GamePhase::GameOver);
                    self.timers.schedule(Transition::ReturnToMenu, GAME_OVER_DURATION);
                }
            }
            Transition::ReturnToMenu => {
                if self.state.phase == GamePhase::GameOver {
                    self.set_phase(GamePhase::Menu);
                }
            }
        }
    }

    // === Transitions ===

    /// Change phase, clearing every pending timer
    fn set_phase(&mut self, phase: GamePhase) {
        let from = self.state.phase;
        if from == phase {
            return;
        }

        self.timers.cancel_all();

        if from == GamePhase::Playing && self.state.ship.thrusting {
            self.state.ship.thrusting = false;
            self.audio.play(SoundEffect::ThrustOff);
        }

        log::info!("Phase {:?} -> {:?}", from, phase);
        self.state.phase = phase;
    }

    fn begin_quiz(&mut self, platform_id: u32) {
        let Some(platform) = self.state.platform(platform_id) else {
            log::warn!("Landing on unknown platform {}", platform_id);
            return;
        };
        let kind = platform.kind;

        let challenge = match platform.challenge.clone() {
            Some(challenge) => challenge,
            None => {
                log::debug!("No preloaded challenge on platform {}", platform_id);
                let excluded: Vec<u32> = self.state.last_answer.into_iter().collect();
                self.challenges.request_challenge(kind, &excluded)
            }
        };

        let budget = DifficultyTier::for_score(self.state.score).quiz_seconds();
        self.quiz = Some(ActiveQuiz {
            platform_id,
            challenge,
            remaining: budget,
            budget,
        });

        self.set_phase(GamePhase::Landed);
        self.audio.play(SoundEffect::Land);
    }

    fn refuel(&mut self, platform_id: u32, answer: u32) -> QuizOutcome {
        self.audio.play(SoundEffect::Success);
        self.state.last_answer = Some(answer);

        let points = self
            .state
            .platform(platform_id)
            .map(Platform::points)
            .unwrap_or(PlatformKind::Easy.points());
        self.state.score += points;

        let stats = self.state.ship_class.stats();
        let fuel_before = self.state.ship.fuel;
        self.state.ship.refuel(FUEL_REWARD * stats.fuel_reward_multiplier);
        let fuel_added = self.state.ship.fuel - fuel_before;

        // Hop off the pad
        self.state.ship.pos.y -= LIFTOFF_RISE;
        self.state.ship.vel = glam::Vec2::new(0.0, -LIFTOFF_SPEED);

        if let Some(platform) = self.state.platform_mut(platform_id) {
            platform.visited = true;
        }

        // The spent pad leaves the field; the rest carry over
        let survivors: Vec<Platform> = self
            .state
            .platforms
            .drain(..)
            .filter(|p| p.id != platform_id)
            .collect();
        self.state.regenerate_platforms(survivors);
        self.preload_challenges();

        log::info!(
            "Refuelled +{:.0} on platform {}, score {}",
            fuel_added,
            platform_id,
            self.state.score
        );
        self.set_phase(GamePhase::Playing);

        QuizOutcome::Correct { points, fuel_added }
    }

    /// Ship destroyed: record the score, blow up, schedule the caption
    fn game_over(&mut self) {
        self.quiz = None;

        let score = self.state.score;
        let now = self.clock.now_ms();
        if let Some(rank) = self.high_scores.add_score(score, now) {
            log::info!("High score #{}: {}", rank, score);
            self.high_scores.save(self.store.as_mut());
        }

        let idx = self.state.rng.random_range(0..GAME_OVER_TEXTS.len());
        self.game_over_message = Some(GAME_OVER_TEXTS[idx]);

        self.set_phase(GamePhase::Exploding);
        spawn_explosion(&mut self.state);
        self.audio.play(SoundEffect::Crash);
        self.timers.schedule(Transition::ExplosionFinished, EXPLOSION_DURATION);
    }

    /// Give every fresh platform a challenge with an answer not already in play
    fn preload_challenges(&mut self) {
        let mut excluded: Vec<u32> = self
            .state
            .platforms
            .iter()
            .filter_map(|p| p.challenge.as_ref().map(|c| c.answer))
            .collect();
        excluded.extend(self.state.last_answer);

        for platform in self.state.platforms.iter_mut() {
            if platform.visited || platform.challenge.is_some() {
                continue;
            }
            let challenge = self.challenges.request_challenge(platform.kind, &excluded);
            excluded.push(challenge.answer);
            platform.challenge = Some(challenge);
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn quiz(&self) -> Option<&ActiveQuiz> {
        self.quiz.as_ref()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game_over_message(&self) -> Option<&'static str> {
        self.game_over_message
    }

    /// Current wall-clock time from the session's clock
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.state.phase,
            ship: &self.state.ship,
            ship_class: self.state.ship_class,
            platforms: &self.state.platforms,
            particles: &self.state.particles,
            score: self.state.score,
            tier: DifficultyTier::for_score(self.state.score),
            quiz: self.quiz.as_ref(),
            game_over_message: self.game_over_message,
            high_scores: &self.high_scores,
            music_enabled: self.audio.music_enabled(),
        }
    }
}
