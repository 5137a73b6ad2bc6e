//! Refuel challenges
//!
//! Landing on a platform opens a timed multiplication question. The session
//! only depends on the `ChallengeSource` trait; `MathChallenges` is the
//! built-in times-table source.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::PlatformKind;

/// Number of answer options shown
pub const OPTION_COUNT: usize = 4;

/// Attempts at drawing a near-miss distractor before falling back to small numbers
const DISTRACTOR_ATTEMPTS: u32 = 50;

/// A single question with its options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub text: String,
    pub answer: u32,
    /// Unique, shuffled, always includes `answer`
    pub options: [u32; OPTION_COUNT],
}

impl Challenge {
    pub fn is_correct(&self, answer: u32) -> bool {
        self.answer == answer
    }
}

/// Supplier of refuel challenges
pub trait ChallengeSource {
    /// A challenge for the given platform kind
    ///
    /// Implementations avoid answers in `excluded` and fall back to an
    /// unrestricted pick when nothing else is left.
    fn request_challenge(&mut self, kind: PlatformKind, excluded: &[u32]) -> Challenge;
}

/// Times-table questions with operands scaled to the platform kind
#[derive(Debug, Clone)]
pub struct MathChallenges {
    rng: Pcg32,
}

impl MathChallenges {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Inclusive operand range for a kind
    pub fn operand_range(kind: PlatformKind) -> (u32, u32) {
        match kind {
            PlatformKind::Easy => (1, 5),
            PlatformKind::Medium => (3, 7),
            PlatformKind::Hard => (5, 9),
        }
    }
}

impl ChallengeSource for MathChallenges {
    fn request_challenge(&mut self, kind: PlatformKind, excluded: &[u32]) -> Challenge {
        generate_challenge(&mut self.rng, kind, excluded)
    }
}

/// Build a multiplication challenge for a platform kind
pub fn generate_challenge<R: Rng>(rng: &mut R, kind: PlatformKind, excluded: &[u32]) -> Challenge {
    let (min, max) = MathChallenges::operand_range(kind);

    let candidates: Vec<(u32, u32)> = (min..=max)
        .flat_map(|a| (min..=max).map(move |b| (a, b)))
        .collect();

    let available: Vec<(u32, u32)> = candidates
        .iter()
        .copied()
        .filter(|(a, b)| !excluded.contains(&(a * b)))
        .collect();

    // Every product excluded: ignore the exclusions
    let pool = if available.is_empty() {
        &candidates
    } else {
        &available
    };

    let (a, b) = pool[rng.random_range(0..pool.len())];
    let answer = a * b;

    Challenge {
        text: format!("{} x {} = ?", a, b),
        answer,
        options: build_options(rng, answer),
    }
}

/// Correct answer plus three distinct distractors, shuffled
fn build_options<R: Rng>(rng: &mut R, answer: u32) -> [u32; OPTION_COUNT] {
    let mut options = vec![answer];

    // Near misses first
    let mut attempts = 0;
    while options.len() < OPTION_COUNT && attempts < DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let offset: i64 = rng.random_range(-5..=5);
        let value = answer as i64 + offset;
        if value > 0 && !options.contains(&(value as u32)) {
            options.push(value as u32);
        }
    }

    // Tiny answers leave few near misses
    while options.len() < OPTION_COUNT {
        let value: u32 = rng.random_range(1..=20);
        if !options.contains(&value) {
            options.push(value);
        }
    }

    options.shuffle(rng);
    [options[0], options[1], options[2], options[3]]
}
