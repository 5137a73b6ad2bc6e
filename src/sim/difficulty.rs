//! Score-tier difficulty table
//!
//! The only difficulty knob in the game. Platform eligibility and quiz time
//! budgets both come from here so the thresholds live in one place.

use serde::{Deserialize, Serialize};

use super::state::PlatformKind;

/// Score bracket governing eligible platform kinds and quiz time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// Below 500 points
    Rookie,
    /// 500 to 749 points
    Veteran,
    /// 750 points and up
    Ace,
}

struct TierRow {
    tier: DifficultyTier,
    min_score: u64,
    kinds: &'static [PlatformKind],
    quiz_seconds: f64,
}

/// Ordered from the highest threshold down
static TIERS: [TierRow; 3] = [
    TierRow {
        tier: DifficultyTier::Ace,
        min_score: 750,
        kinds: &[PlatformKind::Hard],
        quiz_seconds: 5.0,
    },
    TierRow {
        tier: DifficultyTier::Veteran,
        min_score: 500,
        kinds: &[PlatformKind::Medium, PlatformKind::Hard],
        quiz_seconds: 7.0,
    },
    TierRow {
        tier: DifficultyTier::Rookie,
        min_score: 0,
        kinds: &[PlatformKind::Easy, PlatformKind::Medium, PlatformKind::Hard],
        quiz_seconds: 10.0,
    },
];

impl DifficultyTier {
    fn row(self) -> &'static TierRow {
        TIERS
            .iter()
            .find(|row| row.tier == self)
            .unwrap_or(&TIERS[TIERS.len() - 1])
    }

    /// Tier for the given score
    pub fn for_score(score: u64) -> Self {
        TIERS
            .iter()
            .find(|row| score >= row.min_score)
            .map(|row| row.tier)
            .unwrap_or(DifficultyTier::Rookie)
    }

    /// Platform kinds allowed on the field, in quota order
    pub fn eligible_kinds(self) -> &'static [PlatformKind] {
        self.row().kinds
    }

    /// Whether a platform of this kind may stay on / join the field
    pub fn allows(self, kind: PlatformKind) -> bool {
        self.eligible_kinds().contains(&kind)
    }

    /// Seconds the player gets to answer a refuel challenge
    pub fn quiz_seconds(self) -> f64 {
        self.row().quiz_seconds
    }

    /// Lowest score in this tier
    pub fn min_score(self) -> u64 {
        self.row().min_score
    }
}
