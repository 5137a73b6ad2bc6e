//! Platform field generation
//!
//! Each refresh runs three passes:
//! 1. Attrition - survivors the current tier no longer allows are dropped
//! 2. Fill - kinds are picked quota-first, then at random
//! 3. Placement - bounded rejection sampling against spacing and the spawn safe zone
//!
//! Placement is best-effort: if a platform cannot be placed the field is
//! returned short rather than failing.

use rand::Rng;

use super::difficulty::DifficultyTier;
use super::state::{GameState, Platform, PlatformKind};
use crate::consts::*;

/// Build the next platform set
///
/// `next_id` is the next free entity ID and is bumped for every platform created.
pub fn generate_platforms<R: Rng>(
    rng: &mut R,
    next_id: &mut u32,
    target_count: usize,
    score: u64,
    survivors: Vec<Platform>,
) -> Vec<Platform> {
    let tier = DifficultyTier::for_score(score);

    let mut plats: Vec<Platform> = survivors
        .into_iter()
        .filter(|p| tier.allows(p.kind))
        .collect();

    while plats.len() < target_count {
        let kind = choose_kind(rng, tier, &plats);

        match place(rng, &plats) {
            Some((x, y, width)) => {
                plats.push(Platform::new(*next_id, kind, x, y, width));
                *next_id += 1;
            }
            None => {
                log::debug!(
                    "Placement gave up after {} attempts ({} of {} platforms)",
                    PLACEMENT_ATTEMPTS,
                    plats.len(),
                    target_count
                );
                break;
            }
        }
    }

    plats
}

/// Pick the kind for the next platform
///
/// Any eligible kind missing among unvisited platforms wins, in table order;
/// once all are represented the pick is uniform over the tier.
fn choose_kind<R: Rng>(rng: &mut R, tier: DifficultyTier, plats: &[Platform]) -> PlatformKind {
    let eligible = tier.eligible_kinds();

    let missing = eligible.iter().copied().find(|kind| {
        !plats
            .iter()
            .any(|p| !p.visited && p.kind == *kind)
    });

    match missing {
        Some(kind) => kind,
        None => eligible[rng.random_range(0..eligible.len())],
    }
}

/// Draw a position and width that respects spacing and the safe zone
fn place<R: Rng>(rng: &mut R, existing: &[Platform]) -> Option<(f32, f32, f32)> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let width = rng.random_range(PLATFORM_MIN_WIDTH..PLATFORM_MAX_WIDTH);
        let x = rng.random_range(0.0..CANVAS_WIDTH - width);
        let y = rng.random_range(PLATFORM_MIN_Y..PLATFORM_MAX_Y);

        let candidate = Platform::new(0, PlatformKind::Easy, x, y, width);
        if placement_ok(&candidate, existing) {
            return Some((x, y, width));
        }
    }
    None
}

/// Spacing and safe-zone rules for a candidate against the current field
pub fn placement_ok(candidate: &Platform, existing: &[Platform]) -> bool {
    let anchor = candidate.anchor();

    if anchor.distance(SHIP_SPAWN) < SHIP_SAFE_ZONE_RADIUS {
        return false;
    }

    existing
        .iter()
        .all(|p| p.anchor().distance(anchor) >= MIN_PLATFORM_DIST)
}

impl GameState {
    /// Replace the field using the generator at the current score
    pub fn regenerate_platforms(&mut self, survivors: Vec<Platform>) {
        self.platforms = generate_platforms(
            &mut self.rng,
            &mut self.next_id,
            PLATFORM_TARGET_COUNT,
            self.score,
            survivors,
        );
        self.normalize_order();
    }
}
