//! Guidance checkpoint evaluation.
//!
//! Once per tick the engine asks the scheduler whether any checkpoint
//! matches the post-decrement elapsed/remaining values. Fractional,
//! absolute-remaining, and periodic checkpoints each register a stable key
//! in the fired set before emitting, so every key fires at most once per
//! session. Phase entries are handled by the cycler and never deduplicated.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::events::GuidanceKind;

use super::technique::{PoolSelection, Technique};

/// Remaining-time thresholds that trigger "N remaining" notices.
const REMAINING_THRESHOLDS: [u64; 2] = [60, 30];

const HALFWAY_TEXT: &str =
    "You are halfway through your session. Keep going, you are doing wonderfully.";
const THREE_QUARTERS_TEXT: &str =
    "You have just a few minutes remaining. Stay focused and present.";
const ONE_MINUTE_TEXT: &str =
    "One minute remaining. Continue to breathe deeply and stay relaxed.";
const THIRTY_SECONDS_TEXT: &str =
    "Thirty seconds left. Prepare to gently transition back to awareness.";

fn fresh_rng() -> Pcg64 {
    Pcg64::seed_from_u64(rand::random())
}

/// Decides, once per tick, which guidance messages to emit.
#[derive(Debug, Serialize, Deserialize)]
pub struct GuidanceScheduler {
    fired: HashSet<String>,
    // Message-pool selection is cosmetic; a reloaded scheduler reseeds.
    #[serde(skip, default = "fresh_rng")]
    rng: Pcg64,
}

impl GuidanceScheduler {
    pub fn new() -> Self {
        Self {
            fired: HashSet::new(),
            rng: fresh_rng(),
        }
    }

    /// Deterministic pool selection for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            fired: HashSet::new(),
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Forget all fired checkpoints (session start and reset).
    pub fn clear(&mut self) {
        self.fired.clear();
    }

    /// Evaluate all checkpoint classes against the post-decrement clock.
    pub fn evaluate(
        &mut self,
        technique: &Technique,
        elapsed_secs: u64,
        remaining_secs: u64,
        total_secs: u64,
    ) -> Vec<(GuidanceKind, String)> {
        let mut out = Vec::new();

        if total_secs > 0 && elapsed_secs == total_secs / 2 && self.fire("half") {
            out.push((GuidanceKind::Halfway, HALFWAY_TEXT.to_string()));
        }
        if total_secs > 0 && elapsed_secs == total_secs * 3 / 4 && self.fire("quarter") {
            out.push((GuidanceKind::ThreeQuarters, THREE_QUARTERS_TEXT.to_string()));
        }

        for threshold in REMAINING_THRESHOLDS {
            if threshold <= total_secs
                && remaining_secs == threshold
                && self.fire(&format!("remain:{threshold}"))
            {
                let text = match threshold {
                    60 => ONE_MINUTE_TEXT,
                    _ => THIRTY_SECONDS_TEXT,
                };
                out.push((GuidanceKind::Remaining, text.to_string()));
            }
        }

        if let Some(interval) = technique.guidance_interval_secs {
            // Never fire on the interval boundary that coincides with the
            // session's end.
            if elapsed_secs > 0
                && elapsed_secs % interval == 0
                && remaining_secs > interval
                && self.fire(&format!("periodic:{elapsed_secs}"))
            {
                if let Some(text) = self.pick(technique, elapsed_secs / interval) {
                    out.push((GuidanceKind::Periodic, text));
                }
            }
        }

        out
    }

    /// Register `key`; true if it had not fired before.
    fn fire(&mut self, key: &str) -> bool {
        self.fired.insert(key.to_string())
    }

    fn pick(&mut self, technique: &Technique, interval_ordinal: u64) -> Option<String> {
        if technique.pool.is_empty() {
            return None;
        }
        let index = match technique.selection {
            PoolSelection::Random => self.rng.gen_range(0..technique.pool.len()),
            PoolSelection::Sequential => {
                (interval_ordinal.saturating_sub(1) as usize) % technique.pool.len()
            }
        };
        Some(technique.pool[index].to_string())
    }
}

impl Default for GuidanceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TechniqueId;

    fn run_session(technique: TechniqueId, total: u64) -> Vec<(GuidanceKind, String)> {
        let mut scheduler = GuidanceScheduler::with_seed(7);
        let entry = technique.technique();
        let mut events = Vec::new();
        for tick in 1..=total {
            events.extend(scheduler.evaluate(entry, tick, total - tick, total));
        }
        events
    }

    #[test]
    fn halfway_fires_exactly_once() {
        let events = run_session(TechniqueId::Breathing, 180);
        let halfway: Vec<_> = events
            .iter()
            .filter(|(k, _)| *k == GuidanceKind::Halfway)
            .collect();
        assert_eq!(halfway.len(), 1);
    }

    #[test]
    fn repeated_evaluation_at_same_checkpoint_is_silent() {
        let mut scheduler = GuidanceScheduler::with_seed(7);
        let entry = TechniqueId::Breathing.technique();
        let first = scheduler.evaluate(entry, 90, 90, 180);
        let second = scheduler.evaluate(entry, 90, 90, 180);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn remaining_thresholds_respect_total_duration() {
        // A 45-second session never gets the one-minute notice.
        let events = run_session(TechniqueId::Breathing, 45);
        assert!(events
            .iter()
            .all(|(_, text)| !text.starts_with("One minute")));
        let thirty: Vec<_> = events
            .iter()
            .filter(|(k, _)| *k == GuidanceKind::Remaining)
            .collect();
        assert_eq!(thirty.len(), 1);
    }

    #[test]
    fn periodic_messages_come_from_the_technique_pool() {
        let events = run_session(TechniqueId::Meditation, 180);
        let pool = TechniqueId::Meditation.technique().pool;
        let periodic: Vec<_> = events
            .iter()
            .filter(|(k, _)| *k == GuidanceKind::Periodic)
            .collect();
        assert!(!periodic.is_empty());
        for (_, text) in &periodic {
            assert!(pool.contains(&text.as_str()));
        }
    }

    #[test]
    fn periodic_skips_the_final_boundary() {
        // 90s meditation: interval 30 fires at elapsed 30 (remaining 60) but
        // not at elapsed 60 (remaining 30 <= interval).
        let events = run_session(TechniqueId::Meditation, 90);
        let periodic_count = events
            .iter()
            .filter(|(k, _)| *k == GuidanceKind::Periodic)
            .count();
        assert_eq!(periodic_count, 1);
    }

    #[test]
    fn sequential_pool_walks_in_order() {
        let events = run_session(TechniqueId::Progressive, 45 * 4);
        let pool = TechniqueId::Progressive.technique().pool;
        let periodic: Vec<&str> = events
            .iter()
            .filter(|(k, _)| *k == GuidanceKind::Periodic)
            .map(|(_, text)| text.as_str())
            .collect();
        // Intervals at 45 and 90 qualify; at 135 only one interval remains.
        assert_eq!(periodic, vec![pool[0], pool[1]]);
    }

    #[test]
    fn clear_allows_checkpoints_to_fire_again() {
        let mut scheduler = GuidanceScheduler::with_seed(7);
        let entry = TechniqueId::Breathing.technique();
        assert_eq!(scheduler.evaluate(entry, 90, 90, 180).len(), 1);
        scheduler.clear();
        assert_eq!(scheduler.evaluate(entry, 90, 90, 180).len(), 1);
    }
}
