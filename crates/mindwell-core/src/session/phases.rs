//! Phase cycler for phase-based techniques.
//!
//! Rotates through the configured phases on independent per-phase timers,
//! looping until the owning session stops. The cycler has no opinion on
//! rendering; each phase entry is reported back to the engine, which turns
//! it into a `PhaseEntered` event.

use serde::{Deserialize, Serialize};

use super::technique::Phase;

/// Reported whenever a phase is entered (activation, advance, or resume).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEntry {
    pub name: String,
    pub instruction: String,
    pub cycle_count: u32,
}

/// Cycles through an ordered, non-empty phase list on per-phase countdowns.
///
/// Driven by the same logical 1-second ticks as the session clock, but its
/// timing is independent of the session's total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseCycler {
    phases: Vec<Phase>,
    current: usize,
    cycle_count: u32,
    phase_remaining_secs: u64,
    active: bool,
}

impl PhaseCycler {
    /// Build a cycler over `phases`. The engine guarantees non-empty input.
    pub fn new(phases: Vec<Phase>) -> Self {
        let first_duration = phases.first().map(|p| p.duration_secs).unwrap_or(0);
        Self {
            phases,
            current: 0,
            cycle_count: 0,
            phase_remaining_secs: first_duration,
            active: false,
        }
    }

    pub fn current_phase_index(&self) -> usize {
        self.current
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn current_phase(&self) -> &Phase {
        &self.phases[self.current]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin cycling from the first phase. Returns the entry for phase 0.
    pub fn activate(&mut self) -> PhaseEntry {
        self.current = 0;
        self.cycle_count = 0;
        self.phase_remaining_secs = self.phases[0].duration_secs;
        self.active = true;
        self.entry()
    }

    /// Resume after a pause. The interrupted phase restarts from its full
    /// duration rather than continuing mid-phase, and its entry is
    /// re-announced.
    pub fn resume(&mut self) -> PhaseEntry {
        self.phase_remaining_secs = self.current_phase().duration_secs;
        self.active = true;
        self.entry()
    }

    /// Cancel the pending phase timer. The current index is kept.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Back to phase 0 with no cycles counted, inactive.
    pub fn reset(&mut self) {
        self.current = 0;
        self.cycle_count = 0;
        self.phase_remaining_secs = self.phases[0].duration_secs;
        self.active = false;
    }

    /// Advance the phase timer by one second. Returns the new phase's entry
    /// when the current phase expires.
    pub fn tick(&mut self) -> Option<PhaseEntry> {
        if !self.active {
            return None;
        }
        self.phase_remaining_secs = self.phase_remaining_secs.saturating_sub(1);
        if self.phase_remaining_secs > 0 {
            return None;
        }
        self.current = (self.current + 1) % self.phases.len();
        if self.current == 0 {
            self.cycle_count += 1;
        }
        self.phase_remaining_secs = self.current_phase().duration_secs;
        Some(self.entry())
    }

    fn entry(&self) -> PhaseEntry {
        let phase = self.current_phase();
        PhaseEntry {
            name: phase.name.clone(),
            instruction: phase.instruction.clone(),
            cycle_count: self.cycle_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_phases() -> Vec<Phase> {
        vec![
            Phase {
                name: "a".into(),
                duration_secs: 4,
                instruction: "enter a".into(),
            },
            Phase {
                name: "b".into(),
                duration_secs: 7,
                instruction: "enter b".into(),
            },
            Phase {
                name: "c".into(),
                duration_secs: 8,
                instruction: "enter c".into(),
            },
        ]
    }

    #[test]
    fn activation_enters_first_phase() {
        let mut cycler = PhaseCycler::new(abc_phases());
        let entry = cycler.activate();
        assert_eq!(entry.name, "a");
        assert_eq!(entry.cycle_count, 0);
        assert_eq!(cycler.current_phase_index(), 0);
    }

    #[test]
    fn phases_advance_on_expiry() {
        let mut cycler = PhaseCycler::new(abc_phases());
        cycler.activate();
        for _ in 0..3 {
            assert!(cycler.tick().is_none());
        }
        let entry = cycler.tick().expect("phase a expires after 4 ticks");
        assert_eq!(entry.name, "b");
        assert_eq!(cycler.current_phase_index(), 1);
    }

    #[test]
    fn full_traversal_wraps_and_counts_a_cycle() {
        let mut cycler = PhaseCycler::new(abc_phases());
        cycler.activate();
        let mut entries = Vec::new();
        for _ in 0..19 {
            if let Some(entry) = cycler.tick() {
                entries.push(entry);
            }
        }
        // 4 + 7 + 8 seconds brings us back to phase a, one cycle done.
        assert_eq!(cycler.cycle_count(), 1);
        assert_eq!(cycler.current_phase_index(), 0);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(entries.last().unwrap().cycle_count, 1);
    }

    #[test]
    fn inactive_cycler_ignores_ticks() {
        let mut cycler = PhaseCycler::new(abc_phases());
        cycler.activate();
        cycler.deactivate();
        for _ in 0..30 {
            assert!(cycler.tick().is_none());
        }
        assert_eq!(cycler.current_phase_index(), 0);
    }

    #[test]
    fn resume_restarts_the_current_phase() {
        let mut cycler = PhaseCycler::new(abc_phases());
        cycler.activate();
        cycler.tick();
        cycler.tick();
        cycler.deactivate();
        let entry = cycler.resume();
        assert_eq!(entry.name, "a");
        // Full 4 seconds again before advancing.
        for _ in 0..3 {
            assert!(cycler.tick().is_none());
        }
        assert_eq!(cycler.tick().unwrap().name, "b");
    }

    #[test]
    fn reset_returns_to_phase_zero() {
        let mut cycler = PhaseCycler::new(abc_phases());
        cycler.activate();
        for _ in 0..12 {
            cycler.tick();
        }
        cycler.reset();
        assert_eq!(cycler.current_phase_index(), 0);
        assert_eq!(cycler.cycle_count(), 0);
        assert!(!cycler.is_active());
    }
}
