//! Guided session engine.
//!
//! The engine is a logical-clock state machine. It does not use internal
//! threads or the wall clock - the caller delivers one `tick()` per second
//! of session time, which makes every property deterministic under test.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |            \
//!            v             v (reset)
//!        Completed       Paused
//!            |
//!   Stopped (from any state)
//! ```
//!
//! `Completed` and `Stopped` are terminal for the countdown; ticks delivered
//! in either state are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::events::{Event, GuidanceKind, ToneKind};

use super::guidance::GuidanceScheduler;
use super::phases::{PhaseCycler, PhaseEntry};
use super::technique::{Phase, TechniqueId, DURATION_OPTIONS_MIN};

const CLOSING_TEXT: &str = "Congratulations! You have completed your mindfulness session. \
     Take a moment to notice how you feel.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
    Stopped,
}

/// Immutable per-session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub technique: TechniqueId,
    pub total_duration_secs: u64,
    /// Empty for non-phase techniques.
    pub phases: Vec<Phase>,
    pub voice_enabled: bool,
}

impl SessionConfig {
    /// Build a config from the catalog for one of the offered durations.
    pub fn from_catalog(
        technique: TechniqueId,
        minutes: u64,
        voice_enabled: bool,
    ) -> Result<Self, SessionError> {
        if !DURATION_OPTIONS_MIN.contains(&minutes) {
            return Err(SessionError::InvalidConfig(format!(
                "duration must be one of {DURATION_OPTIONS_MIN:?} minutes, got {minutes}"
            )));
        }
        Ok(Self {
            technique,
            total_duration_secs: minutes * 60,
            phases: technique.technique().phases(),
            voice_enabled,
        })
    }
}

/// Log entry created exactly once when a session completes.
///
/// Ownership passes to the storage layer; the engine never reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedSessionRecord {
    pub id: Uuid,
    pub technique: TechniqueId,
    pub duration_secs: u64,
    pub completed_at: DateTime<Utc>,
}

/// Countdown engine for one guided session.
///
/// Owns the session clock, the phase cycler (for phase techniques), and the
/// guidance scheduler. Commands return the events they produce; the caller
/// forwards them to narration/tone sinks and storage.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionEngine {
    config: SessionConfig,
    status: SessionStatus,
    remaining_secs: u64,
    #[serde(default)]
    cycler: Option<PhaseCycler>,
    guidance: GuidanceScheduler,
}

impl SessionEngine {
    pub fn new(config: SessionConfig) -> Self {
        let remaining_secs = config.total_duration_secs;
        Self {
            config,
            status: SessionStatus::Idle,
            remaining_secs,
            cycler: None,
            guidance: GuidanceScheduler::new(),
        }
    }

    /// Engine with a seeded guidance scheduler, for deterministic tests.
    pub fn with_guidance_seed(config: SessionConfig, seed: u64) -> Self {
        let mut engine = Self::new(config);
        engine.guidance = GuidanceScheduler::with_seed(seed);
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.config.total_duration_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.config.total_duration_secs - self.remaining_secs
    }

    /// Index into `config.phases`; absent for non-phase techniques and
    /// before the first start.
    pub fn current_phase_index(&self) -> Option<usize> {
        self.cycler.as_ref().map(|c| c.current_phase_index())
    }

    /// Full traversals of the phase list completed so far.
    pub fn phase_cycle_count(&self) -> u32 {
        self.cycler.as_ref().map(|c| c.cycle_count()).unwrap_or(0)
    }

    /// 0.0 .. 100.0 progress through the session.
    pub fn progress_pct(&self) -> f64 {
        let total = self.config.total_duration_secs;
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            technique: self.config.technique,
            remaining_secs: self.remaining_secs,
            elapsed_secs: self.elapsed_secs(),
            total_secs: self.config.total_duration_secs,
            progress_pct: self.progress_pct(),
            current_phase: self
                .cycler
                .as_ref()
                .map(|c| c.current_phase().name.clone()),
            phase_cycle_count: self.phase_cycle_count(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the session. A zero-duration config completes immediately,
    /// without a tick.
    pub fn start(&mut self) -> Result<Vec<Event>, SessionError> {
        match self.status {
            SessionStatus::Idle => {}
            SessionStatus::Running | SessionStatus::Paused => {
                return Err(SessionError::AlreadyRunning)
            }
            status => {
                return Err(SessionError::NotRunning {
                    action: "start",
                    status,
                })
            }
        }
        self.validate_config()?;

        self.remaining_secs = self.config.total_duration_secs;
        self.guidance.clear();

        let mut events = vec![
            self.tone(ToneKind::Click),
            Event::SessionStarted {
                technique: self.config.technique,
                duration_secs: self.config.total_duration_secs,
                at: Utc::now(),
            },
        ];

        if self.config.total_duration_secs == 0 {
            self.status = SessionStatus::Running;
            events.extend(self.complete());
            return Ok(events);
        }

        self.status = SessionStatus::Running;
        events.push(Event::Guidance {
            kind: GuidanceKind::Opening,
            text: format!(
                "Starting {} minute {} session. Find a comfortable position and relax.",
                self.config.total_duration_secs / 60,
                self.config.technique.technique().title
            ),
            at: Utc::now(),
        });

        if !self.config.phases.is_empty() {
            let mut cycler = PhaseCycler::new(self.config.phases.clone());
            events.push(phase_event(cycler.activate()));
            self.cycler = Some(cycler);
        }

        Ok(events)
    }

    /// Suspend ticking. Remaining time is untouched; elapsed wall-clock time
    /// while paused never counts against the session.
    pub fn pause(&mut self) -> Result<Vec<Event>, SessionError> {
        if self.status != SessionStatus::Running {
            return Err(SessionError::NotRunning {
                action: "pause",
                status: self.status,
            });
        }
        self.status = SessionStatus::Paused;
        if let Some(cycler) = &mut self.cycler {
            cycler.deactivate();
        }
        Ok(vec![
            self.tone(ToneKind::Click),
            Event::SessionPaused {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        ])
    }

    /// Continue from the current remaining time. The interrupted phase
    /// restarts from its full duration.
    pub fn resume(&mut self) -> Result<Vec<Event>, SessionError> {
        if self.status != SessionStatus::Paused {
            return Err(SessionError::NotRunning {
                action: "resume",
                status: self.status,
            });
        }
        self.status = SessionStatus::Running;
        let mut events = vec![
            self.tone(ToneKind::Click),
            Event::SessionResumed {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        ];
        if let Some(cycler) = &mut self.cycler {
            events.push(phase_event(cycler.resume()));
        }
        Ok(events)
    }

    /// Restore full remaining time and forget fired checkpoints. The session
    /// stays open but not advancing (Paused).
    pub fn reset(&mut self) -> Result<Vec<Event>, SessionError> {
        if self.status == SessionStatus::Idle {
            return Err(SessionError::NotRunning {
                action: "reset",
                status: self.status,
            });
        }
        self.status = SessionStatus::Paused;
        self.remaining_secs = self.config.total_duration_secs;
        self.guidance.clear();
        if let Some(cycler) = &mut self.cycler {
            cycler.reset();
        }
        Ok(vec![
            self.tone(ToneKind::Click),
            Event::SessionReset {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        ])
    }

    /// Tear down the session from any state. No completion record is
    /// created; both the session tick and the phase timer are cancelled.
    pub fn stop(&mut self) -> Vec<Event> {
        self.status = SessionStatus::Stopped;
        self.remaining_secs = 0;
        if let Some(cycler) = &mut self.cycler {
            cycler.deactivate();
        }
        vec![
            self.tone(ToneKind::Click),
            Event::SessionStopped { at: Utc::now() },
        ]
    }

    /// Advance the session by one logical second.
    ///
    /// Only acts while Running; ticks in any other state are ignored. The
    /// clock decrements before the guidance scheduler runs, so checkpoint
    /// comparisons see the post-decrement values.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.status != SessionStatus::Running {
            return Vec::new();
        }
        let mut events = Vec::new();

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        let technique = self.config.technique.technique();
        for (kind, text) in self.guidance.evaluate(
            technique,
            self.elapsed_secs(),
            self.remaining_secs,
            self.config.total_duration_secs,
        ) {
            events.push(Event::Guidance {
                kind,
                text,
                at: Utc::now(),
            });
        }

        if self.remaining_secs == 0 {
            events.extend(self.complete());
            return events;
        }

        if let Some(cycler) = &mut self.cycler {
            if let Some(entry) = cycler.tick() {
                events.push(phase_event(entry));
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn validate_config(&self) -> Result<(), SessionError> {
        if self.config.total_duration_secs == 0 && !self.config.phases.is_empty() {
            return Err(SessionError::InvalidConfig(
                "phase technique requires a positive duration".into(),
            ));
        }
        if let Some(phase) = self.config.phases.iter().find(|p| p.duration_secs == 0) {
            return Err(SessionError::InvalidConfig(format!(
                "phase '{}' has zero duration",
                phase.name
            )));
        }
        Ok(())
    }

    /// Transition Running -> Completed and emit the one completion record.
    fn complete(&mut self) -> Vec<Event> {
        self.status = SessionStatus::Completed;
        if let Some(cycler) = &mut self.cycler {
            cycler.deactivate();
        }
        let record = CompletedSessionRecord {
            id: Uuid::new_v4(),
            technique: self.config.technique,
            duration_secs: self.config.total_duration_secs,
            completed_at: Utc::now(),
        };
        vec![
            Event::SessionCompleted {
                record,
                at: Utc::now(),
            },
            self.tone(ToneKind::Complete),
            Event::Guidance {
                kind: GuidanceKind::Closing,
                text: CLOSING_TEXT.to_string(),
                at: Utc::now(),
            },
        ]
    }

    fn tone(&self, kind: ToneKind) -> Event {
        Event::Tone {
            kind,
            at: Utc::now(),
        }
    }
}

fn phase_event(entry: PhaseEntry) -> Event {
    Event::PhaseEntered {
        phase: entry.name,
        instruction: entry.instruction,
        cycle_count: entry.cycle_count,
        at: Utc::now(),
    }
}
