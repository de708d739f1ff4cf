use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{CompletedSessionRecord, SessionStatus, TechniqueId};

/// Which checkpoint class produced a guidance message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceKind {
    /// Spoken once when the session starts.
    Opening,
    /// Halfway point of the session.
    Halfway,
    /// Three quarters of the session elapsed.
    ThreeQuarters,
    /// Fixed remaining-time threshold ("N seconds remaining").
    Remaining,
    /// Periodic technique-specific guidance.
    Periodic,
    /// Spoken once when the session completes.
    Closing,
}

/// Cue for the external tone sink. The core never plays audio itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneKind {
    Click,
    Complete,
    Test,
}

/// Every state change in the session engine produces an Event.
/// The caller (CLI, GUI) renders them; narration and tone sinks consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        technique: TechniqueId,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        at: DateTime<Utc>,
    },
    /// Emitted exactly once, when the countdown reaches zero from Running.
    SessionCompleted {
        record: CompletedSessionRecord,
        at: DateTime<Utc>,
    },
    /// A phase-based technique entered a new phase. Recurs every cycle.
    PhaseEntered {
        phase: String,
        instruction: String,
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    /// A narration cue for the external narration sink.
    Guidance {
        kind: GuidanceKind,
        text: String,
        at: DateTime<Utc>,
    },
    /// An audio cue for the external tone sink.
    Tone {
        kind: ToneKind,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        technique: TechniqueId,
        remaining_secs: u64,
        elapsed_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        current_phase: Option<String>,
        phase_cycle_count: u32,
        at: DateTime<Utc>,
    },
}
