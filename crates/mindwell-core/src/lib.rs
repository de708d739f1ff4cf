//! # Mindwell Core Library
//!
//! This library provides the core business logic for Mindwell, a guided
//! mental-wellness toolkit. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary; any GUI is a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: a logical-clock state machine driven by caller
//!   ticks - countdown, breathing-phase cycling, and guidance checkpoints
//! - **Records**: typed mood, journal, and goal collections with validation
//! - **Storage**: SQLite session history plus whole-collection JSON blobs,
//!   and TOML-based configuration
//! - **Resources**: static crisis-support and self-help directory
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: countdown, phases, and guidance for one session
//! - [`Technique`]: the fixed catalog of guided exercises
//! - [`Database`]: session history and record persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod records;
pub mod resources;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, SessionError, ValidationError};
pub use events::{Event, GuidanceKind, ToneKind};
pub use records::{Goal, JournalEntry, Milestone, MoodEntry};
pub use session::{
    CompletedSessionRecord, Phase, SessionConfig, SessionEngine, SessionStatus, Technique,
    TechniqueId,
};
pub use storage::{Config, Database};
