mod engine;
mod guidance;
mod phases;
mod technique;

pub use engine::{CompletedSessionRecord, SessionConfig, SessionEngine, SessionStatus};
pub use guidance::GuidanceScheduler;
pub use phases::{PhaseCycler, PhaseEntry};
pub use technique::{Phase, PoolSelection, Technique, TechniqueId, DURATION_OPTIONS_MIN};
