//! Typed record collections for mood tracking, journaling, and goals.
//!
//! Each collection is stored as a whole-collection JSON blob in the kv
//! store; records are validated on load rather than trusted blindly.

pub mod goal;
pub mod journal;
pub mod mood;

pub use goal::{Goal, GoalCategory, GoalPriority, GoalStats, GoalStatus, Milestone};
pub use journal::JournalEntry;
pub use mood::{MoodEntry, MoodStats, MoodTrend};
