//! The fixed catalog of guided techniques.
//!
//! Each technique carries its display metadata, optional breathing phases,
//! and an optional periodic guidance interval with a message pool. The
//! catalog is the only place techniques are defined; the engine looks
//! everything up through [`TechniqueId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Session duration choices offered to the user, in minutes.
pub const DURATION_OPTIONS_MIN: [u64; 5] = [3, 5, 10, 15, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechniqueId {
    Breathing,
    Meditation,
    Visualization,
    Progressive,
}

impl TechniqueId {
    pub fn as_str(self) -> &'static str {
        match self {
            TechniqueId::Breathing => "breathing",
            TechniqueId::Meditation => "meditation",
            TechniqueId::Visualization => "visualization",
            TechniqueId::Progressive => "progressive",
        }
    }

    /// Catalog entry for this technique.
    pub fn technique(self) -> &'static Technique {
        CATALOG
            .iter()
            .find(|t| t.id == self)
            .expect("every TechniqueId has a catalog entry")
    }
}

impl fmt::Display for TechniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechniqueId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breathing" => Ok(TechniqueId::Breathing),
            "meditation" => Ok(TechniqueId::Meditation),
            "visualization" => Ok(TechniqueId::Visualization),
            "progressive" => Ok(TechniqueId::Progressive),
            other => Err(SessionError::InvalidConfig(format!(
                "unknown technique '{other}'"
            ))),
        }
    }
}

/// How a periodic message is drawn from the technique's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSelection {
    /// Uniformly random; repeats are allowed.
    Random,
    /// Walk the pool in order of interval ordinal, wrapping around.
    Sequential,
}

/// One named sub-interval of a phase-based technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_secs: u64,
    /// Narrated when the phase is entered.
    pub instruction: String,
}

impl Phase {
    fn new(name: &str, duration_secs: u64, instruction: &str) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            instruction: instruction.into(),
        }
    }
}

/// A catalog entry: one guided exercise.
#[derive(Debug)]
pub struct Technique {
    pub id: TechniqueId,
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: &'static [&'static str],
    /// Periodic guidance cadence in seconds, if the technique has one.
    pub guidance_interval_secs: Option<u64>,
    pub selection: PoolSelection,
    pub pool: &'static [&'static str],
}

impl Technique {
    /// All techniques, in display order.
    pub fn all() -> &'static [Technique] {
        CATALOG
    }

    /// Breathing phases for phase-based techniques; empty otherwise.
    pub fn phases(&self) -> Vec<Phase> {
        match self.id {
            TechniqueId::Breathing => vec![
                Phase::new("inhale", 4, "Breathe in slowly through your nose"),
                Phase::new("hold", 7, "Hold your breath"),
                Phase::new("exhale", 8, "Exhale slowly through your mouth"),
            ],
            _ => Vec::new(),
        }
    }
}

static CATALOG: &[Technique] = &[
    Technique {
        id: TechniqueId::Breathing,
        title: "4-7-8 Breathing",
        description: "Calm your nervous system with this powerful breathing technique",
        instructions: &[
            "Inhale through your nose for 4 counts",
            "Hold your breath for 7 counts",
            "Exhale through your mouth for 8 counts",
            "Repeat this cycle 4-8 times",
        ],
        guidance_interval_secs: None,
        selection: PoolSelection::Random,
        pool: &[],
    },
    Technique {
        id: TechniqueId::Meditation,
        title: "Guided Meditation",
        description: "Find inner peace with timed meditation sessions",
        instructions: &[
            "Find a comfortable seated position",
            "Close your eyes and focus on your breath",
            "When thoughts arise, gently return focus to breathing",
            "Stay present in the moment",
        ],
        guidance_interval_secs: Some(30),
        selection: PoolSelection::Random,
        pool: &[
            "Focus on your breath. Notice the air flowing in and out.",
            "If your mind wanders, gently bring your attention back to your breathing.",
            "Feel your body relaxing with each exhale.",
            "Stay present in this moment. You are doing great.",
            "Notice any thoughts without judgment, then return to your breath.",
        ],
    },
    Technique {
        id: TechniqueId::Visualization,
        title: "Peaceful Visualization",
        description: "Imagine yourself in a calm, peaceful place",
        instructions: &[
            "Close your eyes and breathe deeply",
            "Imagine a place where you feel completely safe",
            "Engage all your senses in this visualization",
            "Stay in this peaceful space for the duration",
        ],
        guidance_interval_secs: Some(40),
        selection: PoolSelection::Sequential,
        pool: &[
            "Imagine yourself in a peaceful place. What do you see around you?",
            "Notice the colors, textures, and lighting in your peaceful space.",
            "What sounds do you hear in this calm environment?",
            "Feel the temperature and any gentle breeze on your skin.",
            "Take in the peaceful energy of this place. You are completely safe here.",
            "Let this feeling of peace and safety fill your entire being.",
            "Stay connected to this peaceful feeling as long as you wish.",
        ],
    },
    Technique {
        id: TechniqueId::Progressive,
        title: "Progressive Relaxation",
        description: "Release tension one muscle group at a time",
        instructions: &[
            "Lie down or sit comfortably",
            "Work through each muscle group as guided",
            "Tense for a few seconds, then release completely",
            "Notice the contrast between tension and relaxation",
        ],
        guidance_interval_secs: Some(45),
        selection: PoolSelection::Sequential,
        pool: &[
            "Now focus on your feet. Tense them for 5 seconds, then release and feel the relaxation.",
            "Move to your calves. Tense the muscles, hold, then let them go completely.",
            "Focus on your thighs. Tighten the muscles, then release and feel the tension melt away.",
            "Now your hands and arms. Make fists, tense your arms, then release.",
            "Focus on your shoulders. Lift them toward your ears, then let them drop.",
            "Tense your face muscles, scrunch everything tight, then release and soften.",
            "Feel the contrast between tension and relaxation throughout your body.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_techniques() {
        assert_eq!(Technique::all().len(), 4);
    }

    #[test]
    fn breathing_phases_are_4_7_8() {
        let phases = TechniqueId::Breathing.technique().phases();
        let durations: Vec<u64> = phases.iter().map(|p| p.duration_secs).collect();
        assert_eq!(durations, vec![4, 7, 8]);
    }

    #[test]
    fn non_phase_techniques_have_no_phases() {
        assert!(TechniqueId::Meditation.technique().phases().is_empty());
        assert!(TechniqueId::Visualization.technique().phases().is_empty());
        assert!(TechniqueId::Progressive.technique().phases().is_empty());
    }

    #[test]
    fn periodic_techniques_have_pools() {
        for t in Technique::all() {
            if t.guidance_interval_secs.is_some() {
                assert!(!t.pool.is_empty(), "{} has no message pool", t.id);
            }
        }
    }

    #[test]
    fn id_round_trips_through_str() {
        for t in Technique::all() {
            assert_eq!(t.id.as_str().parse::<TechniqueId>().unwrap(), t.id);
        }
    }

    #[test]
    fn unknown_technique_is_rejected() {
        assert!("yoga".parse::<TechniqueId>().is_err());
    }
}
