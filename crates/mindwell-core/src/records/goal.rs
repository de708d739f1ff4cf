//! Goals with milestones and derived progress.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalCategory {
    Mindfulness,
    SelfCare,
    Relationships,
    Therapy,
    Physical,
}

impl FromStr for GoalCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mindfulness" => Ok(GoalCategory::Mindfulness),
            "self-care" => Ok(GoalCategory::SelfCare),
            "relationships" => Ok(GoalCategory::Relationships),
            "therapy" => Ok(GoalCategory::Therapy),
            "physical" => Ok(GoalCategory::Physical),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl FromStr for GoalPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(GoalPriority::Low),
            "medium" => Ok(GoalPriority::Medium),
            "high" => Ok(GoalPriority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: GoalCategory,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    /// 0-100, derived from completed milestones.
    pub progress: u8,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub daily_actions: Vec<String>,
}

impl Goal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: &str,
        category: GoalCategory,
        priority: GoalPriority,
        target_date: Option<NaiveDate>,
        milestones: Vec<String>,
        daily_actions: Vec<String>,
        created_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyRecord("goal needs a title".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.trim().to_string(),
            category,
            priority,
            status: GoalStatus::Active,
            progress: 0,
            target_date,
            created_date,
            milestones: milestones
                .into_iter()
                .filter(|m| !m.trim().is_empty())
                .map(|text| Milestone {
                    text,
                    completed: false,
                    completed_date: None,
                })
                .collect(),
            daily_actions: daily_actions
                .into_iter()
                .filter(|a| !a.trim().is_empty())
                .collect(),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyRecord(format!(
                "goal {} has no title",
                self.id
            )));
        }
        if self.progress > 100 {
            return Err(ValidationError::InvalidValue {
                field: "progress".into(),
                message: format!("must be 0-100, got {}", self.progress),
            });
        }
        Ok(())
    }

    /// Flip one milestone and recompute progress. Completing the final
    /// milestone marks the goal completed.
    pub fn toggle_milestone(
        &mut self,
        index: usize,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        let len = self.milestones.len();
        let milestone =
            self.milestones
                .get_mut(index)
                .ok_or_else(|| ValidationError::OutOfBounds {
                    collection: "milestones".into(),
                    index,
                    len,
                })?;
        milestone.completed = !milestone.completed;
        milestone.completed_date = milestone.completed.then_some(today);
        self.recompute_progress();
        Ok(())
    }

    fn recompute_progress(&mut self) {
        if self.milestones.is_empty() {
            return;
        }
        let done = self.milestones.iter().filter(|m| m.completed).count();
        self.progress =
            ((done as f64 / self.milestones.len() as f64) * 100.0).round() as u8;
        self.status = if self.progress == 100 {
            GoalStatus::Completed
        } else if self.status == GoalStatus::Completed {
            GoalStatus::Active
        } else {
            self.status
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub avg_progress: u8,
}

pub fn stats(goals: &[Goal]) -> GoalStats {
    let completed = goals.iter().filter(|g| g.progress == 100).count();
    let avg_progress = if goals.is_empty() {
        0
    } else {
        (goals.iter().map(|g| g.progress as u64).sum::<u64>() / goals.len() as u64) as u8
    };
    GoalStats {
        total: goals.len(),
        completed,
        avg_progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
    }

    fn meditation_goal() -> Goal {
        Goal::new(
            "Practice Daily Meditation",
            "Meditate for at least 10 minutes every day",
            GoalCategory::Mindfulness,
            GoalPriority::High,
            None,
            vec![
                "Meditate 3 days in a row".into(),
                "Meditate for 7 consecutive days".into(),
                "Meditate for 21 consecutive days".into(),
            ],
            vec!["Morning 10-minute sit".into()],
            today(),
        )
        .unwrap()
    }

    #[test]
    fn untitled_goal_is_rejected() {
        let result = Goal::new(
            "  ",
            "",
            GoalCategory::SelfCare,
            GoalPriority::Low,
            None,
            vec![],
            vec![],
            today(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_milestones_are_dropped() {
        let goal = Goal::new(
            "Sleep earlier",
            "",
            GoalCategory::Physical,
            GoalPriority::Medium,
            None,
            vec!["In bed by 11".into(), "  ".into()],
            vec![],
            today(),
        )
        .unwrap();
        assert_eq!(goal.milestones.len(), 1);
    }

    #[test]
    fn daily_actions_are_kept_and_blanks_dropped() {
        let goal = Goal::new(
            "Walk more",
            "",
            GoalCategory::Physical,
            GoalPriority::Low,
            None,
            vec![],
            vec!["Walk after lunch".into(), "   ".into(), "Take the stairs".into()],
            today(),
        )
        .unwrap();
        assert_eq!(
            goal.daily_actions,
            vec!["Walk after lunch".to_string(), "Take the stairs".to_string()]
        );
    }

    #[test]
    fn toggling_milestones_recomputes_progress() {
        let mut goal = meditation_goal();
        goal.toggle_milestone(0, today()).unwrap();
        assert_eq!(goal.progress, 33);
        goal.toggle_milestone(1, today()).unwrap();
        assert_eq!(goal.progress, 67);
        assert_eq!(goal.milestones[1].completed_date, Some(today()));

        goal.toggle_milestone(1, today()).unwrap();
        assert_eq!(goal.progress, 33);
        assert!(goal.milestones[1].completed_date.is_none());
    }

    #[test]
    fn completing_all_milestones_completes_the_goal() {
        let mut goal = meditation_goal();
        for i in 0..3 {
            goal.toggle_milestone(i, today()).unwrap();
        }
        assert_eq!(goal.progress, 100);
        assert_eq!(goal.status, GoalStatus::Completed);

        goal.toggle_milestone(2, today()).unwrap();
        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn milestone_index_is_bounds_checked() {
        let mut goal = meditation_goal();
        assert!(matches!(
            goal.toggle_milestone(9, today()),
            Err(ValidationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn stats_summarize_the_collection() {
        let mut done = meditation_goal();
        for i in 0..3 {
            done.toggle_milestone(i, today()).unwrap();
        }
        let fresh = meditation_goal();
        let s = stats(&[done, fresh]);
        assert_eq!(s.total, 2);
        assert_eq!(s.completed, 1);
        assert_eq!(s.avg_progress, 50);
    }
}
