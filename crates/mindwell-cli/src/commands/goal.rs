use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use mindwell_core::records::goal::{self, GoalCategory, GoalPriority};
use mindwell_core::storage::database::GOALS_KEY;
use mindwell_core::storage::Database;
use mindwell_core::Goal;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// mindfulness, self-care, relationships, therapy, or physical
        #[arg(long, default_value = "self-care")]
        category: GoalCategory,
        /// low, medium, or high
        #[arg(long, default_value = "medium")]
        priority: GoalPriority,
        #[arg(long)]
        target_date: Option<NaiveDate>,
        /// Repeatable: --milestone "first week done"
        #[arg(long = "milestone")]
        milestones: Vec<String>,
        /// Repeatable: --daily-action "10 minutes of stretching"
        #[arg(long = "daily-action")]
        daily_actions: Vec<String>,
    },
    /// List goals as JSON
    List,
    /// Toggle a milestone (0-based index) and recompute progress
    Milestone { goal_id: Uuid, index: usize },
    /// Delete a goal by id
    Delete { goal_id: Uuid },
    /// Totals and average progress
    Stats,
}

fn load_goals(db: &Database) -> Result<Vec<Goal>, Box<dyn std::error::Error>> {
    let goals: Vec<Goal> = db.load_collection(GOALS_KEY)?;
    for goal in &goals {
        goal.validate()?;
    }
    Ok(goals)
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Add {
            title,
            description,
            category,
            priority,
            target_date,
            milestones,
            daily_actions,
        } => {
            let goal = Goal::new(
                &title,
                &description,
                category,
                priority,
                target_date,
                milestones,
                daily_actions,
                Utc::now().date_naive(),
            )?;
            let id = goal.id;
            let mut goals = load_goals(&db)?;
            goals.push(goal);
            db.save_collection(GOALS_KEY, &goals)?;
            println!("Goal created: {id}");
        }
        GoalAction::List => {
            let goals = load_goals(&db)?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Milestone { goal_id, index } => {
            let mut goals = load_goals(&db)?;
            let goal = goals
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or_else(|| format!("no goal with id {goal_id}"))?;
            goal.toggle_milestone(index, Utc::now().date_naive())?;
            println!("{}", serde_json::to_string_pretty(goal)?);
            db.save_collection(GOALS_KEY, &goals)?;
        }
        GoalAction::Delete { goal_id } => {
            let mut goals = load_goals(&db)?;
            let before = goals.len();
            goals.retain(|g| g.id != goal_id);
            if goals.len() == before {
                return Err(format!("no goal with id {goal_id}").into());
            }
            db.save_collection(GOALS_KEY, &goals)?;
            println!("Deleted goal {goal_id}");
        }
        GoalAction::Stats => {
            let goals = load_goals(&db)?;
            let stats = goal::stats(&goals);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
