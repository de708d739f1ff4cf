use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use mindwell_core::records::mood;
use mindwell_core::storage::database::MOOD_KEY;
use mindwell_core::storage::Database;
use mindwell_core::MoodEntry;

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record today's mood (replaces any entry for the same date)
    Log {
        /// Rating from 1 (very low) to 5 (excellent)
        #[arg(long)]
        rating: u8,
        /// Date of the entry, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
        /// Repeatable: --activity exercise --activity meditation
        #[arg(long = "activity")]
        activities: Vec<String>,
    },
    /// List all mood entries, newest first
    List,
    /// Average and 7-day trend
    Stats,
}

fn load_entries(db: &Database) -> Result<Vec<MoodEntry>, Box<dyn std::error::Error>> {
    let entries: Vec<MoodEntry> = db.load_collection(MOOD_KEY)?;
    for entry in &entries {
        entry.validate()?;
    }
    Ok(entries)
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        MoodAction::Log {
            rating,
            date,
            notes,
            activities,
        } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let entry = MoodEntry::new(date, rating, &notes, activities)?;
            let mut entries = load_entries(&db)?;
            mood::upsert(&mut entries, entry);
            db.save_collection(MOOD_KEY, &entries)?;
            println!("Mood entry saved for {date}");
        }
        MoodAction::List => {
            let entries = load_entries(&db)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        MoodAction::Stats => {
            let entries = load_entries(&db)?;
            let stats = mood::stats(&entries);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
