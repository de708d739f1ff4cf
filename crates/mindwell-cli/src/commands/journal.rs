use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use mindwell_core::records::journal;
use mindwell_core::storage::database::JOURNAL_KEY;
use mindwell_core::storage::Database;
use mindwell_core::JournalEntry;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum JournalAction {
    /// Write a new entry
    Add {
        /// Entry body
        content: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Date of the entry, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Repeatable: --tag gratitude --tag sleep
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Link the day's mood rating (1-5)
        #[arg(long)]
        mood: Option<u8>,
    },
    /// List entries, optionally filtered
    List {
        /// Match against title, content, and tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Update an entry's title, content, or tags
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replaces the entry's tags when given
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Link the day's mood rating (1-5)
        #[arg(long)]
        mood: Option<u8>,
    },
    /// Delete an entry by id
    Delete { id: Uuid },
    /// Export all entries as a JSON array
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import entries from a JSON export, skipping duplicates
    Import { input: PathBuf },
}

fn load_entries(db: &Database) -> Result<Vec<JournalEntry>, Box<dyn std::error::Error>> {
    let entries: Vec<JournalEntry> = db.load_collection(JOURNAL_KEY)?;
    for entry in &entries {
        entry.validate()?;
    }
    Ok(entries)
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        JournalAction::Add {
            content,
            title,
            date,
            tags,
            mood,
        } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let entry = JournalEntry::new(&title, &content, date, tags, mood)?;
            let id = entry.id;
            let mut entries = load_entries(&db)?;
            entries.insert(0, entry);
            db.save_collection(JOURNAL_KEY, &entries)?;
            println!("Journal entry saved: {id}");
        }
        JournalAction::List { search } => {
            let entries = load_entries(&db)?;
            let filtered: Vec<&JournalEntry> = match &search {
                Some(term) => entries.iter().filter(|e| e.matches(term)).collect(),
                None => entries.iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        JournalAction::Edit {
            id,
            title,
            content,
            tags,
            mood,
        } => {
            let mut entries = load_entries(&db)?;
            let entry = entries
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| format!("no journal entry with id {id}"))?;
            if let Some(title) = title {
                entry.title = title;
            }
            if let Some(content) = content {
                entry.content = content;
            }
            if !tags.is_empty() {
                entry.tags = tags;
            }
            if let Some(mood) = mood {
                entry.mood = Some(mood);
            }
            entry.validate()?;
            db.save_collection(JOURNAL_KEY, &entries)?;
            println!("Updated journal entry {id}");
        }
        JournalAction::Delete { id } => {
            let mut entries = load_entries(&db)?;
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() == before {
                return Err(format!("no journal entry with id {id}").into());
            }
            db.save_collection(JOURNAL_KEY, &entries)?;
            println!("Deleted journal entry {id}");
        }
        JournalAction::Export { output } => {
            let entries = load_entries(&db)?;
            let json = journal::export(&entries)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported {} entries to {}", entries.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        JournalAction::Import { input } => {
            let json = std::fs::read_to_string(&input)?;
            let imported = journal::import(&json)?;
            let mut entries = load_entries(&db)?;
            let mut added = 0;
            for entry in imported {
                if !entries.iter().any(|e| e.id == entry.id) {
                    entries.push(entry);
                    added += 1;
                }
            }
            entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            db.save_collection(JOURNAL_KEY, &entries)?;
            println!("Imported {added} entries");
        }
    }
    Ok(())
}
