//! Journal entries with tags, search, and JSON export/import.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional link to the day's mood rating.
    #[serde(default)]
    pub mood: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create an entry. A blank title falls back to "Entry for <date>";
    /// an entry that is blank in both title and content is rejected.
    pub fn new(
        title: &str,
        content: &str,
        date: NaiveDate,
        tags: Vec<String>,
        mood: Option<u8>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() && content.is_empty() {
            return Err(ValidationError::EmptyRecord(
                "journal entry needs a title or some content".into(),
            ));
        }
        let title = if title.is_empty() {
            format!("Entry for {}", date.format("%B %-d, %Y"))
        } else {
            title.to_string()
        };
        let entry = Self {
            id: Uuid::new_v4(),
            title,
            content: content.to_string(),
            date,
            tags,
            mood,
            created_at: Utc::now(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() && self.content.trim().is_empty() {
            return Err(ValidationError::EmptyRecord(format!(
                "journal entry {} is blank",
                self.id
            )));
        }
        if let Some(mood) = self.mood {
            if !(1..=5).contains(&mood) {
                return Err(ValidationError::InvalidValue {
                    field: "mood".into(),
                    message: format!("rating must be 1-5, got {mood}"),
                });
            }
        }
        Ok(())
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Case-insensitive match against title, content, and tags.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
    }
}

/// Serialize the whole collection as a flat JSON array.
pub fn export(entries: &[JournalEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// Parse a previously exported collection, validating every entry.
pub fn import(json: &str) -> Result<Vec<JournalEntry>, crate::error::CoreError> {
    let entries: Vec<JournalEntry> = serde_json::from_str(json)?;
    for entry in &entries {
        entry.validate()?;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
    }

    #[test]
    fn blank_entry_is_rejected() {
        assert!(JournalEntry::new("", "   ", date(), vec![], None).is_err());
    }

    #[test]
    fn blank_title_gets_a_default() {
        let entry = JournalEntry::new("", "wrote some thoughts", date(), vec![], None).unwrap();
        assert!(entry.title.starts_with("Entry for"));
    }

    #[test]
    fn mood_rating_is_range_checked() {
        assert!(JournalEntry::new("t", "c", date(), vec![], Some(9)).is_err());
        let entry = JournalEntry::new("t", "c", date(), vec![], Some(4)).unwrap();
        assert_eq!(entry.mood, Some(4));
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        let entry =
            JournalEntry::new("t", "one two  three\nfour", date(), vec![], None).unwrap();
        assert_eq!(entry.word_count(), 4);
    }

    #[test]
    fn search_covers_title_content_and_tags() {
        let entry = JournalEntry::new(
            "Morning pages",
            "felt calmer after breathing",
            date(),
            vec!["gratitude".into()],
            None,
        )
        .unwrap();
        assert!(entry.matches("MORNING"));
        assert!(entry.matches("breathing"));
        assert!(entry.matches("grat"));
        assert!(!entry.matches("anxiety"));
    }

    #[test]
    fn export_import_round_trip() {
        let entries = vec![
            JournalEntry::new("a", "first entry", date(), vec!["sleep".into()], None).unwrap(),
            JournalEntry::new("b", "second entry", date(), vec![], None).unwrap(),
        ];
        let json = export(&entries).unwrap();
        let restored = import(&json).unwrap();
        assert_eq!(restored, entries);
    }

    #[test]
    fn import_rejects_malformed_entries() {
        let json = r#"[{"id":"6e1b4b66-7a3e-4a39-94f6-4a3d6d4e3f10",
            "title":"","content":"","date":"2025-08-20",
            "created_at":"2025-08-20T00:00:00Z"}]"#;
        assert!(import(json).is_err());
    }
}
