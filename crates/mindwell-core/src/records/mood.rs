//! Daily mood entries and trend statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One mood rating for one calendar day. At most one entry per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    /// 1 (very low) to 5 (excellent).
    pub mood: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl MoodEntry {
    pub fn new(date: NaiveDate, mood: u8, notes: &str, activities: Vec<String>) -> Result<Self, ValidationError> {
        let entry = Self {
            date,
            mood,
            notes: notes.trim().to_string(),
            activities,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.mood) {
            return Err(ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("rating must be 1-5, got {}", self.mood),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodStats {
    pub average: f64,
    pub recent_avg: f64,
    pub trend: MoodTrend,
    pub entry_count: usize,
}

/// Insert `entry`, replacing any existing entry for the same date. Keeps the
/// collection sorted newest-first.
pub fn upsert(entries: &mut Vec<MoodEntry>, entry: MoodEntry) {
    entries.retain(|e| e.date != entry.date);
    entries.push(entry);
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Overall average plus a trend comparing the 7 most recent entries against
/// the 7 before them.
pub fn stats(entries: &[MoodEntry]) -> MoodStats {
    if entries.is_empty() {
        return MoodStats {
            average: 0.0,
            recent_avg: 0.0,
            trend: MoodTrend::Stable,
            entry_count: 0,
        };
    }

    let avg = |slice: &[MoodEntry]| -> f64 {
        slice.iter().map(|e| e.mood as f64).sum::<f64>() / slice.len() as f64
    };

    let recent = &entries[..entries.len().min(7)];
    let older = &entries[entries.len().min(7)..entries.len().min(14)];

    let recent_avg = avg(recent);
    let older_avg = if older.is_empty() { recent_avg } else { avg(older) };

    let trend = if recent_avg > older_avg {
        MoodTrend::Improving
    } else if recent_avg < older_avg {
        MoodTrend::Declining
    } else {
        MoodTrend::Stable
    };

    MoodStats {
        average: avg(entries),
        recent_avg,
        trend,
        entry_count: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(MoodEntry::new(date(1), 0, "", vec![]).is_err());
        assert!(MoodEntry::new(date(1), 6, "", vec![]).is_err());
        assert!(MoodEntry::new(date(1), 3, "", vec![]).is_ok());
    }

    #[test]
    fn upsert_replaces_same_date() {
        let mut entries = Vec::new();
        upsert(&mut entries, MoodEntry::new(date(1), 2, "", vec![]).unwrap());
        upsert(&mut entries, MoodEntry::new(date(1), 4, "better", vec![]).unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, 4);
    }

    #[test]
    fn entries_stay_sorted_newest_first() {
        let mut entries = Vec::new();
        upsert(&mut entries, MoodEntry::new(date(3), 3, "", vec![]).unwrap());
        upsert(&mut entries, MoodEntry::new(date(7), 5, "", vec![]).unwrap());
        upsert(&mut entries, MoodEntry::new(date(5), 1, "", vec![]).unwrap());
        let days: Vec<u32> = entries.iter().map(|e| e.date.format("%d").to_string().parse().unwrap()).collect();
        assert_eq!(days, vec![7, 5, 3]);
    }

    #[test]
    fn trend_compares_recent_week_with_prior() {
        let mut entries = Vec::new();
        for day in 1..=7 {
            upsert(&mut entries, MoodEntry::new(date(day), 2, "", vec![]).unwrap());
        }
        for day in 8..=14 {
            upsert(&mut entries, MoodEntry::new(date(day), 4, "", vec![]).unwrap());
        }
        let stats = stats(&entries);
        assert_eq!(stats.trend, MoodTrend::Improving);
        assert_eq!(stats.entry_count, 14);
        assert!((stats.average - 3.0).abs() < 1e-9);
        assert!((stats.recent_avg - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_log_is_stable() {
        let stats = stats(&[]);
        assert_eq!(stats.trend, MoodTrend::Stable);
        assert_eq!(stats.entry_count, 0);
    }
}
