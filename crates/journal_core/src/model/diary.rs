//! Diary entry record.
//!
//! # Invariants
//! - At most one entry exists per day; saving again updates it in place.

use crate::model::tags::Mood;
use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub day: NaiveDate,
    pub content: String,
    pub mood: Mood,
}

impl DiaryEntry {
    pub fn new(day: NaiveDate, content: impl Into<String>, mood: Mood) -> Self {
        Self {
            day,
            content: content.into(),
            mood,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)
    }

    /// First characters of the content, with `...` appended when cut.
    pub fn preview(&self) -> String {
        let mut preview: String = self.content.chars().take(PREVIEW_CHARS).collect();
        if self.content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::DiaryEntry;
    use crate::model::tags::Mood;
    use chrono::NaiveDate;

    fn entry(content: &str) -> DiaryEntry {
        DiaryEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            content,
            Mood::Neutral,
        )
    }

    #[test]
    fn short_content_preview_is_unchanged() {
        assert_eq!(entry("quiet day").preview(), "quiet day");
    }

    #[test]
    fn long_content_preview_is_cut_at_char_boundary() {
        let content = "ñ".repeat(60);
        let preview = entry(&content).preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 53);
    }
}
