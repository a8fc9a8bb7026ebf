//! Closed tag sets stored as lowercase text.

use serde::{Deserialize, Serialize};

/// Color tag shared by calendar events and habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Purple,
    Amber,
    Pink,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Purple,
        Color::Amber,
        Color::Pink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Amber => "amber",
            Self::Pink => "pink",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
    }
}

/// How the day felt, recorded with each diary entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excellent,
    #[default]
    Good,
    Neutral,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Excellent,
        Mood::Good,
        Mood::Neutral,
        Mood::Bad,
        Mood::Terrible,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Bad => "bad",
            Self::Terrible => "terrible",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
    }
}

/// Direction of a ledger movement. Amounts are always stored positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// `+1.0` for income, `-1.0` for expense.
    pub fn sign(self) -> f64 {
        match self {
            Self::Income => 1.0,
            Self::Expense => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, EntryKind, Mood};

    #[test]
    fn tags_parse_their_own_labels() {
        for color in Color::ALL {
            assert_eq!(Color::parse(color.as_str()), Some(color));
        }
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
        assert_eq!(EntryKind::parse(" Income "), Some(EntryKind::Income));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(Color::parse("teal"), None);
        assert_eq!(Mood::parse(""), None);
        assert_eq!(EntryKind::parse("transfer"), None);
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Mood::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
    }
}
