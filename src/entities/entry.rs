// 🎫 Entries - one contestant's Nth instance in a class, and how judges name it

use crate::entities::contestant::Contestant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTRY
// ============================================================================

/// Derived, never stored: "this contestant's `ordinal`th entry in `class_id`"
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub contestant: Contestant,
    pub class_id: String,
    /// 1-based, counted per contestant per class
    pub ordinal: usize,
}

impl Entry {
    /// Flatten contestants into entries in list order, expanding repeated
    /// classes in the order they appear in each contestant's class list
    pub fn expand(contestants: &[Contestant]) -> Vec<Entry> {
        let mut seen: HashMap<(String, String), usize> = HashMap::new();
        let mut entries = Vec::new();

        for contestant in contestants {
            for class_id in &contestant.classes {
                let ordinal = seen
                    .entry((contestant.name.clone(), class_id.clone()))
                    .or_insert(0);
                *ordinal += 1;
                entries.push(Entry {
                    contestant: contestant.clone(),
                    class_id: class_id.clone(),
                    ordinal: *ordinal,
                });
            }
        }

        entries
    }
}

/// Where an entry ended up after allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedEntry {
    pub class_id: String,
    /// Position in the class roster, 1-based
    pub number: usize,
}

// ============================================================================
// ENTRY LABEL
// ============================================================================

/// How a judge refers to an entry.
///
/// `"3"` is entry 3 of the class being judged. `"25B-3"` is entry 3 of
/// class 25B, used when an entry was moved to another class after numbers
/// were handed out; it always resolves against the originating class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryLabel {
    Local(usize),
    Moved { class_id: String, number: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entry label '{0}': expected a number or <class>-<number>")]
pub struct ParseEntryLabelError(pub String);

impl EntryLabel {
    /// (class to look in, roster number) when judging `judged_class`
    pub fn target<'a>(&'a self, judged_class: &'a str) -> (&'a str, usize) {
        match self {
            EntryLabel::Local(number) => (judged_class, *number),
            EntryLabel::Moved { class_id, number } => (class_id.as_str(), *number),
        }
    }

    /// A qualified label pointing at the judged class itself is just local
    pub fn normalized(self, judged_class: &str) -> EntryLabel {
        match self {
            EntryLabel::Moved { class_id, number } if class_id == judged_class => {
                EntryLabel::Local(number)
            }
            other => other,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, EntryLabel::Moved { .. })
    }
}

impl FromStr for EntryLabel {
    type Err = ParseEntryLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ParseEntryLabelError(s.to_string());

        match trimmed.rsplit_once('-') {
            Some((class_id, number)) => {
                let class_id = class_id.trim();
                if class_id.is_empty() {
                    return Err(invalid());
                }
                let number = number.trim().parse::<usize>().map_err(|_| invalid())?;
                Ok(EntryLabel::Moved {
                    class_id: class_id.to_string(),
                    number,
                })
            }
            None => trimmed
                .parse::<usize>()
                .map(EntryLabel::Local)
                .map_err(|_| invalid()),
        }
    }
}

impl TryFrom<String> for EntryLabel {
    type Error = ParseEntryLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryLabel> for String {
    fn from(label: EntryLabel) -> Self {
        label.to_string()
    }
}

impl From<usize> for EntryLabel {
    fn from(number: usize) -> Self {
        EntryLabel::Local(number)
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryLabel::Local(number) => write!(f, "{}", number),
            EntryLabel::Moved { class_id, number } => write!(f, "{}-{}", class_id, number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_counts_ordinals_per_class() {
        let contestants = vec![
            Contestant::new("Bob Beetroot", ["1", "2", "2", "42"]),
            Contestant::new("Dahlia Date", ["1", "3", "3"]),
        ];

        let entries = Entry::expand(&contestants);
        let summary: Vec<(&str, &str, usize)> = entries
            .iter()
            .map(|e| (e.contestant.name.as_str(), e.class_id.as_str(), e.ordinal))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Bob Beetroot", "1", 1),
                ("Bob Beetroot", "2", 1),
                ("Bob Beetroot", "2", 2),
                ("Bob Beetroot", "42", 1),
                ("Dahlia Date", "1", 1),
                ("Dahlia Date", "3", 1),
                ("Dahlia Date", "3", 2),
            ]
        );
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("4".parse::<EntryLabel>().unwrap(), EntryLabel::Local(4));
        assert_eq!(
            "25B-3".parse::<EntryLabel>().unwrap(),
            EntryLabel::Moved {
                class_id: "25B".to_string(),
                number: 3
            }
        );
        assert!("abc".parse::<EntryLabel>().is_err());
        assert!("-3".parse::<EntryLabel>().is_err());
        assert!("25B-x".parse::<EntryLabel>().is_err());
    }

    #[test]
    fn test_label_targets() {
        let local = EntryLabel::Local(2);
        assert_eq!(local.target("16"), ("16", 2));

        let moved: EntryLabel = "25B-3".parse().unwrap();
        assert_eq!(moved.target("25C"), ("25B", 3));
        assert_eq!(moved.clone().normalized("25B"), EntryLabel::Local(3));
        assert!(moved.normalized("25C").is_moved());
    }

    #[test]
    fn test_label_serializes_as_string() {
        let moved = EntryLabel::Moved {
            class_id: "25B".to_string(),
            number: 3,
        };
        assert_eq!(serde_json::to_string(&moved).unwrap(), "\"25B-3\"");

        let back: EntryLabel = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, EntryLabel::Local(7));
    }
}
