// 👤 Contestant Entity - value identified by name + entered classes
//
// "The name and the classes entered are the IDENTITY, the payment is not"
//
// Two registrations of the same person with the same classes are the same
// contestant even if they paid different amounts. Identity is an explicit
// derived key (ContestantKey) so maps, dedup and display order never depend
// on structural comparison of the whole record.

use crate::error::{Result, ShowError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Hex characters kept from the content hash
pub const HASH_LEN: usize = 8;

// ============================================================================
// CONTESTANT KEY
// ============================================================================

/// Derived identity of a contestant.
///
/// Ordered by name first, then by content hash, which gives a total order
/// for deduplication and display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContestantKey {
    pub name: String,
    pub hash: String,
}

impl fmt::Display for ContestantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.hash)
    }
}

// ============================================================================
// CONTESTANT
// ============================================================================

/// One registration record.
///
/// `==` is record equality and includes `paid`; compare `key()` (or use
/// `same_identity`) to ask whether two records are the same contestant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    /// Full name, at least two words
    pub name: String,

    /// Class identifiers entered, in registration order (duplicates allowed)
    pub classes: Vec<String>,

    /// Amount paid so far
    #[serde(default)]
    pub paid: f64,
}

impl Contestant {
    pub fn new<I, S>(name: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Contestant {
            name: name.into(),
            classes: classes.into_iter().map(Into::into).collect(),
            paid: 0.0,
        }
    }

    pub fn with_paid(mut self, paid: f64) -> Self {
        self.paid = paid;
        self
    }

    /// Content hash over name + sorted classes (payment excluded)
    pub fn unique_id(&self) -> String {
        let mut sorted: Vec<&str> = self.classes.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update(format!("{}{}", self.name, sorted.join("-")));
        let digest = format!("{:x}", hasher.finalize());
        digest[..HASH_LEN].to_string()
    }

    pub fn key(&self) -> ContestantKey {
        ContestantKey {
            name: self.name.clone(),
            hash: self.unique_id(),
        }
    }

    /// Same identity (name + class multiset)?
    pub fn same_identity(&self, other: &Contestant) -> bool {
        self.key() == other.key()
    }

    /// How many entries this contestant holds in `class_id`
    pub fn count_in(&self, class_id: &str) -> usize {
        self.classes.iter().filter(|c| c.as_str() == class_id).count()
    }

    /// Entry count per distinct class
    pub fn class_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for class_id in &self.classes {
            *counts.entry(class_id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Merge a later registration into this one: old classes first, payments summed
    pub fn merged_with(&self, update: &Contestant) -> Contestant {
        let mut classes = self.classes.clone();
        classes.extend(update.classes.iter().cloned());
        Contestant {
            name: self.name.clone(),
            classes,
            paid: self.paid + update.paid,
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Name must hold at least two whitespace-separated words
    pub fn check_name(&self) -> Result<()> {
        if self.name.split_whitespace().count() < 2 {
            return Err(ShowError::validation(
                &self.name,
                "name must contain at least two words",
            ));
        }
        Ok(())
    }

    pub fn check_paid(&self) -> Result<()> {
        if !self.paid.is_finite() || self.paid < 0.0 {
            return Err(ShowError::validation(
                &self.name,
                format!("payment must be a non-negative amount, got {}", self.paid),
            ));
        }
        Ok(())
    }

    /// No class may be entered more than `cap` times
    pub fn check_entry_cap(&self, cap: usize) -> Result<()> {
        if let Some((class_id, count)) = self
            .class_counts()
            .into_iter()
            .find(|(_, count)| *count > cap)
        {
            return Err(ShowError::validation(
                &self.name,
                format!(
                    "{} entries in class {} exceeds the limit of {}",
                    count, class_id, cap
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Contestant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
