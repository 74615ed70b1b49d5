// 🎪 Show Aggregate - every class keyed by id, plus manually awarded prizes
//
// Every "update" returns a new Show; callers persist the whole value.

use crate::entities::contestant::{Contestant, ContestantKey};
use crate::entities::entry::{AllocatedEntry, EntryLabel};
use crate::entities::show_class::ShowClass;
use crate::error::{Result, ShowError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A prize awarded by hand rather than derived from points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPrize {
    pub contestant: Contestant,
    pub class_id: String,
    pub prize_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    classes: BTreeMap<String, ShowClass>,

    #[serde(default)]
    prizes: Vec<ManualPrize>,
}

/// Natural ordering for class ids: numeric prefix, then the rest.
///
/// "2" < "10" < "25B" < "25C" < "42"; ids without a numeric prefix sort last.
pub fn class_sort_key(class_id: &str) -> (u64, String) {
    let digits: String = class_id.chars().take_while(|c| c.is_ascii_digit()).collect();
    let number = digits.parse::<u64>().unwrap_or(u64::MAX);
    (number, class_id[digits.len()..].to_string())
}

impl Show {
    /// Build a show; class ids must be unique
    pub fn new(classes: Vec<ShowClass>) -> Result<Self> {
        let count = classes.len();
        let classes: BTreeMap<String, ShowClass> = classes
            .into_iter()
            .map(|c| (c.class_id.clone(), c))
            .collect();

        if classes.len() != count {
            return Err(ShowError::Consistency(format!(
                "{} classes supplied but only {} distinct class ids",
                count,
                classes.len()
            )));
        }

        Ok(Show {
            classes,
            prizes: Vec::new(),
        })
    }

    /// Re-check invariants on a value read back from disk
    pub fn verify(&self, max_entries_per_class: usize) -> Result<()> {
        for (key, show_class) in &self.classes {
            if key != &show_class.class_id {
                return Err(ShowError::Consistency(format!(
                    "class stored under '{}' claims id '{}'",
                    key, show_class.class_id
                )));
            }
            show_class.check_entry_cap(max_entries_per_class)?;
        }
        Ok(())
    }

    /// Classes in natural class order
    pub fn classes(&self) -> Vec<&ShowClass> {
        let mut classes: Vec<&ShowClass> = self.classes.values().collect();
        classes.sort_by_key(|c| class_sort_key(&c.class_id));
        classes
    }

    pub fn class_ids(&self) -> Vec<&str> {
        self.classes().into_iter().map(|c| c.class_id.as_str()).collect()
    }

    pub fn get_class(&self, class_id: &str) -> Option<&ShowClass> {
        self.classes.get(class_id)
    }

    pub fn class_lookup(&self, class_id: &str) -> Result<&ShowClass> {
        self.get_class(class_id)
            .ok_or_else(|| ShowError::UnknownClass {
                class_id: class_id.to_string(),
            })
    }

    /// Resolve a judge's label while judging `class_id`.
    ///
    /// Qualified labels resolve against the class the entry was allocated in.
    pub fn lookup_contestant(&self, class_id: &str, label: &EntryLabel) -> Result<&Contestant> {
        self.class_lookup(class_id)?;
        let (origin, number) = label.target(class_id);
        let origin_class = self.class_lookup(origin)?;
        origin_class
            .entry_lookup(number)
            .map_err(|_| ShowError::UnknownEntry {
                class_id: origin.to_string(),
                entry: label.to_string(),
            })
    }

    /// New show with `show_class` replacing the class of the same id
    pub fn update_class(&self, show_class: ShowClass) -> Result<Show> {
        if !self.classes.contains_key(&show_class.class_id) {
            return Err(ShowError::UnknownClass {
                class_id: show_class.class_id,
            });
        }
        let mut classes = self.classes.clone();
        classes.insert(show_class.class_id.clone(), show_class);
        Ok(Show {
            classes,
            prizes: self.prizes.clone(),
        })
    }

    pub fn with_prize(&self, prize: ManualPrize) -> Show {
        let mut next = self.clone();
        next.prizes.push(prize);
        next
    }

    pub fn prizes(&self) -> &[ManualPrize] {
        &self.prizes
    }

    pub fn contains(&self, key: &ContestantKey) -> bool {
        self.classes.values().any(|c| c.contains(key))
    }

    pub fn count_contestant(&self, key: &ContestantKey) -> usize {
        self.classes.values().map(|c| c.count_contestant(key)).sum()
    }

    /// Distinct contestants across all classes, sorted by identity key
    pub fn unique_contestants(&self) -> Vec<&Contestant> {
        let mut by_key: BTreeMap<ContestantKey, &Contestant> = BTreeMap::new();
        for show_class in self.classes.values() {
            for contestant in &show_class.contestants {
                by_key.entry(contestant.key()).or_insert(contestant);
            }
        }
        by_key.into_values().collect()
    }

    pub fn total_entries(&self) -> usize {
        self.classes.values().map(ShowClass::len).sum()
    }

    /// Each contestant with the (class, number) pairs they were allocated,
    /// contestants in key order, entries in natural class order
    pub fn contestant_entries(&self) -> Vec<(Contestant, Vec<AllocatedEntry>)> {
        let mut index: HashMap<ContestantKey, usize> = HashMap::new();
        let mut result: Vec<(Contestant, Vec<AllocatedEntry>)> = Vec::new();

        for contestant in self.unique_contestants() {
            index.insert(contestant.key(), result.len());
            result.push((contestant.clone(), Vec::new()));
        }

        for show_class in self.classes() {
            for (i, contestant) in show_class.contestants.iter().enumerate() {
                if let Some(&slot) = index.get(&contestant.key()) {
                    result[slot].1.push(AllocatedEntry {
                        class_id: show_class.class_id.clone(),
                        number: i + 1,
                    });
                }
            }
        }

        result
    }
}
