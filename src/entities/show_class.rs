// 🏅 Show Class - one judged category with its numbered roster and placings
//
// A ShowClass is a value: recording a judgment returns a new ShowClass with
// the same roster and fresh placement slots.

use crate::entities::contestant::{Contestant, ContestantKey};
use crate::entities::entry::EntryLabel;
use crate::entities::points::{
    PointsTally, FIRST_PLACE_POINTS, SECOND_PLACE_POINTS, THIRD_PLACE_POINTS,
};
use crate::error::{Result, ShowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// PLACING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placing {
    First,
    Second,
    Third,
    Commended,
}

impl Placing {
    /// Tiers in award order
    pub const ALL: [Placing; 4] = [
        Placing::First,
        Placing::Second,
        Placing::Third,
        Placing::Commended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Placing::First => "First",
            Placing::Second => "Second",
            Placing::Third => "Third",
            Placing::Commended => "Commended",
        }
    }

    /// Commendations carry no points
    pub fn points(&self) -> u32 {
        match self {
            Placing::First => FIRST_PLACE_POINTS,
            Placing::Second => SECOND_PLACE_POINTS,
            Placing::Third => THIRD_PLACE_POINTS,
            Placing::Commended => 0,
        }
    }
}

// ============================================================================
// PLACEMENT
// ============================================================================

/// A placed entry: who it belongs to and how the judge named it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub contestant: Contestant,
    pub entry: EntryLabel,
}

impl Placement {
    pub fn new(contestant: Contestant, entry: EntryLabel) -> Self {
        Placement { contestant, entry }
    }
}

/// One row of a class result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub placing: Placing,
    pub entry: String,
    pub contestant: String,
}

/// The four placement lists for one judgment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Judgment {
    pub first: Vec<Placement>,
    pub second: Vec<Placement>,
    pub third: Vec<Placement>,
    pub commendations: Vec<Placement>,
}

// ============================================================================
// SHOW CLASS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowClass {
    pub class_id: String,
    pub name: String,

    /// Roster; entry number = position + 1
    pub contestants: Vec<Contestant>,

    #[serde(default)]
    pub first_place: Vec<Placement>,
    #[serde(default)]
    pub second_place: Vec<Placement>,
    #[serde(default)]
    pub third_place: Vec<Placement>,
    #[serde(default)]
    pub commendations: Vec<Placement>,
}

impl ShowClass {
    /// Unjudged class with the given roster
    pub fn new(
        class_id: impl Into<String>,
        name: impl Into<String>,
        contestants: Vec<Contestant>,
        max_entries_per_class: usize,
    ) -> Result<Self> {
        let show_class = ShowClass {
            class_id: class_id.into(),
            name: name.into(),
            contestants,
            first_place: Vec::new(),
            second_place: Vec::new(),
            third_place: Vec::new(),
            commendations: Vec::new(),
        };
        show_class.check_entry_cap(max_entries_per_class)?;
        Ok(show_class)
    }

    /// No contestant may appear in the roster more than `cap` times
    pub fn check_entry_cap(&self, cap: usize) -> Result<()> {
        let mut counts: BTreeMap<ContestantKey, usize> = BTreeMap::new();
        for contestant in &self.contestants {
            *counts.entry(contestant.key()).or_insert(0) += 1;
        }
        if let Some((key, count)) = counts.into_iter().find(|(_, n)| *n > cap) {
            return Err(ShowError::Consistency(format!(
                "class {} holds {} entries for {} (limit {})",
                self.class_id, count, key.name, cap
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.contestants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contestants.is_empty()
    }

    pub fn contains(&self, key: &ContestantKey) -> bool {
        self.contestants.iter().any(|c| &c.key() == key)
    }

    pub fn count_contestant(&self, key: &ContestantKey) -> usize {
        self.contestants.iter().filter(|c| &c.key() == key).count()
    }

    /// Distinct contestants, sorted by identity key
    pub fn unique_contestants(&self) -> Vec<&Contestant> {
        let mut by_key: BTreeMap<ContestantKey, &Contestant> = BTreeMap::new();
        for contestant in &self.contestants {
            by_key.entry(contestant.key()).or_insert(contestant);
        }
        by_key.into_values().collect()
    }

    /// Contestant holding entry `number` (1-based)
    pub fn entry_lookup(&self, number: usize) -> Result<&Contestant> {
        number
            .checked_sub(1)
            .and_then(|i| self.contestants.get(i))
            .ok_or_else(|| ShowError::UnknownEntry {
                class_id: self.class_id.clone(),
                entry: number.to_string(),
            })
    }

    /// Entry numbers held by a contestant in this class
    pub fn entry_numbers(&self, key: &ContestantKey) -> Vec<usize> {
        self.contestants
            .iter()
            .enumerate()
            .filter(|(_, c)| &c.key() == key)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// New class with these placings; the roster is untouched and any
    /// previous placings are discarded
    pub fn with_judgment(&self, judgment: Judgment) -> ShowClass {
        ShowClass {
            class_id: self.class_id.clone(),
            name: self.name.clone(),
            contestants: self.contestants.clone(),
            first_place: judgment.first,
            second_place: judgment.second,
            third_place: judgment.third,
            commendations: judgment.commendations,
        }
    }

    pub fn placements(&self, placing: Placing) -> &[Placement] {
        match placing {
            Placing::First => &self.first_place,
            Placing::Second => &self.second_place,
            Placing::Third => &self.third_place,
            Placing::Commended => &self.commendations,
        }
    }

    pub fn is_judged(&self) -> bool {
        Placing::ALL.iter().any(|p| !self.placements(*p).is_empty())
    }

    /// Class points: each contestant keeps only their best tier.
    ///
    /// Tiers are walked first → second → third; ties within a tier all get
    /// the tier's value.
    pub fn points(&self) -> PointsTally {
        let mut tally = PointsTally::new();
        for placing in [Placing::First, Placing::Second, Placing::Third] {
            for placement in self.placements(placing) {
                tally.credit_once(&placement.contestant, placing.points());
            }
        }
        tally
    }

    /// Best placing reached by the entry with this label, if any
    pub fn placing_of(&self, entry: &EntryLabel) -> Option<Placing> {
        Placing::ALL
            .into_iter()
            .find(|p| self.placements(*p).iter().any(|pl| &pl.entry == entry))
    }

    /// Placed entries in award order, for result tables
    pub fn result_rows(&self) -> Vec<ResultRow> {
        Placing::ALL
            .iter()
            .flat_map(|placing| {
                self.placements(*placing).iter().map(move |pl| ResultRow {
                    placing: *placing,
                    entry: pl.entry.to_string(),
                    contestant: pl.contestant.name.clone(),
                })
            })
            .collect()
    }
}
