// 📒 Entry Ledger - append-only registration rows
//
// One row per registration call: the name, the classes that call added and
// what was paid with it. Contestants and entries are derived from the rows,
// never stored. Because an update appends a row instead of rewriting an
// earlier one, entry numbers already handed out never shift.

use crate::entities::{Contestant, Entry};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryLedger {
    rows: Vec<Contestant>,
}

impl EntryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Contestant>) -> Self {
        EntryLedger { rows }
    }

    pub fn rows(&self) -> &[Contestant] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New ledger with `row` appended
    pub fn appended(&self, row: Contestant) -> EntryLedger {
        let mut rows = self.rows.clone();
        rows.push(row);
        EntryLedger { rows }
    }

    /// Canonical contestants, one per name, positioned where the name first
    /// registered; later rows merge in (classes appended, payments summed)
    pub fn contestants(&self) -> Vec<Contestant> {
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut contestants: Vec<Contestant> = Vec::new();

        for row in &self.rows {
            match position.get(row.name.as_str()) {
                Some(&i) => contestants[i] = contestants[i].merged_with(row),
                None => {
                    position.insert(row.name.as_str(), contestants.len());
                    contestants.push(row.clone());
                }
            }
        }

        contestants
    }

    pub fn find(&self, name: &str) -> Option<Contestant> {
        self.contestants().into_iter().find(|c| c.name == name)
    }

    /// Every entry, first registered first numbered.
    ///
    /// Rows are walked in append order and each row's classes in the order
    /// given; entries carry the canonical contestant for their name.
    pub fn entries(&self) -> Vec<Entry> {
        let canonical: HashMap<String, Contestant> = self
            .contestants()
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        let mut ordinals: HashMap<(&str, &str), usize> = HashMap::new();
        let mut entries = Vec::new();

        for row in &self.rows {
            let Some(contestant) = canonical.get(&row.name) else {
                continue;
            };
            for class_id in &row.classes {
                let ordinal = ordinals
                    .entry((row.name.as_str(), class_id.as_str()))
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

    /// Total paid across all of a contestant's rows
    pub fn total_paid(&self, name: &str) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.name == name)
            .map(|r| r.paid)
            .sum()
    }
}
