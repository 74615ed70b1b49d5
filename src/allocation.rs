// 🔢 Class Allocator - turn entries into numbered class rosters
//
// The Nth entry for a class (in ledger order) gets entry number N. Nothing
// else influences numbering, so allocating again from the same ledger hands
// out the same numbers.

use crate::entities::{Entry, Show, ShowClass};
use crate::error::{Result, ShowError};
use crate::taxonomy::ClassTaxonomy;
use std::collections::HashMap;

/// Group entries by class, preserving the order they arrive in
pub fn group_by_class(entries: &[Entry]) -> Vec<(String, Vec<Entry>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Entry>)> = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.class_id.as_str()).or_insert_with(|| {
            groups.push((entry.class_id.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(entry.clone());
    }

    groups
}

/// Build the show: one unjudged class per class id encountered
pub fn allocate_classes(
    entries: &[Entry],
    taxonomy: &ClassTaxonomy,
    max_entries_per_class: usize,
) -> Result<Show> {
    let mut classes = Vec::new();

    for (class_id, class_entries) in group_by_class(entries) {
        let name = taxonomy
            .class_name(&class_id)
            .ok_or_else(|| ShowError::UnknownClass {
                class_id: class_id.clone(),
            })?
            .to_string();

        let roster = class_entries.into_iter().map(|e| e.contestant).collect();
        classes.push(ShowClass::new(class_id, name, roster, max_entries_per_class)?);
    }

    Show::new(classes)
}
