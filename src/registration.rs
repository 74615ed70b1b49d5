// 📝 Contestant Registry - validates registrations and keeps the ledger on disk
//
// Every accepted registration is validated in full, appended to an in-memory
// copy of the ledger, written out, and only then becomes the current state.

use crate::entities::{Contestant, Entry};
use crate::error::{Result, ShowError};
use crate::ledger::EntryLedger;
use crate::storage;
use crate::taxonomy::ClassTaxonomy;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a call to `register` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New contestant appended
    Registered,
    /// Entries added to an existing contestant
    Updated,
    /// Identical contestant already present; nothing written
    Unchanged,
}

pub struct Registrar {
    ledger_loc: PathBuf,
    ledger: EntryLedger,
    taxonomy: ClassTaxonomy,
    max_entries_per_class: usize,
}

impl Registrar {
    /// Open the ledger at `ledger_loc`, loading it if it exists
    pub fn open(
        ledger_loc: impl Into<PathBuf>,
        taxonomy: ClassTaxonomy,
        max_entries_per_class: usize,
    ) -> Result<Self> {
        let ledger_loc = ledger_loc.into();
        let rows = storage::load_ledger(&ledger_loc)?;
        if !rows.is_empty() {
            info!(
                rows = rows.len(),
                path = %ledger_loc.display(),
                "loaded contestant ledger"
            );
        }

        Ok(Registrar {
            ledger_loc,
            ledger: EntryLedger::from_rows(rows),
            taxonomy,
            max_entries_per_class,
        })
    }

    pub fn ledger_loc(&self) -> &Path {
        &self.ledger_loc
    }

    pub fn taxonomy(&self) -> &ClassTaxonomy {
        &self.taxonomy
    }

    /// Name format, payment, known classes and per-class cap
    pub fn validate(&self, contestant: &Contestant) -> Result<()> {
        contestant.check_name()?;
        contestant.check_paid()?;

        if contestant.classes.is_empty() {
            return Err(ShowError::validation(
                &contestant.name,
                "at least one class must be entered",
            ));
        }
        if let Some(unknown) = contestant
            .classes
            .iter()
            .find(|c| !self.taxonomy.is_valid(c))
        {
            return Err(ShowError::validation(
                &contestant.name,
                format!("unknown class {}", unknown),
            ));
        }

        contestant.check_entry_cap(self.max_entries_per_class)
    }

    pub fn register(
        &mut self,
        contestant: Contestant,
        allow_update: bool,
    ) -> Result<RegistrationOutcome> {
        self.validate(&contestant)?;

        let outcome = match self.ledger.find(&contestant.name) {
            Some(existing) if existing.same_identity(&contestant) => {
                warn!(contestant = %contestant.key(), "contestant already registered");
                return Ok(RegistrationOutcome::Unchanged);
            }
            Some(_) if !allow_update => {
                return Err(ShowError::DuplicateName {
                    name: contestant.name,
                });
            }
            Some(existing) => {
                warn!(name = %contestant.name, "updating contestant");
                // the merged record must respect the cap as well
                existing
                    .merged_with(&contestant)
                    .check_entry_cap(self.max_entries_per_class)?;
                RegistrationOutcome::Updated
            }
            None => RegistrationOutcome::Registered,
        };

        let added = contestant.classes.len();
        let name = contestant.name.clone();
        let ledger = self.ledger.appended(contestant);
        storage::save_ledger(&self.ledger_loc, ledger.rows())?;
        self.ledger = ledger;

        match outcome {
            RegistrationOutcome::Updated => {
                info!(name = %name, added, "added entries to contestant")
            }
            _ => info!(name = %name, entries = added, "registered contestant"),
        }
        Ok(outcome)
    }

    /// Canonical contestants in registration order
    pub fn contestants(&self) -> Vec<Contestant> {
        self.ledger.contestants()
    }

    /// Entries in first-registered-first-numbered order
    pub fn entries(&self) -> Vec<Entry> {
        self.ledger.entries()
    }

    /// Each contestant with their entries, in registration order
    pub fn contestant_entries(&self) -> Vec<(Contestant, Vec<Entry>)> {
        let entries = self.entries();
        self.contestants()
            .into_iter()
            .map(|c| {
                let own = entries
                    .iter()
                    .filter(|e| e.contestant.name == c.name)
                    .cloned()
                    .collect();
                (c, own)
            })
            .collect()
    }

    /// Fees for paying entries minus what was paid, never below zero
    pub fn amount_owed(&self, contestant: &Contestant) -> f64 {
        let chargeable = contestant
            .classes
            .iter()
            .filter(|c| !self.taxonomy.is_free(c))
            .count();
        let due = chargeable as f64 * self.taxonomy.entry_cost();
        (due - contestant.paid).max(0.0)
    }

    /// Contestant × class matrix of entry counts
    pub fn to_csv(&self, location: &Path) -> Result<()> {
        let csv_err = |source| ShowError::Csv {
            path: location.to_path_buf(),
            source,
        };
        let class_ids = self.taxonomy.class_ids();

        let mut writer = csv::Writer::from_path(location).map_err(csv_err)?;

        let mut header = vec!["contestant"];
        header.extend(class_ids.iter().copied());
        writer.write_record(&header).map_err(csv_err)?;

        for contestant in self.contestants() {
            let mut record = vec![contestant.name.clone()];
            record.extend(
                class_ids
                    .iter()
                    .map(|id| contestant.count_in(id).to_string()),
            );
            writer.write_record(&record).map_err(csv_err)?;
        }

        writer
            .flush()
            .map_err(|e| ShowError::io(location, e))?;
        info!(path = %location.display(), "exported contestants");
        Ok(())
    }
}
