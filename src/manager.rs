// 🗃️ Show Manager - owns the allocated show and everything done to it
//
// Allocation, judging and manual prizes each compute a new Show, write it
// out, and only then swap it in.

use crate::allocation::allocate_classes;
use crate::entities::{
    AllocatedEntry, Contestant, Entry, EntryLabel, Judgment, ManualPrize, Placement, Placing,
    Show, ShowClass,
};
use crate::error::{Result, ShowError};
use crate::prizes::{self, Prize};
use crate::render::ClassResult;
use crate::storage;
use crate::taxonomy::ClassTaxonomy;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One row of the classes export
#[derive(Debug, Serialize)]
struct ClassCsvRow<'a> {
    class_id: &'a str,
    class_name: &'a str,
    entry: String,
    contestant: &'a str,
    placing: &'a str,
}

pub struct Manager {
    ledger_loc: PathBuf,
    show: Option<Show>,
    taxonomy: ClassTaxonomy,
    max_entries_per_class: usize,
}

impl Manager {
    /// Open the show ledger at `ledger_loc`; it may not exist yet
    pub fn open(
        ledger_loc: impl Into<PathBuf>,
        taxonomy: ClassTaxonomy,
        max_entries_per_class: usize,
    ) -> Result<Self> {
        let ledger_loc = ledger_loc.into();
        let show = storage::load_show(&ledger_loc, max_entries_per_class)?;
        if let Some(show) = &show {
            info!(
                classes = show.classes().len(),
                entries = show.total_entries(),
                path = %ledger_loc.display(),
                "loaded show"
            );
        }

        Ok(Manager {
            ledger_loc,
            show,
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

    /// The allocated show
    pub fn show(&self) -> Result<&Show> {
        self.show.as_ref().ok_or_else(|| ShowError::NotAllocated {
            path: self.ledger_loc.clone(),
        })
    }

    fn commit(&mut self, show: Show) -> Result<&Show> {
        storage::save_show(&self.ledger_loc, &show)?;
        Ok(self.show.insert(show))
    }

    // ========================================================================
    // ALLOCATION
    // ========================================================================

    /// Number every entry and persist the resulting show.
    ///
    /// Refuses to overwrite an existing allocation unless `allow_reallocate`,
    /// since judging refers to entry numbers.
    pub fn allocate(&mut self, entries: &[Entry], allow_reallocate: bool) -> Result<&Show> {
        if self.ledger_loc.exists() && !allow_reallocate {
            return Err(ShowError::ExistingLedger {
                path: self.ledger_loc.clone(),
            });
        }

        let show = allocate_classes(entries, &self.taxonomy, self.max_entries_per_class)?;
        info!(
            classes = show.classes().len(),
            entries = show.total_entries(),
            path = %self.ledger_loc.display(),
            "allocated contestants to classes"
        );
        self.commit(show)
    }

    // ========================================================================
    // JUDGING
    // ========================================================================

    pub fn lookup_contestant(&self, class_id: &str, label: &EntryLabel) -> Result<Contestant> {
        self.show()?.lookup_contestant(class_id, label).cloned()
    }

    fn resolve(&self, class_id: &str, labels: &[EntryLabel]) -> Result<Vec<Placement>> {
        labels
            .iter()
            .map(|label| {
                let contestant = self.lookup_contestant(class_id, label)?;
                Ok(Placement::new(contestant, label.clone().normalized(class_id)))
            })
            .collect()
    }

    /// Record placings for a class, replacing any earlier judgment
    pub fn add_judgment(
        &mut self,
        class_id: &str,
        first: &[EntryLabel],
        second: &[EntryLabel],
        third: &[EntryLabel],
        commendations: &[EntryLabel],
    ) -> Result<ShowClass> {
        let show = self.show()?;
        let show_class = show.class_lookup(class_id)?;

        let judgment = Judgment {
            first: self.resolve(class_id, first)?,
            second: self.resolve(class_id, second)?,
            third: self.resolve(class_id, third)?,
            commendations: self.resolve(class_id, commendations)?,
        };
        let judged = show_class.with_judgment(judgment);
        let next = show.update_class(judged.clone())?;

        self.commit(next)?;
        info!(class_id, "added judgments to class");
        Ok(judged)
    }

    /// Award a prize by hand to the holder of `label`; reported verbatim
    /// after the point-based ones
    pub fn add_prize(
        &mut self,
        class_id: &str,
        label: &EntryLabel,
        prize_name: &str,
    ) -> Result<Contestant> {
        let contestant = self.lookup_contestant(class_id, label)?;
        let next = self.show()?.with_prize(ManualPrize {
            contestant: contestant.clone(),
            class_id: class_id.to_string(),
            prize_name: prize_name.to_string(),
        });
        self.commit(next)?;
        info!(class_id, entry = %label, prize = prize_name, "added manual prize");
        Ok(contestant)
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub fn report_class(&self, class_id: &str) -> Result<ShowClass> {
        let show_class = self.show()?.class_lookup(class_id)?;
        info!(class_id, name = %show_class.name, "reporting on class");
        for placing in Placing::ALL {
            let names: Vec<String> = show_class
                .placements(placing)
                .iter()
                .map(|p| format!("{} ({})", p.contestant.name, p.entry))
                .collect();
            info!("{}: {}", placing.as_str(), names.join(", "));
        }
        Ok(show_class.clone())
    }

    pub fn report_prizes(&self, prizes: &[Prize]) -> Result<Vec<String>> {
        info!("beginning prize report");
        let lines = prizes::report_prizes(self.show()?, &self.taxonomy, prizes)?;
        info!(lines = lines.len(), "completed prize report");
        Ok(lines)
    }

    pub fn report_ranking(&self) -> Result<Vec<String>> {
        Ok(prizes::ranking_lines(self.show()?))
    }

    /// Result tables for every class, in natural class order
    pub fn class_results(&self) -> Result<Vec<ClassResult>> {
        Ok(self
            .show()?
            .classes()
            .into_iter()
            .map(|c| ClassResult {
                class_id: c.class_id.clone(),
                class_name: c.name.clone(),
                rows: c.result_rows(),
            })
            .collect())
    }

    pub fn contestant_entries(&self) -> Result<Vec<(Contestant, Vec<AllocatedEntry>)>> {
        Ok(self.show()?.contestant_entries())
    }

    /// Every roster entry with its placing, one row each, then one row per
    /// entry judged here under another class's label
    pub fn to_csv(&self, location: &Path) -> Result<()> {
        let csv_err = |source| ShowError::Csv {
            path: location.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(location).map_err(csv_err)?;

        for show_class in self.show()?.classes() {
            for (i, contestant) in show_class.contestants.iter().enumerate() {
                let number = i + 1;
                let placing = show_class
                    .placing_of(&EntryLabel::Local(number))
                    .map(|p| p.as_str())
                    .unwrap_or("");
                writer
                    .serialize(ClassCsvRow {
                        class_id: &show_class.class_id,
                        class_name: &show_class.name,
                        entry: number.to_string(),
                        contestant: &contestant.name,
                        placing,
                    })
                    .map_err(csv_err)?;
            }

            for placing in Placing::ALL {
                for placement in show_class.placements(placing) {
                    if !placement.entry.is_moved() {
                        continue;
                    }
                    writer
                        .serialize(ClassCsvRow {
                            class_id: &show_class.class_id,
                            class_name: &show_class.name,
                            entry: placement.entry.to_string(),
                            contestant: &placement.contestant.name,
                            placing: placing.as_str(),
                        })
                        .map_err(csv_err)?;
                }
            }
        }

        writer.flush().map_err(|e| ShowError::io(location, e))?;
        info!(path = %location.display(), "exported classes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entries() -> Vec<Entry> {
        Entry::expand(&[
            Contestant::new("Alice Appleby", ["1", "2", "3"]),
            Contestant::new("Bob Beetroot", ["1", "2", "2", "42"]),
            Contestant::new("Carole Carrot", ["1", "42"]),
            Contestant::new("Dahlia Date", ["1", "3", "3"]),
        ])
    }

    fn manager(dir: &Path) -> Manager {
        Manager::open(dir.join("classes.json"), ClassTaxonomy::builtin(), 2).unwrap()
    }

    fn labels(numbers: &[usize]) -> Vec<EntryLabel> {
        numbers.iter().map(|n| EntryLabel::Local(*n)).collect()
    }

    #[test]
    fn test_reallocation_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();
        let before = fs::read_to_string(mgr.ledger_loc()).unwrap();

        let err = mgr.allocate(&entries()[..3], false).unwrap_err();
        assert!(matches!(err, ShowError::ExistingLedger { .. }));
        assert_eq!(fs::read_to_string(mgr.ledger_loc()).unwrap(), before);

        mgr.allocate(&entries()[..3], true).unwrap();
        assert_eq!(mgr.show().unwrap().total_entries(), 3);
    }

    #[test]
    fn test_judgment_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();

        mgr.add_judgment("1", &labels(&[1]), &labels(&[2]), &labels(&[3]), &labels(&[4]))
            .unwrap();

        let reopened = manager(dir.path());
        let class_one = reopened.report_class("1").unwrap();
        assert_eq!(class_one.first_place.len(), 1);
        assert_eq!(class_one.first_place[0].contestant.name, "Alice Appleby");
        assert_eq!(class_one.second_place[0].contestant.name, "Bob Beetroot");
        assert_eq!(class_one.third_place[0].contestant.name, "Carole Carrot");
        assert_eq!(class_one.commendations[0].contestant.name, "Dahlia Date");
        assert_eq!(class_one.commendations[0].entry, EntryLabel::Local(4));
    }

    #[test]
    fn test_bad_entry_leaves_show_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();
        mgr.add_judgment("42", &labels(&[1]), &[], &[], &[]).unwrap();
        let before = fs::read_to_string(mgr.ledger_loc()).unwrap();

        let err = mgr
            .add_judgment("42", &labels(&[2]), &labels(&[3]), &[], &[])
            .unwrap_err();
        assert!(matches!(err, ShowError::UnknownEntry { .. }));
        assert_eq!(fs::read_to_string(mgr.ledger_loc()).unwrap(), before);
        assert_eq!(mgr.report_class("42").unwrap().first_place.len(), 1);

        assert!(matches!(
            mgr.add_judgment("16", &labels(&[1]), &[], &[], &[]),
            Err(ShowError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_moved_entry_resolves_in_origin_class() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();

        // Dahlia's second class 3 entry judged in class 2
        let moved: EntryLabel = "3-3".parse().unwrap();
        let judged = mgr
            .add_judgment("2", &[moved.clone()], &labels(&[1]), &[], &[])
            .unwrap();
        assert_eq!(judged.first_place[0].contestant.name, "Dahlia Date");
        assert_eq!(judged.first_place[0].entry, moved);

        // a label naming the judged class is stored as a local number
        let own: EntryLabel = "2-2".parse().unwrap();
        let judged = mgr.add_judgment("2", &[own], &[], &[], &[]).unwrap();
        assert_eq!(judged.first_place[0].entry, EntryLabel::Local(2));
    }

    #[test]
    fn test_operations_before_allocation() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());

        assert!(matches!(mgr.report_class("1"), Err(ShowError::NotAllocated { .. })));
        assert!(matches!(
            mgr.add_judgment("1", &labels(&[1]), &[], &[], &[]),
            Err(ShowError::NotAllocated { .. })
        ));
    }

    #[test]
    fn test_manual_prize_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();
        mgr.add_judgment("42", &labels(&[2]), &labels(&[1]), &[], &[]).unwrap();

        let carole = mgr
            .add_prize("42", &EntryLabel::Local(2), "Wonky Wooden Spoon")
            .unwrap();
        assert_eq!(carole.name, "Carole Carrot");
        assert!(matches!(
            mgr.add_prize("99", &EntryLabel::Local(1), "Nope"),
            Err(ShowError::UnknownClass { .. })
        ));
        assert!(matches!(
            mgr.add_prize("42", &EntryLabel::Local(3), "Nope"),
            Err(ShowError::UnknownEntry { .. })
        ));

        let lines = mgr
            .report_prizes(&[Prize::new("Shield", prizes::PrizeRule::OverallHighestPoints)])
            .unwrap();
        assert_eq!(lines, vec!["Shield: Carole Carrot", "Wonky Wooden Spoon: Carole Carrot"]);
        assert_eq!(
            mgr.report_ranking().unwrap(),
            vec!["Carole Carrot: 3", "Bob Beetroot: 2"]
        );
    }

    #[test]
    fn test_class_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();
        mgr.add_judgment("1", &labels(&[4]), &[], &[], &labels(&[1])).unwrap();

        let path = dir.path().join("classes.csv");
        mgr.to_csv(&path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            rdr.headers().unwrap(),
            vec!["class_id", "class_name", "entry", "contestant", "placing"]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), mgr.show().unwrap().total_entries());
        assert_eq!(&rows[0][3], "Alice Appleby");
        assert_eq!(&rows[0][4], "Commended");
        assert_eq!(&rows[3][4], "First");
        assert_eq!(&rows[1][4], "");
    }

    #[test]
    fn test_class_csv_keeps_moved_winner() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();

        let moved: EntryLabel = "3-3".parse().unwrap();
        mgr.add_judgment("2", &[moved], &labels(&[1]), &[], &[]).unwrap();

        let path = dir.path().join("classes.csv");
        mgr.to_csv(&path).unwrap();

        let rows: Vec<csv::StringRecord> = csv::Reader::from_path(&path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect();
        let class_two: Vec<Vec<&str>> = rows
            .iter()
            .filter(|r| &r[0] == "2")
            .map(|r| vec![&r[2], &r[3], &r[4]])
            .collect();

        assert_eq!(
            class_two,
            vec![
                vec!["1", "Alice Appleby", "Second"],
                vec!["2", "Bob Beetroot", ""],
                vec!["3", "Bob Beetroot", ""],
                vec!["3-3", "Dahlia Date", "First"],
            ]
        );
        assert_eq!(rows.len(), mgr.show().unwrap().total_entries() + 1);
    }

    #[test]
    fn test_class_results_in_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager(dir.path());
        mgr.allocate(&entries(), false).unwrap();

        let ids: Vec<String> = mgr
            .class_results()
            .unwrap()
            .into_iter()
            .map(|r| r.class_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "42"]);
    }
}
