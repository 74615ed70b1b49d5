// Show Secretary - Core Library
// Registration, entry allocation, judging and prizes for a numbered-class show.
// Exposes all modules for use in the CLI and tests.

pub mod allocation;
pub mod config;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod manager;
pub mod prizes;
pub mod registration;
pub mod render;
pub mod storage;
pub mod taxonomy;

// Re-export commonly used types
pub use allocation::{allocate_classes, group_by_class};
pub use config::{ShowConfig, MAX_ENTRIES_PER_CLASS};
pub use entities::{
    AllocatedEntry, Contestant, ContestantKey, Entry, EntryLabel, Judgment, ManualPrize,
    Placement, Placing, PointsTally, ResultRow, Show, ShowClass,
    FIRST_PLACE_POINTS, SECOND_PLACE_POINTS, THIRD_PLACE_POINTS,
};
pub use error::{Result, ShowError};
pub use ledger::EntryLedger;
pub use manager::Manager;
pub use prizes::{
    default_prizes, load_prizes, ranking_lines, report_prizes, sort_contestant_by_points, Prize,
    PrizeRule,
};
pub use registration::{Registrar, RegistrationOutcome};
pub use render::{ClassResult, Renderer, TextRenderer};
pub use taxonomy::{ClassDefinition, ClassTaxonomy, Section};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registrar for the show stored at `location`
pub fn open_registrar(location: &Path, config: &ShowConfig) -> Result<Registrar> {
    let taxonomy = ClassTaxonomy::load(&config.taxonomy_path(location))?;
    Registrar::open(
        config.contestant_path(location),
        taxonomy,
        config.max_entries_per_class,
    )
}

/// Manager for the show stored at `location`
pub fn open_manager(location: &Path, config: &ShowConfig) -> Result<Manager> {
    let taxonomy = ClassTaxonomy::load(&config.taxonomy_path(location))?;
    Manager::open(
        config.show_path(location),
        taxonomy,
        config.max_entries_per_class,
    )
}
