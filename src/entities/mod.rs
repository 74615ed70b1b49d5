// Entity Models
// Values, not objects: identity is derived from content, and every
// "update" produces a new value.
//
// - Contestant: name + classes entered (identity), payment (value)
// - Entry / EntryLabel: a contestant's instance in a class and how judges name it
// - ShowClass: numbered roster plus placings
// - Show: all classes keyed by id, plus manual prizes

pub mod contestant;
pub mod entry;
pub mod points;
pub mod show;
pub mod show_class;

pub use contestant::{Contestant, ContestantKey, HASH_LEN};
pub use entry::{AllocatedEntry, Entry, EntryLabel, ParseEntryLabelError};
pub use points::{PointsTally, FIRST_PLACE_POINTS, SECOND_PLACE_POINTS, THIRD_PLACE_POINTS};
pub use show::{class_sort_key, ManualPrize, Show};
pub use show_class::{Judgment, Placement, Placing, ResultRow, ShowClass};
