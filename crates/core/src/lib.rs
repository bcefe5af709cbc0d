//! Event records and the pure logic applied to them: the foreign-friendly
//! classifier, display formatting and the filter engine.

pub mod classify;
pub mod event;
pub mod filter;
pub mod format;

pub use classify::{is_foreign_friendly, matching_rule, Signal};
pub use event::{CatalogPayload, EventRecord, PayloadError};
pub use filter::{filter_events, FilterState};
pub use format::format_date_range;
