use serde::{Deserialize, Serialize};

use crate::classify::is_foreign_friendly;
use crate::event::EventRecord;

/// Query text plus the foreign-friendly toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub foreign_only: bool,
}

impl FilterState {
    pub fn new(q: impl Into<String>, foreign_only: bool) -> Self {
        Self {
            q: q.into(),
            foreign_only,
        }
    }

    pub fn apply<'a>(&self, records: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        filter_events(records, &self.q, self.foreign_only)
    }
}

/// Narrow `records` to the visible subset, preserving input order.
///
/// The query is matched case-insensitively against
/// `"<title> <venue> <category> <theme>"`; it is not trimmed.
pub fn filter_events<'a>(
    records: &'a [EventRecord],
    query: &str,
    foreign_only: bool,
) -> Vec<&'a EventRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| !foreign_only || is_foreign_friendly(r))
        .filter(|r| needle.is_empty() || search_text(r).contains(&needle))
        .collect()
}

fn search_text(record: &EventRecord) -> String {
    format!(
        "{} {} {} {}",
        record.title(),
        record.venue(),
        record.category(),
        record.theme()
    )
    .to_lowercase()
}
