use std::io::Write;

use anyhow::Result;
use klife_core::format::{category_label, fee_label};
use klife_core::{format_date_range, is_foreign_friendly, EventRecord};

/// Human-readable listing: one block per event, friendly ones starred.
pub fn write_listing(w: &mut impl Write, records: &[&EventRecord]) -> Result<()> {
    if records.is_empty() {
        writeln!(w, "No events found. Try adjusting filters.")?;
        return Ok(());
    }
    for record in records {
        let star = if is_foreign_friendly(record) { "⭐ " } else { "" };
        writeln!(w, "{star}{} [{}]", record.title(), category_label(record))?;
        let date = format_date_range(record.date.as_deref().unwrap_or_default());
        writeln!(w, "    {date} | {} | {}", record.venue(), fee_label(record))?;
    }
    writeln!(w, "\n{} event(s)", records.len())?;
    Ok(())
}

/// The records as a pretty-printed JSON array, upstream field names kept.
pub fn write_json(w: &mut impl Write, records: &[&EventRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, records)?;
    writeln!(w)?;
    Ok(())
}
