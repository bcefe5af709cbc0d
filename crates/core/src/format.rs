use crate::event::EventRecord;

pub const PLACEHOLDER_CARD_IMAGE: &str = "https://via.placeholder.com/800x450?text=No+Image";
pub const PLACEHOLDER_DETAIL_IMAGE: &str = "https://via.placeholder.com/1200x600";

/// Render a `"start~end"` date range for display.
///
/// Pure string manipulation: the pieces are trimmed but never parsed.
/// A single date, or a range whose two ends are equal, collapses to one date.
pub fn format_date_range(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut parts = raw.split('~').map(str::trim);
    let first = parts.next().unwrap_or_default();
    match parts.next() {
        Some(second) if second != first => format!("{first} — {second}"),
        _ => first.to_string(),
    }
}

/// Badge text: category, then theme, then a generic label.
pub fn category_label(record: &EventRecord) -> &str {
    [record.category.as_deref(), record.theme.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or("Event")
}

/// Fee line: the upstream fee text, else derived from the free-admission flag.
pub fn fee_label(record: &EventRecord) -> &str {
    match record.fee.as_deref() {
        Some(fee) if !fee.is_empty() => fee,
        _ if record.is_free.as_deref() == Some("무료") => "Free",
        _ => "Varies",
    }
}

pub fn image_url<'a>(record: &'a EventRecord, placeholder: &'a str) -> &'a str {
    non_empty(record.image_url.as_deref()).unwrap_or(placeholder)
}

/// Link target for the official site. Only `http`/`https` URLs are kept.
pub fn homepage_url(record: &EventRecord) -> &str {
    non_empty(record.homepage.as_deref())
        .map(str::trim)
        .filter(|url| is_web_url(url))
        .unwrap_or("#")
}

fn is_web_url(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

/// Map search link for the record's coordinates (`lat,lon`).
pub fn maps_url(record: &EventRecord) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        record.latitude.as_deref().unwrap_or_default(),
        record.longitude.as_deref().unwrap_or_default(),
    )
}

/// Key used to tell cards apart. Not unique across fetches.
pub fn display_key(record: &EventRecord, index: usize) -> String {
    let base = non_empty(record.homepage.as_deref()).unwrap_or(record.title());
    format!("{base}-{index}")
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
