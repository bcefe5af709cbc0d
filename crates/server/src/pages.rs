//! Server-rendered HTML.
//!
//! Pure functions from already-loaded data to markup; no I/O happens here.
//! Every piece of upstream or user text goes through [`escape`].

use std::fmt::Write;

use axum::response::Html;
use chrono::Datelike;

use klife_api_client::CatalogState;
use klife_core::format::{
    category_label, display_key, fee_label, homepage_url, image_url, maps_url,
    PLACEHOLDER_CARD_IMAGE, PLACEHOLDER_DETAIL_IMAGE,
};
use klife_core::{format_date_range, is_foreign_friendly, matching_rule, EventRecord, FilterState, Signal};

const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/api/health", "Health"),
    ("/login", "Login"),
    ("/welcome", "Welcome"),
];

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f9fafb;color:#111827}\
nav{display:flex;gap:1rem;padding:1rem;border-bottom:1px solid #e5e7eb;background:#fff}\
nav a{color:#4b5563;text-decoration:none}nav a.active{color:#2563eb;font-weight:600}\
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.card{background:#fff;border-radius:1rem;overflow:hidden;box-shadow:0 1px 2px #0001}\
.card img{width:100%;height:11rem;object-fit:cover}.card .body{padding:1rem}\
.badge{display:inline-block;padding:.25rem .75rem;border-radius:999px;font-size:.75rem;font-weight:600;background:#eff6ff;color:#1d4ed8}\
.badge.friendly{background:#fef9c3;color:#854d0e}\
.notice{text-align:center;padding:3rem 0;color:#6b7280}.notice.error{color:#dc2626}\
.error{color:#dc2626}.detail{background:#fff;border-radius:1rem;padding:1.5rem;margin-bottom:2rem}\
.detail img{width:100%;max-height:18rem;object-fit:cover;border-radius:1rem}\
footer{border-top:1px solid #f3f4f6;margin-top:3rem;padding:1.5rem 1rem;color:#6b7280;font-size:.875rem}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(current_path: &str) -> String {
    let mut out = String::from("<nav>");
    for (href, label) in NAV_LINKS {
        let class = if *href == current_path { " class=\"active\"" } else { "" };
        let _ = write!(out, "<a href=\"{href}\"{class}>{label}</a>");
    }
    out.push_str("</nav>");
    out
}

/// Wrap `body` in the shared page chrome: nav bar, main column and footer.
pub fn layout(title: &str, current_path: &str, body: &str) -> Html<String> {
    let year = chrono::Local::now().year();
    Html(format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head><body>{nav}\
         <main>{body}</main>\
         <footer>&copy; {year} Seoul Events</footer></body></html>",
        title = escape(title),
        nav = nav(current_path),
    ))
}

// ── Login / welcome ───────────────────────────────────────────────────────

pub fn login_page(username: &str, from: Option<&str>, error: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Login</h1><form method=\"post\" action=\"/login\">");
    if let Some(from) = from {
        let _ = write!(
            body,
            "<input type=\"hidden\" name=\"from\" value=\"{}\">",
            escape(from)
        );
    }
    let _ = write!(
        body,
        "<p><label>Username<br><input name=\"username\" value=\"{}\" placeholder=\"admin\"></label></p>\
         <p><label>Password<br><input type=\"password\" name=\"password\" placeholder=\"123456\"></label></p>",
        escape(username)
    );
    if let Some(error) = error {
        let _ = write!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    body.push_str("<button type=\"submit\">Login</button></form>");
    layout("Login", "/login", &body)
}

pub fn welcome_page(username: &str) -> Html<String> {
    let body = format!(
        "<h1>Welcome, {}!</h1><p>You are logged in.</p>\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
        escape(username)
    );
    layout("Welcome", "/welcome", &body)
}

// ── Events ────────────────────────────────────────────────────────────────

/// Link to the listing with `filter` applied and, optionally, one visible
/// record opened in the detail view.
pub fn events_href(filter: &FilterState, selected: Option<usize>) -> String {
    let mut params = Vec::new();
    if !filter.q.is_empty() {
        params.push(format!("q={}", urlencoding::encode(&filter.q)));
    }
    if filter.foreign_only {
        params.push("foreign=1".to_string());
    }
    if let Some(i) = selected {
        params.push(format!("selected={i}"));
    }
    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// The listing page. `selected` indexes the filtered (visible) records.
pub fn events_page(state: &CatalogState, filter: &FilterState, selected: Option<usize>) -> Html<String> {
    let mut body = String::from(
        "<header><strong>Seoul Events</strong> <span>Discover performances &amp; experiences</span></header>",
    );
    body.push_str(&filter_bar(filter));
    body.push_str("<h1>Events in Seoul</h1>");

    match state {
        CatalogState::Idle | CatalogState::Loading => {
            body.push_str("<div class=\"notice\">Loading events…</div>");
        }
        CatalogState::Failed(e) => {
            let _ = write!(
                body,
                "<div class=\"notice error\">Failed to load: {}</div>",
                escape(&e.to_string())
            );
        }
        CatalogState::Loaded(records) => {
            let visible = filter.apply(records);
            if let Some(record) = selected.and_then(|i| visible.get(i)) {
                body.push_str(&detail(record, &events_href(filter, None)));
            }
            body.push_str("<div class=\"grid\">");
            for (i, record) in visible.iter().enumerate() {
                body.push_str(&card(record, i, filter));
            }
            body.push_str("</div>");
            if visible.is_empty() {
                body.push_str("<div class=\"notice\">No events found. Try adjusting filters.</div>");
            }
        }
    }
    layout("Seoul Events", "/", &body)
}

fn filter_bar(filter: &FilterState) -> String {
    let checked = if filter.foreign_only { " checked" } else { "" };
    format!(
        "<form method=\"get\" action=\"/\">\
         <input name=\"q\" value=\"{q}\" placeholder=\"Search events, places, keywords...\">\
         <label><input type=\"checkbox\" name=\"foreign\" value=\"1\"{checked}> Foreign-friendly</label>\
         <button type=\"submit\">Search</button></form>\
         <form method=\"post\" action=\"/events/refresh\"><button type=\"submit\">Refresh</button></form>",
        q = escape(&filter.q),
    )
}

fn card(record: &EventRecord, index: usize, filter: &FilterState) -> String {
    let friendly = if is_foreign_friendly(record) {
        "<span class=\"badge friendly\">⭐ Foreign-friendly</span>"
    } else {
        ""
    };
    format!(
        "<article class=\"card\" id=\"{key}\"><img src=\"{img}\" alt=\"{title}\"><div class=\"body\">\
         <span class=\"badge\">{category}</span>{friendly} <small>{district}</small>\
         <h3>{title}</h3>\
         <div>📅 {date}</div><div>📍 {venue}</div><div>💰 {fee}</div>\
         <a href=\"{details}\">View Details</a> \
         <a href=\"{homepage}\" target=\"_blank\" rel=\"noreferrer\">Official →</a>\
         </div></article>",
        key = escape(&display_key(record, index)),
        img = escape(image_url(record, PLACEHOLDER_CARD_IMAGE)),
        title = escape(record.title()),
        category = escape(category_label(record)),
        district = escape(record.district.as_deref().unwrap_or_default()),
        date = escape(&format_date_range(record.date.as_deref().unwrap_or_default())),
        venue = escape(record.venue()),
        fee = escape(fee_label(record)),
        details = escape(&events_href(filter, Some(index))),
        homepage = escape(homepage_url(record)),
    )
}

/// Short English blurb chosen from the classifier's verdict.
pub fn summary(record: &EventRecord) -> &'static str {
    match matching_rule(record).map(|rule| rule.signal) {
        Some(Signal::Genre) => {
            "Music, theatre or family programming that is easy to enjoy without understanding Korean."
        }
        Some(Signal::FamiliarTitle) => {
            "Built around widely known titles or soundtracks, so it is approachable for international visitors."
        }
        Some(Signal::PricingOrVenue) => {
            "Held at an arts venue or with simple all-seat pricing, which makes it easy to attend as a visitor."
        }
        None => "Details are provided by the organizer in Korean.",
    }
}

fn detail(record: &EventRecord, close_href: &str) -> String {
    let friendly = if is_foreign_friendly(record) {
        "<span class=\"badge friendly\">⭐ Highly suitable for foreign visitors</span>"
    } else {
        ""
    };
    format!(
        "<section class=\"detail\"><a href=\"{close}\">Close</a>\
         <img src=\"{img}\" alt=\"{title}\"><h2>{title}</h2>\
         <span class=\"badge\">{category}</span>{friendly}\
         <p>{district} · {organizer}</p>\
         <div>📅 <strong>{date}</strong></div><div>🕒 <strong>{duration}</strong></div>\
         <div>📍 <strong>{venue}</strong></div><div>💰 <strong>{fee}</strong></div>\
         <div>👥 <strong>{audience}</strong></div>\
         <h3>Short English Summary</h3><p>{summary}</p>\
         <a href=\"{homepage}\" target=\"_blank\" rel=\"noreferrer\">Official Website</a> \
         <a href=\"{maps}\" target=\"_blank\" rel=\"noreferrer\">Open in Maps</a></section>",
        close = escape(close_href),
        img = escape(image_url(record, PLACEHOLDER_DETAIL_IMAGE)),
        title = escape(record.title()),
        category = escape(record.category()),
        district = escape(record.district.as_deref().unwrap_or_default()),
        organizer = escape(record.organizer.as_deref().unwrap_or_default()),
        date = escape(&format_date_range(record.date.as_deref().unwrap_or_default())),
        duration = escape(record.duration.as_deref().unwrap_or_default()),
        venue = escape(record.venue()),
        fee = escape(record.fee()),
        audience = escape(record.audience.as_deref().unwrap_or_default()),
        summary = summary(record),
        homepage = escape(homepage_url(record)),
        maps = escape(&maps_url(record)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(title: &str) -> EventRecord {
        EventRecord {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn nav_marks_the_current_page() {
        let html = nav("/login");
        assert!(html.contains(r#"<a href="/login" class="active">Login</a>"#));
        assert!(html.contains(r#"<a href="/">Home</a>"#));
    }

    #[test]
    fn events_href_carries_the_filter() {
        let filter = FilterState::new("jazz night", true);
        assert_eq!(events_href(&filter, Some(2)), "/?q=jazz%20night&foreign=1&selected=2");
        assert_eq!(events_href(&FilterState::default(), None), "/");
    }

    #[test]
    fn loading_and_error_states_render_a_notice() {
        let filter = FilterState::default();
        let Html(loading) = events_page(&CatalogState::Loading, &filter, None);
        assert!(loading.contains("Loading events"));

        let failed = CatalogState::Failed(klife_api_client::CatalogError::Status(503));
        let Html(html) = events_page(&failed, &filter, None);
        assert!(html.contains("Failed to load: HTTP 503"));
    }

    #[test]
    fn empty_result_shows_the_hint() {
        let state = CatalogState::Loaded(Arc::new(vec![record("Jazz")]));
        let Html(html) = events_page(&state, &FilterState::new("opera", false), None);
        assert!(html.contains("No events found. Try adjusting filters."));
    }

    #[test]
    fn selected_index_opens_the_detail_view() {
        let state = CatalogState::Loaded(Arc::new(vec![record("Jazz"), record("Ghibli OST")]));
        let Html(html) = events_page(&state, &FilterState::new("ghibli", false), Some(0));
        assert!(html.contains("<h2>Ghibli OST</h2>"));
        assert!(html.contains("Highly suitable for foreign visitors"));
        assert!(!html.contains("Jazz"));
    }

    #[test]
    fn upstream_text_is_escaped() {
        let state = CatalogState::Loaded(Arc::new(vec![record("<script>x</script>")]));
        let Html(html) = events_page(&state, &FilterState::default(), None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn script_links_are_not_rendered() {
        let records = vec![EventRecord {
            homepage: Some("javascript:alert(1)".into()),
            ..record("Jazz")
        }];
        let state = CatalogState::Loaded(Arc::new(records));
        for selected in [None, Some(0)] {
            let Html(html) = events_page(&state, &FilterState::default(), selected);
            assert!(!html.contains(r#"href="javascript:"#));
            assert!(html.contains(r##"<a href="#" target="_blank""##));
        }
    }

    #[test]
    fn welcome_escapes_the_username() {
        let Html(html) = welcome_page("<b>kim</b>");
        assert!(html.contains("Welcome, &lt;b&gt;kim&lt;/b&gt;!"));
        assert!(html.contains(r#"action="/logout""#));
    }
}
