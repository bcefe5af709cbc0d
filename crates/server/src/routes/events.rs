use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use klife_api_client::CatalogLoader;
use klife_core::FilterState;

use crate::pages;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventsQuery {
    pub q: String,
    /// Checkbox value; any of `1`, `true`, `on` enables the filter.
    pub foreign: Option<String>,
    /// Index into the visible records of the card opened in the detail view.
    /// Anything that is not an index is ignored.
    pub selected: Option<String>,
}

impl EventsQuery {
    fn selected(&self) -> Option<usize> {
        self.selected.as_deref()?.trim().parse().ok()
    }

    fn filter(&self) -> FilterState {
        let foreign_only = matches!(self.foreign.as_deref(), Some("1" | "true" | "on"));
        FilterState::new(self.q.clone(), foreign_only)
    }
}

/// GET /: the event listing. Loads the catalog on first use.
pub async fn index(
    State(catalog): State<CatalogLoader>,
    Query(query): Query<EventsQuery>,
) -> Html<String> {
    let state = catalog.ensure_loaded().await;
    pages::events_page(&state, &query.filter(), query.selected())
}

/// POST /events/refresh: fetch the catalog again, then back to the listing.
pub async fn refresh(State(catalog): State<CatalogLoader>) -> Redirect {
    let state = catalog.refresh().finished().await;
    if let Some(e) = state.error() {
        tracing::warn!("catalog refresh failed: {e}");
    }
    Redirect::to("/")
}
