use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One public-event listing as delivered by the events endpoint.
///
/// Field names follow the upstream open-data feed (upper-case keys). Every
/// attribute is optional; numeric values are kept in their textual form so a
/// feed that sends `"LAT": 37.5` and one that sends `"LAT": "37.5"` decode to
/// the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Category code, e.g. "클래식" or "뮤지컬/오페라".
    #[serde(rename = "CODENAME", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// District (gu) name.
    #[serde(rename = "GUNAME", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(rename = "TITLE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `"YYYY-MM-DD~YYYY-MM-DD"` or a single date.
    #[serde(rename = "DATE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "PLACE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(rename = "ORG_NAME", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(rename = "USE_TRGT", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(rename = "USE_FEE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(rename = "INQUIRY", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub inquiry: Option<String>,
    #[serde(rename = "MAIN_IMG", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "RGSTDATE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub registered_on: Option<String>,
    #[serde(rename = "STRTDATE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<String>,
    #[serde(rename = "END_DATE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<String>,
    #[serde(rename = "THEMECODE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(rename = "LOT", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(rename = "LAT", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    /// Free-admission flag as text ("무료" / "유료").
    #[serde(rename = "IS_FREE", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub is_free: Option<String>,
    #[serde(rename = "HMPG_ADDR", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(rename = "PRO_TIME", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl EventRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn venue(&self) -> &str {
        self.venue.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or_default()
    }

    pub fn fee(&self) -> &str {
        self.fee.as_deref().unwrap_or_default()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

// ─── Catalog payload ─────────────────────────────────────────────────────────

/// Response body of the events endpoint after the "parse or keep raw" step.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Json(Value),
    /// The body was not valid JSON; the raw text is retained.
    Text(String),
}

impl CatalogPayload {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw),
        }
    }

    /// Extract the record list: either a bare array or `{"data": [...]}`.
    /// Any other JSON shape yields an empty list.
    pub fn into_records(self) -> Result<Vec<EventRecord>, PayloadError> {
        let items = match self {
            Self::Text(raw) => return Err(PayloadError::NotJson { len: raw.len() }),
            Self::Json(Value::Array(items)) => items,
            Self::Json(Value::Object(mut map)) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Self::Json(_) => Vec::new(),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|source| PayloadError::InvalidRecord { index, source })
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("response body is not JSON ({len} bytes)")]
    NotJson { len: usize },
    #[error("record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
    },
}
