//! Foreign-friendliness heuristic.
//!
//! An event counts as approachable without Korean-language fluency when any
//! rule in [`FOREIGN_FRIENDLY_RULES`] matches. Rules are evaluated in table
//! order and evaluation stops at the first match, so the table order is part
//! of the behaviour (it decides which [`Signal`] is reported).

use crate::event::EventRecord;

/// Record attribute a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Theme,
    Title,
    Fee,
    Venue,
}

impl Field {
    fn read(self, record: &EventRecord) -> &str {
        match self {
            Self::Category => record.category(),
            Self::Theme => record.theme(),
            Self::Title => record.title(),
            Self::Fee => record.fee(),
            Self::Venue => record.venue(),
        }
    }
}

/// Why a record was classified as foreign-friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Music, classical, theatre or children's programming.
    Genre,
    /// Title mentions a widely known brand or a soundtrack concert.
    FamiliarTitle,
    /// All-seats pricing or an arts venue.
    PricingOrVenue,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub signal: Signal,
    pub field: Field,
    /// Substrings to look for. Stored lower-case when `fold_case` is set.
    pub keywords: &'static [&'static str],
    pub fold_case: bool,
}

impl Rule {
    pub fn matches(&self, record: &EventRecord) -> bool {
        let text = self.field.read(record);
        if text.is_empty() {
            return false;
        }
        if self.fold_case {
            let text = text.to_lowercase();
            self.keywords.iter().any(|k| text.contains(k))
        } else {
            self.keywords.iter().any(|k| text.contains(k))
        }
    }
}

pub const FOREIGN_FRIENDLY_RULES: &[Rule] = &[
    Rule {
        signal: Signal::Genre,
        field: Field::Category,
        // classical, music, theatre
        keywords: &["클래식", "뮤직", "연극"],
        fold_case: true,
    },
    Rule {
        signal: Signal::Genre,
        field: Field::Theme,
        // children
        keywords: &["어린이"],
        fold_case: true,
    },
    Rule {
        signal: Signal::FamiliarTitle,
        field: Field::Title,
        keywords: &["gibli", "ghibli", "disney", "ost"],
        fold_case: true,
    },
    Rule {
        signal: Signal::PricingOrVenue,
        field: Field::Fee,
        // "all seats"
        keywords: &["전석"],
        fold_case: false,
    },
    Rule {
        signal: Signal::PricingOrVenue,
        field: Field::Venue,
        keywords: &["art"],
        fold_case: true,
    },
];

/// First rule in table order that matches `record`.
pub fn matching_rule(record: &EventRecord) -> Option<&'static Rule> {
    FOREIGN_FRIENDLY_RULES.iter().find(|rule| rule.matches(record))
}

pub fn is_foreign_friendly(record: &EventRecord) -> bool {
    matching_rule(record).is_some()
}
