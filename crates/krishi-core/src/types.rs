//! Shared domain types: the agricultural season calendar and the canonical
//! month vocabulary used by slot extraction and the model codecs.

use serde::{Deserialize, Serialize};

/// Canonical lowercase month labels, in calendar order.
///
/// This is the fixed vocabulary the month codec falls back to when no
/// artifact overrides it, and the list slot extraction matches against.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Agricultural season, derived from the month.
///
/// Season is never set independently: it is always computed from a month
/// label via [`season_for_month`], so a month stored in session memory and
/// its season can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Monsoon,
    Winter,
    Summer,
}

impl Season {
    /// All seasons, in the codec's canonical order.
    pub const ALL: [Season; 3] = [Season::Monsoon, Season::Winter, Season::Summer];

    /// Lowercase label, matching the season codec vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Monsoon => "monsoon",
            Season::Winter => "winter",
            Season::Summer => "summer",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a month label to its season.
///
/// Case-insensitive. Calendar buckets: June-September is monsoon,
/// October-February is winter, March-May is summer. Returns `None` for
/// anything that is not a month name.
pub fn season_for_month(month: &str) -> Option<Season> {
    match month.to_lowercase().as_str() {
        "june" | "july" | "august" | "september" => Some(Season::Monsoon),
        "october" | "november" | "december" | "january" | "february" => Some(Season::Winter),
        "march" | "april" | "may" => Some(Season::Summer),
        _ => None,
    }
}
