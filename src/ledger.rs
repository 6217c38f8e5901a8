use std::fmt;

/// Why a card was left out of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SearchFieldNotFound,
    NoMatches,
    TooManyMatches,
    XCoordinateAnomaly,
    YCoordinateAnomaly,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::SearchFieldNotFound => "search field not found",
            SkipReason::NoMatches => "no matches from the search query",
            SkipReason::TooManyMatches => "too many matches",
            SkipReason::XCoordinateAnomaly => "x-coordinate anomaly",
            SkipReason::YCoordinateAnomaly => "y-coordinate anomaly",
        };
        f.write_str(reason)
    }
}

/// Cards that could not be added, in the order they failed.
///
/// A name appears once; failing again keeps its position and takes the newer
/// reason.
#[derive(Debug, Clone, Default)]
pub struct FailureLedger {
    entries: Vec<(String, SkipReason)>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, reason: SkipReason) {
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = reason,
            None => self.entries.push((name.to_string(), reason)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SkipReason)> {
        self.entries.iter().map(|(name, reason)| (name.as_str(), *reason))
    }
}
