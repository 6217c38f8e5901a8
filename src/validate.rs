//! Decide which search result, if any, is the card being imported.
//!
//! Results sit on a grid in one row. Up to three matches are accepted as long
//! as they are evenly spaced along that row; the last one is the newest print.

use crate::ledger::SkipReason;
use decklist_cv::MatchPoint;

/// More matches than this means the query was too broad.
pub const MAX_MATCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept(MatchPoint),
    Reject(SkipReason),
}

/// Classify match points sorted by y, then x.
pub fn classify_matches(points: &[MatchPoint]) -> Verdict {
    let Some(&last) = points.last() else {
        return Verdict::Reject(SkipReason::NoMatches);
    };
    if points.len() > MAX_MATCHES {
        return Verdict::Reject(SkipReason::TooManyMatches);
    }

    let deltas: Vec<i64> = points
        .windows(2)
        .map(|pair| pair[1].x as i64 - pair[0].x as i64)
        .collect();
    if deltas.windows(2).any(|pair| pair[0] != pair[1]) {
        return Verdict::Reject(SkipReason::XCoordinateAnomaly);
    }

    if points.iter().any(|point| point.y != last.y) {
        return Verdict::Reject(SkipReason::YCoordinateAnomaly);
    }

    Verdict::Accept(last)
}
