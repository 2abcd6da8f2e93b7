//! Search results and their total order

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Decimal places a score is rounded to when results are compared
pub const SCORE_PRECISION: usize = 3;

/// Minimal view of a search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub score: f64,
}

/// Full view of a search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultDetail {
    pub title: String,
    pub url: String,
    pub score: f64,
    pub page_rank: f64,
    /// Whether the score was multiplied by PageRank
    pub boosted: bool,
}

impl SearchResultDetail {
    pub fn brief(&self) -> SearchResult {
        SearchResult {
            title: self.title.clone(),
            score: self.score,
        }
    }
}

/// Total order over results: rounded score descending, then title ascending.
///
/// Scores are compared after formatting to [`SCORE_PRECISION`] decimal
/// places, so two scores differing only beyond the third decimal tie and
/// fall through to the title comparison. This rounding is part of the
/// ranking contract, not a presentation detail.
pub fn result_order(a: &SearchResultDetail, b: &SearchResultDetail) -> Ordering {
    let a_score = format!("{:.*}", SCORE_PRECISION, a.score);
    let b_score = format!("{:.*}", SCORE_PRECISION, b.score);
    b_score
        .cmp(&a_score)
        .then_with(|| a.title.cmp(&b.title))
}
