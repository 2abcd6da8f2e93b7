//! Query evaluation over the index
//!
//! Components:
//! - `scorer`: ephemeral query documents and cosine similarity
//! - `results`: result types and the (rounded score desc, title asc) order

pub mod results;
pub mod scorer;

pub use results::{SearchResult, SearchResultDetail};
pub use scorer::{cosine_similarity, QueryDoc};

use crate::index::Index;

/// Score every indexed page against `query` and return the full ordered list.
///
/// With `boost` set, each cosine similarity is multiplied by the page's
/// PageRank before ordering.
pub fn search(index: &Index, query: &str, boost: bool) -> Vec<SearchResultDetail> {
    let query_doc = QueryDoc::new(index, query);

    let mut scored: Vec<SearchResultDetail> = index
        .pages()
        .map(|page| {
            let similarity = cosine_similarity(&query_doc, page);
            let score = if boost {
                similarity * page.page_rank()
            } else {
                similarity
            };
            SearchResultDetail {
                title: page.title().to_string(),
                url: page.url().to_string(),
                score,
                page_rank: page.page_rank(),
                boosted: boost,
            }
        })
        .collect();

    scored.sort_by(results::result_order);
    scored
}

/// Like [`search`], capped to the best `k` results.
pub fn search_top(index: &Index, query: &str, boost: bool, k: usize) -> Vec<SearchResultDetail> {
    let mut scored = search(index, query, boost);
    scored.truncate(k);
    scored
}
