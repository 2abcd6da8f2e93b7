//! Query scoring
//!
//! A search query is modelled as an ephemeral document: it has term
//! statistics like an indexed page does, but owns no global entries, has no
//! URL, and is discarded after a single search. Pages are scored by cosine
//! similarity between the query's and the page's TF-IDF vectors, restricted
//! to the query's term universe.

use crate::index::{Index, IndexedPage};
use crate::index::tokenizer::tokenize;

#[derive(Debug, Clone)]
struct QueryTerm {
    word: String,
    count: u32,
    tf_idf: f64,
}

/// Ephemeral term-vector view of a query string
#[derive(Debug, Clone)]
pub struct QueryDoc {
    /// Total query tokens, including ones the index has never seen.
    /// Unknown tokens carry no term entry but still dilute every term
    /// frequency through this denominator.
    size: usize,
    terms: Vec<QueryTerm>,
}

impl QueryDoc {
    /// Tokenise `query` and attach statistics for every token the index
    /// knows. Unknown tokens contribute nothing beyond the document size.
    pub fn new(index: &Index, query: &str) -> QueryDoc {
        let tokens = tokenize(query);
        let size = tokens.len();

        let mut terms: Vec<QueryTerm> = Vec::new();
        for token in tokens {
            if let Some(existing) = terms.iter_mut().find(|t| t.word == token) {
                existing.count += 1;
            } else if index.knows_word(&token) {
                terms.push(QueryTerm {
                    word: token,
                    count: 1,
                    tf_idf: 0.0,
                });
            }
        }

        let mut doc = QueryDoc { size, terms };
        for term in &mut doc.terms {
            let tf = term.count as f64 / doc.size as f64;
            term.tf_idf = (1.0 + tf).log2() * index.idf(&term.word);
        }
        doc
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn tf_idf(&self, word: &str) -> f64 {
        self.terms
            .iter()
            .find(|t| t.word == word)
            .map(|t| t.tf_idf)
            .unwrap_or(0.0)
    }
}

/// Cosine similarity between a query and an indexed page.
///
/// Both denominator sums range over the query's terms only; the page-side
/// sum is further restricted to terms the page actually contains. A zero
/// factor on either side means no similarity.
pub fn cosine_similarity(query: &QueryDoc, page: &IndexedPage) -> f64 {
    let mut dot = 0.0;
    let mut query_sq = 0.0;
    let mut page_sq = 0.0;

    for term in &query.terms {
        query_sq += term.tf_idf * term.tf_idf;
        if let Some(stat) = page.term(&term.word) {
            let weight = stat.tf_idf();
            dot += term.tf_idf * weight;
            page_sq += weight * weight;
        }
    }

    if query_sq == 0.0 || page_sq == 0.0 {
        return 0.0;
    }
    dot / (page_sq.sqrt() * query_sq.sqrt())
}
