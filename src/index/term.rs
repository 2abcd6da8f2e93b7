//! Corpus-wide term statistics

use crate::index::PageId;
use serde::{Deserialize, Serialize};

/// Statistics for one word across the whole index.
///
/// Tracks which pages contain the word (in first-insertion order, which is
/// observable through iteration) and caches the word's inverse document
/// frequency. The cache is filled exactly once, during the index build's
/// priming stage; afterwards the entry is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalTerm {
    word: String,
    pages: Vec<PageId>,
    idf: Option<f64>,
}

impl GlobalTerm {
    pub(crate) fn new(word: String) -> Self {
        Self {
            word,
            pages: Vec::new(),
            idf: None,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Pages containing this word, in the order they were indexed
    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    /// Number of documents the word appears in
    pub fn doc_occurrence(&self) -> usize {
        self.pages.len()
    }

    /// Cached IDF; primed during index build
    pub fn idf(&self) -> f64 {
        self.idf.unwrap_or(0.0)
    }

    pub(crate) fn add_page(&mut self, page: PageId) {
        if !self.pages.contains(&page) {
            self.pages.push(page);
        }
    }

    /// Compute and cache `idf = log2(total_docs / (1 + doc_occurrence))`.
    pub(crate) fn prime_idf(&mut self, total_docs: usize) {
        if self.idf.is_none() {
            let ratio = total_docs as f64 / (1.0 + self.doc_occurrence() as f64);
            self.idf = Some(ratio.log2());
        }
    }
}
