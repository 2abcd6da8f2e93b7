//! Per-page document statistics

use crate::index::TermId;
use crate::urls::NormalUrl;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrence statistics for one word within one page.
///
/// `tf` and `tf_idf` are caches filled exactly once during the index build's
/// priming stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTerm {
    term: TermId,
    count: u32,
    tf: Option<f64>,
    tf_idf: Option<f64>,
}

impl PageTerm {
    fn new(term: TermId) -> Self {
        Self {
            term,
            count: 1,
            tf: None,
            tf_idf: None,
        }
    }

    pub fn term_id(&self) -> TermId {
        self.term
    }

    /// Times the word appears in the page
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Cached term frequency; primed during index build
    pub fn tf(&self) -> f64 {
        self.tf.unwrap_or(0.0)
    }

    /// Cached TF-IDF; primed during index build
    pub fn tf_idf(&self) -> f64 {
        self.tf_idf.unwrap_or(0.0)
    }

    /// Compute and cache `tf = count / doc_size` and
    /// `tf_idf = log2(1 + tf) * idf`.
    fn prime(&mut self, doc_size: usize, idf: f64) {
        if self.tf.is_none() {
            self.tf = Some(self.count as f64 / doc_size as f64);
        }
        if self.tf_idf.is_none() {
            self.tf_idf = Some((1.0 + self.tf()).log2() * idf);
        }
    }
}

/// A crawled page after indexing: title, term statistics, link sets, rank.
///
/// Identity is the URL. Pages are immutable once the index build completes,
/// except that `page_rank` is written exactly once by the ranking stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedPage {
    url: NormalUrl,
    title: String,
    size: usize,
    terms: HashMap<String, PageTerm>,
    outlinks: Vec<NormalUrl>,
    inlinks: Vec<NormalUrl>,
    page_rank: f64,
}

impl IndexedPage {
    pub(crate) fn new(url: NormalUrl, title: String, outlinks: Vec<NormalUrl>) -> Self {
        Self {
            url,
            title,
            size: 0,
            terms: HashMap::new(),
            outlinks,
            inlinks: Vec::new(),
            page_rank: 0.0,
        }
    }

    pub fn url(&self) -> &NormalUrl {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Total token count, duplicates included
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct words on the page
    pub fn unique_words(&self) -> usize {
        self.terms.len()
    }

    /// All outbound links, including links to pages that never made it into
    /// the index
    pub fn outlinks(&self) -> &[NormalUrl] {
        &self.outlinks
    }

    /// Indexed pages that link here
    pub fn inlinks(&self) -> &[NormalUrl] {
        &self.inlinks
    }

    pub fn page_rank(&self) -> f64 {
        self.page_rank
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.terms.contains_key(word)
    }

    pub fn term(&self, word: &str) -> Option<&PageTerm> {
        self.terms.get(word)
    }

    /// TF of `word` in this page, 0 when the word is absent
    pub fn tf(&self, word: &str) -> f64 {
        self.terms.get(word).map(PageTerm::tf).unwrap_or(0.0)
    }

    /// TF-IDF of `word` in this page, 0 when the word is absent
    pub fn tf_idf(&self, word: &str) -> f64 {
        self.terms.get(word).map(PageTerm::tf_idf).unwrap_or(0.0)
    }

    pub fn links_to(&self, url: &NormalUrl) -> bool {
        self.outlinks.contains(url)
    }

    /// Record one occurrence of `word`, bumping the page size.
    ///
    /// Returns `true` when this is the word's first appearance on the page;
    /// the caller must then register the word with [`insert_term`].
    ///
    /// [`insert_term`]: IndexedPage::insert_term
    pub(crate) fn record_occurrence(&mut self, word: &str) -> bool {
        self.size += 1;
        match self.terms.get_mut(word) {
            Some(stat) => {
                stat.count += 1;
                false
            }
            None => true,
        }
    }

    pub(crate) fn insert_term(&mut self, word: String, term: TermId) {
        self.terms.insert(word, PageTerm::new(term));
    }

    pub(crate) fn add_inlink(&mut self, url: NormalUrl) {
        if !self.inlinks.contains(&url) {
            self.inlinks.push(url);
        }
    }

    pub(crate) fn set_page_rank(&mut self, rank: f64) {
        self.page_rank = rank;
    }

    /// Prime every term's tf/tf_idf cache. `idf_of` resolves a term id to its
    /// (already primed) global IDF.
    pub(crate) fn prime_statistics(&mut self, idf_of: impl Fn(TermId) -> f64) {
        let size = self.size;
        for stat in self.terms.values_mut() {
            stat.prime(size, idf_of(stat.term));
        }
    }
}
