//! The inverted index
//!
//! The [`Index`] is the nexus of all page and word data: a page arena keyed
//! by canonical URL and a term arena keyed by word, with cross-references
//! stored as integer ids so the cyclic page↔term and page↔page relationships
//! never turn into ownership cycles. Both arenas preserve insertion order —
//! pages in first-successful-fetch order, a word's page set in first-indexing
//! order — because PageRank and iteration results are observable functions of
//! those orders.
//!
//! Building runs four stages in order: parse every fetched page, prime the
//! tf/idf/tf-idf caches, wire reciprocal in-links, then crunch PageRanks.
//! After build the index is read-only.

pub mod page;
pub mod term;
pub mod tokenizer;

pub use page::{IndexedPage, PageTerm};
pub use term::GlobalTerm;

use crate::crawl::extractor;
use crate::crawl::FetchedPage;
use crate::progress::{CrawlStage, ProgressListener};
use crate::rank;
use crate::urls::NormalUrl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use self::tokenizer::tokenize;

/// Handle to a page in the index's page arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub(crate) usize);

/// Handle to a word in the index's term arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermId(pub(crate) usize);

/// Summary counters for a completed crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub seed_url: String,
    pub crawl_time: DateTime<Utc>,
    pub total_docs: usize,
    pub total_words: usize,
}

/// In-memory inverted index over a crawled web subgraph
#[derive(Debug, Serialize, Deserialize)]
pub struct Index {
    seed_url: String,
    crawl_time: DateTime<Utc>,
    pages: Vec<IndexedPage>,
    page_ids: HashMap<NormalUrl, PageId>,
    words: Vec<GlobalTerm>,
    word_ids: HashMap<String, TermId>,
}

impl Index {
    /// Build an index from crawler output.
    pub fn build(seed_url: &str, fetched: Vec<FetchedPage>) -> Index {
        Self::build_with_progress(seed_url, fetched, None)
    }

    /// Build an index from crawler output, reporting stage transitions.
    pub fn build_with_progress(
        seed_url: &str,
        fetched: Vec<FetchedPage>,
        listener: Option<&dyn ProgressListener>,
    ) -> Index {
        let mut index = Index {
            seed_url: seed_url.to_string(),
            crawl_time: Utc::now(),
            pages: Vec::new(),
            page_ids: HashMap::new(),
            words: Vec::new(),
            word_ids: HashMap::new(),
        };

        notify(listener, CrawlStage::Parsing);
        for page in fetched {
            index.insert_page(page);
        }
        index.prime_statistics();

        notify(listener, CrawlStage::Linking);
        index.wire_inlinks();

        notify(listener, CrawlStage::Ranking);
        index.assign_ranks();

        notify(listener, CrawlStage::Done);
        index
    }

    /// Parse one fetched page into the index. Duplicate URLs are ignored.
    fn insert_page(&mut self, fetched: FetchedPage) {
        if self.page_ids.contains_key(&fetched.url) {
            return;
        }
        let page_id = PageId(self.pages.len());

        let title = extractor::extract_title(&fetched.raw_text);
        let tokens = tokenize(&extractor::extract_paragraphs(&fetched.raw_text));

        let mut page = IndexedPage::new(fetched.url.clone(), title, fetched.outlinks);
        for token in tokens {
            if page.record_occurrence(&token) {
                let term_id = self.intern(&token);
                self.words[term_id.0].add_page(page_id);
                page.insert_term(token, term_id);
            }
        }

        self.page_ids.insert(fetched.url, page_id);
        self.pages.push(page);
    }

    /// Look up or create the global entry for `word`.
    fn intern(&mut self, word: &str) -> TermId {
        if let Some(&id) = self.word_ids.get(word) {
            return id;
        }
        let id = TermId(self.words.len());
        self.words.push(GlobalTerm::new(word.to_string()));
        self.word_ids.insert(word.to_string(), id);
        id
    }

    /// Fill every idf/tf/tf-idf cache. Totals are final once parsing is done,
    /// so each value is computed exactly once here and never again.
    fn prime_statistics(&mut self) {
        let total_docs = self.pages.len();
        for word in &mut self.words {
            word.prime_idf(total_docs);
        }
        let words = &self.words;
        for page in &mut self.pages {
            page.prime_statistics(|term| words[term.0].idf());
        }
    }

    /// For every indexed link target, record the reciprocal in-link.
    /// Outlinks pointing outside the index stay in the source page's outlink
    /// set but produce no in-link anywhere.
    fn wire_inlinks(&mut self) {
        for i in 0..self.pages.len() {
            let from = self.pages[i].url().clone();
            let targets: Vec<PageId> = self.pages[i]
                .outlinks()
                .iter()
                .filter_map(|url| self.page_ids.get(url).copied())
                .collect();
            for target in targets {
                self.pages[target.0].add_inlink(from.clone());
            }
        }
    }

    /// Run PageRank over the indexed link graph and write each page's rank.
    fn assign_ranks(&mut self) {
        let adjacency: Vec<Vec<usize>> = self
            .pages
            .iter()
            .map(|page| {
                page.outlinks()
                    .iter()
                    .filter_map(|url| self.page_ids.get(url).map(|id| id.0))
                    .collect()
            })
            .collect();

        let ranks = rank::compute(&adjacency, rank::ALPHA, rank::CONVERGENCE);
        for (page, rank) in self.pages.iter_mut().zip(ranks) {
            page.set_page_rank(rank);
        }
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    pub fn crawl_time(&self) -> DateTime<Utc> {
        self.crawl_time
    }

    /// Number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.pages.len()
    }

    /// Number of distinct words across the whole index
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            seed_url: self.seed_url.clone(),
            crawl_time: self.crawl_time,
            total_docs: self.total_docs(),
            total_words: self.total_words(),
        }
    }

    /// Pages in first-successful-fetch order
    pub fn pages(&self) -> impl Iterator<Item = &IndexedPage> {
        self.pages.iter()
    }

    pub fn page(&self, url: &NormalUrl) -> Option<&IndexedPage> {
        self.page_ids.get(url).map(|id| &self.pages[id.0])
    }

    pub fn knows_word(&self, word: &str) -> bool {
        self.word_ids.contains_key(word)
    }

    pub fn word(&self, word: &str) -> Option<&GlobalTerm> {
        self.word_ids.get(word).map(|id| &self.words[id.0])
    }

    /// How many documents contain `word`; 0 for unknown words
    pub fn doc_occurrence(&self, word: &str) -> usize {
        self.word(word).map(GlobalTerm::doc_occurrence).unwrap_or(0)
    }

    /// IDF of `word`; 0 for unknown words
    pub fn idf(&self, word: &str) -> f64 {
        self.word(word).map(GlobalTerm::idf).unwrap_or(0.0)
    }

    /// TF of `word` in the page at `url`; 0 for unknown pages or absent words
    pub fn tf(&self, url: &NormalUrl, word: &str) -> f64 {
        self.page(url).map(|p| p.tf(word)).unwrap_or(0.0)
    }

    /// TF-IDF of `word` in the page at `url`; 0 unless both the page is
    /// indexed and the word is globally known
    pub fn tf_idf(&self, url: &NormalUrl, word: &str) -> f64 {
        if !self.knows_word(word) {
            return 0.0;
        }
        self.page(url).map(|p| p.tf_idf(word)).unwrap_or(0.0)
    }

    /// PageRank of the page at `url`, or −1 for unknown pages
    pub fn page_rank(&self, url: &NormalUrl) -> f64 {
        self.page(url).map(IndexedPage::page_rank).unwrap_or(-1.0)
    }

    /// All outbound links of the page at `url` (indexed or not), or `None`
    /// for unknown pages
    pub fn outgoing_links(&self, url: &NormalUrl) -> Option<Vec<String>> {
        self.page(url)
            .map(|p| p.outlinks().iter().map(|u| u.to_string()).collect())
    }

    /// All indexed pages linking to `url`, or `None` for unknown pages
    pub fn incoming_links(&self, url: &NormalUrl) -> Option<Vec<String>> {
        self.page(url)
            .map(|p| p.inlinks().iter().map(|u| u.to_string()).collect())
    }
}

fn notify(listener: Option<&dyn ProgressListener>, stage: CrawlStage) {
    if let Some(listener) = listener {
        listener.update(stage, 0, 0);
    }
}
