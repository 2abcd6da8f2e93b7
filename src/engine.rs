//! The engine facade
//!
//! An [`Engine`] owns the configuration and at most one [`Index`]. A crawl
//! replaces the index wholesale; queries borrow it read-only. Lookups on
//! unknown URLs or words never fail — they return the defined sentinels
//! (0 for statistics, −1 for PageRank, `None` for link lists) so callers get
//! best-effort answers without partial-failure handling.

use crate::config::Config;
use crate::crawl::{Crawler, Fetch, FetchConfig, HttpFetcher};
use crate::index::{Index, IndexStats};
use crate::progress::{CrawlStage, ProgressListener};
use crate::search::{self, SearchResult, SearchResultDetail};
use crate::storage;
use crate::urls::NormalUrl;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Keyword search engine over a crawled web subgraph
pub struct Engine {
    config: Config,
    index: Option<Index>,
}

impl Engine {
    pub fn new(config: Config) -> Engine {
        Engine {
            config,
            index: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.storage.data_dir.join(storage::SNAPSHOT_FILE)
    }

    /// Reset to a fresh state: drop the in-memory index and delete every
    /// persisted snapshot, creating the data directory when missing.
    pub fn initialize(&mut self) -> Result<()> {
        self.index = None;
        storage::clean_data_dir(&self.config.storage.data_dir)
    }

    /// Crawl from `seed` over HTTP and replace the in-memory index.
    pub async fn crawl(&mut self, seed: &str) -> Result<()> {
        self.crawl_with_progress(seed, None).await
    }

    /// Crawl from `seed` over HTTP, reporting stage transitions.
    pub async fn crawl_with_progress(
        &mut self,
        seed: &str,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<()> {
        let fetcher = HttpFetcher::new(&FetchConfig {
            user_agent: self.config.crawl.user_agent.clone(),
            timeout: Duration::from_secs(self.config.crawl.timeout_secs),
        })?;
        self.crawl_with(seed, &fetcher, listener).await
    }

    /// Crawl from `seed` using the given fetcher, replacing the in-memory
    /// index and persisting the result best-effort.
    pub async fn crawl_with<F: Fetch>(
        &mut self,
        seed: &str,
        fetcher: &F,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<()> {
        let seed_url = NormalUrl::parse(seed).context("invalid seed URL")?;
        info!(seed = %seed_url, "starting crawl");

        if let Some(listener) = listener {
            listener.update(CrawlStage::Retrieving, 0, 0);
        }
        let crawler = Crawler::new(self.config.crawl.page_cap, self.config.crawl.max_retries);
        let fetched = crawler.run(&seed_url, fetcher, listener).await;

        let index = Index::build_with_progress(&seed_url.to_string(), fetched, listener);
        info!(
            docs = index.total_docs(),
            words = index.total_words(),
            "index built"
        );

        if let Err(err) = storage::save_index(&index, &self.snapshot_path()) {
            warn!(%err, "failed to persist crawl snapshot");
        }
        self.index = Some(index);
        Ok(())
    }

    /// Restore the persisted snapshot, if one exists. Returns whether an
    /// index was loaded.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(false);
        }
        self.index = Some(storage::load_index(&path)?);
        Ok(true)
    }

    /// Top-k search returning the minimal result view.
    pub fn search(&self, query: &str, boost: bool, k: usize) -> Vec<SearchResult> {
        self.search_detailed(query, boost, k)
            .iter()
            .map(SearchResultDetail::brief)
            .collect()
    }

    /// Top-k search returning title, url, score, rank, and boost flag.
    pub fn search_detailed(&self, query: &str, boost: bool, k: usize) -> Vec<SearchResultDetail> {
        match &self.index {
            Some(index) => search::search_top(index, query, boost, k),
            None => Vec::new(),
        }
    }

    /// IDF of `word`; 0 when unknown or before any crawl
    pub fn idf(&self, word: &str) -> f64 {
        self.index.as_ref().map_or(0.0, |ix| ix.idf(word))
    }

    /// TF of `word` in the page at `url`; 0 for unknown inputs
    pub fn tf(&self, url: &str, word: &str) -> f64 {
        match (&self.index, NormalUrl::parse(url)) {
            (Some(index), Ok(url)) => index.tf(&url, word),
            _ => 0.0,
        }
    }

    /// TF-IDF of `word` in the page at `url`; 0 for unknown inputs
    pub fn tf_idf(&self, url: &str, word: &str) -> f64 {
        match (&self.index, NormalUrl::parse(url)) {
            (Some(index), Ok(url)) => index.tf_idf(&url, word),
            _ => 0.0,
        }
    }

    /// PageRank of the page at `url`; −1 for unknown inputs
    pub fn page_rank(&self, url: &str) -> f64 {
        match (&self.index, NormalUrl::parse(url)) {
            (Some(index), Ok(url)) => index.page_rank(&url),
            _ => -1.0,
        }
    }

    /// Outbound links of the page at `url`; `None` for unknown inputs
    pub fn outgoing_links(&self, url: &str) -> Option<Vec<String>> {
        let index = self.index.as_ref()?;
        index.outgoing_links(&NormalUrl::parse(url).ok()?)
    }

    /// Indexed pages linking to `url`; `None` for unknown inputs
    pub fn incoming_links(&self, url: &str) -> Option<Vec<String>> {
        let index = self.index.as_ref()?;
        index.incoming_links(&NormalUrl::parse(url).ok()?)
    }

    /// Summary counters of the current index, if any
    pub fn stats(&self) -> Option<IndexStats> {
        self.index.as_ref().map(Index::stats)
    }
}
