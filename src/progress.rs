//! Advisory crawl-progress reporting
//!
//! The engine tells a listener which stage a crawl is in; listeners must not
//! influence the crawl. This is a convenience for front-ends, not part of the
//! engine's correctness contract.

/// Stages of a crawl-and-index run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStage {
    /// Visiting pages over the network
    Retrieving,
    /// Parsing fetched pages into the index
    Parsing,
    /// Wiring reciprocal in-links
    Linking,
    /// Crunching PageRanks
    Ranking,
    /// Index is ready
    Done,
}

/// Observer for crawl progress
pub trait ProgressListener {
    /// Called at stage boundaries and periodically while retrieving.
    /// `done`/`pending` are page counts where the stage has them, else 0.
    fn update(&self, stage: CrawlStage, done: usize, pending: usize);
}
