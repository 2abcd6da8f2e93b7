//! Crawling subsystem: fetch, extract, walk the link graph
//!
//! Components:
//! - `fetcher`: the [`Fetch`] contract and its reqwest implementation
//! - `extractor`: fixed tag-shaped regex extraction of title/text/hrefs
//! - `crawler`: breadth-first traversal with retry budget and page cap

pub mod crawler;
pub mod extractor;
pub mod fetcher;

pub use crawler::{Crawler, FetchedPage};
pub use fetcher::{Fetch, FetchConfig, FetchError, HttpFetcher};
