//! Breadth-first crawler
//!
//! Starting from a seed URL, the crawler walks the link graph in BFS order:
//! a FIFO frontier of normalised URLs, a seen-set populated at enqueue time
//! (so a URL discovered twice is only ever queued once, even while it is
//! still in flight), and a per-URL failure budget. A URL that keeps failing
//! is admitted to the output in its blank state so that links pointing at it
//! from other pages stay resolvable during index build.
//!
//! Pages enter the output in the order their fetches completed. That order is
//! observable downstream (PageRank depends on page enumeration), so fetches
//! are awaited one at a time.

use crate::crawl::extractor;
use crate::crawl::fetcher::Fetch;
use crate::progress::{CrawlStage, ProgressListener};
use crate::urls::NormalUrl;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{info, warn};

/// How many page visits between progress reports
pub const REPORT_INTERVAL: usize = 10;

/// A crawled page that has not yet been indexed
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Canonical URL the page was fetched from
    pub url: NormalUrl,
    /// Raw document text (empty for pages admitted after fetch failures)
    pub raw_text: String,
    /// Resolved outbound links, deduplicated, in document order
    pub outlinks: Vec<NormalUrl>,
}

impl FetchedPage {
    /// Build a page from raw HTML, extracting and resolving its outlinks.
    pub fn from_html(url: NormalUrl, raw_text: String) -> Self {
        let mut outlinks: Vec<NormalUrl> = Vec::new();
        for href in extractor::extract_hrefs(&raw_text) {
            let resolved = url.resolve(&href);
            if !outlinks.contains(&resolved) {
                outlinks.push(resolved);
            }
        }
        Self {
            url,
            raw_text,
            outlinks,
        }
    }

    /// A page that could not be fetched: no text, no outlinks.
    pub fn blank(url: NormalUrl) -> Self {
        Self {
            url,
            raw_text: String::new(),
            outlinks: Vec::new(),
        }
    }
}

/// BFS crawler over the hyperlink graph
pub struct Crawler {
    /// Maximum pages to visit; 0 means unlimited
    page_cap: usize,
    /// How many times a failing URL is re-queued before being given up on
    max_retries: u32,
}

impl Crawler {
    pub fn new(page_cap: usize, max_retries: u32) -> Self {
        Self {
            page_cap,
            max_retries,
        }
    }

    /// Crawl from `seed`, returning pages in fetch-completion order.
    pub async fn run<F: Fetch>(
        &self,
        seed: &NormalUrl,
        fetcher: &F,
        progress: Option<&dyn ProgressListener>,
    ) -> Vec<FetchedPage> {
        let mut frontier: VecDeque<NormalUrl> = VecDeque::new();
        let mut seen: HashSet<NormalUrl> = HashSet::new();
        let mut fetched: Vec<FetchedPage> = Vec::new();
        let mut failures: HashMap<NormalUrl, u32> = HashMap::new();
        let mut visited = 0usize;

        frontier.push_back(seed.clone());
        seen.insert(seed.clone());

        while self.page_cap == 0 || visited < self.page_cap {
            let Some(url) = frontier.pop_front() else {
                break;
            };

            match fetcher.fetch(&url).await {
                Ok(body) => {
                    visited += 1;
                    let page = FetchedPage::from_html(url, body);
                    for link in &page.outlinks {
                        if seen.insert(link.clone()) {
                            frontier.push_back(link.clone());
                        }
                    }
                    fetched.push(page);

                    if visited % REPORT_INTERVAL == 0 {
                        info!(visited, queued = frontier.len(), "crawl progress");
                        if let Some(listener) = progress {
                            listener.update(CrawlStage::Retrieving, visited, frontier.len());
                        }
                    }
                }
                Err(err) => {
                    let count = failures.entry(url.clone()).or_insert(0);
                    if *count < self.max_retries {
                        // Back to the tail of the queue for another try.
                        *count += 1;
                        frontier.push_back(url);
                    } else {
                        warn!(url = %url, %err, "giving up after {} retries", self.max_retries);
                        fetched.push(FetchedPage::blank(url));
                    }
                }
            }
        }

        info!(visited, "crawl finished");
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fetcher::FetchError;
    use std::sync::Mutex;

    struct StaticSite {
        pages: HashMap<String, String>,
        attempts: Mutex<HashMap<String, u32>>,
        /// URLs that fail this many times before succeeding
        flaky: HashMap<String, u32>,
    }

    impl StaticSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                attempts: Mutex::new(HashMap::new()),
                flaky: HashMap::new(),
            }
        }

        fn with_flaky(mut self, url: &str, failures: u32) -> Self {
            self.flaky.insert(url.to_string(), failures);
            self
        }

        fn attempts_for(&self, url: &str) -> u32 {
            self.attempts
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or(0)
        }
    }

    impl Fetch for StaticSite {
        async fn fetch(&self, url: &NormalUrl) -> Result<String, FetchError> {
            let key = url.to_string();
            let attempt = {
                let mut attempts = self.attempts.lock().unwrap();
                let entry = attempts.entry(key.clone()).or_insert(0);
                *entry += 1;
                *entry
            };

            if let Some(&failures) = self.flaky.get(&key) {
                if attempt <= failures {
                    return Err(FetchError::Io(std::io::Error::other("flaky")));
                }
            }

            self.pages.get(&key).cloned().ok_or_else(|| {
                FetchError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, key))
            })
        }
    }

    fn url(s: &str) -> NormalUrl {
        NormalUrl::parse(s).unwrap()
    }

    fn crawl_urls(pages: &[FetchedPage]) -> Vec<String> {
        pages.iter().map(|p| p.url.to_string()).collect()
    }

    #[tokio::test]
    async fn visits_in_breadth_first_order() {
        let site = StaticSite::new(&[
            (
                "http://s.test/root.html",
                r#"<a href="./a.html">a</a> <a href="./b.html">b</a>"#,
            ),
            (
                "http://s.test/a.html",
                r#"<a href="./c.html">c</a> <a href="./b.html">b again</a>"#,
            ),
            ("http://s.test/b.html", "no links"),
            ("http://s.test/c.html", "no links"),
        ]);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/root.html"), &site, None).await;

        assert_eq!(
            crawl_urls(&pages),
            vec![
                "http://s.test/root.html",
                "http://s.test/a.html",
                "http://s.test/b.html",
                "http://s.test/c.html",
            ]
        );
    }

    #[tokio::test]
    async fn seen_urls_are_fetched_once() {
        let site = StaticSite::new(&[
            ("http://s.test/x.html", r#"<a href="./y.html">y</a>"#),
            ("http://s.test/y.html", r#"<a href="./x.html">x</a>"#),
        ]);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/x.html"), &site, None).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(site.attempts_for("http://s.test/x.html"), 1);
        assert_eq!(site.attempts_for("http://s.test/y.html"), 1);
    }

    #[tokio::test]
    async fn duplicate_links_on_one_page_queue_once() {
        let site = StaticSite::new(&[
            (
                "http://s.test/root.html",
                r#"<a href="./a.html">1</a> <a href="./a.html">2</a>"#,
            ),
            ("http://s.test/a.html", "leaf"),
        ]);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/root.html"), &site, None).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(site.attempts_for("http://s.test/a.html"), 1);
    }

    #[tokio::test]
    async fn page_cap_bounds_the_crawl() {
        let site = StaticSite::new(&[
            ("http://s.test/1.html", r#"<a href="./2.html">n</a>"#),
            ("http://s.test/2.html", r#"<a href="./3.html">n</a>"#),
            ("http://s.test/3.html", r#"<a href="./4.html">n</a>"#),
            ("http://s.test/4.html", "end"),
        ]);

        let crawler = Crawler::new(2, 3);
        let pages = crawler.run(&url("http://s.test/1.html"), &site, None).await;

        assert_eq!(
            crawl_urls(&pages),
            vec!["http://s.test/1.html", "http://s.test/2.html"]
        );
    }

    #[tokio::test]
    async fn unreachable_page_is_admitted_blank_after_retries() {
        let site = StaticSite::new(&[(
            "http://s.test/root.html",
            r#"<p>alpha</p><a href="./gone.html">gone</a>"#,
        )]);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/root.html"), &site, None).await;

        assert_eq!(pages.len(), 2);
        let blank = &pages[1];
        assert_eq!(blank.url.to_string(), "http://s.test/gone.html");
        assert!(blank.raw_text.is_empty());
        assert!(blank.outlinks.is_empty());
        // Initial attempt plus max_retries re-queues.
        assert_eq!(site.attempts_for("http://s.test/gone.html"), 4);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_to_success() {
        let site = StaticSite::new(&[
            ("http://s.test/root.html", r#"<a href="./slow.html">s</a>"#),
            ("http://s.test/slow.html", "<p>finally</p>"),
        ])
        .with_flaky("http://s.test/slow.html", 2);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/root.html"), &site, None).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].raw_text, "<p>finally</p>");
        assert_eq!(site.attempts_for("http://s.test/slow.html"), 3);
    }

    #[tokio::test]
    async fn unrecognised_href_shapes_resolve_to_the_page_itself() {
        // mailto: and bare links resolve to the page's own URL, which is
        // already seen, so nothing new is queued.
        let site = StaticSite::new(&[(
            "http://s.test/root.html",
            r#"<a href="mailto:a@b.c">m</a> <a href="bare.html">b</a>"#,
        )]);

        let crawler = Crawler::new(0, 3);
        let pages = crawler.run(&url("http://s.test/root.html"), &site, None).await;

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].outlinks, vec![url("http://s.test/root.html")]);
    }
}
