//! Canonical URL representation and hyperlink resolution
//!
//! Every URL the engine touches is normalised into a [`NormalUrl`] with four
//! components: protocol, host, base path, and file name. Two URL strings that
//! differ only in protocol/host case or a trailing host slash normalise to the
//! same value, which is what the crawler's seen-set and the index's page map
//! key on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors from URL normalisation
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// A URL split into protocol, host, base path, and file name.
///
/// Invariants:
/// - `protocol` is `"http://"` or `"https://"`, lower-cased
/// - `host` is lower-cased, no trailing slash; a non-default port is kept
///   as `host:port`
/// - `base_path` begins and ends with `/` (possibly just `"/"`)
/// - `file` contains no `/` and may be empty
///
/// Everything after the final slash of a path is treated as a file name, so
/// `/a/b/fruits` splits into base path `/a/b/` and file `fruits` while
/// `/a/b/fruits/` splits into base path `/a/b/fruits/` and an empty file.
/// Relative links on a slashless page therefore resolve against the parent
/// directory; the rest of the engine relies on this rule, so it is pinned by
/// tests rather than "fixed".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalUrl {
    protocol: String,
    host: String,
    base_path: String,
    file: String,
}

impl NormalUrl {
    /// Parse and canonicalise an absolute http(s) URL.
    pub fn parse(s: &str) -> Result<Self, UrlError> {
        let parsed = Url::parse(s)?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::UnsupportedScheme(scheme.to_string()));
        }
        let protocol = format!("{}://", scheme);

        let mut host = parsed
            .host_str()
            .ok_or(UrlError::MissingHost)?
            .trim_end_matches('/')
            .to_lowercase();
        if let Some(port) = parsed.port() {
            host = format!("{}:{}", host, port);
        }

        // The url crate gives "/" for an empty path, so there is always at
        // least one slash to split on.
        let path = parsed.path();
        let split = path.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (base_path, file) = path.split_at(split);

        Ok(NormalUrl {
            protocol,
            host,
            base_path: base_path.to_string(),
            file: file.to_string(),
        })
    }

    /// Resolve an href found on this page.
    ///
    /// Absolute `http(s)://` links are parsed as-is; `./`-relative links are
    /// appended to this page's base path; `/`-rooted links are resolved
    /// against the host. Every other shape (`mailto:`, protocol-relative
    /// `//host/x`, bare `name.html`, ...) and any resolution that yields a
    /// malformed URL falls back to this page's own URL.
    pub fn resolve(&self, href: &str) -> NormalUrl {
        let built = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(rest) = href.strip_prefix("./") {
            format!("{}{}{}{}", self.protocol, self.host, self.base_path, rest)
        } else if href.starts_with('/') {
            format!("{}{}{}", self.protocol, self.host, href)
        } else {
            return self.clone();
        };

        NormalUrl::parse(&built).unwrap_or_else(|_| self.clone())
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

impl fmt::Display for NormalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.protocol, self.host, self.base_path, self.file
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_path_at_last_slash() {
        let u = NormalUrl::parse("https://people.scs.carleton.ca/~davidmckenney/fruits/N-0.html")
            .unwrap();
        assert_eq!(u.protocol(), "https://");
        assert_eq!(u.host(), "people.scs.carleton.ca");
        assert_eq!(u.base_path(), "/~davidmckenney/fruits/");
        assert_eq!(u.file(), "N-0.html");
    }

    #[test]
    fn slashless_trailing_segment_is_a_file_name() {
        let u = NormalUrl::parse("https://example.com/a/b/fruits").unwrap();
        assert_eq!(u.base_path(), "/a/b/");
        assert_eq!(u.file(), "fruits");

        let with_slash = NormalUrl::parse("https://example.com/a/b/fruits/").unwrap();
        assert_eq!(with_slash.base_path(), "/a/b/fruits/");
        assert_eq!(with_slash.file(), "");
        assert_ne!(u, with_slash);
    }

    #[test]
    fn case_and_trailing_slash_canonicalise() {
        let a = NormalUrl::parse("HTTP://People.Scs.Carleton.CA/").unwrap();
        let b = NormalUrl::parse("http://people.scs.carleton.ca").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "http://people.scs.carleton.ca/");
    }

    #[test]
    fn bare_host_gets_root_base_path() {
        let u = NormalUrl::parse("http://example.com").unwrap();
        assert_eq!(u.base_path(), "/");
        assert_eq!(u.file(), "");
        assert_eq!(u.to_string(), "http://example.com/");
    }

    #[test]
    fn explicit_port_is_part_of_the_host() {
        let u = NormalUrl::parse("http://127.0.0.1:8080/site/index.html").unwrap();
        assert_eq!(u.host(), "127.0.0.1:8080");
        assert_eq!(u.to_string(), "http://127.0.0.1:8080/site/index.html");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            NormalUrl::parse("ftp://example.com/file"),
            Err(UrlError::UnsupportedScheme(_))
        ));
        assert!(NormalUrl::parse("not a url at all").is_err());
    }

    #[test]
    fn resolve_absolute_href() {
        let base = NormalUrl::parse("http://example.com/dir/page.html").unwrap();
        let r = base.resolve("https://Other.Example.COM/x.html");
        assert_eq!(r.to_string(), "https://other.example.com/x.html");
    }

    #[test]
    fn resolve_dot_relative_uses_base_path() {
        let base = NormalUrl::parse("http://example.com/dir/page.html").unwrap();
        let r = base.resolve("./next.html");
        assert_eq!(r.to_string(), "http://example.com/dir/next.html");
    }

    #[test]
    fn resolve_rooted_href_uses_host() {
        let base = NormalUrl::parse("http://example.com/dir/page.html").unwrap();
        let r = base.resolve("/top.html");
        assert_eq!(r.to_string(), "http://example.com/top.html");
    }

    #[test]
    fn resolve_unrecognised_shapes_return_base() {
        let base = NormalUrl::parse("http://example.com/dir/page.html").unwrap();
        assert_eq!(base.resolve("mailto:someone@example.com"), base);
        assert_eq!(base.resolve("//cdn.example.com/x.js"), base);
        assert_eq!(base.resolve("bare.html"), base);
        assert_eq!(base.resolve(""), base);
    }

    #[test]
    fn resolve_malformed_result_returns_base() {
        let base = NormalUrl::parse("http://example.com/dir/page.html").unwrap();
        // Parses as far as the prefix check but fails full parsing.
        assert_eq!(base.resolve("http://"), base);
    }

    #[test]
    fn resolve_on_slashless_page_uses_parent_directory() {
        let base = NormalUrl::parse("http://example.com/a/b/fruits").unwrap();
        let r = base.resolve("./pear.html");
        assert_eq!(r.to_string(), "http://example.com/a/b/pear.html");
    }
}
