//! Source references and domain-based deduplication

use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Domain assigned to a source whose URL cannot be parsed
pub const UNKNOWN_DOMAIN: &str = "Source";

/// A reference URL attached to a myth
///
/// Sources are immutable once created. The `domain` is always derived from
/// the URL and is the key used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    url: String,
    domain: String,
    title: Option<String>,
}

impl Source {
    /// Normalize a raw URL into a source. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::Source;
    ///
    /// let source = Source::from_raw("https://www.NASA.gov/mission");
    /// assert_eq!(source.domain(), "nasa.gov");
    ///
    /// let broken = Source::from_raw("not a url");
    /// assert_eq!(broken.domain(), "Source");
    /// assert_eq!(broken.url(), "not a url");
    /// ```
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let url = raw.into();
        let domain = derive_domain(&url);
        Self {
            url,
            domain,
            title: None,
        }
    }

    /// Normalize a raw URL and attach a display title (blank titles are dropped)
    pub fn with_title(raw: impl Into<String>, title: Option<String>) -> Self {
        let mut source = Self::from_raw(raw);
        source.title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        source
    }

    /// The URL exactly as it was supplied
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lowercase host without a leading `www.`, or `"Source"`
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Optional display title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Display label: the title when known, otherwise the domain
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.domain)
    }

    /// Whether the URL parsed to a host
    pub fn is_resolvable(&self) -> bool {
        self.domain != UNKNOWN_DOMAIN
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.url)
    }
}

/// Derive the deduplication domain for a raw URL
pub fn derive_domain(raw: &str) -> String {
    Url::parse(raw.trim())
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_ascii_lowercase()))
        .map(|host| match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        })
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Normalize raw source strings and keep the first occurrence per domain
///
/// Blank entries are dropped before normalization. Surviving entries keep
/// their original order and their text as supplied.
///
/// # Examples
///
/// ```
/// use ekmyth_domain::dedupe_sources;
///
/// let sources = dedupe_sources([
///     "https://www.nasa.gov/x",
///     "https://nasa.gov/y",
///     "https://bbc.com/z",
/// ]);
/// assert_eq!(sources.len(), 2);
/// assert_eq!(sources[0].url(), "https://www.nasa.gov/x");
/// ```
pub fn dedupe_sources<I, S>(raw: I) -> Vec<Source>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    merge_sources(
        raw.into_iter()
            .filter(|s| !s.as_ref().trim().is_empty())
            .map(|s| Source::from_raw(s.as_ref())),
    )
}

/// Keep the first occurrence per domain of already-normalized sources
pub fn merge_sources<I>(sources: I) -> Vec<Source>
where
    I: IntoIterator<Item = Source>,
{
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.domain.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_strips_www_and_lowercases() {
        assert_eq!(derive_domain("https://www.BBC.co.uk/news"), "bbc.co.uk");
        assert_eq!(derive_domain("http://example.org"), "example.org");
    }

    #[test]
    fn test_domain_keeps_inner_www() {
        assert_eq!(derive_domain("https://news.www.example.com"), "news.www.example.com");
    }

    #[test]
    fn test_unparseable_url_falls_back() {
        let source = Source::from_raw("smithsonianmag article");
        assert_eq!(source.domain(), UNKNOWN_DOMAIN);
        assert_eq!(source.url(), "smithsonianmag article");
        assert!(!source.is_resolvable());
    }

    #[test]
    fn test_url_without_host_falls_back() {
        assert_eq!(derive_domain("mailto:editor@example.com"), UNKNOWN_DOMAIN);
    }

    #[test]
    fn test_title_blank_is_dropped() {
        let source = Source::with_title("https://nasa.gov", Some("   ".to_string()));
        assert_eq!(source.title(), None);
        assert_eq!(source.label(), "nasa.gov");

        let titled = Source::with_title("https://nasa.gov", Some("NASA".to_string()));
        assert_eq!(titled.label(), "NASA");
    }

    #[test]
    fn test_dedupe_keeps_first_per_domain() {
        let sources = dedupe_sources([
            "https://www.nasa.gov/x",
            "https://nasa.gov/y",
            "https://bbc.com/z",
        ]);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url(), "https://www.nasa.gov/x");
        assert_eq!(sources[1].domain(), "bbc.com");
    }

    #[test]
    fn test_dedupe_drops_blank_entries() {
        let sources = dedupe_sources(["", "   ", "https://bbc.com/z", "\t"]);
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_dedupe_keeps_raw_text() {
        let sources = dedupe_sources(["  field notes ", " https://www.nasa.gov/x"]);
        assert_eq!(sources[0].url(), "  field notes ");
        assert_eq!(sources[0].domain(), UNKNOWN_DOMAIN);
        assert_eq!(sources[1].url(), " https://www.nasa.gov/x");
        assert_eq!(sources[1].domain(), "nasa.gov");
    }

    #[test]
    fn test_unparseable_urls_share_one_key() {
        let sources = dedupe_sources(["first note", "second note"]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].url(), "first note");
    }

    #[test]
    fn test_merge_preserves_titles() {
        let merged = merge_sources(vec![
            Source::from_raw("https://nasa.gov/a"),
            Source::with_title("https://www.nasa.gov/b", Some("dup".to_string())),
            Source::with_title("https://esa.int/c", Some("ESA".to_string())),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].title(), Some("ESA"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: deduplicated output never repeats a domain
        #[test]
        fn test_dedupe_domains_unique(hosts in proptest::collection::vec("[a-c]{1,2}", 0..12)) {
            let raw: Vec<String> = hosts.iter().map(|h| format!("https://{}.com/p", h)).collect();
            let sources = dedupe_sources(&raw);

            let mut domains = HashSet::new();
            for source in &sources {
                prop_assert!(domains.insert(source.domain().to_string()));
            }
        }

        /// Property: output is an order-preserving subsequence of the input
        #[test]
        fn test_dedupe_preserves_order(hosts in proptest::collection::vec("[a-d]", 0..12)) {
            let raw: Vec<String> = hosts.iter().map(|h| format!("https://{}.org", h)).collect();
            let sources = dedupe_sources(&raw);

            let mut cursor = 0;
            for source in &sources {
                let pos = raw[cursor..].iter().position(|r| r == source.url());
                prop_assert!(pos.is_some());
                cursor += pos.unwrap_or(0) + 1;
            }
        }
    }
}
