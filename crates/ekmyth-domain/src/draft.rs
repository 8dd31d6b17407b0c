//! Unpublished submissions

/// Category assigned when a draft leaves it blank
pub const DEFAULT_CATEGORY: &str = "General";

/// Categories offered by the submission form
pub const KNOWN_CATEGORIES: [&str; 6] = ["General", "Science", "History", "Health", "Tech", "Culture"];

/// Transient user input prior to verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Headline
    pub title: String,

    /// Category label
    pub category: String,

    /// The disputed statement
    pub myth_claim: String,

    /// The proposed correct explanation
    pub fact_reality: String,

    /// Source URLs exactly as entered
    pub raw_sources: Vec<String>,
}

impl Draft {
    /// Create a draft in the default category with no sources
    pub fn new(
        title: impl Into<String>,
        myth_claim: impl Into<String>,
        fact_reality: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: DEFAULT_CATEGORY.to_string(),
            myth_claim: myth_claim.into(),
            fact_reality: fact_reality.into(),
            raw_sources: Vec::new(),
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the raw sources
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Split a multi-line source field (one URL per line), dropping blank lines
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::Draft;
    ///
    /// let sources = Draft::parse_sources("https://nasa.gov\n\n  https://bbc.com  \n");
    /// assert_eq!(sources, vec!["https://nasa.gov", "https://bbc.com"]);
    /// ```
    pub fn parse_sources(input: &str) -> Vec<String> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Sources that are not blank, trimmed
    pub fn non_blank_sources(&self) -> Vec<String> {
        self.raw_sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Category after trimming, or the default when blank
    pub fn effective_category(&self) -> &str {
        match self.category.trim() {
            "" => DEFAULT_CATEGORY,
            category => category,
        }
    }
}
