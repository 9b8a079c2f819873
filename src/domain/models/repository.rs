use chrono::{DateTime, Utc};

/// One item of an account's repository collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub homepage: Option<String>,
    pub html_url: String,
    /// URL template, e.g. `.../commits{/sha}`.
    pub commits_url: String,
    /// URL template, e.g. `.../releases{/id}`.
    pub releases_url: String,
    /// The repository's own detail resource.
    pub url: String,
}

impl Repository {
    /// Commit list endpoint with the `{/sha}` placeholder removed.
    pub fn commits_endpoint(&self) -> String {
        self.commits_url.replace("{/sha}", "")
    }

    /// Release list endpoint with the `{/id}` placeholder removed.
    pub fn releases_endpoint(&self) -> String {
        self.releases_url.replace("{/id}", "")
    }

    /// The homepage, only if it looks like an absolute URL.
    pub fn live_url(&self) -> Option<&str> {
        self.homepage
            .as_deref()
            .filter(|homepage| homepage.starts_with("http"))
    }

    /// `Tue Mar 05 2024` style date of the last update.
    pub fn updated_on(&self) -> Option<String> {
        self.updated_at
            .map(|updated_at| updated_at.format("%a %b %d %Y").to_string())
    }
}
