/// Number of characters of a commit message kept for display.
pub const COMMIT_MESSAGE_PREFIX_CHARS: usize = 40;

/// Supplementary facts fetched per repository. Each one is optional; an
/// absent field simply renders nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extras {
    pub last_commit: Option<String>,
    pub latest_release: Option<String>,
    pub open_issues: Option<u64>,
}

impl Extras {
    pub fn is_empty(&self) -> bool {
        self.last_commit.is_none() && self.latest_release.is_none() && self.open_issues.is_none()
    }
}

/// Shortens a commit message to its display prefix, always followed by an ellipsis.
pub fn commit_message_prefix(message: &str) -> String {
    let prefix: String = message.chars().take(COMMIT_MESSAGE_PREFIX_CHARS).collect();
    format!("{prefix}…")
}
