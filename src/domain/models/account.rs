/// Profile-level record for an identifier, as returned by `/users/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: u64,
    pub followers: u64,
    pub html_url: String,
}

impl Account {
    /// The display name, or the login when the account has none.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref().filter(|bio| !bio.is_empty())
    }
}
