use thiserror::Error;

/// Classified failure of a single upstream GitHub request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Rate limit exceeded while fetching {resource}")]
    RateLimited { resource: String },

    #[error("Unexpected status {status} for {resource}")]
    UnexpectedStatus { resource: String, status: u16 },

    #[error("Network error for {resource}: {message}")]
    Network { resource: String, message: String },

    #[error("Malformed response for {resource}: {message}")]
    Malformed { resource: String, message: String },
}

impl ApiError {
    /// Short stable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Network { .. } => "network",
            Self::Malformed { .. } => "malformed",
        }
    }
}
