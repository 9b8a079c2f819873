use crate::domain::models::identifier::{Identifier, IdentifierError, SearchContext};
use crate::domain::models::pulse::PulseDelays;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "gh-profile-page")]
#[command(about = "Serves a GitHub profile and its repositories as a live HTML page")]
#[command(version)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_BASE_URL", default_value = "https://api.github.com")]
    pub api_base_url: String,

    /// Identifier shown on first load and whenever a search fails validation
    #[arg(long, env = "DEFAULT_USER", default_value = "urnjoya", value_parser = parse_identifier)]
    pub default_user: Identifier,

    /// Upper bound for a single upstream request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Pulse duration for "found" and "empty query" feedback
    #[arg(long, env = "PULSE_SHORT_MS", default_value_t = 1000)]
    pub pulse_short_ms: u64,

    /// Pulse duration for "not found" and "load error" feedback
    #[arg(long, env = "PULSE_LONG_MS", default_value_t = 1500)]
    pub pulse_long_ms: u64,

    /// Ask the browser to confirm before leaving the page
    #[arg(long, env = "CONFIRM_UNLOAD")]
    pub confirm_unload: bool,

    /// OTLP collector endpoint; spans are only exported when set
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

fn parse_identifier(raw: &str) -> Result<Identifier, IdentifierError> {
    Identifier::parse(raw)
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pulse_delays(&self) -> PulseDelays {
        PulseDelays {
            short: Duration::from_millis(self.pulse_short_ms),
            long: Duration::from_millis(self.pulse_long_ms),
        }
    }

    pub fn search_context(&self) -> SearchContext {
        SearchContext::new(self.default_user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> anyhow::Result<()> {
        let config = Config::try_parse_from(["gh-profile-page"])?;
        assert_eq!(config.listen.to_string(), "127.0.0.1:3000");
        assert_eq!(config.default_user.as_str(), "urnjoya");
        assert_eq!(config.pulse_delays(), PulseDelays::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.confirm_unload);
        Ok(())
    }

    #[test]
    fn test_blank_default_user_is_rejected() {
        assert!(Config::try_parse_from(["gh-profile-page", "--default-user", "  "]).is_err());
    }

    #[test]
    fn test_overrides() -> anyhow::Result<()> {
        let config = Config::try_parse_from([
            "gh-profile-page",
            "--default-user",
            "octocat",
            "--pulse-short-ms",
            "10",
            "--confirm-unload",
        ])?;
        assert_eq!(config.search_context().default_identifier().as_str(), "octocat");
        assert_eq!(config.pulse_delays().short, Duration::from_millis(10));
        assert!(config.confirm_unload);
        Ok(())
    }
}
