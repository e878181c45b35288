//! Backend base URLs.

/// Default analysis backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default canopy-height backend (already includes the `/api` prefix).
pub const DEFAULT_CHM_API_URL: &str = "http://localhost:5000/api";

/// One base URL per backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub chm_api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chm_api_url: DEFAULT_CHM_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `SYLITHE_API_URL` and `SYLITHE_CHM_API_URL`, falling back to
    /// the local development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("SYLITHE_API_URL").ok(),
            std::env::var("SYLITHE_CHM_API_URL").ok(),
        )
    }

    /// Builds a config from optional overrides. Blank values fall back to
    /// the defaults and trailing slashes are removed.
    #[must_use]
    pub fn from_values(api_url: Option<String>, chm_api_url: Option<String>) -> Self {
        let pick = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_url: pick(api_url, DEFAULT_API_URL),
            chm_api_url: pick(chm_api_url, DEFAULT_CHM_API_URL),
        }
    }

    /// Replaces the URLs that are `Some`, keeping the others.
    #[must_use]
    pub fn with_overrides(self, api_url: Option<String>, chm_api_url: Option<String>) -> Self {
        Self::from_values(
            api_url.or(Some(self.api_url)),
            chm_api_url.or(Some(self.chm_api_url)),
        )
    }
}
