/// Deployment environment. Picks the log level used when
/// `PLACESYNC_LOG_LEVEL` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    #[must_use]
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test => "warn",
            Environment::Production => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which external mapping provider backs the external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Kakao Local keyword search.
    Keyword,
    /// Google Places text search.
    Text,
    /// No external provider; the external source reports itself unavailable.
    Disabled,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Keyword => write!(f, "keyword"),
            ProviderKind::Text => write!(f, "text"),
            ProviderKind::Disabled => write!(f, "none"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub provider: ProviderKind,
    pub kakao_api_key: Option<String>,
    pub google_places_api_key: Option<String>,
    pub provider_timeout_secs: u64,
    pub search_language: String,
    pub max_result_count: u32,
    pub debounce_ms: u64,
    pub recent_queries_capacity: usize,
    pub page_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("provider", &self.provider)
            .field(
                "kakao_api_key",
                &self.kakao_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("search_language", &self.search_language)
            .field("max_result_count", &self.max_result_count)
            .field("debounce_ms", &self.debounce_ms)
            .field("recent_queries_capacity", &self.recent_queries_capacity)
            .field("page_size", &self.page_size)
            .finish()
    }
}
