//! Source adapters: the local and public collections plus the external
//! mapping provider.

mod category;
mod collection;
mod google;
mod http;
mod kakao;

pub use category::{google_category, kakao_category};
pub use collection::CollectionAdapter;
pub use google::{TextSearchClient, TextSearchOptions, DEFAULT_FIELDS};
pub use kakao::KeywordSearchClient;

use std::future::Future;

use placesync_core::{AppConfig, ProviderKind, SearchableRecord, SourceTag};

use crate::error::ProviderError;

/// An external mapping provider able to turn a keyword into place records.
///
/// Implementations issue one outbound query per call and tag every record
/// [`SourceTag::External`]. Zero results is `Ok(vec![])`, not an error.
pub trait PlaceProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    fn search(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<SearchableRecord>, ProviderError>> + Send;
}

/// The provider chosen by configuration.
#[derive(Debug)]
pub enum ConfiguredProvider {
    Keyword(KeywordSearchClient),
    Text(TextSearchClient),
    /// No provider configured; every search reports
    /// [`ProviderError::Unavailable`].
    Disabled,
}

impl ConfiguredProvider {
    /// Build the provider selected by `config.provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] when the selected provider has
    /// no API key, or [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        match config.provider {
            ProviderKind::Keyword => {
                let key = config.kakao_api_key.as_deref().ok_or_else(|| {
                    ProviderError::Unavailable("KAKAO_REST_API_KEY is not set".to_string())
                })?;
                Ok(Self::Keyword(KeywordSearchClient::new(
                    key,
                    config.provider_timeout_secs,
                    config.max_result_count,
                )?))
            }
            ProviderKind::Text => {
                let key = config.google_places_api_key.as_deref().ok_or_else(|| {
                    ProviderError::Unavailable("GOOGLE_PLACES_API_KEY is not set".to_string())
                })?;
                let options = TextSearchOptions {
                    language: config.search_language.clone(),
                    max_result_count: config.max_result_count,
                    ..TextSearchOptions::default()
                };
                Ok(Self::Text(TextSearchClient::new(
                    key,
                    config.provider_timeout_secs,
                    options,
                )?))
            }
            ProviderKind::Disabled => Ok(Self::Disabled),
        }
    }
}

impl PlaceProvider for ConfiguredProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Keyword(client) => client.name(),
            Self::Text(client) => client.name(),
            Self::Disabled => "none",
        }
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchableRecord>, ProviderError> {
        match self {
            Self::Keyword(client) => client.search(keyword).await,
            Self::Text(client) => client.search(keyword).await,
            Self::Disabled => Err(ProviderError::Unavailable(
                "no external provider configured".to_string(),
            )),
        }
    }
}

/// What the external source contributed to one search session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalOutcome {
    pub records: Vec<SearchableRecord>,
    /// Advisory message when the provider failed; `records` is then empty.
    pub error: Option<String>,
}

/// Boundary around the configured [`PlaceProvider`]: every failure is
/// absorbed here and turned into an empty contribution plus an advisory.
#[derive(Debug)]
pub struct ExternalAdapter<P> {
    provider: P,
}

impl<P: PlaceProvider> ExternalAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn search(&self, keyword: &str) -> ExternalOutcome {
        match self.provider.search(keyword).await {
            Ok(records) => {
                let total = records.len();
                let records: Vec<SearchableRecord> = records
                    .into_iter()
                    .filter(|r| r.source() == SourceTag::External)
                    .collect();
                if records.len() != total {
                    tracing::warn!(
                        provider = self.provider.name(),
                        dropped = total - records.len(),
                        "provider returned records not tagged external"
                    );
                }
                tracing::debug!(
                    provider = self.provider.name(),
                    keyword,
                    count = records.len(),
                    "external search complete"
                );
                ExternalOutcome {
                    records,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    keyword,
                    error = %e,
                    "external place search failed"
                );
                ExternalOutcome {
                    records: Vec::new(),
                    error: Some(e.advisory()),
                }
            }
        }
    }
}
