//! Text-search provider backed by Google Places (`places:searchText`).

use placesync_core::{checked_latitude, checked_longitude, SearchableRecord, SourceTag};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::category::google_category;
use super::http::{build_client, decode_response, endpoint_url};
use super::PlaceProvider;
use crate::error::ProviderError;

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const TEXT_SEARCH_PATH: &str = "v1/places:searchText";

/// Response fields requested through `X-Goog-FieldMask`.
pub const DEFAULT_FIELDS: &[&str] = &[
    "places.id",
    "places.displayName",
    "places.formattedAddress",
    "places.location",
    "places.types",
    "places.nationalPhoneNumber",
    "places.websiteUri",
    "places.editorialSummary",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchRequest<'a> {
    text_query: &'a str,
    language_code: &'a str,
    max_result_count: u32,
}

/// A zero-result search comes back as `{}`, hence the default.
#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePlace {
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    location: Option<LatLng>,
    #[serde(default)]
    types: Vec<String>,
    national_phone_number: Option<String>,
    website_uri: Option<String>,
    editorial_summary: Option<LocalizedText>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Options for a text search beyond the query itself.
#[derive(Debug, Clone)]
pub struct TextSearchOptions {
    pub language: String,
    pub max_result_count: u32,
    pub fields: Vec<String>,
}

impl Default for TextSearchOptions {
    fn default() -> Self {
        Self {
            language: "ko".to_string(),
            max_result_count: 15,
            fields: DEFAULT_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Client for Google Places text search.
pub struct TextSearchClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    options: TextSearchOptions,
}

impl std::fmt::Debug for TextSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("options", &self.options)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl TextSearchClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        options: TextSearchOptions,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, options, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        options: TextSearchOptions,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            endpoint: endpoint_url(base_url, TEXT_SEARCH_PATH)?,
            options,
        })
    }

    fn field_mask(&self) -> String {
        self.options.fields.join(",")
    }
}

impl PlaceProvider for TextSearchClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchableRecord>, ProviderError> {
        let request = TextSearchRequest {
            text_query: keyword,
            language_code: &self.options.language,
            max_result_count: self.options.max_result_count,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", self.field_mask())
            .json(&request)
            .send()
            .await?;

        let body: TextSearchResponse = decode_response(
            PROVIDER,
            &format!("google searchText(textQuery={keyword})"),
            response,
        )
        .await?;

        Ok(body.places.into_iter().filter_map(to_record).collect())
    }
}

/// Places without a display name cannot be shown and are skipped.
fn to_record(place: GooglePlace) -> Option<SearchableRecord> {
    let name = place
        .display_name
        .map(|t| t.text)
        .filter(|t| !t.trim().is_empty())?;

    let mut record = SearchableRecord::new(
        SourceTag::External,
        place.id,
        name,
        place.formatted_address.unwrap_or_default(),
        google_category(&place.types),
    );
    if let Some(location) = place.location {
        record.latitude = location.latitude.and_then(checked_latitude);
        record.longitude = location.longitude.and_then(checked_longitude);
    }
    record.phone = place.national_phone_number;
    record.url = place.website_uri;
    record.description = place
        .editorial_summary
        .map(|t| t.text)
        .filter(|t| !t.trim().is_empty());
    Some(record)
}
