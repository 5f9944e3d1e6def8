//! Keyword-search provider backed by the Kakao Local API.

use placesync_core::{checked_latitude, checked_longitude, SearchableRecord, SourceTag};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::category::kakao_category;
use super::http::{build_client, decode_response, endpoint_url};
use super::PlaceProvider;
use crate::error::ProviderError;

const PROVIDER: &str = "kakao";
const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const KEYWORD_PATH: &str = "v2/local/search/keyword.json";
/// Kakao accepts `size` in `1..=15`.
const MAX_PAGE_SIZE: u32 = 15;

#[derive(Debug, Deserialize)]
struct KeywordSearchResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    id: String,
    place_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    category_group_code: String,
    #[serde(default)]
    category_name: String,
    /// Longitude, as a decimal string.
    #[serde(default)]
    x: String,
    /// Latitude, as a decimal string.
    #[serde(default)]
    y: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    place_url: String,
}

/// Client for Kakao Local keyword search.
///
/// Use [`KeywordSearchClient::new`] for production or
/// [`KeywordSearchClient::with_base_url`] to point at a mock server.
pub struct KeywordSearchClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    page_size: u32,
}

impl std::fmt::Debug for KeywordSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordSearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("page_size", &self.page_size)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl KeywordSearchClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, page_size: u32) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, page_size, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        page_size: u32,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            endpoint: endpoint_url(base_url, KEYWORD_PATH)?,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    fn build_url(&self, keyword: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", keyword)
            .append_pair("size", &self.page_size.to_string());
        url
    }
}

impl PlaceProvider for KeywordSearchClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchableRecord>, ProviderError> {
        let url = self.build_url(keyword);
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await?;

        let body: KeywordSearchResponse =
            decode_response(PROVIDER, &format!("kakao keyword(query={keyword})"), response)
                .await?;

        Ok(body.documents.into_iter().map(to_record).collect())
    }
}

fn to_record(doc: KakaoDocument) -> SearchableRecord {
    let category = kakao_category(&doc.category_group_code, &doc.category_name);
    let address = if doc.road_address_name.trim().is_empty() {
        doc.address_name
    } else {
        doc.road_address_name
    };

    let mut record =
        SearchableRecord::new(SourceTag::External, doc.id, doc.place_name, address, category);
    record.latitude = doc.y.trim().parse().ok().and_then(checked_latitude);
    record.longitude = doc.x.trim().parse().ok().and_then(checked_longitude);
    record.phone = non_empty(doc.phone);
    record.url = non_empty(doc.place_url);
    record.description = non_empty(doc.category_name);
    record
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placesync_core::Category;

    fn doc(json: serde_json::Value) -> KakaoDocument {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn build_url_encodes_keyword_and_size() {
        let client = KeywordSearchClient::with_base_url("k", 30, 10, "https://dapi.kakao.com")
            .unwrap();
        let url = client.build_url("성수 카페");
        assert!(url.as_str().starts_with(
            "https://dapi.kakao.com/v2/local/search/keyword.json?query="
        ));
        assert!(url.as_str().ends_with("&size=10"), "{url}");
        assert!(!url.as_str().contains(' '), "keyword must be encoded: {url}");
    }

    #[test]
    fn page_size_is_clamped() {
        let client = KeywordSearchClient::with_base_url("k", 30, 20, "https://dapi.kakao.com")
            .unwrap();
        assert!(client.build_url("x").as_str().ends_with("size=15"));
    }

    #[test]
    fn maps_document_to_external_record() {
        let record = to_record(doc(serde_json::json!({
            "id": "26338954",
            "place_name": "카카오프렌즈 코엑스점",
            "address_name": "서울 강남구 삼성동 159",
            "road_address_name": "서울 강남구 영동대로 513",
            "category_group_code": "",
            "category_name": "가정,생활 > 문구,사무용품 > 디자인문구 > 카카오프렌즈",
            "x": "127.05902969025047",
            "y": "37.51207412593136",
            "phone": "02-6002-1880",
            "place_url": "http://place.map.kakao.com/26338954"
        })));

        assert_eq!(record.source(), SourceTag::External);
        assert_eq!(record.id, "26338954");
        assert_eq!(record.address, "서울 강남구 영동대로 513");
        assert_eq!(record.category, Category::Other);
        let (lat, lng) = record.coordinates().unwrap();
        assert!((lat - 37.512_074).abs() < 1e-5);
        assert!((lng - 127.059_029).abs() < 1e-5);
        assert_eq!(record.phone.as_deref(), Some("02-6002-1880"));
    }

    #[test]
    fn non_finite_or_out_of_range_coordinates_are_dropped() {
        for (x, y) in [("NaN", "inf"), ("127.0", "-inf"), ("181.0", "91.0")] {
            let record = to_record(doc(serde_json::json!({
                "id": "9",
                "place_name": "Broken Pin",
                "x": x,
                "y": y
            })));
            assert_eq!(record.coordinates(), None, "x={x} y={y}");
        }
    }

    #[test]
    fn falls_back_to_lot_address_and_skips_blank_fields() {
        let record = to_record(doc(serde_json::json!({
            "id": "1",
            "place_name": "어니언 성수",
            "address_name": "서울 성동구 성수동2가 277-135",
            "road_address_name": "",
            "category_group_code": "CE7",
            "x": "",
            "y": "37.5446",
            "phone": ""
        })));

        assert_eq!(record.address, "서울 성동구 성수동2가 277-135");
        assert_eq!(record.category, Category::Cafe);
        assert_eq!(record.latitude, Some(37.5446));
        assert_eq!(record.longitude, None, "unparseable coordinate is absent");
        assert!(record.phone.is_none());
        assert!(record.url.is_none());
    }
}
