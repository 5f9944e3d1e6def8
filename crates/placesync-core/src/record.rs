//! Domain types shared by the search pipeline and the map reconciler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed place category tag. Provider-specific types are folded into one of
/// these; anything unrecognised becomes [`Category::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Cafe,
    Attraction,
    Shopping,
    Culture,
    Nature,
    Accommodation,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Restaurant,
        Category::Cafe,
        Category::Attraction,
        Category::Shopping,
        Category::Culture,
        Category::Nature,
        Category::Accommodation,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Attraction => "attraction",
            Category::Shopping => "shopping",
            Category::Culture => "culture",
            Category::Nature => "nature",
            Category::Accommodation => "accommodation",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Which backing collection produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Local,
    Public,
    External,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Local => write!(f, "local"),
            SourceTag::Public => write!(f, "public"),
            SourceTag::External => write!(f, "external"),
        }
    }
}

/// `value` as a latitude, if it is finite and within `[-90, 90]`.
#[must_use]
pub fn checked_latitude(value: f64) -> Option<f64> {
    (value.is_finite() && (-90.0..=90.0).contains(&value)).then_some(value)
}

/// `value` as a longitude, if it is finite and within `[-180, 180]`.
#[must_use]
pub fn checked_longitude(value: f64) -> Option<f64> {
    (value.is_finite() && (-180.0..=180.0).contains(&value)).then_some(value)
}

/// A candidate place produced by one source adapter.
///
/// `id` is only unique within its source partition. The source tag is fixed
/// at construction and has no setter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchableRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub category: Category,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "source")]
    source: SourceTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchableRecord {
    #[must_use]
    pub fn new(
        source: SourceTag,
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            category,
            latitude: None,
            longitude: None,
            source,
            phone: None,
            url: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn source(&self) -> SourceTag {
        self.source
    }

    /// `(latitude, longitude)` when both are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    #[must_use]
    pub fn key(&self) -> MarkerKey {
        MarkerKey::new(self.source, &self.id)
    }
}

/// A record after merging, with the display-grouping flags derived from its
/// source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedResult {
    #[serde(flatten)]
    pub record: SearchableRecord,
    pub is_local: bool,
    pub is_public: bool,
}

impl MergedResult {
    #[must_use]
    pub fn from_record(record: SearchableRecord) -> Self {
        let source = record.source();
        Self {
            record,
            is_local: source == SourceTag::Local,
            is_public: source == SourceTag::Public,
        }
    }

    #[must_use]
    pub fn key(&self) -> MarkerKey {
        self.record.key()
    }
}

/// Source-qualified record identifier (`"{source}:{id}"`), unique across all
/// partitions. Keys the live marker set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerKey(String);

impl MarkerKey {
    #[must_use]
    pub fn new(source: SourceTag, id: &str) -> Self {
        Self(format!("{source}:{id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ephemeral per-query state. Higher `generation` always wins at publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub keyword: String,
    pub started_at: DateTime<Utc>,
    pub generation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_coordinates_reject_non_finite_and_out_of_range() {
        assert_eq!(checked_latitude(37.5), Some(37.5));
        assert_eq!(checked_latitude(-90.0), Some(-90.0));
        assert_eq!(checked_latitude(90.5), None);
        assert_eq!(checked_latitude(f64::NAN), None);
        assert_eq!(checked_longitude(180.0), Some(180.0));
        assert_eq!(checked_longitude(-180.1), None);
        assert_eq!(checked_longitude(f64::INFINITY), None);
    }

    #[test]
    fn category_round_trips_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!("  CAFE ".parse::<Category>().unwrap(), Category::Cafe);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "spaceport".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: spaceport");
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Accommodation).unwrap();
        assert_eq!(json, "\"accommodation\"");
    }

    #[test]
    fn marker_key_is_source_qualified() {
        let local = SearchableRecord::new(SourceTag::Local, "7", "Cafe", "", Category::Cafe);
        let public = SearchableRecord::new(SourceTag::Public, "7", "Cafe", "", Category::Cafe);
        assert_eq!(local.key().as_str(), "local:7");
        assert_ne!(local.key(), public.key(), "same id in different partitions");
    }

    #[test]
    fn coordinates_require_both_axes() {
        let mut record = SearchableRecord::new(SourceTag::Local, "1", "A", "", Category::Other);
        assert_eq!(record.coordinates(), None);
        record.latitude = Some(37.5);
        assert_eq!(record.coordinates(), None);
        record.longitude = Some(127.0);
        assert_eq!(record.coordinates(), Some((37.5, 127.0)));
    }

    #[test]
    fn merged_result_flags_follow_source() {
        let local = MergedResult::from_record(SearchableRecord::new(
            SourceTag::Local,
            "1",
            "A",
            "",
            Category::Other,
        ));
        assert!(local.is_local && !local.is_public);

        let public = MergedResult::from_record(SearchableRecord::new(
            SourceTag::Public,
            "1",
            "A",
            "",
            Category::Other,
        ));
        assert!(!public.is_local && public.is_public);

        let external = MergedResult::from_record(SearchableRecord::new(
            SourceTag::External,
            "1",
            "A",
            "",
            Category::Other,
        ));
        assert!(!external.is_local && !external.is_public);
    }

    #[test]
    fn merged_result_serializes_flat() {
        let merged = MergedResult::from_record(
            SearchableRecord::new(SourceTag::Local, "1", "A", "Seoul", Category::Cafe)
                .with_coordinates(37.5, 127.0),
        );
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["source"], "local");
        assert_eq!(value["category"], "cafe");
        assert_eq!(value["is_local"], true);
        assert!(value.get("phone").is_none());
    }
}
