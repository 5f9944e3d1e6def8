use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::record::{checked_latitude, checked_longitude, Category, SearchableRecord, SourceTag};
use crate::ConfigError;

/// One place as stored in a records file. The source tag is not part of the
/// file; it is assigned by whoever loads the collection.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: Category,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl RecordEntry {
    #[must_use]
    pub fn into_record(self, source: SourceTag) -> SearchableRecord {
        let mut record =
            SearchableRecord::new(source, self.id, self.name, self.address, self.category);
        record.latitude = self.latitude;
        record.longitude = self.longitude;
        record.phone = self.phone;
        record.url = self.url;
        record.description = self.description;
        record
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordsFile {
    pub records: Vec<RecordEntry>,
}

/// Load a place collection from a YAML or JSON file and tag every record
/// with `source`.
///
/// Files ending in `.json` are parsed as JSON; everything else as YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_records(path: &Path, source: SourceTag) -> Result<Vec<SearchableRecord>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RecordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let file = parse_records(&content, is_json)?;

    validate_records(&file)?;

    Ok(file
        .records
        .into_iter()
        .map(|entry| entry.into_record(source))
        .collect())
}

fn parse_records(content: &str, is_json: bool) -> Result<RecordsFile, ConfigError> {
    if is_json {
        serde_json::from_str(content).map_err(ConfigError::RecordsFileJson)
    } else {
        serde_yaml::from_str(content).map_err(ConfigError::RecordsFileYaml)
    }
}

fn validate_records(file: &RecordsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for entry in &file.records {
        if entry.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "record '{}' has an empty id",
                entry.name
            )));
        }

        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "record '{}' has an empty name",
                entry.id
            )));
        }

        if !seen_ids.insert(entry.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate record id: '{}'",
                entry.id
            )));
        }

        if entry.latitude.is_some_and(|lat| checked_latitude(lat).is_none()) {
            return Err(ConfigError::Validation(format!(
                "record '{}' has latitude outside [-90, 90]",
                entry.id
            )));
        }

        if entry.longitude.is_some_and(|lng| checked_longitude(lng).is_none()) {
            return Err(ConfigError::Validation(format!(
                "record '{}' has longitude outside [-180, 180]",
                entry.id
            )));
        }
    }

    Ok(())
}
