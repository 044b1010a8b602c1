//! Saved-search records kept by the history backend

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque record identifier; the backend may send a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Fields the user supplies when saving or editing a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A stored search with its weather snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: RecordId,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Backend timestamps, passed through as sent
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Raw weather payload captured when the record was saved
    #[serde(default, rename = "temperature_data")]
    pub weather_snapshot: Option<serde_json::Value>,
}

/// Headline numbers pulled out of a record's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SnapshotPreview {
    pub current_temperature: Option<f64>,
    pub current_humidity: Option<f64>,
    pub forecast_periods: usize,
}

impl SavedRecord {
    pub fn preview(&self) -> Option<SnapshotPreview> {
        let snapshot = self.weather_snapshot.as_ref()?;
        Some(SnapshotPreview {
            current_temperature: snapshot
                .pointer("/current/main/temp")
                .and_then(serde_json::Value::as_f64),
            current_humidity: snapshot
                .pointer("/current/main/humidity")
                .and_then(serde_json::Value::as_f64),
            forecast_periods: snapshot
                .pointer("/forecast/list")
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len),
        })
    }

    /// Apply an edit in place, as the history view does after a successful update
    pub fn apply(&mut self, draft: &RecordDraft) {
        self.location = draft.location.clone();
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
    }
}

/// Export formats offered by the history backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Pdf,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown export format: {0}")]
pub struct UnknownExportFormat(pub String);

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        Self::Json,
        Self::Csv,
        Self::Xml,
        Self::Pdf,
        Self::Markdown,
    ];

    /// Path segment used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Pdf => "pdf",
            Self::Markdown => "markdown",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Xml => "application/xml",
            Self::Pdf => "application/pdf",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }

    /// Download file name, e.g. `weather_records.csv`
    pub fn file_name(&self) -> String {
        format!("weather_records.{}", self.as_str())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let found = Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted || (wanted == "md" && *f == Self::Markdown));
        found.ok_or(UnknownExportFormat(wanted))
    }
}
