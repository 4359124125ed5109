use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Timestamp layout actinia expects for temporal registration.
pub const GRASS_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key/value metadata as reported by GRASS info modules (`r.info`, `t.info`, ...).
///
/// actinia reports scalars as strings (`"cells": "2025000"`), so values are
/// kept as strings; numbers or booleans in the response are stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        let serde_json::Value::Object(obj) = value else {
            return None;
        };

        let entries = obj
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();

        Some(Self(entries))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn cells(&self) -> Option<&str> {
        self.get("cells")
    }

    pub fn min(&self) -> Option<&str> {
        self.get("min")
    }

    pub fn max(&self) -> Option<&str> {
        self.get("max")
    }

    /// Parse a value as a number, for callers that need arithmetic on it.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(value)
            .ok_or_else(|| serde::de::Error::custom("metadata must be a JSON object"))
    }
}

/// Computational region of a location or mapset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub n: f64,
    pub s: f64,
    pub e: f64,
    pub w: f64,
    pub nsres: f64,
    pub ewres: f64,
    pub rows: u64,
    pub cols: u64,
    pub cells: u64,
    #[serde(default)]
    pub proj: Option<i64>,
    #[serde(default)]
    pub zone: Option<i64>,
}

/// `process_results` of the location and mapset info endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInfo {
    pub projection: String,
    pub region: Region,
}

pub type LocationInfo = ProjectionInfo;
pub type MapsetInfo = ProjectionInfo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub version: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalType {
    Absolute,
    Relative,
}

impl TemporalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }
}

impl fmt::Display for TemporalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemporalType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(format!(
                "unknown temporal type '{}', expected 'absolute' or 'relative'",
                other
            )),
        }
    }
}

/// Body of `POST .../strds/{name}`.
#[derive(Debug, Clone, Serialize)]
pub struct StrdsCreation<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub temporaltype: TemporalType,
}

/// A raster map with its valid time, used to register it in a STRDS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterRegistration {
    pub name: String,
    #[serde(with = "grass_datetime")]
    pub start_time: NaiveDateTime,
    #[serde(with = "grass_datetime")]
    pub end_time: NaiveDateTime,
}

impl RasterRegistration {
    pub fn new(name: impl Into<String>, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
        }
    }
}

/// One row of a STRDS raster listing (`t.rast.list`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrdsRasterEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

mod grass_datetime {
    use super::GRASS_DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(GRASS_DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, GRASS_DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
