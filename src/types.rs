//! Type vocabulary for column profiles.
//!
//! This module owns the [`StructuralType`] enum (how values are physically
//! encoded), the [`SemanticTag`] enum (what values mean), the payloads a
//! semantic tag can carry, and [`ColumnMeta`], the bag of derived per-column
//! metadata. The string forms track the schema.org / datadrivendiscovery URIs
//! the profile documents are published under; `as_uri` exposes those verbatim.

use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{geo::AreaDescriptor, temporal::TemporalResolution};

/// Physical encoding of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralType {
    MissingData,
    Integer,
    Float,
    Text,
    GeoPoint,
    GeoPolygon,
}

impl StructuralType {
    pub fn as_str(self) -> &'static str {
        match self {
            StructuralType::MissingData => "missing_data",
            StructuralType::Integer => "integer",
            StructuralType::Float => "float",
            StructuralType::Text => "text",
            StructuralType::GeoPoint => "geo_point",
            StructuralType::GeoPolygon => "geo_polygon",
        }
    }

    /// URI this structural type is published under in profile documents.
    pub fn as_uri(self) -> &'static str {
        match self {
            StructuralType::MissingData => {
                "https://metadata.datadrivendiscovery.org/types/MissingData"
            }
            StructuralType::Integer => "http://schema.org/Integer",
            StructuralType::Float => "http://schema.org/Float",
            StructuralType::Text => "http://schema.org/Text",
            StructuralType::GeoPoint => "http://schema.org/GeoCoordinates",
            StructuralType::GeoPolygon => "http://schema.org/GeoShape",
        }
    }
}

impl fmt::Display for StructuralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StructuralType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "missing_data" | "missing" => Ok(StructuralType::MissingData),
            "integer" | "int" => Ok(StructuralType::Integer),
            "float" | "double" => Ok(StructuralType::Float),
            "text" | "string" => Ok(StructuralType::Text),
            "geo_point" | "point" => Ok(StructuralType::GeoPoint),
            "geo_polygon" | "polygon" => Ok(StructuralType::GeoPolygon),
            _ => Err(anyhow!(
                "Unknown structural type '{value}'. Supported types: missing_data, integer, float, text, geo_point, geo_polygon"
            )),
        }
    }
}

/// Real-world meaning of a column's values, independent of encoding.
///
/// A column owns a set of tags; each tag may carry a [`SemanticValue`]
/// payload. `Address` is never produced by detection; it exists so manual
/// overrides and the dataset aggregator can speak about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticTag {
    Boolean,
    Url,
    FilePath,
    Admin,
    Address,
    Categorical,
    Id,
    Date,
    Time,
    DateTime,
    Latitude,
    Longitude,
    Text,
}

impl SemanticTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticTag::Boolean => "boolean",
            SemanticTag::Url => "url",
            SemanticTag::FilePath => "file_path",
            SemanticTag::Admin => "admin",
            SemanticTag::Address => "address",
            SemanticTag::Categorical => "categorical",
            SemanticTag::Id => "id",
            SemanticTag::Date => "date",
            SemanticTag::Time => "time",
            SemanticTag::DateTime => "date_time",
            SemanticTag::Latitude => "latitude",
            SemanticTag::Longitude => "longitude",
            SemanticTag::Text => "text",
        }
    }

    /// URI this semantic tag is published under in profile documents.
    pub fn as_uri(self) -> &'static str {
        match self {
            SemanticTag::Boolean => "http://schema.org/Boolean",
            SemanticTag::Url => "http://schema.org/URL",
            SemanticTag::FilePath => "https://metadata.datadrivendiscovery.org/types/FileName",
            SemanticTag::Admin => "http://schema.org/AdministrativeArea",
            SemanticTag::Address => "http://schema.org/address",
            SemanticTag::Categorical => "http://schema.org/Enumeration",
            SemanticTag::Id => "http://schema.org/identifier",
            SemanticTag::Date => "http://schema.org/Date",
            SemanticTag::Time => "http://schema.org/Time",
            SemanticTag::DateTime => "http://schema.org/DateTime",
            SemanticTag::Latitude => "http://schema.org/latitude",
            SemanticTag::Longitude => "http://schema.org/longitude",
            SemanticTag::Text => "http://schema.org/Text",
        }
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SemanticTag {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "boolean" | "bool" => Ok(SemanticTag::Boolean),
            "url" => Ok(SemanticTag::Url),
            "file_path" | "file" => Ok(SemanticTag::FilePath),
            "admin" | "admin_area" => Ok(SemanticTag::Admin),
            "address" => Ok(SemanticTag::Address),
            "categorical" | "enumeration" => Ok(SemanticTag::Categorical),
            "id" | "identifier" => Ok(SemanticTag::Id),
            "date" => Ok(SemanticTag::Date),
            "time" => Ok(SemanticTag::Time),
            "date_time" | "datetime" => Ok(SemanticTag::DateTime),
            "latitude" | "lat" => Ok(SemanticTag::Latitude),
            "longitude" | "long" => Ok(SemanticTag::Longitude),
            "text" => Ok(SemanticTag::Text),
            _ => Err(anyhow!("Unknown semantic tag '{value}'")),
        }
    }
}

/// Granularity label for name-triggered date/time component columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentGranularity {
    Year,
    YearMonth,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl ComponentGranularity {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentGranularity::Year => "Year",
            ComponentGranularity::YearMonth => "Year_Month",
            ComponentGranularity::Month => "Month",
            ComponentGranularity::Day => "Day",
            ComponentGranularity::Hour => "Hour",
            ComponentGranularity::Minute => "Minute",
            ComponentGranularity::Second => "Second",
        }
    }
}

/// Payload attached to a semantic tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticValue {
    /// The tag carries no further data.
    None,
    /// Distinct category values for categorical columns.
    Categories(std::collections::BTreeSet<String>),
    /// Parsed instants for full date/time columns.
    Instants(Vec<DateTime<Utc>>),
    /// Resolved administrative areas.
    Areas(Vec<AreaDescriptor>),
    /// Instants reconstructed from a single named date/time component.
    Component {
        granularity: ComponentGranularity,
        instants: Vec<DateTime<Utc>>,
    },
}

impl SemanticValue {
    /// Parsed instants attached to this payload, if any.
    pub fn instants(&self) -> Option<&[DateTime<Utc>]> {
        match self {
            SemanticValue::Instants(instants) => Some(instants),
            SemanticValue::Component { instants, .. } => Some(instants),
            _ => None,
        }
    }
}

/// Ordered mapping from semantic tag to its payload.
pub type SemanticTypes = BTreeMap<SemanticTag, SemanticValue>;

/// Component order of a geo-point column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointFormat {
    #[serde(rename = "long,lat")]
    LongLat,
    #[serde(rename = "lat,long")]
    LatLong,
}

/// Derived per-column metadata. Never fed back into detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Fraction of values that do not match the assigned type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unclean_values_ratio: Option<f64>,
    /// Fraction of values that are empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_values_ratio: Option<f64>,
    /// Number of distinct non-empty values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_distinct_values: Option<usize>,
    /// Component order for geo-point columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_format: Option<PointFormat>,
    /// Coarsest granularity at which tagged instants stay distinct.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_resolution: Option<TemporalResolution>,
}

impl ColumnMeta {
    pub fn is_empty(&self) -> bool {
        self.unclean_values_ratio.is_none()
            && self.missing_values_ratio.is_none()
            && self.num_distinct_values.is_none()
            && self.point_format.is_none()
            && self.temporal_resolution.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_type_round_trips_through_str() {
        for ty in [
            StructuralType::MissingData,
            StructuralType::Integer,
            StructuralType::Float,
            StructuralType::Text,
            StructuralType::GeoPoint,
            StructuralType::GeoPolygon,
        ] {
            assert_eq!(ty.as_str().parse::<StructuralType>().unwrap(), ty);
        }
    }

    #[test]
    fn semantic_tag_accepts_aliases() {
        assert_eq!("datetime".parse::<SemanticTag>().unwrap(), SemanticTag::DateTime);
        assert_eq!("bool".parse::<SemanticTag>().unwrap(), SemanticTag::Boolean);
        assert!("quaternion".parse::<SemanticTag>().is_err());
    }

    #[test]
    fn uris_track_published_vocabulary() {
        assert_eq!(StructuralType::GeoPoint.as_uri(), "http://schema.org/GeoCoordinates");
        assert_eq!(
            SemanticTag::FilePath.as_uri(),
            "https://metadata.datadrivendiscovery.org/types/FileName"
        );
    }

    #[test]
    fn point_format_serializes_with_original_labels() {
        assert_eq!(serde_json::to_string(&PointFormat::LongLat).unwrap(), "\"long,lat\"");
        assert_eq!(serde_json::to_string(&PointFormat::LatLong).unwrap(), "\"lat,long\"");
    }

    #[test]
    fn empty_meta_reports_empty() {
        assert!(ColumnMeta::default().is_empty());
        let meta = ColumnMeta {
            missing_values_ratio: Some(0.5),
            ..ColumnMeta::default()
        };
        assert!(!meta.is_empty());
    }
}
