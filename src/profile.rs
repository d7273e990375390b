//! Column profiling orchestration.
//!
//! [`ColumnProfiler`] wires the pattern classifier, structural resolver,
//! semantic detector, and the injected collaborators together for a single
//! column, and [`determine_dataset_type`] rolls one column's types into a
//! dataset-level category. Profiling a column is a pure function of its name,
//! its values, and the gazetteer's answers; re-running it yields an identical
//! result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    geo::GeoResolver,
    observe::{self, NoopObserver, Observer, Phase},
    patterns,
    semantic,
    structural::{self, MAX_UNCLEAN},
    temporal,
    types::{ColumnMeta, SemanticTag, SemanticTypes, StructuralType},
};

static NOOP_OBSERVER: NoopObserver = NoopObserver;

/// Caller-supplied typing that replaces automatic structural detection and
/// narrows semantic detection to the requested tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualOverride {
    pub structural_type: StructuralType,
    pub semantic_types: Vec<SemanticTag>,
}

/// Result of profiling one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub structural_type: StructuralType,
    pub semantic_types: SemanticTypes,
    pub meta: ColumnMeta,
}

/// Profiles columns against an optional gazetteer and observer.
pub struct ColumnProfiler<'a> {
    geo: Option<&'a dyn GeoResolver>,
    observer: &'a dyn Observer,
}

impl Default for ColumnProfiler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ColumnProfiler<'a> {
    pub fn new() -> Self {
        Self {
            geo: None,
            observer: &NOOP_OBSERVER,
        }
    }

    /// Installs a gazetteer backend for administrative-area detection.
    pub fn with_geo(mut self, geo: &'a dyn GeoResolver) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Installs an observer around the profiling sub-phases. Profiling output
    /// never depends on the observer.
    pub fn with_observer(mut self, observer: &'a dyn Observer) -> Self {
        self.observer = observer;
        self
    }

    /// Identifies the structural type and semantic types of a column.
    ///
    /// The column name feeds the id, date-component, and latitude/longitude
    /// heuristics. Empty strings mark missing values; the caller stringifies
    /// anything that is not already text.
    pub fn profile(
        &self,
        name: &str,
        values: &[String],
        manual: Option<&ManualOverride>,
    ) -> ColumnProfile {
        let num_total = values.len();
        let mut meta = ColumnMeta::default();

        let counts = observe::scoped(self.observer, Phase::PatternScan, || {
            patterns::count_patterns(values)
        });
        let threshold = structural::detection_threshold(num_total, counts.empty, MAX_UNCLEAN);

        let structural_type = match manual {
            Some(manual) => {
                meta.unclean_values_ratio = Some(structural::unclean_values_ratio(
                    manual.structural_type,
                    &counts,
                    num_total,
                ));
                manual.structural_type
            }
            None => {
                let resolved = structural::resolve(&counts, num_total, &mut meta);
                if !matches!(
                    resolved,
                    StructuralType::MissingData | StructuralType::Text
                ) {
                    meta.unclean_values_ratio =
                        Some(structural::unclean_values_ratio(resolved, &counts, num_total));
                }
                resolved
            }
        };

        if structural_type != StructuralType::MissingData && counts.empty > 0 {
            meta.missing_values_ratio = Some(counts.empty as f64 / num_total as f64);
        }

        // A fully missing column is terminal: nothing to detect, no ratios
        if structural_type == StructuralType::MissingData && manual.is_none() {
            return ColumnProfile {
                structural_type,
                semantic_types: SemanticTypes::new(),
                meta,
            };
        }

        let distinct: BTreeSet<String> = values
            .iter()
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();

        let (structural_type, semantic_types) = match manual {
            Some(manual) => (
                structural_type,
                semantic::detect_manual(
                    &manual.semantic_types,
                    values,
                    &counts,
                    &distinct,
                    self.geo,
                    self.observer,
                    &mut meta,
                ),
            ),
            None => semantic::detect(
                name,
                values,
                &counts,
                structural_type,
                threshold,
                &distinct,
                self.geo,
                self.observer,
                &mut meta,
            ),
        };

        record_temporal_resolution(&semantic_types, &mut meta);

        ColumnProfile {
            structural_type,
            semantic_types,
            meta,
        }
    }
}

/// Records the resolution of the finest-grained temporal tag, if any carries
/// instants.
fn record_temporal_resolution(semantic_types: &SemanticTypes, meta: &mut ColumnMeta) {
    for tag in [SemanticTag::DateTime, SemanticTag::Date, SemanticTag::Time] {
        if let Some(instants) = semantic_types.get(&tag).and_then(|value| value.instants())
            && !instants.is_empty()
        {
            meta.temporal_resolution = temporal::estimate_resolution(instants.iter().copied());
            return;
        }
    }
}

/// Dataset-level category a column contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Numerical,
    Categorical,
    Spatial,
    Temporal,
}

const SPATIAL_SEMANTIC_TAGS: [SemanticTag; 4] = [
    SemanticTag::Latitude,
    SemanticTag::Longitude,
    SemanticTag::Address,
    SemanticTag::Admin,
];

/// Maps one column's types to a dataset-level category via fixed precedence:
/// spatial, then temporal, then categorical, then numerical. Reduction across
/// columns is the caller's concern.
pub fn determine_dataset_type<I>(structural_type: StructuralType, semantic_tags: I) -> Option<DatasetType>
where
    I: IntoIterator<Item = SemanticTag>,
{
    let tags: Vec<SemanticTag> = semantic_tags.into_iter().collect();
    if matches!(
        structural_type,
        StructuralType::GeoPoint | StructuralType::GeoPolygon
    ) {
        Some(DatasetType::Spatial)
    } else if tags.iter().any(|tag| SPATIAL_SEMANTIC_TAGS.contains(tag)) {
        Some(DatasetType::Spatial)
    } else if tags.contains(&SemanticTag::DateTime) {
        Some(DatasetType::Temporal)
    } else if tags.contains(&SemanticTag::Categorical) {
        Some(DatasetType::Categorical)
    } else if matches!(
        structural_type,
        StructuralType::Integer | StructuralType::Float
    ) {
        Some(DatasetType::Numerical)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SemanticValue;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn fully_missing_column_is_terminal() {
        let profiler = ColumnProfiler::new();
        let profile = profiler.profile("anything", &strings(&["", "", ""]), None);
        assert_eq!(profile.structural_type, StructuralType::MissingData);
        assert!(profile.semantic_types.is_empty());
        assert!(profile.meta.is_empty());
    }

    #[test]
    fn integer_column_records_distinct_count_and_ratios() {
        let profiler = ColumnProfiler::new();
        let values = strings(&["10", "20", "20", "30", ""]);
        let profile = profiler.profile("amount", &values, None);
        assert_eq!(profile.structural_type, StructuralType::Integer);
        assert_eq!(profile.meta.num_distinct_values, Some(3));
        assert_eq!(profile.meta.missing_values_ratio, Some(0.2));
        assert_eq!(profile.meta.unclean_values_ratio, Some(0.0));
    }

    #[test]
    fn compact_date_integers_revise_to_text() {
        let profiler = ColumnProfiler::new();
        let values = strings(&["20200106", "20200107", "20200108"]);
        let profile = profiler.profile("recorded", &values, None);
        assert_eq!(profile.structural_type, StructuralType::Text);
        let instants = profile.semantic_types[&SemanticTag::DateTime]
            .instants()
            .unwrap();
        assert_eq!(instants.len(), 3);
        assert_eq!(
            profile.meta.temporal_resolution,
            Some(crate::temporal::TemporalResolution::Day)
        );
    }

    #[test]
    fn manual_override_narrows_detection() {
        let profiler = ColumnProfiler::new();
        let values = strings(&["1", "0", "1", "1"]);
        let manual = ManualOverride {
            structural_type: StructuralType::Integer,
            semantic_types: vec![SemanticTag::Boolean, SemanticTag::Url],
        };
        let profile = profiler.profile("flag", &values, Some(&manual));
        assert_eq!(profile.structural_type, StructuralType::Integer);
        assert_eq!(profile.meta.unclean_values_ratio, Some(0.0));
        // Requested tags appear even when nothing computes a payload for them
        assert_eq!(profile.semantic_types[&SemanticTag::Url], SemanticValue::None);
        // Id detection was not requested, so it does not run
        assert!(!profile.semantic_types.contains_key(&SemanticTag::Id));
    }

    #[test]
    fn profiling_is_idempotent() {
        let profiler = ColumnProfiler::new();
        let values = strings(&["alpha", "beta", "alpha", "", "gamma"]);
        let first = profiler.profile("label", &values, None);
        let second = profiler.profile("label", &values, None);
        assert_eq!(first, second);
    }

    #[test]
    fn dataset_type_precedence_is_fixed() {
        assert_eq!(
            determine_dataset_type(StructuralType::GeoPoint, []),
            Some(DatasetType::Spatial)
        );
        assert_eq!(
            determine_dataset_type(
                StructuralType::Float,
                [SemanticTag::Latitude, SemanticTag::DateTime]
            ),
            Some(DatasetType::Spatial)
        );
        assert_eq!(
            determine_dataset_type(StructuralType::Text, [SemanticTag::DateTime]),
            Some(DatasetType::Temporal)
        );
        assert_eq!(
            determine_dataset_type(StructuralType::Text, [SemanticTag::Categorical]),
            Some(DatasetType::Categorical)
        );
        assert_eq!(
            determine_dataset_type(StructuralType::Integer, []),
            Some(DatasetType::Numerical)
        );
        assert_eq!(determine_dataset_type(StructuralType::Text, []), None);
    }
}
