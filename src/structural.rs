//! Structural type resolution from pattern counts.
//!
//! Turns a column's [`PatternCounts`] and row count into one
//! [`StructuralType`] using the noise-tolerant threshold
//! `max(1, 0.98 * (N - empty))`, records the geo-point component order, and
//! computes the uncleanliness and missing-value ratios.

use crate::{
    patterns::PatternCounts,
    types::{ColumnMeta, PointFormat, StructuralType},
};

/// Tolerable ratio of unclean data in a structurally typed column.
pub const MAX_UNCLEAN: f64 = 0.02;

/// Minimum count of matching values required to assign a type, relative to
/// the non-empty total with `tolerance` noise allowed.
pub fn detection_threshold(num_total: usize, num_empty: usize, tolerance: f64) -> f64 {
    let non_empty = num_total.saturating_sub(num_empty);
    ((1.0 - tolerance) * non_empty as f64).max(1.0)
}

/// Resolves the structural type of a column and records the point format.
///
/// Resolution is strictly ordered: all-empty wins first, then integer, float,
/// the two geo-point shapes, polygon, and finally text as the fallback.
pub fn resolve(counts: &PatternCounts, num_total: usize, meta: &mut ColumnMeta) -> StructuralType {
    let threshold = detection_threshold(num_total, counts.empty, MAX_UNCLEAN);
    if counts.empty == num_total {
        StructuralType::MissingData
    } else if counts.int as f64 >= threshold {
        StructuralType::Integer
    } else if (counts.int + counts.float) as f64 >= threshold {
        StructuralType::Float
    } else if counts.point as f64 >= threshold || counts.other_point as f64 >= threshold {
        meta.point_format = Some(PointFormat::LongLat);
        StructuralType::GeoPoint
    } else if counts.latlong_point as f64 >= threshold || counts.geo_combined as f64 >= threshold {
        meta.point_format = Some(PointFormat::LatLong);
        StructuralType::GeoPoint
    } else if counts.polygon as f64 >= threshold {
        StructuralType::GeoPolygon
    } else {
        StructuralType::Text
    }
}

/// Fraction of values that do not match the given structural type.
///
/// Takes into account that a valid int is also a valid float, and that every
/// point shape counts toward a geo-point column.
pub fn unclean_values_ratio(
    structural_type: StructuralType,
    counts: &PatternCounts,
    num_total: usize,
) -> f64 {
    if num_total == 0 {
        return 0.0;
    }
    let clean = match structural_type {
        StructuralType::Integer => counts.empty + counts.int,
        StructuralType::Float => counts.empty + counts.int + counts.float,
        StructuralType::GeoPoint => {
            counts.empty
                + counts.point
                + counts.geo_combined
                + counts.other_point
                + counts.latlong_point
        }
        StructuralType::GeoPolygon => counts.empty + counts.polygon,
        StructuralType::MissingData | StructuralType::Text => return 0.0,
    };
    num_total.saturating_sub(clean) as f64 / num_total as f64
}

/// Fraction of values that do not parse as booleans.
pub fn unclean_boolean_ratio(counts: &PatternCounts, num_total: usize) -> f64 {
    if num_total == 0 {
        return 0.0;
    }
    num_total.saturating_sub(counts.empty + counts.boolean) as f64 / num_total as f64
}
