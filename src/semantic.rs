//! Semantic type detection layered over the resolved structural type.
//!
//! Runs after structural resolution and may revise the structural type: a
//! column of `YYYYMMDD` values parses as integers but is really text holding
//! dates. All checks are independent unless noted, so a column can carry
//! several tags at once. Detection is a pure function of the column name, its
//! values, and the injected gazetteer's answers.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use log::debug;

use crate::{
    dates,
    geo::GeoResolver,
    observe::{self, Observer, Phase},
    patterns::PatternCounts,
    structural::{detection_threshold, unclean_boolean_ratio},
    types::{
        ColumnMeta, ComponentGranularity, SemanticTag, SemanticTypes, SemanticValue,
        StructuralType,
    },
};

/// At least this share of non-empty values must have enough words for a
/// column to count as free text.
pub const TEXT_WORDS_THRESHOLD: f64 = 0.5;

/// Maximum distinct-to-total ratio for categorical columns.
pub const MAX_CATEGORICAL_RATIO: f64 = 0.10;

/// Minimum share of distinct values the gazetteer must resolve before a
/// column is considered administrative areas.
const ADMIN_COVERAGE_RATIO: f64 = 0.7;

/// Gazetteer lookups only run once a column has this many distinct values.
const ADMIN_MIN_DISTINCT: usize = 3;

const ID_NAME_HINTS: &[&str] = &["id", "identifier", "index"];
const LATITUDE_NAME_HINTS: &[&str] = &["latitude", "lat"];
const LONGITUDE_NAME_HINTS: &[&str] = &["longitude", "long", "lon", "lng"];

const MONTH_NAMES: &[(&str, &str)] = &[
    ("january", "jan"),
    ("february", "feb"),
    ("march", "mar"),
    ("april", "apr"),
    ("may", "may"),
    ("june", "jun"),
    ("july", "jul"),
    ("august", "aug"),
    ("september", "sep"),
    ("october", "oct"),
    ("november", "nov"),
    ("december", "dec"),
];

/// Detects semantic types for a column whose structural type has been
/// resolved automatically. Returns the (possibly revised) structural type and
/// the tag set; `meta` picks up distinct counts and the boolean unclean
/// ratio.
#[allow(clippy::too_many_arguments)]
pub(crate) fn detect(
    name: &str,
    values: &[String],
    counts: &PatternCounts,
    structural: StructuralType,
    threshold: f64,
    distinct: &BTreeSet<String>,
    geo: Option<&dyn GeoResolver>,
    observer: &dyn Observer,
    meta: &mut ColumnMeta,
) -> (StructuralType, SemanticTypes) {
    let mut tags = SemanticTypes::new();
    let mut structural = structural;

    if counts.boolean as f64 >= threshold {
        tags.insert(SemanticTag::Boolean, SemanticValue::None);
        meta.unclean_values_ratio = Some(unclean_boolean_ratio(counts, values.len()));
    }

    if structural == StructuralType::Text {
        detect_text_tags(
            values, counts, threshold, distinct, geo, observer, meta, &mut tags,
        );
    } else if structural == StructuralType::Integer {
        if name_hints_id(name) {
            tags.insert(SemanticTag::Id, SemanticValue::None);
        }
        meta.num_distinct_values = Some(distinct.len());
    }

    if matches!(structural, StructuralType::Integer | StructuralType::Text) {
        detect_named_components(name, values, &mut structural, threshold, &mut tags);
    }

    if structural == StructuralType::Float {
        observe::scoped(observer, Phase::LatLongScan, || {
            detect_lat_long(name, values, threshold, &mut tags);
        });
    }

    let parsed_dates = observe::scoped(observer, Phase::DateScan, || dates::parse_dates(values));
    if parsed_dates.len() as f64 >= threshold {
        tags.insert(SemanticTag::DateTime, SemanticValue::Instants(parsed_dates));
        if structural == StructuralType::Integer {
            // 'YYYYMMDD' values parse as integers, but that's not what they are
            structural = StructuralType::Text;
        }
    }

    (structural, tags)
}

/// Narrowed detection when the caller supplies a manual override: only the
/// requested tags are recomputed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn detect_manual(
    requested: &[SemanticTag],
    values: &[String],
    counts: &PatternCounts,
    distinct: &BTreeSet<String>,
    geo: Option<&dyn GeoResolver>,
    observer: &dyn Observer,
    meta: &mut ColumnMeta,
) -> SemanticTypes {
    let mut tags = SemanticTypes::new();
    for &tag in requested {
        tags.insert(tag, SemanticValue::None);
    }

    for &tag in requested {
        match tag {
            SemanticTag::Boolean => {
                meta.unclean_values_ratio = Some(unclean_boolean_ratio(counts, values.len()));
            }
            SemanticTag::DateTime => {
                let parsed =
                    observe::scoped(observer, Phase::DateScan, || dates::parse_dates(values));
                tags.insert(SemanticTag::DateTime, SemanticValue::Instants(parsed));
            }
            SemanticTag::Admin => {
                // No coverage gate here: the caller asserted the meaning, we
                // only look up the areas over the full value sequence
                if let Some(geo) = geo
                    && distinct.len() >= ADMIN_MIN_DISTINCT
                {
                    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
                    let resolved = observe::scoped(observer, Phase::AdminAreas, || {
                        geo.resolve_names(&refs)
                    });
                    let areas: Vec<_> = resolved.into_iter().flatten().collect();
                    if !areas.is_empty()
                        && let Some(areas) = geo.disambiguate(&areas)
                    {
                        tags.insert(SemanticTag::Admin, SemanticValue::Areas(areas));
                    }
                }
            }
            SemanticTag::Categorical => {
                meta.num_distinct_values = Some(distinct.len());
                tags.insert(
                    SemanticTag::Categorical,
                    SemanticValue::Categories(distinct.clone()),
                );
            }
            _ => {}
        }
    }

    tags
}

#[allow(clippy::too_many_arguments)]
fn detect_text_tags(
    values: &[String],
    counts: &PatternCounts,
    threshold: f64,
    distinct: &BTreeSet<String>,
    geo: Option<&dyn GeoResolver>,
    observer: &dyn Observer,
    meta: &mut ColumnMeta,
    tags: &mut SemanticTypes,
) {
    let mut categorical = false;

    if counts.url as f64 >= threshold {
        tags.insert(SemanticTag::Url, SemanticValue::None);
    }
    if counts.file as f64 >= threshold {
        tags.insert(SemanticTag::FilePath, SemanticValue::None);
    }

    if let Some(geo) = geo
        && distinct.len() >= ADMIN_MIN_DISTINCT
    {
        observe::scoped(observer, Phase::AdminAreas, || {
            let refs: Vec<&str> = distinct.iter().map(String::as_str).collect();
            let resolved = geo.resolve_names(&refs);
            let areas: Vec<_> = resolved.into_iter().flatten().collect();
            if areas.len() as f64 > ADMIN_COVERAGE_RATIO * distinct.len() as f64
                && let Some(areas) = geo.disambiguate(&areas)
            {
                tags.insert(SemanticTag::Admin, SemanticValue::Areas(areas));
                categorical = true;
            }
        });
    }

    // Looser threshold: not all of the column needs to be many words
    let text_threshold = detection_threshold(values.len(), counts.empty, TEXT_WORDS_THRESHOLD);
    if !categorical && counts.text as f64 >= text_threshold {
        tags.insert(SemanticTag::Text, SemanticValue::None);
    } else {
        meta.num_distinct_values = Some(distinct.len());
        let max_categorical =
            MAX_CATEGORICAL_RATIO * (values.len().saturating_sub(counts.empty)) as f64;
        if categorical
            || distinct.len() as f64 <= max_categorical
            || tags.contains_key(&SemanticTag::Boolean)
        {
            tags.insert(
                SemanticTag::Categorical,
                SemanticValue::Categories(distinct.clone()),
            );
        }
    }
}

fn name_hints_id(name: &str) -> bool {
    let lowered = name.trim().to_ascii_lowercase();
    ID_NAME_HINTS
        .iter()
        .any(|hint| lowered.starts_with(hint) || lowered.ends_with(hint))
}

/// Name-triggered date/time component heuristics for integer and text
/// columns.
///
/// The units share accumulators: year, month, and day build into one instant
/// list (month overwrites the month field of year instants when both are
/// present), while hour, minute, and second build time-of-day placeholder
/// instants into another. The time units only tag once the date accumulator
/// has reached the threshold.
fn detect_named_components(
    name: &str,
    values: &[String],
    structural: &mut StructuralType,
    threshold: f64,
    tags: &mut SemanticTypes,
) {
    let lowered = name.trim().to_ascii_lowercase();
    let entry_structural = *structural;
    let mut instants: Vec<DateTime<Utc>> = Vec::new();

    if lowered.contains("year") {
        for value in values {
            match year_instant(value, entry_structural) {
                Some(instant) => instants.push(instant),
                None => debug!("column '{name}': value {value:?} has no usable year"),
            }
        }
        if instants.len() as f64 >= threshold {
            tag_date_component(
                structural,
                tags,
                SemanticTag::Date,
                ComponentGranularity::Year,
                &instants,
            );
        }
    }

    if lowered.contains("month") {
        if instants.is_empty() {
            for value in values {
                match replace_month(None, value) {
                    Some(instant) => instants.push(instant),
                    None => debug!("column '{name}': value {value:?} is not a month"),
                }
            }
            if instants.len() as f64 >= threshold {
                tag_date_component(
                    structural,
                    tags,
                    SemanticTag::Date,
                    ComponentGranularity::Month,
                    &instants,
                );
            }
        } else {
            // Year instants already exist: overwrite their month field
            let mut reached = false;
            for index in 0..instants.len() {
                let Some(raw) = values.get(index) else {
                    break;
                };
                match replace_month(Some(instants[index]), raw) {
                    Some(updated) => instants[index] = updated,
                    None => debug!("column '{name}': value {raw:?} is not a month"),
                }
                reached |= instants.len() as f64 >= threshold;
            }
            if reached {
                tag_date_component(
                    structural,
                    tags,
                    SemanticTag::Date,
                    ComponentGranularity::YearMonth,
                    &instants,
                );
            }
        }
    }

    if lowered.contains("day") {
        let mut reached = false;
        for value in values {
            match day_instant(value) {
                Some(instant) => instants.push(instant),
                None => debug!("column '{name}': value {value:?} is not a day of month"),
            }
            reached |= instants.len() as f64 >= threshold;
        }
        if reached {
            tag_date_component(
                structural,
                tags,
                SemanticTag::Date,
                ComponentGranularity::Day,
                &instants,
            );
        }
    }

    let mut times: Vec<DateTime<Utc>> = Vec::new();
    let time_units = [
        ("hour", ComponentGranularity::Hour),
        ("minute", ComponentGranularity::Minute),
        ("second", ComponentGranularity::Second),
    ];
    for (token, granularity) in time_units {
        if !lowered.contains(token) {
            continue;
        }
        // Time units gate on the date accumulator: a column named only
        // "hour"/"minute"/"second", with no date component, earns no tag
        let reached = instants.len() as f64 >= threshold;
        for value in values {
            match time_instant(value, granularity) {
                Some(instant) => times.push(instant),
                None => debug!("column '{name}': value {value:?} is not a {token}"),
            }
        }
        if reached {
            tag_date_component(structural, tags, SemanticTag::Time, granularity, &times);
        }
    }
}

/// Records a reached date/time component: the column is revised to text and
/// tagged with the granularity plus the instants built so far.
fn tag_date_component(
    structural: &mut StructuralType,
    tags: &mut SemanticTypes,
    tag: SemanticTag,
    granularity: ComponentGranularity,
    instants: &[DateTime<Utc>],
) {
    *structural = StructuralType::Text;
    tags.insert(
        tag,
        SemanticValue::Component {
            granularity,
            instants: instants.to_vec(),
        },
    );
}

fn year_instant(value: &str, structural: StructuralType) -> Option<DateTime<Utc>> {
    let raw = value.trim();
    let year_token = match structural {
        StructuralType::Integer => {
            // Columns mixing year and month arrive as YYYYMM integers
            let parsed: i64 = raw.parse().ok()?;
            if parsed > 9999 {
                dates::extract_year(raw)?
            } else {
                raw
            }
        }
        _ => {
            if raw.len() > 4 {
                dates::extract_year(raw)?
            } else {
                raw
            }
        }
    };
    let year: i32 = year_token.trim().parse().ok()?;
    if !(1..=9999).contains(&year) {
        return None;
    }
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

fn day_instant(value: &str) -> Option<DateTime<Utc>> {
    let day: u32 = value.trim().parse().ok()?;
    Utc.with_ymd_and_hms(1, 1, day, 0, 0, 0).single()
}

fn time_instant(value: &str, granularity: ComponentGranularity) -> Option<DateTime<Utc>> {
    let field: u32 = value.trim().parse().ok()?;
    let (hour, minute, second) = match granularity {
        ComponentGranularity::Hour => (field, 0, 0),
        ComponentGranularity::Minute => (0, field, 0),
        ComponentGranularity::Second => (0, 0, field),
        _ => return None,
    };
    Utc.with_ymd_and_hms(1, 1, 1, hour, minute, second).single()
}

fn month_number(token: &str) -> Option<u32> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        let number: u32 = trimmed.parse().ok()?;
        return (1..=12).contains(&number).then_some(number);
    }
    let lowered = trimmed.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|(full, short)| *full == lowered || *short == lowered)
        .map(|index| index as u32 + 1)
}

/// Builds a new placeholder instant for a month token, or overwrites the
/// month field of an existing instant.
fn replace_month(original: Option<DateTime<Utc>>, token: &str) -> Option<DateTime<Utc>> {
    let base = match original {
        Some(instant) => instant,
        None => Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single()?,
    };
    base.with_month(month_number(token)?)
}

fn detect_lat_long(name: &str, values: &[String], threshold: f64, tags: &mut SemanticTypes) {
    let mut num_lat = 0usize;
    let mut num_long = 0usize;
    for value in values {
        if let Ok(number) = value.trim().parse::<f64>() {
            if (-180.0..=180.0).contains(&number) {
                num_long += 1;
                if (-90.0..=90.0).contains(&number) {
                    num_lat += 1;
                }
            }
        }
    }

    let lowered = name.to_ascii_lowercase();
    if num_lat as f64 >= threshold
        && LATITUDE_NAME_HINTS.iter().any(|hint| lowered.contains(hint))
    {
        tags.insert(SemanticTag::Latitude, SemanticValue::None);
    }
    if num_long as f64 >= threshold
        && LONGITUDE_NAME_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
    {
        tags.insert(SemanticTag::Longitude, SemanticValue::None);
    }
}
