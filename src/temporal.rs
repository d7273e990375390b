//! Temporal resolution estimation and instant distribution statistics.
//!
//! Given the distinct instants parsed from a column, [`estimate_resolution`]
//! finds the coarsest granularity at which the instants can be distinguished
//! without excessive collisions: granularities are tried coarse to fine, and
//! the first one whose average distinct-instants-per-bin stays under the 5%
//! collision tolerance wins. The distribution helpers summarize where the
//! instants fall within the year, the ISO week calendar, and the day.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Tolerated average of distinct instants per bin before a granularity is
/// considered too coarse (5% collisions).
const BIN_COLLISION_TOLERANCE: f64 = 1.05;

/// Time granularity, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalResolution {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TemporalResolution {
    pub fn as_str(self) -> &'static str {
        match self {
            TemporalResolution::Year => "year",
            TemporalResolution::Quarter => "quarter",
            TemporalResolution::Month => "month",
            TemporalResolution::Week => "week",
            TemporalResolution::Day => "day",
            TemporalResolution::Hour => "hour",
            TemporalResolution::Minute => "minute",
            TemporalResolution::Second => "second",
        }
    }
}

fn quarter_of(instant: &DateTime<Utc>) -> u32 {
    (instant.month() - 1) / 3 + 1
}

fn week_start(instant: &DateTime<Utc>) -> String {
    // "%Y-%W" misbehaves at year boundaries; map to the first day of the week
    let monday = *instant - Duration::days(instant.weekday().num_days_from_monday() as i64);
    monday.format("%Y-%m-%d").to_string()
}

fn bin_key(resolution: TemporalResolution, instant: &DateTime<Utc>) -> String {
    match resolution {
        TemporalResolution::Year => instant.format("%Y").to_string(),
        TemporalResolution::Quarter => format!("{}-Q{}", instant.year(), quarter_of(instant)),
        TemporalResolution::Month => instant.format("%Y-%m").to_string(),
        TemporalResolution::Week => week_start(instant),
        TemporalResolution::Day => instant.format("%Y-%m-%d").to_string(),
        TemporalResolution::Hour => instant.format("%Y-%m-%d %H").to_string(),
        TemporalResolution::Minute => instant.format("%Y-%m-%d %H:%M").to_string(),
        TemporalResolution::Second => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Granularity ladder tried by [`estimate_resolution`], coarse to fine. The
/// order is an explicit list; nothing here relies on map iteration order.
pub const RESOLUTION_LADDER: &[TemporalResolution] = &[
    TemporalResolution::Year,
    TemporalResolution::Quarter,
    TemporalResolution::Month,
    TemporalResolution::Week,
    TemporalResolution::Day,
    TemporalResolution::Hour,
    TemporalResolution::Minute,
    TemporalResolution::Second,
];

/// Estimates the resolution of a temporal attribute from its instants.
///
/// Duplicate instants are collapsed before estimation. Returns `None` only
/// for an empty input.
pub fn estimate_resolution<I>(instants: I) -> Option<TemporalResolution>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let distinct: BTreeSet<DateTime<Utc>> = instants.into_iter().collect();
    if distinct.is_empty() {
        return None;
    }

    if distinct.len() == 1 {
        let only = distinct.iter().next().expect("single instant");
        return Some(if only.second() != 0 {
            TemporalResolution::Second
        } else if only.minute() != 0 {
            TemporalResolution::Minute
        } else if only.hour() != 0 {
            TemporalResolution::Hour
        } else {
            TemporalResolution::Day
        });
    }

    for &resolution in RESOLUTION_LADDER {
        let bins: HashSet<String> = distinct
            .iter()
            .map(|instant| bin_key(resolution, instant))
            .collect();
        let avg_per_bin = distinct.len() as f64 / bins.len() as f64;
        if avg_per_bin < BIN_COLLISION_TOLERANCE {
            return Some(resolution);
        }
    }

    Some(TemporalResolution::Second)
}

/// Four coarse buckets of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    fn of(instant: &DateTime<Utc>) -> Self {
        match instant.hour() {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=23 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

fn percentages<K: Ord + Hash>(keys: impl Iterator<Item = K>, total: usize) -> BTreeMap<K, f64> {
    keys.counts()
        .into_iter()
        .map(|(key, count)| (key, count as f64 / total as f64 * 100.0))
        .collect()
}

/// Percentage of instants falling in each quarter of the year (1..=4).
pub fn quarter_distribution(instants: &[DateTime<Utc>]) -> BTreeMap<u32, f64> {
    if instants.is_empty() {
        return BTreeMap::new();
    }
    percentages(instants.iter().map(quarter_of), instants.len())
}

/// Percentage of instants falling in each ISO week of the year.
pub fn week_distribution(instants: &[DateTime<Utc>]) -> BTreeMap<u32, f64> {
    if instants.is_empty() {
        return BTreeMap::new();
    }
    percentages(
        instants.iter().map(|instant| instant.iso_week().week()),
        instants.len(),
    )
}

/// Percentage of instants falling in each time-of-day bucket.
pub fn time_of_day_distribution(instants: &[DateTime<Utc>]) -> BTreeMap<TimeOfDay, f64> {
    if instants.is_empty() {
        return BTreeMap::new();
    }
    percentages(instants.iter().map(TimeOfDay::of), instants.len())
}
