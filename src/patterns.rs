//! Shape-pattern classification over raw column values.
//!
//! A single pass over a column counts how many values match each of a fixed
//! set of shape patterns. The cascade is strictly first-match-in-declared-order
//! over mutually exclusive categories; the declaration order in [`CASCADE`] is
//! part of the contract. The boolean token count is independent of the
//! cascade: a value such as `"1"` counts as both `int` and `bool`.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum number of whitespace-separated tokens for a value to count as
/// free text.
pub const TEXT_WORDS: usize = 4;

static RE_INT: LazyLock<Regex> = LazyLock::new(|| {
    // 4.0 and 7.000 are integers
    Regex::new(r"^[+-]?[0-9]+(?:\.0*)?$").expect("int pattern")
});
static RE_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:(?:[0-9]+\.[0-9]*)|(?:\.[0-9]+))(?:[Ee][+-]?[0-9]+)?$")
        .expect("float pattern")
});
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:http|https|ftp)://|www\.)[a-zA-Z0-9$@.+,;!*~'()\[\]:/?&=#%_-]+$")
        .expect("url pattern")
});
static RE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    // URI format, Windows drives, MacOS and UNIX well-known roots
    Regex::new(
        r"(?:^file://)|(?:^[CD]:\\)|(?:^/(?:Applications|Library|System|Users|Volumes|bin|boot|dev|etc|home|lib|opt|proc|root|run|sbin|srv|usr|var|tmp)/)",
    )
    .expect("file pattern")
});
static RE_WKT_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^POINT ?\(-?[0-9]{1,3}\.[0-9]{1,15} -?[0-9]{1,3}\.[0-9]{1,15}\)$")
        .expect("wkt point pattern")
});
static RE_GEO_COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    // Place name followed by parenthesized coordinates, e.g. "Brooklyn (40.6, -73.9)"
    Regex::new(
        r"^([\p{Lu}\p{Po}0-9 ])+ \(-?[0-9]{1,3}\.[0-9]{1,15}, ?-?[0-9]{1,3}\.[0-9]{1,15}\)$",
    )
    .expect("combined geo pattern")
});
static RE_OTHER_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^POINT ?\(-?[0-9]{1,3}\.[0-9]{1,15}, ?-?[0-9]{1,3}\.[0-9]{1,15}\)$")
        .expect("comma point pattern")
});
static RE_LATLONG_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(-?[0-9]{1,3}\.[0-9]{1,15}, ?-?[0-9]{1,3}\.[0-9]{1,15}\)$")
        .expect("bare point pattern")
});
static RE_WKT_POLYGON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^POLYGON ?\(\([0-9 .]+\)(, ?\([0-9 .]+\))*\)$").expect("wkt polygon pattern")
});
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

const BOOLEAN_TOKENS: &[&str] = &["0", "1", "true", "false", "y", "n", "yes", "no"];

/// Shape category a value can fall into. One per value, assigned by the first
/// matching entry of [`CASCADE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTag {
    Empty,
    Int,
    Float,
    Url,
    File,
    Point,
    GeoCombined,
    OtherPoint,
    LatLongPoint,
    Polygon,
    Text,
}

fn is_empty(value: &str) -> bool {
    value.is_empty()
}

fn is_int(value: &str) -> bool {
    RE_INT.is_match(value)
}

fn is_float(value: &str) -> bool {
    RE_FLOAT.is_match(value)
}

fn is_url(value: &str) -> bool {
    RE_URL.is_match(value)
}

fn is_file(value: &str) -> bool {
    RE_FILE.is_match(value)
}

fn is_wkt_point(value: &str) -> bool {
    RE_WKT_POINT.is_match(value)
}

fn is_geo_combined(value: &str) -> bool {
    RE_GEO_COMBINED.is_match(value)
}

fn is_other_point(value: &str) -> bool {
    RE_OTHER_POINT.is_match(value)
}

fn is_latlong_point(value: &str) -> bool {
    RE_LATLONG_POINT.is_match(value)
}

fn is_wkt_polygon(value: &str) -> bool {
    RE_WKT_POLYGON.is_match(value)
}

fn is_free_text(value: &str) -> bool {
    RE_WHITESPACE.find_iter(value).count() >= TEXT_WORDS - 1
}

/// The classification cascade, evaluated top to bottom; first match wins.
pub const CASCADE: &[(PatternTag, fn(&str) -> bool)] = &[
    (PatternTag::Empty, is_empty),
    (PatternTag::Int, is_int),
    (PatternTag::Float, is_float),
    (PatternTag::Url, is_url),
    (PatternTag::File, is_file),
    (PatternTag::Point, is_wkt_point),
    (PatternTag::GeoCombined, is_geo_combined),
    (PatternTag::OtherPoint, is_other_point),
    (PatternTag::LatLongPoint, is_latlong_point),
    (PatternTag::Polygon, is_wkt_polygon),
    (PatternTag::Text, is_free_text),
];

/// Whether the lowercase form of the value is one of the boolean tokens.
pub fn is_boolean_token(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    BOOLEAN_TOKENS.contains(&lowered.as_str())
}

/// Per-pattern occurrence counts for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub empty: usize,
    pub int: usize,
    pub float: usize,
    pub url: usize,
    pub file: usize,
    pub point: usize,
    pub geo_combined: usize,
    pub other_point: usize,
    pub latlong_point: usize,
    pub polygon: usize,
    pub text: usize,
    /// Independent of the cascade tags above.
    pub boolean: usize,
}

impl PatternCounts {
    fn bump(&mut self, tag: PatternTag) {
        match tag {
            PatternTag::Empty => self.empty += 1,
            PatternTag::Int => self.int += 1,
            PatternTag::Float => self.float += 1,
            PatternTag::Url => self.url += 1,
            PatternTag::File => self.file += 1,
            PatternTag::Point => self.point += 1,
            PatternTag::GeoCombined => self.geo_combined += 1,
            PatternTag::OtherPoint => self.other_point += 1,
            PatternTag::LatLongPoint => self.latlong_point += 1,
            PatternTag::Polygon => self.polygon += 1,
            PatternTag::Text => self.text += 1,
        }
    }

    pub fn get(&self, tag: PatternTag) -> usize {
        match tag {
            PatternTag::Empty => self.empty,
            PatternTag::Int => self.int,
            PatternTag::Float => self.float,
            PatternTag::Url => self.url,
            PatternTag::File => self.file,
            PatternTag::Point => self.point,
            PatternTag::GeoCombined => self.geo_combined,
            PatternTag::OtherPoint => self.other_point,
            PatternTag::LatLongPoint => self.latlong_point,
            PatternTag::Polygon => self.polygon,
            PatternTag::Text => self.text,
        }
    }
}

/// Classifies the shape of a single value against the cascade.
pub fn classify_value(value: &str) -> Option<PatternTag> {
    CASCADE
        .iter()
        .find(|(_, matches)| matches(value))
        .map(|(tag, _)| *tag)
}

/// Counts pattern matches across a whole column in one pass.
pub fn count_patterns<S: AsRef<str>>(values: &[S]) -> PatternCounts {
    let mut counts = PatternCounts::default();
    for value in values {
        let value = value.as_ref();
        if let Some(tag) = classify_value(value) {
            counts.bump(tag);
        }
        if is_boolean_token(value) {
            counts.boolean += 1;
        }
    }
    counts
}
