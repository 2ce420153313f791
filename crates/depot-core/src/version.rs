//! Package version parsing and comparison.
//!
//! Depot versions are not semver: build artifacts in the wild carry
//! strings like `1.3.0`, `2.3.7`, or `0.8.0.dev5698`. Comparison is
//! segment-based:
//! - Segments split on `.`, `-`, and `_`
//! - Numeric segments compare as numbers
//! - `devNNNN` segments order before their release (`1.0.dev3 < 1.0`)
//! - Other text segments order before release and compare
//!   case-insensitively among themselves
//! - Missing trailing segments compare equal to release
//!   (`1.0 == 1.0.0`)

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed package version with comparable segments.
///
/// The original string is preserved; `Display` reproduces it exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Version {
    original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    /// A development tag such as `dev5698`.
    Dev(u64),
    Text(String),
}

impl Version {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            segments: parse_segments(version),
        }
    }

    /// The exact string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_dev(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Dev(_)))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.original
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => compare_segment_to_release(s),
        (None, Some(s)) => compare_segment_to_release(s).reverse(),
        (Some(a), Some(b)) => compare_two_segments(a, b),
    }
}

/// How a trailing segment compares against an absent one.
fn compare_segment_to_release(seg: &Segment) -> Ordering {
    match seg {
        Segment::Numeric(0) => Ordering::Equal,
        Segment::Numeric(_) => Ordering::Greater,
        Segment::Dev(_) => Ordering::Less,
        Segment::Text(s) if s.is_empty() => Ordering::Equal,
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_two_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Dev(a), Segment::Dev(b)) => a.cmp(b),
        (Segment::Numeric(_), Segment::Dev(_)) => Ordering::Greater,
        (Segment::Dev(_), Segment::Numeric(_)) => Ordering::Less,
        (Segment::Numeric(_), Segment::Text(_)) => Ordering::Greater,
        (Segment::Text(_), Segment::Numeric(_)) => Ordering::Less,
        (Segment::Dev(_), Segment::Text(_)) => Ordering::Less,
        (Segment::Text(_), Segment::Dev(_)) => Ordering::Greater,
        (Segment::Text(a), Segment::Text(b)) => {
            a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
        }
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in version.chars() {
        if ch == '.' || ch == '-' || ch == '_' {
            if !current.is_empty() {
                segments.push(classify(&current));
                current.clear();
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        segments.push(classify(&current));
    }

    segments
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }
    if let Some(rest) = token.strip_prefix("dev") {
        if let Ok(n) = rest.parse::<u64>() {
            return Segment::Dev(n);
        }
        if rest.is_empty() {
            return Segment::Dev(0);
        }
    }
    Segment::Text(token.to_string())
}
