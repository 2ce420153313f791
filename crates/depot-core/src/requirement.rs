//! Requirement strings: parsing, canonical rendering, and artifact matching.

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::Artifact;

/// Malformed requirement string.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("invalid requirement `{input}`: {reason}")]
#[diagnostic(help("expected `name`, `name version`, or `name version-build`"))]
pub struct RequirementParseError {
    pub input: String,
    pub reason: String,
}

/// A name/version/build constraint on package artifacts.
///
/// The textual form is `NAME`, `NAME VERSION`, or `NAME VERSION-BUILD`;
/// the empty string is the unconstrained requirement. The derived
/// `strictness` counts how many of the three fields are pinned:
///
/// | strictness | constrains           |
/// |------------|----------------------|
/// | 0          | nothing              |
/// | 1          | name                 |
/// | 2          | name, version        |
/// | 3          | name, version, build |
///
/// Names are canonicalized to lower case at construction. Immutable once
/// built; serde uses the canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Requirement {
    name: Option<String>,
    version: Option<String>,
    build: Option<u32>,
    strictness: u8,
}

impl Requirement {
    /// The unconstrained requirement (strictness 0); matches every artifact.
    pub fn any() -> Self {
        Self {
            name: None,
            version: None,
            build: None,
            strictness: 0,
        }
    }

    fn from_parts(
        name: Option<String>,
        version: Option<String>,
        build: Option<u32>,
    ) -> Self {
        let strictness = match (&name, &version, &build) {
            (None, ..) => 0,
            (Some(_), None, _) => 1,
            (Some(_), Some(_), None) => 2,
            (Some(_), Some(_), Some(_)) => 3,
        };
        Self {
            name: name.map(|n| n.to_ascii_lowercase()),
            version,
            build,
            strictness,
        }
    }

    /// Canonical (lower-cased) project name, if constrained.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    /// How many of name/version/build this requirement pins (0..=3).
    pub fn strictness(&self) -> u8 {
        self.strictness
    }

    /// Whether `artifact` satisfies this requirement.
    ///
    /// Checks are tiered and short-circuit: name (case-insensitive), then
    /// the exact version string, then the build number.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        let Some(name) = self.name.as_deref() else {
            return true;
        };
        if !artifact.name().eq_ignore_ascii_case(name) {
            return false;
        }
        let Some(version) = self.version.as_deref() else {
            return true;
        };
        if artifact.version().as_str() != version {
            return false;
        }
        match self.build {
            None => true,
            Some(build) => artifact.build() == build,
        }
    }
}

impl FromStr for Requirement {
    type Err = RequirementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| RequirementParseError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Ok(Self::any()),
            [name] => {
                check_token(name).map_err(|r| err(&r))?;
                Ok(Self::from_parts(Some((*name).to_string()), None, None))
            }
            [name, verbuild] => {
                check_token(name).map_err(|r| err(&r))?;
                let (version, build) = match verbuild.rsplit_once('-') {
                    Some((version, build)) => {
                        let build: u32 = build
                            .parse()
                            .map_err(|_| err("build must be a non-negative integer"))?;
                        (version, Some(build))
                    }
                    None => (*verbuild, None),
                };
                check_token(version).map_err(|r| err(&r))?;
                Ok(Self::from_parts(
                    Some((*name).to_string()),
                    Some(version.to_string()),
                    build,
                ))
            }
            _ => Err(err("too many tokens")),
        }
    }
}

/// NAME and VERSION tokens admit word characters and dots only.
fn check_token(token: &str) -> Result<(), String> {
    if token.is_empty() {
        return Err("empty token".to_string());
    }
    match token
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '.')
    {
        Some(c) => Err(format!("unexpected character `{c}`")),
        None => Ok(()),
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.version, &self.build) {
            (Some(n), Some(v), Some(b)) => write!(f, "{n} {v}-{b}"),
            (Some(n), Some(v), None) => write!(f, "{n} {v}"),
            (Some(n), None, _) => write!(f, "{n}"),
            (None, ..) => Ok(()),
        }
    }
}

impl TryFrom<String> for Requirement {
    type Error = RequirementParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Requirement> for String {
    fn from(r: Requirement) -> Self {
        r.to_string()
    }
}
