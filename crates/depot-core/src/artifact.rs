//! A concrete, resolvable package unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::requirement::Requirement;
use crate::version::Version;

/// One installable artifact: a project name at an exact version and
/// build number, plus the requirements it declares on other projects.
///
/// The `key` is the globally unique identifier the execution layer
/// operates on, in the canonical form `name-version-build`. Artifacts are
/// owned by the repository and never mutated by the resolution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    key: String,
    name: String,
    version: Version,
    build: u32,
    requires: Vec<Requirement>,
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        version: &str,
        build: u32,
        requires: Vec<Requirement>,
    ) -> Self {
        let name = name.into();
        Self {
            key: format!("{name}-{version}-{build}"),
            name,
            version: Version::parse(version),
            build,
            requires,
        }
    }

    /// Globally unique identifier, `name-version-build`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Project name as published (original casing).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical lower-cased project name, as used in requirements.
    pub fn cname(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn build(&self) -> u32 {
        self.build
    }

    /// Requirements this artifact declares on other projects.
    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
