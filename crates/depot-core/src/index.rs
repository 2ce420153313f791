//! Read-only package indexes consumed by the resolution engine.
//!
//! `Repository` is the index of every known artifact; `InstalledSet` is
//! the index of what is currently on the machine. Both are treated as
//! immutable snapshots for the duration of one resolution call. The
//! in-memory implementations here back tests and any caller that loads
//! an index before planning; network-backed implementations live in the
//! fetch layer, outside this workspace's scope.

use std::collections::HashMap;

use crate::artifact::Artifact;
use crate::requirement::Requirement;

/// A queryable index of known package artifacts.
///
/// Multiple artifacts may share a project name (different versions and
/// builds). Name lookups are case-insensitive.
pub trait Repository {
    /// All artifacts whose project name matches `name`.
    fn find_by_name(&self, name: &str) -> Vec<&Artifact>;

    /// The artifact with exactly this name and version string. When
    /// several builds of the same version exist, the highest build wins.
    fn find_exact(&self, name: &str, version: &str) -> Option<&Artifact>;

    /// The requirements declared by the artifact with this key, or empty
    /// if the key is unknown.
    fn dependencies_of(&self, key: &str) -> Vec<Requirement>;
}

/// A queryable index of currently-installed artifacts.
///
/// The install layer guarantees at most one artifact per project name.
pub trait InstalledSet {
    /// Installed artifacts matching the given name and, when supplied,
    /// the exact version string and build number.
    fn find(&self, name: &str, version: Option<&str>, build: Option<u32>) -> Vec<&Artifact>;
}

/// An in-memory `Repository` snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemRepository {
    artifacts: Vec<Artifact>,
    by_name: HashMap<String, Vec<usize>>,
    by_key: HashMap<String, usize>,
}

impl MemRepository {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_key = HashMap::new();
        for (i, artifact) in artifacts.iter().enumerate() {
            by_name.entry(artifact.cname()).or_default().push(i);
            by_key.insert(artifact.key().to_string(), i);
        }
        Self {
            artifacts,
            by_name,
            by_key,
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl Repository for MemRepository {
    fn find_by_name(&self, name: &str) -> Vec<&Artifact> {
        match self.by_name.get(&name.to_ascii_lowercase()) {
            Some(indices) => indices.iter().map(|&i| &self.artifacts[i]).collect(),
            None => Vec::new(),
        }
    }

    fn find_exact(&self, name: &str, version: &str) -> Option<&Artifact> {
        self.find_by_name(name)
            .into_iter()
            .filter(|a| a.version().as_str() == version)
            .max_by_key(|a| a.build())
    }

    fn dependencies_of(&self, key: &str) -> Vec<Requirement> {
        match self.by_key.get(key) {
            Some(&i) => self.artifacts[i].requires().to_vec(),
            None => Vec::new(),
        }
    }
}

/// An in-memory `InstalledSet` snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemInstalledSet {
    artifacts: Vec<Artifact>,
}

impl MemInstalledSet {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }
}

impl InstalledSet for MemInstalledSet {
    fn find(&self, name: &str, version: Option<&str>, build: Option<u32>) -> Vec<&Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.name().eq_ignore_ascii_case(name))
            .filter(|a| version.map_or(true, |v| a.version().as_str() == v))
            .filter(|a| build.map_or(true, |b| a.build() == b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemRepository {
        MemRepository::new(vec![
            Artifact::new("numpy", "1.2.0", 1, vec![]),
            Artifact::new("numpy", "1.3.0", 1, vec![]),
            Artifact::new("numpy", "1.3.0", 2, vec![]),
            Artifact::new("PIL", "1.1.6", 4, vec![]),
        ])
    }

    #[test]
    fn find_by_name_case_insensitive() {
        let repo = fixture();
        assert_eq!(repo.find_by_name("numpy").len(), 3);
        assert_eq!(repo.find_by_name("pil").len(), 1);
        assert_eq!(repo.find_by_name("PIL").len(), 1);
        assert!(repo.find_by_name("nosuch").is_empty());
    }

    #[test]
    fn find_exact_prefers_highest_build() {
        let repo = fixture();
        let a = repo.find_exact("numpy", "1.3.0").unwrap();
        assert_eq!(a.key(), "numpy-1.3.0-2");
        assert!(repo.find_exact("numpy", "9.9").is_none());
    }

    #[test]
    fn dependencies_of_unknown_key_is_empty() {
        let repo = fixture();
        assert!(repo.dependencies_of("nosuch-1.0-1").is_empty());
    }

    #[test]
    fn installed_set_find() {
        let installed = MemInstalledSet::new(vec![
            Artifact::new("numpy", "1.3.0", 1, vec![]),
            Artifact::new("PIL", "1.1.6", 4, vec![]),
        ]);
        assert_eq!(installed.find("numpy", None, None).len(), 1);
        assert_eq!(installed.find("numpy", Some("1.3.0"), Some(1)).len(), 1);
        assert!(installed.find("numpy", Some("1.2.0"), None).is_empty());
        assert!(installed.find("scipy", None, None).is_empty());
    }
}
