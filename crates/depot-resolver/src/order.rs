//! Deterministic install ordering over a complete dependency closure.

use std::collections::HashSet;

use depot_core::Artifact;

use crate::error::SolveError;

/// Order a complete closure so every dependency precedes its dependents.
///
/// The input must already be closed: every project name referenced by any
/// artifact's requirements is present in the set. This is re-validated and
/// violations surface as `MissingDependency` naming the referencing
/// artifact.
///
/// Artifacts are first sorted by project name so the result is
/// deterministic, then placed in repeated passes: any artifact whose
/// dependency names are all placed is appended and its name marked
/// placed. A full pass that places nothing means the remaining artifacts
/// require each other, which fails with `DependencyCycle` listing them.
pub fn determine_install_order(artifacts: Vec<Artifact>) -> Result<Vec<Artifact>, SolveError> {
    let names: HashSet<String> = artifacts.iter().map(|a| a.cname()).collect();
    for artifact in &artifacts {
        for req in artifact.requires() {
            if let Some(name) = req.name() {
                if !names.contains(name) {
                    return Err(SolveError::MissingDependency {
                        declared_by: artifact.key().to_string(),
                        requirement: req.clone(),
                    });
                }
            }
        }
    }

    let mut remaining = artifacts;
    remaining.sort_by_key(|a| a.cname());

    let mut placed: HashSet<String> = HashSet::new();
    let mut ordered = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let before = ordered.len();
        let mut i = 0;
        while i < remaining.len() {
            let ready = remaining[i]
                .requires()
                .iter()
                .filter_map(|r| r.name())
                .all(|name| placed.contains(name));
            if ready {
                let artifact = remaining.remove(i);
                placed.insert(artifact.cname());
                ordered.push(artifact);
            } else {
                i += 1;
            }
        }
        if ordered.len() == before {
            return Err(SolveError::DependencyCycle {
                keys: remaining.iter().map(|a| a.key().to_string()).collect(),
            });
        }
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::Requirement;

    fn artifact(name: &str, version: &str, requires: &[&str]) -> Artifact {
        let reqs: Vec<Requirement> = requires.iter().map(|r| r.parse().unwrap()).collect();
        Artifact::new(name, version, 1, reqs)
    }

    fn keys(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.key()).collect()
    }

    #[test]
    fn chain_orders_dependency_first() {
        let ordered = determine_install_order(vec![
            artifact("app", "1.0", &["lib"]),
            artifact("lib", "2.0", &[]),
        ])
        .unwrap();
        assert_eq!(keys(&ordered), ["lib-2.0-1", "app-1.0-1"]);
    }

    #[test]
    fn independent_artifacts_sort_by_name() {
        let ordered = determine_install_order(vec![
            artifact("zlib", "1.0", &[]),
            artifact("bzip2", "1.0", &[]),
            artifact("lzma", "1.0", &[]),
        ])
        .unwrap();
        assert_eq!(keys(&ordered), ["bzip2-1.0-1", "lzma-1.0-1", "zlib-1.0-1"]);
    }

    #[test]
    fn diamond_is_a_valid_topological_order() {
        let ordered = determine_install_order(vec![
            artifact("top", "1.0", &["left", "right"]),
            artifact("left", "1.0", &["base"]),
            artifact("right", "1.0", &["base"]),
            artifact("base", "1.0", &[]),
        ])
        .unwrap();
        let pos = |key: &str| keys(&ordered).iter().position(|k| *k == key).unwrap();
        assert!(pos("base-1.0-1") < pos("left-1.0-1"));
        assert!(pos("base-1.0-1") < pos("right-1.0-1"));
        assert!(pos("left-1.0-1") < pos("top-1.0-1"));
        assert!(pos("right-1.0-1") < pos("top-1.0-1"));
    }

    #[test]
    fn mutual_cycle_is_detected() {
        let err = determine_install_order(vec![
            artifact("a", "1.0", &["b"]),
            artifact("b", "1.0", &["a"]),
        ])
        .unwrap_err();
        match err {
            SolveError::DependencyCycle { keys } => {
                assert_eq!(keys, ["a-1.0-1", "b-1.0-1"]);
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_closure_is_rejected() {
        let err = determine_install_order(vec![artifact("app", "1.0", &["lib"])]).unwrap_err();
        match err {
            SolveError::MissingDependency {
                declared_by,
                requirement,
            } => {
                assert_eq!(declared_by, "app-1.0-1");
                assert_eq!(requirement.name(), Some("lib"));
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(determine_install_order(vec![]).unwrap().is_empty());
    }
}
