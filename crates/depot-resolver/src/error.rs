use depot_core::Requirement;
use miette::Diagnostic;
use thiserror::Error;

/// Resolution and planning failures.
///
/// Every variant carries the offending requirement/artifact so a
/// presentation layer can render a precise message. Errors propagate
/// unmodified; this engine performs no retries and no partial recovery.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum SolveError {
    /// No artifact in the repository satisfies the requirement.
    #[error("no package found matching `{requirement}`")]
    #[diagnostic(help("check the project name and version against the repository index"))]
    NoPackageFound { requirement: Requirement },

    /// A declared dependency could not be resolved during closure
    /// computation. `declared_by` is the key of the artifact that
    /// declared it.
    #[error("can not resolve `{requirement}` required by {declared_by}")]
    MissingDependency {
        declared_by: String,
        requirement: Requirement,
    },

    /// Install ordering made no progress on a full pass; `keys` is the
    /// stuck subset.
    #[error("loop in dependency graph: {}", keys.join(", "))]
    #[diagnostic(help("these artifacts require each other and cannot be ordered"))]
    DependencyCycle { keys: Vec<String> },

    /// A remove requirement matched zero installed artifacts, or was too
    /// weak to single one out.
    #[error("`{requirement}` matches {count} installed packages, expected exactly one")]
    #[diagnostic(help("narrow the requirement with a version or build number"))]
    AmbiguousRemoval {
        requirement: Requirement,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_package_found_display() {
        let err = SolveError::NoPackageFound {
            requirement: "scipy 0.8.0".parse().unwrap(),
        };
        assert_eq!(err.to_string(), "no package found matching `scipy 0.8.0`");
    }

    #[test]
    fn missing_dependency_display() {
        let err = SolveError::MissingDependency {
            declared_by: "scipy-0.8.0.dev5698-1".to_string(),
            requirement: "numpy 1.3.0".parse().unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "can not resolve `numpy 1.3.0` required by scipy-0.8.0.dev5698-1"
        );
    }

    #[test]
    fn cycle_display_mentions_loop() {
        let err = SolveError::DependencyCycle {
            keys: vec!["a-1.0-1".to_string(), "b-1.0-1".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("loop"), "got: {msg}");
        assert!(msg.contains("a-1.0-1"));
        assert!(msg.contains("b-1.0-1"));
    }

    #[test]
    fn ambiguous_removal_display() {
        let err = SolveError::AmbiguousRemoval {
            requirement: "numpy".parse().unwrap(),
            count: 0,
        };
        assert!(err.to_string().contains("matches 0 installed packages"));
    }
}
