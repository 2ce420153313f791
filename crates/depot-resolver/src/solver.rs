//! Turns install/remove jobs into a concrete, ordered operation list.

use std::fmt;

use depot_core::{Artifact, InstalledSet, Repository, Requirement};
use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::resolver::{ResolveMode, Resolver};

/// What a job asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Install,
    Remove,
}

/// One unit of caller intent: install or remove whatever satisfies the
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    pub requirement: Requirement,
}

impl Job {
    pub fn install(requirement: Requirement) -> Self {
        Self {
            kind: JobKind::Install,
            requirement,
        }
    }

    pub fn remove(requirement: Requirement) -> Self {
        Self {
            kind: JobKind::Remove,
            requirement,
        }
    }
}

/// What the execution layer should do to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Install,
    Remove,
}

/// One concrete step of the plan, identified by artifact key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OpKind,
    pub key: String,
}

impl Operation {
    fn install(key: &str) -> Self {
        Self {
            kind: OpKind::Install,
            key: key.to_string(),
        }
    }

    fn remove(key: &str) -> Self {
        Self {
            kind: OpKind::Remove,
            key: key.to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OpKind::Install => write!(f, "install {}", self.key),
            OpKind::Remove => write!(f, "remove {}", self.key),
        }
    }
}

/// Plans a batch of jobs against a repository and the installed set.
///
/// A pure function of its inputs: `resolve` returns the operation list
/// and mutates nothing. Executing the operations is the install layer's
/// job.
pub struct Solver<'a, R: Repository, I: InstalledSet> {
    resolver: Resolver<'a, R>,
    installed: &'a I,
    mode: ResolveMode,
    force: bool,
    forceall: bool,
}

impl<'a, R: Repository, I: InstalledSet> Solver<'a, R, I> {
    pub fn new(repo: &'a R, installed: &'a I) -> Self {
        Self {
            resolver: Resolver::new(repo),
            installed,
            mode: ResolveMode::default(),
            force: false,
            forceall: false,
        }
    }

    /// Resolution mode for install jobs (default `Recur`).
    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reinstall the requested artifact even when already installed.
    /// Dependencies are still filtered.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Reinstall everything in the sequence, installed or not.
    pub fn with_forceall(mut self, forceall: bool) -> Self {
        self.forceall = forceall;
        self
    }

    /// Plan all jobs, in order, into one operation list.
    pub fn resolve(&self, jobs: &[Job]) -> Result<Vec<Operation>, SolveError> {
        let mut operations = Vec::new();
        for job in jobs {
            match job.kind {
                JobKind::Install => self.plan_install(&job.requirement, &mut operations)?,
                JobKind::Remove => self.plan_remove(&job.requirement, &mut operations)?,
            }
        }
        Ok(operations)
    }

    fn plan_install(
        &self,
        requirement: &Requirement,
        operations: &mut Vec<Operation>,
    ) -> Result<(), SolveError> {
        let sequence = self.resolver.install_sequence(requirement, self.mode)?;
        // The root of the request is the last artifact in dependency order.
        let root_key = sequence
            .last()
            .map(|a| a.key().to_string())
            .unwrap_or_default();

        let mut keep: Vec<Artifact> = Vec::new();
        for artifact in sequence {
            let force_this = self.forceall || (self.force && artifact.key() == root_key);
            if !force_this && self.installed_key(&artifact) {
                tracing::debug!("{} already installed, skipping", artifact.key());
                continue;
            }
            keep.push(artifact);
        }

        let start = operations.len();
        for artifact in &keep {
            operations.push(Operation::install(artifact.key()));
        }

        // In reverse dependency order, schedule removal of a superseded
        // same-name artifact immediately before its replacement install.
        for artifact in keep.iter().rev() {
            let superseded: Vec<String> = self
                .installed
                .find(artifact.name(), None, None)
                .into_iter()
                .filter(|i| i.key() != artifact.key())
                .map(|i| i.key().to_string())
                .collect();
            for old_key in superseded {
                let found = operations[start..]
                    .iter()
                    .position(|op| op.kind == OpKind::Install && op.key == artifact.key());
                if let Some(pos) = found {
                    tracing::debug!("{} supersedes installed {old_key}", artifact.key());
                    operations.insert(start + pos, Operation::remove(&old_key));
                }
            }
        }

        Ok(())
    }

    fn plan_remove(
        &self,
        requirement: &Requirement,
        operations: &mut Vec<Operation>,
    ) -> Result<(), SolveError> {
        let ambiguous = |count: usize| SolveError::AmbiguousRemoval {
            requirement: requirement.clone(),
            count,
        };
        let name = requirement.name().ok_or_else(|| ambiguous(0))?;
        let matches = self
            .installed
            .find(name, requirement.version(), requirement.build());
        match matches.as_slice() {
            [artifact] => {
                operations.push(Operation::remove(artifact.key()));
                Ok(())
            }
            _ => Err(ambiguous(matches.len())),
        }
    }

    /// Whether this exact artifact (by key) is already installed.
    fn installed_key(&self, artifact: &Artifact) -> bool {
        self.installed
            .find(artifact.name(), None, None)
            .iter()
            .any(|i| i.key() == artifact.key())
    }
}
