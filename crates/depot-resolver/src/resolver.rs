//! Core resolution algorithm: latest-artifact selection, transitive
//! closure with an explicit worklist, and strictest-wins conflict
//! resolution.

use std::collections::{HashMap, HashSet, VecDeque};

use depot_core::{Artifact, Repository, Requirement};

use crate::conflict::{ConflictReport, ResolutionConflict};
use crate::error::SolveError;
use crate::graph::ResolutionGraph;
use crate::order::determine_install_order;

/// How much of the dependency graph `install_sequence` resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Only the root artifact itself.
    Root,
    /// The root plus one level of dependencies. The result is ordered
    /// only when that one-level set happens to be closed; otherwise it is
    /// returned as collected.
    Flat,
    /// The full transitive closure, conflict-resolved and ordered.
    #[default]
    Recur,
}

/// Resolves requirements against one repository snapshot.
///
/// Stateless between calls; every method is a pure function of the
/// snapshot and its arguments.
pub struct Resolver<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> Resolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// The best artifact satisfying `requirement`: among all matches, the
    /// one with the highest version, build number breaking version ties.
    ///
    /// The requirement must name a project (strictness >= 1).
    pub fn latest_artifact(&self, requirement: &Requirement) -> Result<&'a Artifact, SolveError> {
        let no_match = || SolveError::NoPackageFound {
            requirement: requirement.clone(),
        };
        let name = requirement.name().ok_or_else(no_match)?;
        self.repo
            .find_by_name(name)
            .into_iter()
            .filter(|a| requirement.matches(a))
            .max_by(|a, b| (a.version(), a.build()).cmp(&(b.version(), b.build())))
            .ok_or_else(no_match)
    }

    /// Resolve `requirement` into an ordered list of artifacts to install,
    /// dependencies before dependents.
    ///
    /// Conflicts encountered in `Recur` mode are logged at debug level;
    /// use [`install_sequence_with_report`](Self::install_sequence_with_report)
    /// to inspect them.
    pub fn install_sequence(
        &self,
        requirement: &Requirement,
        mode: ResolveMode,
    ) -> Result<Vec<Artifact>, SolveError> {
        match mode {
            ResolveMode::Root => Ok(vec![self.latest_artifact(requirement)?.clone()]),
            ResolveMode::Flat => self.flat_sequence(requirement),
            ResolveMode::Recur => {
                let (sequence, report) = self.install_sequence_with_report(requirement)?;
                for conflict in &report.conflicts {
                    tracing::debug!("requirement conflict: {conflict}");
                }
                Ok(sequence)
            }
        }
    }

    /// Full transitive resolution, also returning the requirements that
    /// were displaced during conflict resolution.
    pub fn install_sequence_with_report(
        &self,
        requirement: &Requirement,
    ) -> Result<(Vec<Artifact>, ConflictReport), SolveError> {
        let (closure, report) = self.recursive_closure(requirement)?;
        let ordered = determine_install_order(closure)?;
        Ok((ordered, report))
    }

    /// Build the dependency graph of a fully resolved closure, for tree
    /// rendering and "why is this installed" queries.
    pub fn resolution_graph(
        &self,
        requirement: &Requirement,
    ) -> Result<ResolutionGraph, SolveError> {
        let root_key = self.latest_artifact(requirement)?.key().to_string();
        let (closure, _) = self.recursive_closure(requirement)?;
        Ok(ResolutionGraph::from_closure(&root_key, &closure))
    }

    /// Root plus one level of dependencies, each resolved to its latest
    /// matching artifact.
    fn flat_sequence(&self, requirement: &Requirement) -> Result<Vec<Artifact>, SolveError> {
        let root = self.latest_artifact(requirement)?.clone();
        let mut seen: HashSet<String> = HashSet::from([root.key().to_string()]);
        let mut sequence = vec![root.clone()];

        for req in self.repo.dependencies_of(root.key()) {
            let dep = self.latest_artifact(&req)?.clone();
            if seen.insert(dep.key().to_string()) {
                sequence.push(dep);
            }
        }

        let names: HashSet<String> = sequence.iter().map(|a| a.cname()).collect();
        let closed = sequence.iter().all(|a| {
            a.requires()
                .iter()
                .filter_map(|r| r.name())
                .all(|name| names.contains(name))
        });
        if closed {
            determine_install_order(sequence)
        } else {
            // One-level resolution makes no ordering promise when the
            // dependencies have unresolved sub-dependencies of their own.
            Ok(sequence)
        }
    }

    /// Worklist traversal of the full dependency closure, followed by
    /// conflict resolution.
    ///
    /// `shallow` holds the root's own requirement per direct dependency
    /// name; a weaker transitive requirement for the same name is not
    /// re-resolved, since the root's constraint is authoritative and
    /// already scheduled. `deep` accumulates every requirement seen per
    /// name, in encounter order, for conflict resolution afterwards.
    fn recursive_closure(
        &self,
        requirement: &Requirement,
    ) -> Result<(Vec<Artifact>, ConflictReport), SolveError> {
        let root = self.latest_artifact(requirement)?.clone();

        let shallow: HashMap<String, Requirement> = root
            .requires()
            .iter()
            .filter_map(|r| r.name().map(|n| (n.to_string(), r.clone())))
            .collect();
        let mut deep: HashMap<String, Vec<Requirement>> = HashMap::new();

        let mut collected = vec![root.clone()];
        let mut visited: HashSet<String> = HashSet::from([root.key().to_string()]);
        let mut worklist: VecDeque<Artifact> = VecDeque::from([root]);

        while let Some(artifact) = worklist.pop_front() {
            for req in artifact.requires() {
                let missing = || SolveError::MissingDependency {
                    declared_by: artifact.key().to_string(),
                    requirement: req.clone(),
                };
                let name = req.name().ok_or_else(missing)?;

                let seen = deep.entry(name.to_string()).or_default();
                if !seen.contains(req) {
                    seen.push(req.clone());
                }

                if let Some(root_req) = shallow.get(name) {
                    if req.strictness() < root_req.strictness() {
                        continue;
                    }
                }

                let dep = self.latest_artifact(req).map_err(|_| missing())?.clone();
                if visited.insert(dep.key().to_string()) {
                    collected.push(dep.clone());
                    worklist.push_back(dep);
                }
            }
        }

        self.resolve_conflicts(collected, &deep)
    }

    /// Reduce the collected set to one artifact per project name.
    ///
    /// For each duplicated name the strictest requirement seen anywhere
    /// in the traversal picks the artifact; among equally strict
    /// requirements the one encountered first wins, and the displacement
    /// is recorded in the report rather than applied silently.
    fn resolve_conflicts(
        &self,
        collected: Vec<Artifact>,
        deep: &HashMap<String, Vec<Requirement>>,
    ) -> Result<(Vec<Artifact>, ConflictReport), SolveError> {
        let mut count_by_name: HashMap<String, usize> = HashMap::new();
        let mut name_order: Vec<String> = Vec::new();
        for artifact in &collected {
            let count = count_by_name.entry(artifact.cname()).or_default();
            if *count == 0 {
                name_order.push(artifact.cname());
            }
            *count += 1;
        }

        let mut report = ConflictReport::new();
        let mut winners: HashMap<String, Artifact> = HashMap::new();
        for name in &name_order {
            if count_by_name[name] < 2 {
                continue;
            }
            let Some(reqs) = deep.get(name) else {
                continue;
            };
            let mut winner_req = &reqs[0];
            for req in &reqs[1..] {
                if req.strictness() > winner_req.strictness() {
                    winner_req = req;
                }
            }
            let winner = self.latest_artifact(winner_req)?.clone();
            for req in reqs {
                if req == winner_req {
                    continue;
                }
                let reason = if req.strictness() < winner_req.strictness() {
                    format!(
                        "strictest requirement wins ({} vs {})",
                        req.strictness(),
                        winner_req.strictness()
                    )
                } else {
                    "first requirement encountered wins (equal strictness)".to_string()
                };
                report.add(ResolutionConflict {
                    name: name.clone(),
                    requested: req.to_string(),
                    resolved_key: winner.key().to_string(),
                    reason,
                });
            }
            winners.insert(name.clone(), winner);
        }

        // Replace every duplicated name's artifacts with its winner, at
        // the position of the first occurrence.
        let mut result = Vec::with_capacity(collected.len());
        let mut replaced: HashSet<String> = HashSet::new();
        for artifact in collected {
            let name = artifact.cname();
            match winners.get(&name) {
                Some(winner) => {
                    if replaced.insert(name) {
                        result.push(winner.clone());
                    }
                }
                None => result.push(artifact),
            }
        }

        Ok((result, report))
    }
}
