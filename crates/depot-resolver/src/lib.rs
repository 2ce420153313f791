//! Dependency resolution engine for Depot: transitive closure computation,
//! strictest-wins conflict resolution, deterministic install ordering, and
//! install/remove operation planning.
//!
//! Everything in this crate is a pure, synchronous computation over
//! read-only `Repository`/`InstalledSet` snapshots from `depot-core`.
//! Fetching indexes and executing the produced operation list are the
//! concern of other layers.

pub mod conflict;
pub mod error;
pub mod graph;
pub mod order;
pub mod resolver;
pub mod solver;

pub use conflict::{ConflictReport, ResolutionConflict};
pub use error::SolveError;
pub use graph::ResolutionGraph;
pub use order::determine_install_order;
pub use resolver::{ResolveMode, Resolver};
pub use solver::{Job, JobKind, OpKind, Operation, Solver};
