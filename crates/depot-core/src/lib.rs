//! Core data types for the Depot package planner.
//!
//! This crate defines the value types the resolution engine operates on:
//! package versions, requirements, artifacts, and the read-only repository
//! and installed-set interfaces it consumes.
//!
//! This crate is intentionally free of async code and I/O. Everything here
//! is an immutable in-memory snapshot; the engine in `depot-resolver` is a
//! pure function over these types.

pub mod artifact;
pub mod index;
pub mod requirement;
pub mod version;

pub use artifact::Artifact;
pub use index::{InstalledSet, MemInstalledSet, MemRepository, Repository};
pub use requirement::{Requirement, RequirementParseError};
pub use version::Version;
