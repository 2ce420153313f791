//! Reporting for requirements displaced during conflict resolution.

use std::fmt;

/// All requirements that lost conflict resolution during one closure
/// computation.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<ResolutionConflict>,
}

/// One displaced requirement: several requirements named the same project
/// and this one did not pick the artifact.
#[derive(Debug, Clone)]
pub struct ResolutionConflict {
    /// Canonical project name the requirements disagreed on.
    pub name: String,
    /// The requirement that lost.
    pub requested: String,
    /// Key of the artifact that was kept.
    pub resolved_key: String,
    pub reason: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: ResolutionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No requirement conflicts.");
        }
        writeln!(f, "Requirement conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {}: `{}` displaced by {} ({})",
                c.name, c.requested, c.resolved_key, c.reason
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ResolutionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: `{}` -> {} ({})",
            self.name, self.requested, self.resolved_key, self.reason
        )
    }
}
