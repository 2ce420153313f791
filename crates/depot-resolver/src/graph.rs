//! Resolved dependency graph: tree rendering and provenance queries.

use std::collections::{HashMap, HashSet};

use depot_core::Artifact;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// The dependency graph of one fully resolved closure.
///
/// One node per project name (conflict resolution guarantees one artifact
/// per name in a recursive closure), an edge from dependent to dependency.
/// Built from a closure so the out-of-scope CLI layer can render trees
/// and answer "why is this artifact in the plan".
pub struct ResolutionGraph {
    graph: DiGraph<Artifact, ()>,
    /// Lookup from canonical project name to node index.
    index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
}

impl ResolutionGraph {
    /// Build the graph from a resolved closure. `root_key` identifies the
    /// artifact resolution started from.
    pub fn from_closure(root_key: &str, closure: &[Artifact]) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let mut root = None;

        for artifact in closure {
            let idx = graph.add_node(artifact.clone());
            index.insert(artifact.cname(), idx);
            if artifact.key() == root_key {
                root = Some(idx);
            }
        }
        for artifact in closure {
            let from = index[&artifact.cname()];
            for req in artifact.requires() {
                if let Some(&to) = req.name().and_then(|n| index.get(n)) {
                    if !graph.edges(from).any(|e| e.target() == to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self { graph, index, root }
    }

    /// Look up a node by canonical project name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn artifact(&self, idx: NodeIndex) -> &Artifact {
        &self.graph[idx]
    }

    /// Direct dependencies of a node.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect();
        deps.sort_by_key(|&i| self.graph[i].cname());
        deps
    }

    /// Who requires this node.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        deps.sort_by_key(|&i| self.graph[i].cname());
        deps
    }

    /// Render the dependency tree from the root as ASCII art.
    pub fn render_tree(&self) -> String {
        let mut output = String::new();
        let Some(root) = self.root else {
            return output;
        };

        output.push_str(self.graph[root].key());
        output.push('\n');

        let mut visited = HashSet::from([root]);
        let deps = self.dependencies_of(root);
        let count = deps.len();
        for (i, idx) in deps.into_iter().enumerate() {
            self.render_subtree(&mut output, idx, "", i == count - 1, &mut visited);
        }
        output
    }

    fn render_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.into_iter().enumerate() {
            self.render_subtree(output, child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    /// The requirement chain from the root down to `name`: why that
    /// artifact is part of the plan.
    pub fn find_path(&self, name: &str) -> Option<Vec<&Artifact>> {
        let root = self.root?;
        let target = self.find(name)?;
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(root, target, &mut path, &mut visited) {
            Some(path.iter().map(|&idx| &self.graph[idx]).collect())
        } else {
            None
        }
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for child in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Number of artifacts in the closure.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::Requirement;

    fn artifact(name: &str, version: &str, requires: &[&str]) -> Artifact {
        let reqs: Vec<Requirement> = requires.iter().map(|r| r.parse().unwrap()).collect();
        Artifact::new(name, version, 1, reqs)
    }

    fn fixture() -> ResolutionGraph {
        ResolutionGraph::from_closure(
            "app-1.0-1",
            &[
                artifact("app", "1.0", &["lib", "base"]),
                artifact("lib", "1.0", &["base"]),
                artifact("base", "1.0", &[]),
            ],
        )
    }

    #[test]
    fn nodes_and_edges() {
        let g = fixture();
        assert_eq!(g.len(), 3);
        assert!(!g.is_empty());

        let app = g.find("app").unwrap();
        let base = g.find("base").unwrap();
        assert_eq!(g.dependencies_of(app).len(), 2);
        assert_eq!(g.dependents_of(base).len(), 2);
        assert!(g.find("nosuch").is_none());
    }

    #[test]
    fn tree_rendering() {
        let g = fixture();
        let tree = g.render_tree();
        assert!(tree.starts_with("app-1.0-1\n"));
        assert!(tree.contains("lib-1.0-1"));
        assert!(tree.contains("base-1.0-1"));
        assert!(tree.contains("└── "));
    }

    #[test]
    fn tree_rendering_cuts_cycles() {
        let g = ResolutionGraph::from_closure(
            "a-1.0-1",
            &[artifact("a", "1.0", &["b"]), artifact("b", "1.0", &["a"])],
        );
        // Must terminate; the revisit is cut off.
        let tree = g.render_tree();
        assert!(tree.contains("a-1.0-1"));
        assert!(tree.contains("b-1.0-1"));
    }

    #[test]
    fn path_to_transitive_dependency() {
        let g = fixture();
        let path = g.find_path("base").unwrap();
        assert_eq!(path.first().unwrap().key(), "app-1.0-1");
        assert_eq!(path.last().unwrap().key(), "base-1.0-1");

        assert!(g.find_path("nosuch").is_none());
    }
}
