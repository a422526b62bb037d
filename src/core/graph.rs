//! Project dependency graph validation.
//!
//! Projects are emitted in the order they are declared. This module checks
//! that order before anything is written: every reference must exist, point
//! at an earlier project, and the `uses`/`links` edges must form a DAG.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::error::ModelError;
use crate::core::manifest::{ProjectDef, ProjectKindDef};

/// How one project refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Compose public include dirs and defines
    Uses,
    /// Link against the library artifact
    Links,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    is_library: bool,
    deps: Vec<(String, EdgeKind)>,
}

/// Declared projects and the references between them.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    nodes: Vec<Node>,
}

impl ProjectGraph {
    /// Build the graph from manifest definitions, in declared order.
    pub fn from_defs<'a>(defs: impl IntoIterator<Item = &'a ProjectDef>) -> Self {
        let nodes = defs
            .into_iter()
            .map(|def| {
                let deps = def
                    .uses
                    .iter()
                    .map(|u| (u.clone(), EdgeKind::Uses))
                    .chain(def.links.iter().map(|l| (l.clone(), EdgeKind::Links)))
                    .collect();
                Node {
                    name: def.name.clone(),
                    is_library: def.kind != ProjectKindDef::Executable,
                    deps,
                }
            })
            .collect();
        ProjectGraph { nodes }
    }

    /// Validate names, references, acyclicity and declaration order.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.name.as_str(), i).is_some() {
                return Err(ModelError::DuplicateProject {
                    name: node.name.clone(),
                });
            }
        }

        let mut graph: DiGraph<usize, EdgeKind> = DiGraph::new();
        let handles: Vec<NodeIndex> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();

        for (i, node) in self.nodes.iter().enumerate() {
            for (dep, kind) in &node.deps {
                let Some(&j) = index.get(dep.as_str()) else {
                    return Err(ModelError::UnknownReference {
                        project: node.name.clone(),
                        reference: dep.clone(),
                    });
                };

                if *kind == EdgeKind::Links && !self.nodes[j].is_library {
                    return Err(ModelError::NotALibrary {
                        project: node.name.clone(),
                        reference: dep.clone(),
                    });
                }

                graph.add_edge(handles[i], handles[j], *kind);
            }
        }

        // Cycles first: an out-of-order report for a cycle would be misleading
        for scc in tarjan_scc(&graph) {
            let is_cycle = scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|&n| graph.contains_edge(n, n));
            if is_cycle {
                let mut members: Vec<usize> = scc.iter().map(|&n| graph[n]).collect();
                members.sort_unstable();
                let mut projects: Vec<String> =
                    members.iter().map(|&i| self.nodes[i].name.clone()).collect();
                projects.push(projects[0].clone());
                return Err(ModelError::Cycle { projects });
            }
        }

        for edge in graph.raw_edges() {
            let (from, to) = (graph[edge.source()], graph[edge.target()]);
            if to > from {
                return Err(ModelError::OutOfOrder {
                    project: self.nodes[from].name.clone(),
                    dependency: self.nodes[to].name.clone(),
                });
            }
        }

        Ok(())
    }
}
