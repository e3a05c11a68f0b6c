// Call graph structures for callview.
// Restricts a document to one source file and links callers to callees.

use crate::domain::document::CallGraphDocument;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// A node in the call graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub name: String,
    pub file: String, // drives the fill colour lookup
    pub line: Option<u32>,
}

impl FunctionNode {
    /// `name (file:line)`, or `name (file)` without a line.
    pub fn describe(&self) -> String {
        match self.line {
            Some(line) => format!("{} ({}:{})", self.name, self.file, line),
            None => format!("{} ({})", self.name, self.file),
        }
    }
}

pub type CallDiGraph = DiGraph<FunctionNode, ()>;

/// Call graph for a single file.
#[derive(Debug, Clone)]
pub struct FileCallGraph {
    pub filename: String,
    pub graph: CallDiGraph,
    index: HashMap<String, NodeIndex>,
    dropped_calls: usize,
}

impl FileCallGraph {
    /// Build the graph of functions whose `file` equals `filename`.
    ///
    /// Calls that leave the filtered set are dropped; repeated calls to the
    /// same callee collapse into one edge.
    pub fn from_document(doc: &CallGraphDocument, filename: &str) -> Self {
        let mut graph = CallDiGraph::new();
        let mut index = HashMap::new();

        for (name, record) in doc.functions.iter().filter(|(_, r)| r.file == filename) {
            let idx = graph.add_node(FunctionNode {
                name: name.to_string(),
                file: record.file.clone(),
                line: record.line,
            });
            index.insert(name.to_string(), idx);
        }

        let mut dropped_calls = 0;
        for (name, record) in doc.functions.iter().filter(|(_, r)| r.file == filename) {
            let Some(&caller) = index.get(name) else {
                continue;
            };
            for callee in &record.calls {
                match index.get(callee) {
                    Some(&target) => {
                        graph.update_edge(caller, target, ());
                    }
                    None => dropped_calls += 1,
                }
            }
        }

        tracing::debug!(
            file = filename,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_calls,
            "built call graph"
        );

        Self {
            filename: filename.to_string(),
            graph,
            index,
            dropped_calls,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of call sites whose callee is outside this file.
    pub fn dropped_calls(&self) -> usize {
        self.dropped_calls
    }

    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn contains_edge(&self, caller: &str, callee: &str) -> bool {
        match (self.index.get(caller), self.index.get(callee)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Callees of `name` inside this file, in insertion order.
    pub fn callees(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        // petgraph walks outgoing edges newest first
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].name.as_str())
            .collect();
        out.reverse();
        out
    }

    /// Functions in document order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges as (caller, callee) names in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].name.as_str(),
                    self.graph[e.target()].name.as_str(),
                )
            })
            .collect()
    }
}
