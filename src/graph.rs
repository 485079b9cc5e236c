//! Weighted undirected graph with a precomputed adjacency index.
//!
//! The input to backbone extraction is a flat edge list. [`WeightedGraph`]
//! turns it, once per run, into:
//!
//! - a `petgraph` [`UnGraph`] whose node payloads are the string identifiers
//!   and whose edge payloads are the weights,
//! - an identifier → node-index map,
//! - cached per-node statistics (degree and total incident weight), which
//!   every significance test needs and which would otherwise be recomputed
//!   for each incident edge.
//!
//! The graph is built in O(E) and is read-only afterward: workers share it
//! by reference and nothing is ever mutated mid-computation. Filtering only
//! excludes edges from the *output*, never from the graph itself.
//!
//! Validation happens here. The graph must be simple (no self-loops, no
//! repeated unordered pair) and every weight finite and non-negative;
//! anything else is a [`Error::MalformedRecord`] naming the offending
//! record.

use crate::error::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// One row of a weighted edge list: an unordered `{source, target}` pair
/// with a non-negative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Source node identifier.
    pub source: String,
    /// Target node identifier.
    pub target: String,
    /// Edge weight.
    pub weight: f64,
}

impl EdgeRecord {
    /// Create a record.
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }

    /// The node pair in canonical (lexicographically sorted) order.
    ///
    /// `(u, v)` and `(v, u)` map to the same key, so an undirected edge has
    /// exactly one canonical form regardless of which endpoint emitted it.
    pub fn canonical_key(&self) -> (&str, &str) {
        canonical_pair(&self.source, &self.target)
    }
}

/// Sort a node pair by the lexicographic order on identifiers.
pub(crate) fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Per-node adjacency statistics, computed once at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStats {
    /// Number of incident edges.
    pub degree: usize,
    /// Sum of incident edge weights.
    pub total_weight: f64,
}

/// An immutable weighted undirected graph plus its adjacency index.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    graph: UnGraph<String, f64>,
    stats: Vec<NodeStats>,
}

impl WeightedGraph {
    /// Build the graph and adjacency index from a validated edge list.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for an empty list; [`Error::MalformedRecord`]
    /// for an empty identifier, a self-loop, a non-finite or negative
    /// weight, or a repeated unordered pair.
    pub fn build(records: &[EdgeRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut graph = UnGraph::<String, f64>::new_undirected();
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());

        for (i, rec) in records.iter().enumerate() {
            let record = i + 1;
            validate_record(record, rec)?;

            let (a, b) = rec.canonical_key();
            if !seen.insert((a.to_owned(), b.to_owned())) {
                return Err(Error::MalformedRecord {
                    record,
                    reason: format!("duplicate edge ({a}, {b})"),
                });
            }

            let s = node_index(&mut graph, &mut indices, &rec.source);
            let t = node_index(&mut graph, &mut indices, &rec.target);
            let _ = graph.add_edge(s, t, rec.weight);
        }

        // Adjacency index: each edge contributes to exactly two entries,
        // so sum(degree) == 2 * edge_count.
        let mut stats = vec![NodeStats::default(); graph.node_count()];
        for edge in graph.edge_references() {
            let w = *edge.weight();
            for end in [edge.source(), edge.target()] {
                stats[end.index()].degree += 1;
                stats[end.index()].total_weight += w;
            }
        }

        Ok(Self { graph, stats })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node indices, in first-appearance order of the input.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// The identifier of a node.
    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Cached statistics for a node.
    pub fn stats(&self, node: NodeIndex) -> NodeStats {
        self.stats[node.index()]
    }

    /// Incident edges of a node as `(neighbor, weight)` pairs.
    pub fn incident(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph.edges(node).map(|e| (e.target(), *e.weight()))
    }
}

fn node_index(
    graph: &mut UnGraph<String, f64>,
    indices: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    match indices.get(name) {
        Some(&idx) => idx,
        None => {
            let idx = graph.add_node(name.to_owned());
            let _ = indices.insert(name.to_owned(), idx);
            idx
        }
    }
}

fn validate_record(record: usize, rec: &EdgeRecord) -> Result<()> {
    if rec.source.is_empty() || rec.target.is_empty() {
        return Err(Error::MalformedRecord {
            record,
            reason: "empty node identifier".to_string(),
        });
    }
    if rec.source == rec.target {
        return Err(Error::MalformedRecord {
            record,
            reason: format!("self-loop on '{}'", rec.source),
        });
    }
    if !rec.weight.is_finite() {
        return Err(Error::MalformedRecord {
            record,
            reason: format!("weight '{}' is not finite", rec.weight),
        });
    }
    if rec.weight < 0.0 {
        return Err(Error::MalformedRecord {
            record,
            reason: format!("weight {} is negative", rec.weight),
        });
    }
    Ok(())
}
