//! Per-node backbone evaluation.
//!
//! Each node tests its own incident edges against its own `(degree,
//! total_weight)` context, so the same edge is evaluated twice — once from
//! each endpoint — and generally gets two different alpha values. The
//! backbone keeps an edge that is significant from *at least one* endpoint:
//! candidates carry the canonical (sorted) node pair so the two emissions
//! collapse to one record at merge time.
//!
//! Evaluation is a free function over explicit inputs, with no state beyond
//! its arguments, so the engine can dispatch it to any worker without setup
//! or teardown.

use crate::error::{Error, Result};
use crate::filter::policy::SignificanceTest;
use crate::graph::{canonical_pair, WeightedGraph};
use petgraph::graph::NodeIndex;

/// A backbone candidate emitted by one endpoint's evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Canonical (lexicographically sorted) node pair.
    pub key: (String, String),
    /// Original edge weight, unchanged from the input.
    pub weight: f64,
}

/// Evaluate one node: return the incident edges that are significant from
/// this node's perspective, i.e. with `alpha < alpha_threshold`.
///
/// A node with degree < 2 or zero total weight produces no candidates
/// (alpha is pinned to 1.0 there), which is a valid outcome, not an error.
///
/// # Errors
///
/// [`Error::Other`] if the adjacency entry is internally inconsistent or a
/// score comes out non-finite in a way validation should have prevented;
/// the engine reports this as a batch failure rather than dropping the
/// node.
pub fn evaluate_node(
    graph: &WeightedGraph,
    node: NodeIndex,
    test: &dyn SignificanceTest,
    alpha_threshold: f64,
) -> Result<Vec<Candidate>> {
    let stats = graph.stats(node);
    let log_threshold = alpha_threshold.ln();
    let name = graph.name(node);

    let mut candidates = Vec::new();
    let mut incident = 0usize;

    for (neighbor, weight) in graph.incident(node) {
        incident += 1;
        let log_alpha = test.log_alpha(weight, stats.total_weight, stats.degree);
        if log_alpha.is_nan() {
            return Err(Error::Other(format!(
                "non-finite significance score for edge ({name}, {})",
                graph.name(neighbor)
            )));
        }
        if log_alpha < log_threshold {
            let (a, b) = canonical_pair(name, graph.name(neighbor));
            candidates.push(Candidate {
                key: (a.to_owned(), b.to_owned()),
                weight,
            });
        }
    }

    if incident != stats.degree {
        return Err(Error::Other(format!(
            "adjacency entry for '{name}' is inconsistent: indexed degree {} but {incident} incident edges",
            stats.degree
        )));
    }

    Ok(candidates)
}
