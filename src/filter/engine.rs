//! Batch dispatch and candidate merging.
//!
//! The node set is split into contiguous batches; each batch is evaluated
//! independently against the shared read-only graph, and the per-batch
//! candidate lists are merged on the coordinator into a single map keyed by
//! the canonical node pair. The canonical key guarantees that an edge
//! evaluated from both endpoints lands on the same entry, and the weight is
//! a property of the edge rather than of the evaluating endpoint, so a
//! second insertion overwrites with an identical value: the merge is
//! idempotent and commutative, and the output cannot depend on batch
//! completion order, batch size, or worker count.
//!
//! Workers never share mutable state and never communicate; a batch that
//! fails aborts the whole run with its index attached, rather than leaving
//! a silently incomplete backbone.

use crate::error::{Error, Result};
use crate::filter::evaluator::{evaluate_node, Candidate};
use crate::filter::policy::SignificanceTest;
use crate::graph::WeightedGraph;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default nodes per batch. Small enough to keep in-flight candidate lists
/// modest, large enough to amortize per-task overhead.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Deduplicated backbone candidates, keyed by canonical node pair.
pub type BackboneSet = BTreeMap<(String, String), f64>;

/// Applies a significance test across every node of a graph and reduces
/// the per-node results into one deduplicated backbone set.
#[derive(Debug, Clone)]
pub struct ReductionEngine {
    batch_size: usize,
    workers: Option<usize>,
}

impl ReductionEngine {
    /// Create an engine with the default batch size and as many workers as
    /// the runtime offers.
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
        }
    }

    /// Set nodes per batch (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the worker count. `None` uses available parallelism.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Evaluate every node and merge the results.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for a worker count of zero or an
    /// unbuildable pool; [`Error::BatchFailed`] if any batch fails.
    pub fn run(
        &self,
        graph: &WeightedGraph,
        test: &dyn SignificanceTest,
        alpha_threshold: f64,
    ) -> Result<BackboneSet> {
        let nodes: Vec<NodeIndex> = graph.nodes().collect();
        let batches: Vec<&[NodeIndex]> = nodes.chunks(self.batch_size).collect();

        let partials = self.evaluate_batches(graph, &batches, test, alpha_threshold)?;

        let mut backbone = BackboneSet::new();
        for partial in partials {
            merge_candidates(&mut backbone, partial);
        }
        Ok(backbone)
    }

    #[cfg(feature = "parallel")]
    fn evaluate_batches(
        &self,
        graph: &WeightedGraph,
        batches: &[&[NodeIndex]],
        test: &dyn SignificanceTest,
        alpha_threshold: f64,
    ) -> Result<Vec<Vec<Candidate>>> {
        let evaluate = || {
            batches
                .par_iter()
                .enumerate()
                .map(|(batch, nodes)| evaluate_batch(graph, batch, nodes, test, alpha_threshold))
                .collect::<Result<Vec<_>>>()
        };

        match self.workers {
            None => evaluate(),
            Some(0) => Err(Error::InvalidParameter {
                name: "worker_count",
                message: "must be at least 1",
            }),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| Error::Other(format!("failed to build worker pool: {e}")))?;
                pool.install(evaluate)
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_batches(
        &self,
        graph: &WeightedGraph,
        batches: &[&[NodeIndex]],
        test: &dyn SignificanceTest,
        alpha_threshold: f64,
    ) -> Result<Vec<Vec<Candidate>>> {
        if self.workers == Some(0) {
            return Err(Error::InvalidParameter {
                name: "worker_count",
                message: "must be at least 1",
            });
        }
        batches
            .iter()
            .enumerate()
            .map(|(batch, nodes)| evaluate_batch(graph, batch, nodes, test, alpha_threshold))
            .collect()
    }
}

impl Default for ReductionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate one contiguous node batch. Pure and read-only over the graph.
fn evaluate_batch(
    graph: &WeightedGraph,
    batch: usize,
    nodes: &[NodeIndex],
    test: &dyn SignificanceTest,
    alpha_threshold: f64,
) -> Result<Vec<Candidate>> {
    let mut out = Vec::new();
    for &node in nodes {
        let candidates =
            evaluate_node(graph, node, test, alpha_threshold).map_err(|e| Error::BatchFailed {
                batch,
                cause: e.to_string(),
            })?;
        out.extend(candidates);
    }
    Ok(out)
}

/// Merge a partial candidate list into the accumulator. Re-inserting an
/// existing key overwrites with the identical weight, so merging the same
/// partial twice is a no-op.
pub(crate) fn merge_candidates(backbone: &mut BackboneSet, partial: Vec<Candidate>) {
    for candidate in partial {
        let _ = backbone.insert(candidate.key, candidate.weight);
    }
}
