//! Backbone extraction orchestration.
//!
//! [`extract_backbone`] is the front door: validate the edge list, build
//! the graph, run the reduction engine with the configured policy, and
//! return the retained edges plus summary statistics. Configuration is an
//! explicit immutable value threaded through every call — there is no
//! process-global state to initialize.

use crate::error::{Error, Result};
use crate::filter::{FilterPolicy, ReductionEngine, DEFAULT_BATCH_SIZE};
use crate::graph::{EdgeRecord, WeightedGraph};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Default significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Configuration for one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneConfig {
    alpha_threshold: f64,
    policy: FilterPolicy,
    workers: Option<usize>,
    batch_size: usize,
}

impl BackboneConfig {
    /// Defaults: `alpha_threshold = 0.05`, disparity filter, available
    /// parallelism, batch size [`DEFAULT_BATCH_SIZE`].
    pub fn new() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA,
            policy: FilterPolicy::default(),
            workers: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the significance threshold; must be in `(0, 1]`.
    pub fn with_alpha_threshold(mut self, alpha_threshold: f64) -> Self {
        self.alpha_threshold = alpha_threshold;
        self
    }

    /// Set the significance policy.
    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the worker count. `None` uses available parallelism.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Set the reduction engine's batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The configured significance threshold.
    pub fn alpha_threshold(&self) -> f64 {
        self.alpha_threshold
    }

    /// The configured policy.
    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    fn validate(&self) -> Result<()> {
        if !self.alpha_threshold.is_finite()
            || self.alpha_threshold <= 0.0
            || self.alpha_threshold > 1.0
        {
            return Err(Error::InvalidParameter {
                name: "alpha_threshold",
                message: "must be in (0, 1]",
            });
        }
        Ok(())
    }
}

impl Default for BackboneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackboneStats {
    /// Edges in the input.
    pub input_edges: usize,
    /// Edges retained in the backbone.
    pub backbone_edges: usize,
    /// Distinct nodes appearing in the backbone.
    pub backbone_nodes: usize,
}

/// The retained backbone plus run statistics.
///
/// Edges are in canonical-key order (source < target lexicographically,
/// sorted by pair), with no duplicate pairs and weights unchanged from the
/// input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackboneResult {
    /// Retained edges.
    pub edges: Vec<EdgeRecord>,
    /// Summary statistics.
    pub stats: BackboneStats,
}

impl BackboneResult {
    fn empty(input_edges: usize) -> Self {
        Self {
            edges: Vec::new(),
            stats: BackboneStats {
                input_edges,
                ..BackboneStats::default()
            },
        }
    }
}

/// Extract the statistically significant backbone of a weighted undirected
/// edge list.
///
/// An empty input is not an error: it produces an empty result with a
/// warning, so batch pipelines can skip vacuous inputs gracefully.
///
/// # Errors
///
/// [`Error::InvalidParameter`] for an out-of-range threshold or worker
/// count; [`Error::MalformedRecord`] for an invalid record (empty
/// identifier, self-loop, bad weight, duplicate pair);
/// [`Error::BatchFailed`] if a worker batch fails.
pub fn extract_backbone(records: &[EdgeRecord], config: &BackboneConfig) -> Result<BackboneResult> {
    config.validate()?;

    if records.is_empty() {
        warn!("input edge list is empty; returning an empty backbone");
        return Ok(BackboneResult::empty(0));
    }

    let graph = WeightedGraph::build(records)?;
    let engine = ReductionEngine::new()
        .with_batch_size(config.batch_size)
        .with_workers(config.workers);
    let backbone = engine.run(&graph, config.policy.test(), config.alpha_threshold)?;

    let mut nodes: BTreeSet<&str> = BTreeSet::new();
    let edges: Vec<EdgeRecord> = backbone
        .iter()
        .map(|((source, target), &weight)| EdgeRecord::new(source.clone(), target.clone(), weight))
        .collect();
    for edge in &edges {
        let _ = nodes.insert(&edge.source);
        let _ = nodes.insert(&edge.target);
    }

    let stats = BackboneStats {
        input_edges: records.len(),
        backbone_edges: edges.len(),
        backbone_nodes: nodes.len(),
    };
    info!(
        policy = %config.policy,
        alpha = config.alpha_threshold,
        input_edges = stats.input_edges,
        backbone_edges = stats.backbone_edges,
        backbone_nodes = stats.backbone_nodes,
        "backbone extracted"
    );

    Ok(BackboneResult { edges, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn keys(result: &BackboneResult) -> BTreeSet<(String, String)> {
        result
            .edges
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect()
    }

    #[test]
    fn star_keeps_low_share_edges() {
        // a: weights [1, 1, 8], k = 3, W = 10; disparity alphas
        // [0.01, 0.01, 0.64]. Threshold 0.05 keeps a-b and a-c only; the
        // leaf endpoints contribute nothing.
        let edges = vec![
            EdgeRecord::new("a", "b", 1.0),
            EdgeRecord::new("a", "c", 1.0),
            EdgeRecord::new("a", "d", 8.0),
        ];
        let result = extract_backbone(&edges, &BackboneConfig::new()).unwrap();

        assert_eq!(
            keys(&result),
            BTreeSet::from([
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
            ])
        );
        assert_eq!(result.stats.input_edges, 3);
        assert_eq!(result.stats.backbone_edges, 2);
        assert_eq!(result.stats.backbone_nodes, 3);
    }

    #[test]
    fn degree_one_nodes_contribute_nothing() {
        // A single edge: both endpoints have degree 1, so the backbone is
        // empty at any threshold.
        let edges = vec![EdgeRecord::new("a", "b", 1000.0)];
        let result = extract_backbone(
            &edges,
            &BackboneConfig::new().with_alpha_threshold(1.0),
        )
        .unwrap();
        assert!(result.edges.is_empty());
    }

    #[test]
    fn union_of_endpoints_dedups_to_one_record() {
        // (u, v) is significant from u (share 0.1 among three edges) but
        // not from v (share 0.5 among two): union semantics keep it, once.
        let edges = vec![
            EdgeRecord::new("u", "v", 1.0),
            EdgeRecord::new("u", "x", 1.0),
            EdgeRecord::new("u", "y", 8.0),
            EdgeRecord::new("v", "w", 1.0),
        ];
        let result = extract_backbone(&edges, &BackboneConfig::new()).unwrap();

        let uv: Vec<_> = result
            .edges
            .iter()
            .filter(|e| e.canonical_key() == ("u", "v"))
            .collect();
        assert_eq!(uv.len(), 1);
        assert_eq!(uv[0].weight, 1.0);
    }

    #[test]
    fn empty_input_is_a_soft_result() {
        let result = extract_backbone(&[], &BackboneConfig::new()).unwrap();
        assert!(result.edges.is_empty());
        assert_eq!(result.stats, BackboneStats::default());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let result = extract_backbone(
                &[EdgeRecord::new("a", "b", 1.0)],
                &BackboneConfig::new().with_alpha_threshold(alpha),
            );
            assert!(
                matches!(result, Err(Error::InvalidParameter { name: "alpha_threshold", .. })),
                "alpha {alpha} should be rejected"
            );
        }
    }

    #[test]
    fn ncdf_policy_is_selectable() {
        // From a (k = 3, W = 10): ncdf alphas are 0.19, 0.19, 0.96 — at
        // threshold 0.2 the two weight-1 edges pass, the weight-8 one not.
        let edges = vec![
            EdgeRecord::new("a", "b", 1.0),
            EdgeRecord::new("a", "c", 1.0),
            EdgeRecord::new("a", "d", 8.0),
        ];
        let result = extract_backbone(
            &edges,
            &BackboneConfig::new()
                .with_policy(FilterPolicy::NoiseCorrected)
                .with_alpha_threshold(0.2),
        )
        .unwrap();
        assert_eq!(result.stats.backbone_edges, 2);
    }

    #[test]
    fn threshold_is_monotone() {
        let edges = vec![
            EdgeRecord::new("a", "b", 1.0),
            EdgeRecord::new("a", "c", 2.0),
            EdgeRecord::new("a", "d", 8.0),
            EdgeRecord::new("b", "c", 5.0),
            EdgeRecord::new("b", "d", 1.0),
        ];
        let mut previous = BTreeSet::new();
        for alpha in [0.01, 0.05, 0.25, 0.75, 1.0] {
            let result = extract_backbone(
                &edges,
                &BackboneConfig::new().with_alpha_threshold(alpha),
            )
            .unwrap();
            let current = keys(&result);
            assert!(
                previous.is_subset(&current),
                "raising the threshold to {alpha} must not drop edges"
            );
            previous = current;
        }
    }

    /// Random simple weighted graphs: up to 12 nodes, arbitrary subset of
    /// pairs, weights in [0, 100).
    fn arb_edges() -> impl Strategy<Value = Vec<EdgeRecord>> {
        proptest::collection::vec(((0usize..12), (0usize..12), 0.0f64..100.0), 1..60).prop_map(
            |raw| {
                let mut seen = BTreeSet::new();
                let mut edges = Vec::new();
                for (u, v, w) in raw {
                    if u == v {
                        continue;
                    }
                    let (a, b) = (u.min(v), u.max(v));
                    if seen.insert((a, b)) {
                        edges.push(EdgeRecord::new(format!("n{a}"), format!("n{b}"), w));
                    }
                }
                if edges.is_empty() {
                    edges.push(EdgeRecord::new("n0", "n1", 1.0));
                }
                edges
            },
        )
    }

    proptest! {
        // Each case runs several full extractions (and, with `parallel`,
        // builds worker pools), so keep the case count moderate.
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn backbone_is_a_subset_with_unchanged_weights(edges in arb_edges(), alpha in 0.001f64..1.0) {
            let result = extract_backbone(
                &edges,
                &BackboneConfig::new().with_alpha_threshold(alpha),
            ).unwrap();

            let input: BTreeMap<(String, String), f64> = edges
                .iter()
                .map(|e| {
                    let (a, b) = e.canonical_key();
                    ((a.to_string(), b.to_string()), e.weight)
                })
                .collect();

            prop_assert!(result.edges.len() <= edges.len());
            for edge in &result.edges {
                let key = (edge.source.clone(), edge.target.clone());
                prop_assert_eq!(input.get(&key), Some(&edge.weight), "invented or altered edge");
            }
        }

        #[test]
        fn output_is_deterministic_across_scheduling(edges in arb_edges()) {
            let reference = extract_backbone(
                &edges,
                &BackboneConfig::new().with_workers(Some(1)).with_batch_size(1),
            ).unwrap();

            for (workers, batch_size) in [(None, 3), (Some(4), 7), (Some(2), 1000)] {
                let got = extract_backbone(
                    &edges,
                    &BackboneConfig::new().with_workers(workers).with_batch_size(batch_size),
                ).unwrap();
                prop_assert_eq!(&got, &reference);
            }
        }
    }
}
