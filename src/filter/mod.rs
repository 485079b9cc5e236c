//! Backbone significance filtering.
//!
//! Dense weighted networks — co-occurrence graphs especially — carry many
//! edges that exist only because their endpoints are high-degree, not
//! because the connection itself is meaningful. A backbone filter keeps an
//! edge only when its weight is statistically surprising relative to the
//! *local* weight distribution of an endpoint, which controls for degree
//! heterogeneity in a way a global weight cutoff cannot.
//!
//! ## The null model
//!
//! For a node with degree `k` and total incident weight `W`, the null
//! hypothesis is that `W` is spread over the `k` edges uniformly at random.
//! Each incident edge with weight `w` gets a significance score from its
//! share `p = w / W`:
//!
//! ```text
//! disparity filter:   alpha = p^(k-1)
//! noise-corrected:    alpha = 1 - (1-p)^(k-1)
//! ```
//!
//! An edge joins the backbone when `alpha < alpha_threshold` from at least
//! one of its two endpoints (the union semantics of the disparity-filter
//! literature; see [`evaluator`]). Both tests pin `alpha = 1.0` for nodes
//! with degree < 2 or zero total weight — such nodes cannot produce a
//! statistically distinguishable edge.
//!
//! ## Pipeline
//!
//! ```text
//! edge list → WeightedGraph → node batches → evaluate (parallel, read-only)
//!           → canonical-key merge → backbone set
//! ```
//!
//! The work is embarrassingly parallel: per-node evaluation reads the
//! shared graph and writes nothing, and the [`engine`] merges per-batch
//! results sequentially on the coordinator.
//!
//! ## References
//!
//! - Serrano, Boguñá, Vespignani (2009). "Extracting the multiscale
//!   backbone of complex weighted networks." PNAS 106 (16).
//! - Coscia & Neffke (2017). "Network backboning with noisy data." ICDE.

mod engine;
mod evaluator;
mod policy;

pub use engine::{BackboneSet, ReductionEngine, DEFAULT_BATCH_SIZE};
pub use evaluator::{evaluate_node, Candidate};
pub use policy::{DisparityFilter, FilterPolicy, NoiseCorrectedFilter, SignificanceTest};
