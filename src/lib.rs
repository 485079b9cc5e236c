//! # spine
//!
//! Statistically significant backbone extraction for large weighted,
//! undirected graphs.
//!
//! Dense co-occurrence networks (user-user graphs built from shared
//! community membership, for example) are dominated by edges that exist
//! only because their endpoints are busy. `spine` reduces such a graph to
//! its backbone: the subset of edges whose weight is locally surprising
//! relative to the total weight incident on at least one endpoint. Two
//! interchangeable significance tests are provided — the disparity filter
//! and a noise-corrected variant — evaluated per node in parallel over a
//! shared read-only adjacency index and merged by canonical edge key, so
//! the output never depends on scheduling.
//!
//! ## Usage
//!
//! ```rust
//! use spine::{extract_backbone, BackboneConfig, EdgeRecord};
//!
//! // Node "a" spreads weight 10 over three edges; the two weight-1 edges
//! // carry improbably small shares and survive the default 0.05 threshold.
//! let edges = vec![
//!     EdgeRecord::new("a", "b", 1.0),
//!     EdgeRecord::new("a", "c", 1.0),
//!     EdgeRecord::new("a", "d", 8.0),
//! ];
//!
//! let result = extract_backbone(&edges, &BackboneConfig::new()).unwrap();
//! assert_eq!(result.stats.backbone_edges, 2);
//! ```
//!
//! ## Guarantees
//!
//! - The backbone is a subset of the input: no invented edges, no altered
//!   weights, no duplicate pairs.
//! - Output is deterministic for fixed `(edges, threshold, policy)`,
//!   independent of worker count and batch size.
//! - Validation failures are typed errors naming the offending record; a
//!   failed worker batch aborts the run rather than silently thinning the
//!   result.
//!
//! The `parallel` feature (default) enables rayon-based evaluation; the
//! `cli` feature builds the `spine` binary (CSV in, CSV out, atomic
//! writes).

pub mod backbone;
/// Error types used across `spine`.
pub mod error;
pub mod filter;
pub mod graph;
pub mod io;

pub use backbone::{extract_backbone, BackboneConfig, BackboneResult, BackboneStats, DEFAULT_ALPHA};
pub use error::{Error, Result};
pub use filter::{
    DisparityFilter, FilterPolicy, NoiseCorrectedFilter, ReductionEngine, SignificanceTest,
    DEFAULT_BATCH_SIZE,
};
pub use graph::{EdgeRecord, NodeStats, WeightedGraph};
