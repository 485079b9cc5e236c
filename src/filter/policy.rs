//! Significance tests for edge weights.
//!
//! Both tests score one incident edge against the local weight distribution
//! of the evaluating node. With degree `k`, total incident weight `W`, and
//! edge weight `w`, let `p = w / W` be the share of the node's weight
//! carried by this edge. Then:
//!
//! ```text
//! disparity:        alpha = p^(k-1)
//! noise-corrected:  alpha = 1 - (1-p)^(k-1)
//! ```
//!
//! Lower alpha means more surprising under the null model, and an edge is
//! retained when `alpha < alpha_threshold`. A node with `k < 2` or `W == 0`
//! has no distinguishable edges; both tests return `alpha = 1.0` there.
//!
//! ## Numerical form
//!
//! `p^(k-1)` can legitimately be far below f64 epsilon for high-degree
//! nodes, so scores are produced in log space ([`SignificanceTest::log_alpha`])
//! and compared against `ln(alpha_threshold)`. The log of the disparity
//! score is exactly `(k-1)·ln(p)`, which stays representable long after the
//! plain power has underflowed; the noise-corrected variant uses
//! `ln_1p`/`exp_m1` so that small shares keep full precision.

use crate::error::Error;
use core::fmt;
use std::str::FromStr;

/// A per-edge significance statistic, evaluated from one endpoint's local
/// context.
///
/// Implementations must be pure: the engine calls them concurrently from
/// worker threads with no synchronization.
pub trait SignificanceTest: Sync {
    /// Natural log of the significance score for an edge of weight `weight`
    /// at a node with the given `degree` and `total_weight`.
    ///
    /// Always in `(-inf, 0]`; `0.0` (alpha = 1) when `degree < 2` or
    /// `total_weight == 0`.
    fn log_alpha(&self, weight: f64, total_weight: f64, degree: usize) -> f64;

    /// The significance score itself, in `[0, 1]`.
    ///
    /// May underflow to `0.0` for extreme inputs; use [`Self::log_alpha`]
    /// for threshold comparisons.
    fn alpha(&self, weight: f64, total_weight: f64, degree: usize) -> f64 {
        self.log_alpha(weight, total_weight, degree).exp()
    }
}

/// Weight share `p = w / W`, or `None` in the degenerate cases where no
/// edge can be significant.
fn weight_share(weight: f64, total_weight: f64, degree: usize) -> Option<f64> {
    if degree < 2 || total_weight == 0.0 {
        return None;
    }
    Some((weight / total_weight).clamp(0.0, 1.0))
}

/// The disparity filter: `alpha = p^(k-1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisparityFilter;

impl SignificanceTest for DisparityFilter {
    fn log_alpha(&self, weight: f64, total_weight: f64, degree: usize) -> f64 {
        match weight_share(weight, total_weight, degree) {
            // (k-1)·ln(p); ln(0) = -inf gives alpha = 0 for zero-weight edges.
            Some(p) => (degree - 1) as f64 * p.ln(),
            None => 0.0,
        }
    }
}

/// The noise-corrected disparity filter: `alpha = 1 - (1-p)^(k-1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseCorrectedFilter;

impl SignificanceTest for NoiseCorrectedFilter {
    fn log_alpha(&self, weight: f64, total_weight: f64, degree: usize) -> f64 {
        match weight_share(weight, total_weight, degree) {
            Some(p) => {
                // q = ln((1-p)^(k-1)), then alpha = 1 - e^q = -expm1(q).
                let q = (degree - 1) as f64 * (-p).ln_1p();
                (-q.exp_m1()).ln()
            }
            None => 0.0,
        }
    }
}

/// Significance test selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// The disparity filter (`"disparity"`).
    #[default]
    Disparity,
    /// The noise-corrected disparity filter (`"ncdf"`).
    NoiseCorrected,
}

impl FilterPolicy {
    /// The test this policy names.
    pub fn test(&self) -> &'static dyn SignificanceTest {
        match self {
            FilterPolicy::Disparity => &DisparityFilter,
            FilterPolicy::NoiseCorrected => &NoiseCorrectedFilter,
        }
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPolicy::Disparity => write!(f, "disparity"),
            FilterPolicy::NoiseCorrected => write!(f, "ncdf"),
        }
    }
}

impl FromStr for FilterPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "disparity" => Ok(FilterPolicy::Disparity),
            "ncdf" => Ok(FilterPolicy::NoiseCorrected),
            _ => Err(Error::InvalidParameter {
                name: "policy",
                message: "expected 'disparity' or 'ncdf'",
            }),
        }
    }
}
