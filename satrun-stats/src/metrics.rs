//! Derived Run Metrics
//!
//! Reduces one [`StatisticsDocument`] to the eight scalars reported per run.
//!
//! Two different reductions are used for the idle/miss ratios:
//! - L1 miss rate and watcher idle rate are **mean-of-means**: each counter is
//!   averaged across units first, then the ratio of the averages is taken.
//! - Clause idle rate is a **pooled** ratio: idle and busy cycles are summed
//!   over every clause unit of every group, then divided.
//!
//! Neither is a mean of per-unit ratios, which is what usually diverges from
//! them. Over a single sequence the two forms are algebraically equal since the
//! unit count cancels; each metric is still computed in the form the study
//! defined it.

use crate::document::{AverageStat, CacheStatistics, StatisticsDocument, UnitCycles};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The eight reported metrics, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total simulated cycles
    Cycles,
    /// Mean assignments per round
    AverageAssignments,
    /// Mean watchers per round
    AverageWatchers,
    /// Mean clauses per round
    AverageClauses,
    /// Shared cache miss rate
    L3MissRate,
    /// Private cache miss rate (mean-of-means)
    L1MissRate,
    /// Watcher idle rate (mean-of-means)
    WatcherIdleRate,
    /// Clause unit idle rate (pooled sums)
    ClauseIdleRate,
}

impl Metric {
    /// All metrics in report order
    pub const ALL: [Metric; 8] = [
        Metric::Cycles,
        Metric::AverageAssignments,
        Metric::AverageWatchers,
        Metric::AverageClauses,
        Metric::L3MissRate,
        Metric::L1MissRate,
        Metric::WatcherIdleRate,
        Metric::ClauseIdleRate,
    ];

    /// Stable machine-readable key
    pub fn key(self) -> &'static str {
        match self {
            Metric::Cycles => "cycles",
            Metric::AverageAssignments => "average_assignments",
            Metric::AverageWatchers => "average_watchers",
            Metric::AverageClauses => "average_clauses",
            Metric::L3MissRate => "l3_miss_rate",
            Metric::L1MissRate => "l1_miss_rate",
            Metric::WatcherIdleRate => "watcher_idle_rate",
            Metric::ClauseIdleRate => "clause_idle_rate",
        }
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            Metric::Cycles => "Total cycles",
            Metric::AverageAssignments => "Average assignments",
            Metric::AverageWatchers => "Average watchers",
            Metric::AverageClauses => "Average clauses",
            Metric::L3MissRate => "L3 cache miss rate",
            Metric::L1MissRate => "L1 cache miss rate",
            Metric::WatcherIdleRate => "Watcher idle rate",
            Metric::ClauseIdleRate => "Clause idle rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single metric value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Exact counter (cycles)
    Integer(u64),
    /// Mean or ratio
    Real(f64),
}

impl MetricValue {
    /// Value as a float
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Integer(v) => v as f64,
            MetricValue::Real(v) => v,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Real(v) => write_real(f, *v),
        }
    }
}

/// Shortest round-trip digits with a fraction (`3.0`); scientific form keeps a
/// signed exponent of at least two digits (`5e-05`, `1e+16`).
fn write_real(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&repr),
    }
}

/// Arithmetic failures while deriving metrics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    /// An `AverageStat` recorded no samples
    #[error("{metric}: `{field}.count` is zero")]
    ZeroCount {
        /// Metric being computed
        metric: Metric,
        /// Document field holding the average
        field: &'static str,
    },

    /// A per-unit sequence has no entries, so its mean is undefined
    #[error("{metric}: `{field}` is empty")]
    EmptySequence {
        /// Metric being computed
        metric: Metric,
        /// Document field holding the sequence
        field: &'static str,
    },

    /// Numerator and denominator are both zero
    #[error("{metric}: ratio denominator is zero")]
    ZeroDenominator {
        /// Metric being computed
        metric: Metric,
    },
}

/// All eight metrics of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// `total_cycle`, unchanged
    pub cycles: u64,
    /// Assignments per round
    pub average_assignments: f64,
    /// Watchers per round
    pub average_watchers: f64,
    /// Clauses per round
    pub average_clauses: f64,
    /// Shared cache miss rate
    pub l3_miss_rate: f64,
    /// Private cache miss rate
    pub l1_miss_rate: f64,
    /// Watcher idle rate
    pub watcher_idle_rate: f64,
    /// Clause unit idle rate
    pub clause_idle_rate: f64,
}

impl RunMetrics {
    /// Compute every metric of a document, failing on the first degenerate one
    pub fn from_document(doc: &StatisticsDocument) -> Result<Self, MetricError> {
        Ok(Self {
            cycles: doc.total_cycle,
            average_assignments: average(
                &doc.average_assignments,
                Metric::AverageAssignments,
                "average_assignments",
            )?,
            average_watchers: average(
                &doc.average_watchers,
                Metric::AverageWatchers,
                "average_watchers",
            )?,
            average_clauses: average(
                &doc.average_clauses,
                Metric::AverageClauses,
                "average_clauses",
            )?,
            l3_miss_rate: l3_miss_rate(&doc.l3_cache_statistics)?,
            l1_miss_rate: l1_miss_rate(&doc.private_cache_statistics)?,
            watcher_idle_rate: watcher_idle_rate(&doc.watcher_statistics)?,
            clause_idle_rate: clause_idle_rate(doc)?,
        })
    }

    /// Look up one metric
    pub fn get(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Cycles => MetricValue::Integer(self.cycles),
            Metric::AverageAssignments => MetricValue::Real(self.average_assignments),
            Metric::AverageWatchers => MetricValue::Real(self.average_watchers),
            Metric::AverageClauses => MetricValue::Real(self.average_clauses),
            Metric::L3MissRate => MetricValue::Real(self.l3_miss_rate),
            Metric::L1MissRate => MetricValue::Real(self.l1_miss_rate),
            Metric::WatcherIdleRate => MetricValue::Real(self.watcher_idle_rate),
            Metric::ClauseIdleRate => MetricValue::Real(self.clause_idle_rate),
        }
    }
}

/// `total / count` of an average counter
pub fn average(stat: &AverageStat, metric: Metric, field: &'static str) -> Result<f64, MetricError> {
    if stat.count == 0 {
        return Err(MetricError::ZeroCount { metric, field });
    }
    Ok(stat.total as f64 / stat.count as f64)
}

/// `part / (part + rest)`, refusing a zero denominator
fn ratio(part: f64, rest: f64, metric: Metric) -> Result<f64, MetricError> {
    let denominator = part + rest;
    if denominator == 0.0 {
        return Err(MetricError::ZeroDenominator { metric });
    }
    Ok(part / denominator)
}

/// Arithmetic mean of one field across a sequence
fn mean_of<T>(
    items: &[T],
    value: impl Fn(&T) -> u64,
    metric: Metric,
    field: &'static str,
) -> Result<f64, MetricError> {
    if items.is_empty() {
        return Err(MetricError::EmptySequence { metric, field });
    }
    let sum: u128 = items.iter().map(|item| value(item) as u128).sum();
    Ok(sum as f64 / items.len() as f64)
}

/// Miss rate of the shared cache from its aggregate counters
pub fn l3_miss_rate(stats: &CacheStatistics) -> Result<f64, MetricError> {
    ratio(
        stats.cache_misses as f64,
        stats.cache_hits as f64,
        Metric::L3MissRate,
    )
}

/// Private cache miss rate: `mean(misses) / (mean(hits) + mean(misses))`.
///
/// Mean-of-means, not the pooled `sum(misses) / sum(accesses)`.
pub fn l1_miss_rate(caches: &[CacheStatistics]) -> Result<f64, MetricError> {
    let metric = Metric::L1MissRate;
    let field = "private_cache_statistics";
    let hits = mean_of(caches, |c| c.cache_hits, metric, field)?;
    let misses = mean_of(caches, |c| c.cache_misses, metric, field)?;
    ratio(misses, hits, metric)
}

/// Watcher idle rate: `mean(idle) / (mean(idle) + mean(busy))`.
///
/// Mean-of-means, same shape as [`l1_miss_rate`].
pub fn watcher_idle_rate(watchers: &[UnitCycles]) -> Result<f64, MetricError> {
    let metric = Metric::WatcherIdleRate;
    let field = "watcher_statistics";
    let idle = mean_of(watchers, |w| w.idle_cycle, metric, field)?;
    let busy = mean_of(watchers, |w| w.busy_cycle, metric, field)?;
    ratio(idle, busy, metric)
}

/// Clause idle rate: `sum(idle) / (sum(idle) + sum(busy))` over every clause
/// unit of every group.
///
/// Pooled sums, unlike the watcher idle rate. An empty set of clause units
/// leaves a zero denominator and fails.
pub fn clause_idle_rate(doc: &StatisticsDocument) -> Result<f64, MetricError> {
    let (idle, busy) = doc
        .clause_statistics
        .iter()
        .flat_map(|group| group.single_clause.iter())
        .fold((0u128, 0u128), |(idle, busy), unit| {
            (idle + unit.idle_cycle as u128, busy + unit.busy_cycle as u128)
        });
    ratio(idle as f64, busy as f64, Metric::ClauseIdleRate)
}
