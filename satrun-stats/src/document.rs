//! Statistics Document Schema
//!
//! Typed view of the `statistics.json` file a simulation run leaves behind.
//! Only the fields the aggregator reads are modelled; everything else the
//! simulator writes (interconnect counters, the resolved config, per-unit
//! idle breakdowns) is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a statistics document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or misses an expected key
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        /// Offending path
        path: PathBuf,
        /// Underlying JSON error (carries line/column and the missing key)
        #[source]
        source: serde_json::Error,
    },
}

/// Running sum and sample count; the mean is `total / count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageStat {
    /// Sum of all recorded values
    pub total: u64,
    /// Number of recorded values
    pub count: u64,
}

/// Hit/miss counters of one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Accesses served by the cache
    pub cache_hits: u64,
    /// Accesses forwarded to the next level
    pub cache_misses: u64,
}

/// Idle/busy split of one hardware unit (a watcher or a single clause unit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCycles {
    /// Cycles spent waiting
    pub idle_cycle: u64,
    /// Cycles spent working
    pub busy_cycle: u64,
}

/// Clause units attached to one watcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseGroup {
    /// One entry per clause unit in the group
    pub single_clause: Vec<UnitCycles>,
}

/// Per-run statistics as written by the simulator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsDocument {
    /// Total simulated cycles
    pub total_cycle: u64,
    /// Assignments processed per round
    pub average_assignments: AverageStat,
    /// Watchers visited per round
    pub average_watchers: AverageStat,
    /// Clauses evaluated per round
    pub average_clauses: AverageStat,
    /// Shared last-level cache counters
    pub l3_cache_statistics: CacheStatistics,
    /// One entry per private (L1) cache
    pub private_cache_statistics: Vec<CacheStatistics>,
    /// One entry per watcher unit
    pub watcher_statistics: Vec<UnitCycles>,
    /// One group per watcher, each holding its clause units
    pub clause_statistics: Vec<ClauseGroup>,
}

impl StatisticsDocument {
    /// Load and parse a statistics document.
    ///
    /// The file handle is dropped before returning on every path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a statistics document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_json() -> serde_json::Value {
        json!({
            "total_cycle": 1000,
            "average_assignments": { "total": 12, "count": 4 },
            "average_watchers": { "total": 30, "count": 3 },
            "average_clauses": { "total": 9, "count": 9 },
            "l3_cache_statistics": { "cache_hits": 3, "cache_misses": 1 },
            "private_cache_statistics": [
                { "cache_hits": 2, "cache_misses": 2 },
                { "cache_hits": 4, "cache_misses": 0 }
            ],
            "watcher_statistics": [
                { "total_assignments": 5, "idle_cycle": 10, "busy_cycle": 30,
                  "idle_stat": { "idle_no_task": 10 } }
            ],
            "clause_statistics": [
                { "single_clause": [ { "idle_cycle": 1, "busy_cycle": 1 } ] }
            ],
            "icnt_statistics": { "total_messages": 7 },
            "config": { "n_watchers": 1, "n_clauses": 1 }
        })
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let doc = StatisticsDocument::from_json(&sample_json().to_string()).unwrap();

        assert_eq!(doc.total_cycle, 1000);
        assert_eq!(doc.average_assignments, AverageStat { total: 12, count: 4 });
        assert_eq!(doc.private_cache_statistics.len(), 2);
        assert_eq!(doc.watcher_statistics[0].busy_cycle, 30);
        assert_eq!(doc.clause_statistics[0].single_clause.len(), 1);
    }

    #[test]
    fn test_cache_and_unit_counters() {
        let doc = StatisticsDocument::from_json(&sample_json().to_string()).unwrap();

        assert_eq!(
            doc.l3_cache_statistics,
            CacheStatistics { cache_hits: 3, cache_misses: 1 }
        );
        assert_eq!(
            doc.private_cache_statistics[1],
            CacheStatistics { cache_hits: 4, cache_misses: 0 }
        );
        assert_eq!(
            doc.watcher_statistics[0],
            UnitCycles { idle_cycle: 10, busy_cycle: 30 }
        );
    }

    #[test]
    fn test_missing_total_cycle_is_an_error() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("total_cycle");

        let err = StatisticsDocument::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("total_cycle"));
    }

    #[test]
    fn test_load_reports_path_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("statistics.json");

        let err = StatisticsDocument::load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
        assert!(err.to_string().contains("statistics.json"));
    }

    #[test]
    fn test_load_reports_path_on_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statistics.json");
        let mut file = File::create(&path).unwrap();
        write!(file, "{{ \"total_cycle\": ").unwrap();

        let err = StatisticsDocument::load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
