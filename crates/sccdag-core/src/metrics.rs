//! Per-stage instrumentation snapshots.
//!
//! Every pipeline stage returns a [`StageMetrics`] alongside its output. The
//! snapshot is plain data: the core records counters and wall time but never
//! formats or logs it beyond a `debug!` event; rendering belongs to callers.

use std::time::Instant;

use serde::Serialize;

/// Counters and elapsed wall time for one stage invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageMetrics {
    /// Wall time spent in the stage, in nanoseconds.
    pub elapsed_ns: u64,
    /// Outgoing edges examined.
    pub edge_traversals: u64,
    /// Vertices entered by a depth-first traversal.
    pub dfs_visits: u64,
    /// Work-queue pushes plus pops.
    pub queue_ops: u64,
    /// Distance updates that improved a tentative value.
    pub relaxations: u64,
}

impl StageMetrics {
    /// Elapsed wall time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_ns as f64 / 1_000_000.0
    }

    pub(crate) fn stop(&mut self, started: Instant) {
        self.elapsed_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_millis_converts_nanos() {
        let m = StageMetrics {
            elapsed_ns: 2_500_000,
            ..StageMetrics::default()
        };
        assert!((m.elapsed_millis() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn stop_records_elapsed_time_only() {
        let mut m = StageMetrics::default();
        let started = Instant::now();
        m.stop(started);
        let upper = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        assert!(m.elapsed_ns <= upper);
        assert_eq!(m.edge_traversals, 0, "stop leaves counters alone");
    }

    #[test]
    fn serializes_flat_counter_fields() {
        let m = StageMetrics {
            elapsed_ns: 10,
            edge_traversals: 3,
            dfs_visits: 2,
            queue_ops: 4,
            relaxations: 1,
        };
        let json = serde_json::to_value(m).expect("serialize");
        assert_eq!(json["edge_traversals"], 3);
        assert_eq!(json["relaxations"], 1);
        assert_eq!(json["elapsed_ns"], 10);
    }
}
