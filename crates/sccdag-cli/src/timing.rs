//! Opt-in wall-clock timing of command phases (`--timing` / `SCCDAG_TIMING`).
//!
//! Samples are kept per thread and drained into a [`TimingReport`] once the
//! command has finished.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Aggregated timings, one row per phase name in lexical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    pub name: String,
    pub total: Duration,
    pub max: Duration,
    pub count: usize,
}

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `SCCDAG_TIMING` is `1`, `true`, `yes` or `on`.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("SCCDAG_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        SAMPLES.with(|samples| samples.borrow_mut().clear());
    }
}

fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

/// Run `f`, recording its duration under `name` when timing is enabled.
pub fn timed<R>(name: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| samples.borrow_mut().push((name.to_string(), elapsed)));
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut grouped: BTreeMap<String, Vec<Duration>> = BTreeMap::new();
    for (name, elapsed) in samples {
        grouped.entry(name).or_default().push(elapsed);
    }

    let phases = grouped
        .into_iter()
        .map(|(name, values)| PhaseTiming {
            name,
            total: values.iter().sum(),
            max: values.iter().copied().max().unwrap_or_default(),
            count: values.len(),
        })
        .collect();

    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let phases = self
            .phases
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "count": p.count,
                    "total_us": p.total.as_micros(),
                    "max_us": p.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "phases": phases })
    }

    #[must_use]
    pub fn display_table(&self) -> String {
        use std::fmt::Write as _;

        let mut out = format!("{:<28} {:>6} {:>12} {:>12}\n", "phase", "count", "total_us", "max_us");
        for p in &self.phases {
            let _ = writeln!(
                out,
                "{:<28} {:>6} {:>12} {:>12}",
                p.name,
                p.count,
                p.total.as_micros(),
                p.max.as_micros()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for value in ["1", "true", "YES", " on "] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["0", "false", "", "maybe"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    // One test: the enabled flag is process-wide.
    #[test]
    fn samples_are_recorded_only_while_enabled() {
        set_timing_enabled(false);
        assert_eq!(timed("phase", || 7), 7);
        assert!(collect_report().is_empty());

        set_timing_enabled(true);
        timed("load", || ());
        timed("load", || ());
        timed("analyze", || ());
        let report = collect_report();
        set_timing_enabled(false);

        let names: Vec<_> = report.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["analyze", "load"]);
        assert_eq!(report.phases[1].count, 2);
        assert_eq!(report.to_json()["phases"][1]["count"], 2);
        assert!(report.display_table().contains("load"));
    }
}
