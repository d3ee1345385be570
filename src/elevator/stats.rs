/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Request;

#[derive(Debug, Default, Clone, Copy)]
struct Summary {
    count: u64,
    min: u64,
    max: u64,
    sum: u64,
}

/**
 * Round-trip latency of satisfied requests, from creation to arrival.
 *
 * Latencies are kept in milliseconds and reported in seconds.
 */
#[derive(Debug, Default)]
pub struct StatsCollector {
    summary: Mutex<Summary>,
}

impl StatsCollector {
    pub fn new() -> StatsCollector {
        StatsCollector::default()
    }

    fn lock(&self) -> MutexGuard<'_, Summary> {
        self.summary.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_completed_request(&self, request: &Request) {
        self.record_latency(request.time_created().elapsed());
    }

    pub fn record_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        let mut summary = self.lock();

        if summary.count == 0 {
            summary.min = millis;
            summary.max = millis;
        } else {
            summary.min = summary.min.min(millis);
            summary.max = summary.max.max(millis);
        }
        summary.count += 1;
        summary.sum = summary.sum.saturating_add(millis);
    }

    pub fn count(&self) -> u64 {
        self.lock().count
    }

    pub fn min_ms(&self) -> Option<u64> {
        let summary = self.lock();
        (summary.count > 0).then_some(summary.min)
    }

    pub fn max_ms(&self) -> Option<u64> {
        let summary = self.lock();
        (summary.count > 0).then_some(summary.max)
    }

    pub fn average_ms(&self) -> Option<f64> {
        let summary = self.lock();
        (summary.count > 0).then(|| summary.sum as f64 / summary.count as f64)
    }
}

fn seconds(millis: Option<f64>) -> String {
    match millis {
        Some(ms) => format!("{:?} seconds", ms / 1000.0),
        None => "N/A".to_string(),
    }
}

impl fmt::Display for StatsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total Requests Completed:  {}", self.count())?;
        writeln!(f, "  Fastest Completion Time:   {}", seconds(self.min_ms().map(|ms| ms as f64)))?;
        writeln!(f, "  Slowest Completion Time:   {}", seconds(self.max_ms().map(|ms| ms as f64)))?;
        writeln!(f, "  Average Completion Time:   {}", seconds(self.average_ms()))
    }
}
