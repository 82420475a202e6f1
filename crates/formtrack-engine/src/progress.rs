//! Session progress log and summary statistics.
//!
//! Accumulates per-session rep totals and computes the summary a progress
//! chart is drawn from: totals, averages, best session, and a least-squares
//! trend of reps against elapsed days. Rendering itself is a downstream
//! concern; this module only supplies the numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed session's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Reps completed that session
    pub reps: u32,
}

impl SessionRecord {
    /// Creates a new session record.
    #[must_use]
    pub fn new(date: NaiveDate, reps: u32) -> Self {
        Self { date, reps }
    }
}

/// Summary statistics over a progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Reps summed over all sessions
    pub total_reps: u64,
    /// Mean reps per session
    pub average_reps: f64,
    /// Highest single-session total
    pub best_session: u32,
    /// Number of sessions recorded
    pub total_sessions: usize,
    /// Least-squares slope of reps against days since the first session;
    /// positive means improving
    pub trend_slope: f64,
}

/// Capacity-limited log of per-session totals, oldest first.
pub struct ProgressLog {
    records: Vec<SessionRecord>,
    max_records: usize,
}

impl ProgressLog {
    /// Create a new log with a given maximum capacity.
    ///
    /// When the capacity is exceeded, the oldest records are evicted.
    #[must_use]
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Vec::with_capacity(max_records.min(4096)),
            max_records: max_records.max(1),
        }
    }

    /// Create with default capacity (365 sessions ~ one daily year).
    #[must_use]
    pub fn default_capacity() -> Self {
        Self::new(365)
    }

    /// Push a session record into the log, keeping records date-ordered.
    ///
    /// If the log is at capacity, the oldest record is evicted.
    pub fn push(&mut self, record: SessionRecord) {
        if self.records.len() >= self.max_records {
            self.records.remove(0);
        }
        // Most pushes arrive in date order already; fix up when they don't.
        let insert_at = self
            .records
            .iter()
            .rposition(|r| r.date <= record.date)
            .map_or(0, |i| i + 1);
        self.records.insert(insert_at, record);
    }

    /// The most recent record, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    /// All records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Number of records in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum capacity of the log.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_records
    }

    /// Clear all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Compute summary statistics over all records.
    ///
    /// Returns `None` if the log is empty. The trend slope is the
    /// univariate least-squares fit of reps against days since the first
    /// session; a log whose sessions all fall on one day has slope 0.
    #[must_use]
    pub fn stats(&self) -> Option<ProgressStats> {
        if self.records.is_empty() {
            return None;
        }

        let n = self.records.len() as f64;
        let start = self.records[0].date;

        let mut total: u64 = 0;
        let mut best: u32 = 0;
        for r in &self.records {
            total += u64::from(r.reps);
            best = best.max(r.reps);
        }
        let average = total as f64 / n;

        // Least squares: slope = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)²
        let mean_days = self
            .records
            .iter()
            .map(|r| days_since(start, r.date))
            .sum::<f64>()
            / n;
        let mut covariance = 0.0;
        let mut variance = 0.0;
        for r in &self.records {
            let dx = days_since(start, r.date) - mean_days;
            covariance += dx * (f64::from(r.reps) - average);
            variance += dx * dx;
        }
        let trend_slope = if variance > 0.0 {
            covariance / variance
        } else {
            0.0
        };

        Some(ProgressStats {
            total_reps: total,
            average_reps: average,
            best_session: best,
            total_sessions: self.records.len(),
            trend_slope,
        })
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::default_capacity()
    }
}

fn days_since(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}
