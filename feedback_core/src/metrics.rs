//! Submission counters reported by `/api/stats`

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::collections::HashMap;
use parking_lot::RwLock;
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct SubmissionMetrics {
    pub total_submissions: Arc<AtomicU64>,
    pub accepted_submissions: Arc<AtomicU64>,
    pub rejected_submissions: Arc<AtomicU64>,
    pub invalid_payloads: Arc<AtomicU64>,
    pub missing_by_field: Arc<RwLock<HashMap<String, u64>>>,
    pub last_submission_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    pub rejected_submissions: u64,
    pub invalid_payloads: u64,
    pub missing_by_field: Vec<FieldMetric>,
    pub acceptance_rate: f64,
    pub uptime_seconds: i64,
    pub last_submission_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldMetric {
    pub field: String,
    pub count: u64,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self {
            total_submissions: Arc::new(AtomicU64::new(0)),
            accepted_submissions: Arc::new(AtomicU64::new(0)),
            rejected_submissions: Arc::new(AtomicU64::new(0)),
            invalid_payloads: Arc::new(AtomicU64::new(0)),
            missing_by_field: Arc::new(RwLock::new(HashMap::new())),
            last_submission_at: Arc::new(RwLock::new(None)),
            start_time: Utc::now(),
        }
    }

    fn record_received(&self) {
        self.total_submissions.fetch_add(1, Ordering::Relaxed);
        *self.last_submission_at.write() = Some(Utc::now());
    }

    pub fn record_accepted(&self) {
        self.record_received();
        self.accepted_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, missing: &[String]) {
        self.record_received();
        self.rejected_submissions.fetch_add(1, Ordering::Relaxed);

        let mut fields = self.missing_by_field.write();
        for field in missing {
            *fields.entry(field.clone()).or_insert(0) += 1;
        }
    }

    /// Bodies that could not be decoded never reach the field check.
    pub fn record_invalid_payload(&self) {
        self.record_received();
        self.invalid_payloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> i64 {
        Utc::now().signed_duration_since(self.start_time).num_seconds()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total_submissions.load(Ordering::Relaxed);
        let accepted = self.accepted_submissions.load(Ordering::Relaxed);

        let mut missing_by_field: Vec<FieldMetric> = self
            .missing_by_field
            .read()
            .iter()
            .map(|(field, count)| FieldMetric {
                field: field.clone(),
                count: *count,
            })
            .collect();

        missing_by_field.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.field.cmp(&b.field)));

        StatsSnapshot {
            total_submissions: total,
            accepted_submissions: accepted,
            rejected_submissions: self.rejected_submissions.load(Ordering::Relaxed),
            invalid_payloads: self.invalid_payloads.load(Ordering::Relaxed),
            missing_by_field,
            acceptance_rate: if total > 0 {
                (accepted as f64 / total as f64) * 100.0
            } else {
                0.0
            },
            uptime_seconds: self.uptime_seconds(),
            last_submission_at: *self.last_submission_at.read(),
        }
    }
}

impl Default for SubmissionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
