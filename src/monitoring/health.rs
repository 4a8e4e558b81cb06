//! Health report served at `{prefix}/health`.
//!
//! Reports uptime and how many records each dataset loaded, so an uptime
//! monitor can tell a degraded (empty dataset) server from a healthy one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::DatasetStore;

#[derive(Debug, Clone)]
pub struct HealthState {
    started_at: DateTime<Utc>,
    nba_records: usize,
    nfl_records: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthReport {
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub nba_records: usize,
    pub nfl_records: usize,
}

impl HealthState {
    pub fn new(store: &DatasetStore) -> Self {
        Self {
            started_at: Utc::now(),
            nba_records: store.nba().len(),
            nfl_records: store.nfl().len(),
        }
    }

    pub fn report(&self) -> HealthReport {
        self.report_at(Utc::now())
    }

    fn report_at(&self, now: DateTime<Utc>) -> HealthReport {
        let status = if self.nba_records == 0 || self.nfl_records == 0 {
            "degraded"
        } else {
            "ok"
        };

        HealthReport {
            status,
            started_at: self.started_at,
            uptime_seconds: (now - self.started_at).num_seconds(),
            nba_records: self.nba_records,
            nfl_records: self.nfl_records,
        }
    }
}
