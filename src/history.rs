use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use time_humanize::{Accuracy, HumanTime, Tense};

/// A completed run, immutable once created. Values are stored pre-formatted
/// the way the history cards show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub distance_km: String,
    pub elapsed: String,
    pub pace: String,
    pub completed_at: DateTime<Local>,
}

impl RunRecord {
    /// Rough "completed … ago" label relative to `now`.
    pub fn completed_ago(&self, now: DateTime<Local>) -> String {
        let secs = now
            .signed_duration_since(self.completed_at)
            .num_seconds()
            .max(0);
        HumanTime::from(std::time::Duration::from_secs(secs as u64))
            .to_text_en(Accuracy::Rough, Tense::Past)
    }
}

/// In-memory run history, most recent first. Lives for the process only;
/// nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub struct History {
    runs: Vec<RunRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a finished run.
    pub fn push(&mut self, record: RunRecord) {
        self.runs.insert(0, record);
    }

    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn latest(&self) -> Option<&RunRecord> {
        self.runs.first()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
