use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::geo::{Point, PositionSample};
use crate::track::{DistanceTracker, SampleOutcome};

/// Milliseconds since the Unix epoch, the time base for all session math.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Lifecycle status as shown on the readout. Idle means no live session.
#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    Idle,
    Running,
    Paused,
}

/// Rejected session transition; the session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionError {
    NotRunning,
    NotPaused,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotRunning => write!(f, "session is not running"),
            SessionError::NotPaused => write!(f, "session is not paused"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One live run: start timestamp, paused-time accounting, and the distance
/// tracker. Constructed on start, consumed into a record on finish; the
/// controller holds `Option<RunSession>` and `None` is Idle.
#[derive(Debug, Clone)]
pub struct RunSession {
    started_at_ms: u64,
    pause_started_at_ms: Option<u64>,
    total_paused_ms: u64,
    tracker: DistanceTracker,
}

impl RunSession {
    /// Starts a fresh session: zero distance, zero paused time, no previous
    /// position.
    pub fn begin(now_ms: u64) -> Self {
        Self {
            started_at_ms: now_ms,
            pause_started_at_ms: None,
            total_paused_ms: 0,
            tracker: DistanceTracker::new(),
        }
    }

    pub fn status(&self) -> Status {
        if self.pause_started_at_ms.is_some() {
            Status::Paused
        } else {
            Status::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at_ms.is_some()
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// Sum of all closed pause intervals. Only grows, only while paused.
    pub fn total_paused_ms(&self) -> u64 {
        self.total_paused_ms
    }

    pub fn total_distance_km(&self) -> f64 {
        self.tracker.total_km()
    }

    pub fn previous_position(&self) -> Option<Point> {
        self.tracker.previous_position()
    }

    /// Wall time spent running: now minus start minus closed pauses,
    /// saturating so a skewed clock never yields a negative display.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms
            .saturating_sub(self.started_at_ms)
            .saturating_sub(self.total_paused_ms)
    }

    /// Valid only while running.
    pub fn pause(&mut self, now_ms: u64) -> Result<(), SessionError> {
        if self.pause_started_at_ms.is_some() {
            return Err(SessionError::NotRunning);
        }
        self.pause_started_at_ms = Some(now_ms);
        Ok(())
    }

    /// Valid only while paused; closes the open pause interval.
    pub fn resume(&mut self, now_ms: u64) -> Result<(), SessionError> {
        match self.pause_started_at_ms.take() {
            Some(pause_started) => {
                self.total_paused_ms += now_ms.saturating_sub(pause_started);
                Ok(())
            }
            None => Err(SessionError::NotPaused),
        }
    }

    /// Feeds one fix to the distance tracker. Samples arriving while paused
    /// are discarded here by state check; the watch stays subscribed.
    pub fn record_sample(&mut self, sample: PositionSample) -> Option<SampleOutcome> {
        if self.is_paused() {
            return None;
        }
        Some(self.tracker.record(sample))
    }
}
