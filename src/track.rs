use crate::geo::{haversine_km, Point, PositionSample};

/// Outcome of feeding one sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// First fix of the session; establishes the origin, adds no distance.
    Origin(Point),
    /// A subsequent fix; carries the incremental leg and the new total.
    Advanced { leg_km: f64, total_km: f64 },
}

/// Accumulates run distance from successive position samples.
///
/// No smoothing or outlier rejection: every consecutive pair contributes
/// its haversine distance, GPS jitter included.
#[derive(Debug, Clone, Default)]
pub struct DistanceTracker {
    total_km: f64,
    previous: Option<Point>,
}

impl DistanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total distance so far in kilometres. Monotonically non-decreasing.
    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    pub fn previous_position(&self) -> Option<Point> {
        self.previous
    }

    pub fn record(&mut self, sample: PositionSample) -> SampleOutcome {
        let point = sample.point;
        match self.previous.replace(point) {
            None => SampleOutcome::Origin(point),
            Some(prev) => {
                let leg_km = haversine_km(prev, point);
                self.total_km += leg_km;
                SampleOutcome::Advanced {
                    leg_km,
                    total_km: self.total_km,
                }
            }
        }
    }
}
