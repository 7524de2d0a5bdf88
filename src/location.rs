//! Location provider seam: permission query plus a cancellable watch
//! subscription that pushes fixes (or errors) into an mpsc sink.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::geo::{Point, PositionSample};
use crate::session::epoch_ms;

/// One-shot permission state, queried before starting a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Permission {
    Granted,
    Denied,
    Unknown,
}

/// Non-fatal geolocation failures. Any of these arriving mid-session forces
/// an implicit finish so the run never sits on a dead feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    PermissionDenied,
    PositionUnavailable,
    SampleTimeout,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::PermissionDenied => {
                write!(f, "Location permission denied. Allow location access and try again.")
            }
            GeoError::PositionUnavailable => {
                write!(f, "Location information unavailable. Check your GPS signal.")
            }
            GeoError::SampleTimeout => {
                write!(f, "Timed out waiting for a location fix. Try again.")
            }
        }
    }
}

impl std::error::Error for GeoError {}

/// Watch subscription options, mirroring the usual geolocation knobs.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// A fix not resolved within this window surfaces as `SampleTimeout`.
    pub sample_timeout: Duration,
    /// Maximum acceptable age of a cached fix; zero means fresh fixes only.
    pub max_sample_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            sample_timeout: Duration::from_secs(5),
            max_sample_age: Duration::ZERO,
        }
    }
}

/// Event pushed by an active watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoEvent {
    Fix(PositionSample),
    Error(GeoError),
}

/// Handle for an active watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

pub trait LocationProvider {
    fn permission(&self) -> Permission;

    /// Starts pushing `GeoEvent`s into `sink` until the watch is cleared.
    /// Delivery is asynchronous and may stay silent arbitrarily long; the
    /// subscription remains pending until cancelled.
    fn watch(&mut self, options: &WatchOptions, sink: Sender<GeoEvent>) -> WatchId;

    fn clear_watch(&mut self, id: WatchId);
}

const KM_PER_DEG_LAT: f64 = 111.19;

/// Fix generator for running without a GPS device: a random walk from a
/// start point with drifting heading, paced to the configured speed.
#[derive(Debug, Clone)]
pub struct SimulatedWalk {
    pub start: Point,
    pub speed_kmh: f64,
    pub interval: Duration,
}

pub struct SimulatedProvider {
    walk: SimulatedWalk,
    next_id: u64,
    cancels: HashMap<WatchId, Arc<AtomicBool>>,
}

impl SimulatedProvider {
    pub fn new(walk: SimulatedWalk) -> Self {
        Self {
            walk,
            next_id: 0,
            cancels: HashMap::new(),
        }
    }
}

impl LocationProvider for SimulatedProvider {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn watch(&mut self, _options: &WatchOptions, sink: Sender<GeoEvent>) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        self.cancels.insert(id, cancelled.clone());

        let walk = self.walk.clone();
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut point = walk.start;
            let mut heading: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let step_km = walk.speed_kmh * walk.interval.as_secs_f64() / 3600.0;

            loop {
                if cancelled.load(Ordering::Relaxed) {
                    break;
                }
                if sink
                    .send(GeoEvent::Fix(PositionSample {
                        point,
                        timestamp_ms: epoch_ms(),
                    }))
                    .is_err()
                {
                    break;
                }

                heading += rng.gen_range(-0.4..0.4);
                point.lat += step_km / KM_PER_DEG_LAT * heading.cos();
                point.lon +=
                    step_km / (KM_PER_DEG_LAT * point.lat.to_radians().cos()) * heading.sin();

                thread::sleep(walk.interval);
            }
        });

        id
    }

    fn clear_watch(&mut self, id: WatchId) {
        if let Some(cancelled) = self.cancels.remove(&id) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }
}

/// Replays a fixed event list into the sink, synchronously on `watch`.
/// Used by headless integration tests in place of a live feed.
pub struct ScriptedProvider {
    permission: Permission,
    script: Vec<GeoEvent>,
    next_id: u64,
    active: HashSet<WatchId>,
}

impl ScriptedProvider {
    pub fn new(permission: Permission, script: Vec<GeoEvent>) -> Self {
        Self {
            permission,
            script,
            next_id: 0,
            active: HashSet::new(),
        }
    }

    pub fn denied() -> Self {
        Self::new(Permission::Denied, Vec::new())
    }

    /// Number of watches started but not yet cleared.
    pub fn active_watches(&self) -> usize {
        self.active.len()
    }
}

impl LocationProvider for ScriptedProvider {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn watch(&mut self, _options: &WatchOptions, sink: Sender<GeoEvent>) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        self.active.insert(id);

        for event in &self.script {
            if sink.send(*event).is_err() {
                break;
            }
        }

        id
    }

    fn clear_watch(&mut self, id: WatchId) {
        self.active.remove(&id);
    }
}
