//! Run controller: maps user commands and event feeds onto the session
//! state machine, and confines side effects to the watch subscription, the
//! route map, and the readout.

use std::sync::mpsc::Sender;

use chrono::Local;

use crate::format::{format_distance_km, format_duration, format_pace};
use crate::geo::PositionSample;
use crate::history::{History, RunRecord};
use crate::location::{GeoError, GeoEvent, LocationProvider, Permission, WatchId, WatchOptions};
use crate::map::{RouteMap, FOLLOW_ZOOM};
use crate::session::{RunSession, SessionError, Status};
use crate::track::SampleOutcome;

/// Display surface the controller writes into and the renderer reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub distance: String,
    pub time: String,
    pub pace: String,
}

impl Default for Readout {
    fn default() -> Self {
        Self {
            distance: "0.00".to_string(),
            time: "00:00:00".to_string(),
            pace: "0:00".to_string(),
        }
    }
}

pub struct Controller<P: LocationProvider> {
    provider: P,
    options: WatchOptions,
    geo_sink: Sender<GeoEvent>,
    session: Option<RunSession>,
    watch: Option<WatchId>,
    history: History,
    map: RouteMap,
    readout: Readout,
    alert: Option<String>,
}

impl<P: LocationProvider> Controller<P> {
    pub fn new(provider: P, options: WatchOptions, geo_sink: Sender<GeoEvent>) -> Self {
        Self {
            provider,
            options,
            geo_sink,
            session: None,
            watch: None,
            history: History::new(),
            map: RouteMap::new(),
            readout: Readout::default(),
            alert: None,
        }
    }

    pub fn status(&self) -> Status {
        self.session
            .as_ref()
            .map_or(Status::Idle, RunSession::status)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&RunSession> {
        self.session.as_ref()
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn map(&self) -> &RouteMap {
        &self.map
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Starts a run: permission gate, fresh session, fresh map, new watch.
    pub fn start(&mut self, now_ms: u64) -> Result<(), GeoError> {
        if self.session.is_some() {
            return Ok(());
        }

        if self.provider.permission() == Permission::Denied {
            self.alert = Some(GeoError::PermissionDenied.to_string());
            return Err(GeoError::PermissionDenied);
        }

        self.session = Some(RunSession::begin(now_ms));
        self.map.clear();
        self.readout = Readout::default();
        self.alert = None;
        self.watch = Some(self.provider.watch(&self.options, self.geo_sink.clone()));
        Ok(())
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<(), SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NotRunning)?
            .pause(now_ms)
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<(), SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NotPaused)?
            .resume(now_ms)
    }

    /// Archives the current session into history and returns to Idle.
    /// Releases the watch on every path, user-triggered or not.
    pub fn finish(&mut self, now_ms: u64) -> Result<(), SessionError> {
        let session = self.session.take().ok_or(SessionError::NotRunning)?;

        let elapsed_ms = session.elapsed_ms(now_ms);
        let distance_km = session.total_distance_km();
        self.history.push(RunRecord {
            distance_km: format_distance_km(distance_km),
            elapsed: format_duration(elapsed_ms),
            pace: format_pace(elapsed_ms, distance_km),
            completed_at: Local::now(),
        });

        self.release_watch();
        Ok(())
    }

    pub fn handle_geo_event(&mut self, event: GeoEvent, now_ms: u64) {
        match event {
            GeoEvent::Fix(sample) => self.handle_fix(sample),
            GeoEvent::Error(err) => self.handle_geo_error(err, now_ms),
        }
    }

    /// One position fix. Ignored while Idle; discarded by state check while
    /// Paused. The first fix of a session only centers the map.
    pub fn handle_fix(&mut self, sample: PositionSample) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.record_sample(sample) {
            None => {} // paused
            Some(SampleOutcome::Origin(point)) => {
                self.map.set_view(point, FOLLOW_ZOOM);
                self.map.append_point(point);
            }
            Some(SampleOutcome::Advanced { total_km, .. }) => {
                self.readout.distance = format_distance_km(total_km);
                self.map.append_point(sample.point);
                self.map.pan_to(sample.point);
            }
        }
    }

    /// A geolocation failure mid-session force-finishes the run so it cannot
    /// sit Running on a dead feed; while Idle it only raises the alert.
    pub fn handle_geo_error(&mut self, err: GeoError, now_ms: u64) {
        self.alert = Some(err.to_string());
        if self.session.is_some() {
            let _ = self.finish(now_ms);
        }
    }

    /// 1 Hz display refresh; frozen while paused.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.is_paused() {
            return;
        }

        let elapsed_ms = session.elapsed_ms(now_ms);
        self.readout.time = format_duration(elapsed_ms);
        self.readout.pace = format_pace(elapsed_ms, session.total_distance_km());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn release_watch(&mut self) {
        if let Some(id) = self.watch.take() {
            self.provider.clear_watch(id);
        }
    }
}
