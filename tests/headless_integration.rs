use std::sync::mpsc;
use std::time::Duration;

use stride::controller::Controller;
use stride::geo::PositionSample;
use stride::location::{GeoError, GeoEvent, Permission, ScriptedProvider, WatchOptions};
use stride::runtime::{spawn_geo_bridge, AppEvent, FixedTicker, Runner, TestEventSource};
use stride::session::Status;

// Headless integration using the internal runtime + controller without a TTY.
// The scripted provider pushes its fixes through the geo bridge into the same
// channel the runner consumes, exercising the real event path end to end.
#[test]
fn headless_run_flow_accumulates_distance_and_finishes() {
    let (tx, rx) = mpsc::channel();
    let geo_sink = spawn_geo_bridge(tx);

    let provider = ScriptedProvider::new(
        Permission::Granted,
        vec![
            GeoEvent::Fix(PositionSample::new(51.500, -0.100, 0)),
            GeoEvent::Fix(PositionSample::new(51.510, -0.100, 2_000)),
            GeoEvent::Fix(PositionSample::new(51.520, -0.100, 4_000)),
        ],
    );
    let mut controller = Controller::new(provider, WatchOptions::default(), geo_sink);

    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    controller.start(0).unwrap();
    assert_eq!(controller.status(), Status::Running);

    // Drive the loop until the scripted fixes have all been consumed
    let mut fixes_seen = 0;
    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Geo(ev) => {
                if matches!(ev, GeoEvent::Fix(_)) {
                    fixes_seen += 1;
                }
                controller.handle_geo_event(ev, 10_000);
            }
            AppEvent::Tick => controller.tick(10_000),
            _ => {}
        }
        if fixes_seen == 3 {
            break;
        }
    }

    assert_eq!(fixes_seen, 3, "all scripted fixes should arrive");
    // two legs of 0.01 degrees latitude each, ~1.11 km apiece
    let total = controller.session().unwrap().total_distance_km();
    assert!((total - 2.224).abs() < 0.01, "got {total}");
    assert_eq!(controller.map().route().len(), 3);

    controller.finish(600_000).unwrap();
    assert_eq!(controller.status(), Status::Idle);
    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.provider().active_watches(), 0);

    let record = controller.history().latest().unwrap();
    assert_eq!(record.elapsed, "00:10:00");
    assert_eq!(record.distance_km, "2.22");
    // 10 minutes over ~2.224 km -> ~4:29 min/km
    assert_eq!(record.pace, "4:29");
}

#[test]
fn headless_error_event_terminates_the_run() {
    let (tx, rx) = mpsc::channel();
    let geo_sink = spawn_geo_bridge(tx);

    let provider = ScriptedProvider::new(
        Permission::Granted,
        vec![
            GeoEvent::Fix(PositionSample::new(48.8566, 2.3522, 0)),
            GeoEvent::Error(GeoError::PositionUnavailable),
        ],
    );
    let mut controller = Controller::new(provider, WatchOptions::default(), geo_sink);

    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    controller.start(0).unwrap();
    for _ in 0..100u32 {
        if let AppEvent::Geo(ev) = runner.step() {
            controller.handle_geo_event(ev, 60_000);
        }
        if controller.status() == Status::Idle {
            break;
        }
    }

    // the error finished the run: one record, watch released, alert raised
    assert_eq!(controller.status(), Status::Idle);
    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.provider().active_watches(), 0);
    assert!(controller.alert().is_some());
}

#[test]
fn headless_ticks_only_advance_the_readout_while_running() {
    let (tx, rx) = mpsc::channel();
    let geo_sink = spawn_geo_bridge(tx);

    let provider = ScriptedProvider::new(Permission::Granted, vec![]);
    let mut controller = Controller::new(provider, WatchOptions::default(), geo_sink);

    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    // idle: ticks arrive (timeouts) but the readout stays zeroed
    for _ in 0..3 {
        if let AppEvent::Tick = runner.step() {
            controller.tick(1_000_000);
        }
    }
    assert_eq!(controller.readout().time, "00:00:00");

    controller.start(0).unwrap();
    if let AppEvent::Tick = runner.step() {
        controller.tick(125_000);
    }
    assert_eq!(controller.readout().time, "00:02:05");
}
