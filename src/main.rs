mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use webbrowser::Browser;

use stride::{
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    geo::Point,
    location::{SimulatedProvider, SimulatedWalk},
    runtime::{spawn_geo_bridge, AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{epoch_ms, Status},
    TICK_RATE_MS,
};

pub const HISTORY_CARD_WIDTH: u16 = 48;

/// terminal run tracker with a live route canvas and pace readout
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Track a run from the terminal: live route canvas, distance, elapsed time and pace, with an in-session run history. Fixes come from a simulated GPS feed you can shape with the sim flags."
)]
pub struct Cli {
    /// seconds to wait for a single fix before it counts as timed out
    #[clap(short = 't', long)]
    sample_timeout_secs: Option<u64>,

    /// accept cached fixes up to this many seconds old (0 = fresh only)
    #[clap(long)]
    max_sample_age_secs: Option<u64>,

    /// request coarse fixes instead of high-accuracy ones
    #[clap(long)]
    low_accuracy: bool,

    /// simulated runner speed in km/h
    #[clap(short = 's', long)]
    speed_kmh: Option<f64>,

    /// milliseconds between simulated fixes
    #[clap(long)]
    fix_interval_ms: Option<u64>,

    /// start latitude of the simulated feed
    #[clap(long)]
    start_lat: Option<f64>,

    /// start longitude of the simulated feed
    #[clap(long)]
    start_lon: Option<f64>,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlays the given flags onto the persisted defaults.
    fn apply(&self, cfg: &mut Config) {
        if let Some(v) = self.sample_timeout_secs {
            cfg.sample_timeout_secs = v;
        }
        if let Some(v) = self.max_sample_age_secs {
            cfg.max_sample_age_secs = v;
        }
        if self.low_accuracy {
            cfg.high_accuracy = false;
        }
        if let Some(v) = self.speed_kmh {
            cfg.sim_speed_kmh = v;
        }
        if let Some(v) = self.fix_interval_ms {
            cfg.sim_interval_ms = v;
        }
        if let Some(v) = self.start_lat {
            cfg.start_lat = v;
        }
        if let Some(v) = self.start_lon {
            cfg.start_lon = v;
        }
    }
}

pub struct App {
    pub controller: Controller<SimulatedProvider>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    cli.apply(&mut cfg);
    if cli.save_config {
        store.save(&cfg)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let source = CrosstermEventSource::new();
    let geo_sink = spawn_geo_bridge(source.sender());
    let provider = SimulatedProvider::new(SimulatedWalk {
        start: Point::new(cfg.start_lat, cfg.start_lon),
        speed_kmh: cfg.sim_speed_kmh,
        interval: Duration::from_millis(cfg.sim_interval_ms),
    });

    let mut app = App {
        controller: Controller::new(provider, cfg.watch_options(), geo_sink),
    };

    let res = run_app(&mut terminal, &mut app, source);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: CrosstermEventSource,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(source, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => app.controller.tick(epoch_ms()),
            AppEvent::Resize => {}
            AppEvent::Geo(ev) => app.controller.handle_geo_event(ev, epoch_ms()),
            AppEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }

                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        // archive an in-flight run before leaving
                        let _ = app.controller.finish(epoch_ms());
                        break;
                    }
                    KeyCode::Char('s') => {
                        let _ = app.controller.start(epoch_ms());
                    }
                    KeyCode::Char(' ') => match app.controller.status() {
                        Status::Running => {
                            let _ = app.controller.pause(epoch_ms());
                        }
                        Status::Paused => {
                            let _ = app.controller.resume(epoch_ms());
                        }
                        Status::Idle => {}
                    },
                    KeyCode::Char('f') => {
                        let _ = app.controller.finish(epoch_ms());
                    }
                    KeyCode::Char('t') => {
                        if app.controller.status() == Status::Idle {
                            share_latest_run(app);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn share_latest_run(app: &App) {
    if let Some(run) = app.controller.history().latest() {
        if Browser::is_available() {
            webbrowser::open(&format!(
                "https://twitter.com/intent/tweet?text={}%20km%20in%20{}%20%2F%20{}%20min%2Fkm",
                run.distance_km, run.elapsed, run.pace
            ))
            .unwrap_or_default();
        }
    }
}
