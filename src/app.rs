//! Refresh loop and the session context that ties everything together
//!
//! Control flow per tick: timer -> fetch/generate -> resolve -> build
//! geometry -> update map. Network sources fetch on a worker thread per
//! tick and post back over a channel, so a slow request never stalls the
//! frame loop and overlapping cycles each land when they finish.

use crate::colors::{ColorState, StatusColor};
use crate::config::{FlowMapConfig, RenderMode, SourceKind};
use crate::coords::{resolve_flows, CoordinateTable};
use crate::error::Result;
use crate::flow::FlowRecord;
use crate::help::{render_help_overlay, render_status, HELP};
use crate::map::canvas::BrailleCanvas;
use crate::map::{ElementId, MapView, MapWidget};
use crate::render::{build_feature_collection, ArcAnimation, FeatureCollection, FLOW_SOURCE};
use crate::source::{fetch_map_config, EventSource, RadarSource, RemoteSource, SyntheticSource};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use rand::prelude::*;
use serde::Serialize;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// Refresh timer
// ============================================================================

/// Fixed-interval trigger that fires immediately on first poll
#[derive(Clone, Debug)]
pub struct RefreshTimer {
    interval: Duration,
    next: Option<Duration>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    /// True when a cycle is due at `now`
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next {
            Some(due) if now < due => false,
            Some(due) => {
                // skip missed ticks instead of firing a burst
                let next = due + self.interval;
                self.next = Some(if next <= now { now + self.interval } else { next });
                true
            }
            None => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }

    /// Make the next poll fire
    pub fn trigger(&mut self) {
        self.next = None;
    }
}

// ============================================================================
// Session
// ============================================================================

/// Result of one fetch/generate cycle
pub struct CycleOutcome {
    pub cycle: u64,
    pub result: Result<Vec<FlowRecord>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    pub text: String,
    pub color: StatusColor,
}

struct LiveArc {
    anim: ArcAnimation,
    path: ElementId,
    marker: ElementId,
}

/// Everything one running map owns; passed around instead of globals
pub struct Session {
    mode: RenderMode,
    table: CoordinateTable,
    map: MapWidget,
    source: Box<dyn EventSource>,
    timer: RefreshTimer,
    tx: Sender<CycleOutcome>,
    rx: Receiver<CycleOutcome>,
    arcs: Vec<LiveArc>,
    rng: StdRng,
    status: Status,
    next_cycle: u64,
    in_flight: usize,
}

impl Session {
    pub fn new(
        mode: RenderMode,
        table: CoordinateTable,
        map: MapWidget,
        source: Box<dyn EventSource>,
        interval: Duration,
        seed: Option<u64>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let status = Status {
            text: format!("waiting for {}", source.describe()),
            color: StatusColor::Muted,
        };

        Self {
            mode,
            table,
            map,
            source,
            timer: RefreshTimer::new(interval),
            tx,
            rx,
            arcs: Vec::new(),
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
                None => StdRng::from_entropy(),
            },
            status,
            next_cycle: 0,
            in_flight: 0,
        }
    }

    /// Build table, source and map from configuration.
    /// Fails only when the map config endpoint has no access token.
    pub fn from_config(config: &FlowMapConfig) -> Result<Self> {
        let view = load_view(config)?;
        let table = load_table(config);
        let source = build_source(config, &table)?;
        tracing::info!(
            mode = ?config.mode,
            source = %source.describe(),
            countries = table.len(),
            interval_ms = config.interval.as_millis() as u64,
            "session ready"
        );

        let session = Self::new(
            config.mode,
            table,
            MapWidget::new(view),
            source,
            config.interval,
            config.seed,
        );
        let view = session.map.view();
        tracing::debug!(
            lat = view.center.lat,
            lon = view.center.lon,
            zoom = view.zoom,
            style = %view.style_url,
            "map view"
        );
        Ok(session)
    }

    pub fn map(&self) -> &MapWidget {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapWidget {
        &mut self.map
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn active_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn refresh_now(&mut self) {
        self.timer.trigger();
    }

    /// Start a cycle if the timer says so
    pub fn tick(&mut self, now: Duration) {
        if self.timer.poll(now) {
            self.start_cycle(now);
        }
    }

    fn start_cycle(&mut self, now: Duration) {
        let cycle = self.next_cycle;
        self.next_cycle += 1;

        match self.source.detach() {
            Some(mut worker) => {
                self.in_flight += 1;
                let tx = self.tx.clone();
                tracing::debug!(cycle, "fetch started");
                thread::spawn(move || {
                    let result = worker.fetch();
                    let _ = tx.send(CycleOutcome { cycle, result });
                });
            }
            None => {
                let result = self.source.fetch();
                self.apply(CycleOutcome { cycle, result }, now);
            }
        }
    }

    /// Apply every finished background fetch
    pub fn drain(&mut self, now: Duration) {
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    self.apply(outcome, now);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Render one cycle's records, or report its failure
    pub fn apply(&mut self, outcome: CycleOutcome, now: Duration) {
        let records = match outcome.result {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(cycle = outcome.cycle, error = %err, "cycle failed");
                self.status = Status {
                    text: format!("events unavailable: {}", err),
                    color: StatusColor::Critical,
                };
                return;
            }
        };

        let resolution = resolve_flows(records, &self.table);
        for skipped in &resolution.unresolved {
            tracing::debug!(
                origin = %skipped.record.origin,
                target = %skipped.record.target,
                missing = ?skipped.missing,
                "unresolved flow skipped"
            );
        }
        let drawn = resolution.drawable.len();
        let dropped = resolution.dropped();

        match self.mode {
            RenderMode::Declarative => {
                let data = build_feature_collection(&resolution.drawable);
                let lines = data.lines().count();
                let targets = data.points().count();
                self.map.set_source(FLOW_SOURCE, data);
                tracing::debug!(lines, targets, "flow source replaced");
                self.status = Status {
                    text: format!(
                        "{} flows · {} unresolved · updated {}",
                        lines,
                        dropped,
                        chrono::Local::now().format("%H:%M:%S")
                    ),
                    color: StatusColor::Good,
                };
            }
            RenderMode::Animated => {
                for flow in resolution.drawable {
                    let anim = ArcAnimation::spawn(flow, now, &mut self.rng);
                    tracing::debug!(
                        origin = %anim.flow.record.origin,
                        target = %anim.flow.record.target,
                        hue = anim.hue,
                        duration_ms = anim.duration().as_millis() as u64,
                        "arc spawned"
                    );
                    let path = self.map.add_path(vec![anim.flow.from], anim.rgb);
                    let marker = self.map.add_marker(anim.flow.from, anim.rgb);
                    self.arcs.push(LiveArc { anim, path, marker });
                }
                self.status = Status {
                    text: format!("{} arcs in flight · {}", self.arcs.len(), self.source.describe()),
                    color: StatusColor::Good,
                };
            }
        }

        tracing::info!(cycle = outcome.cycle, drawn, dropped, "cycle applied");
    }

    /// Per-frame update of the animated arcs
    pub fn advance(&mut self, now: Duration) {
        let map = &mut self.map;
        self.arcs.retain(|arc| {
            if arc.anim.is_finished(now) {
                if arc.anim.is_cancelled() {
                    tracing::debug!(origin = %arc.anim.flow.record.origin, "arc cancelled");
                }
                map.remove(arc.path);
                map.remove(arc.marker);
                return false;
            }
            let progress = arc.anim.progress(now);
            map.update_path(arc.path, arc.anim.traced_path(progress));
            map.move_marker(arc.marker, arc.anim.position_at(progress));
            true
        });
    }

    /// Cancel every running arc and release its map elements
    pub fn shutdown(&mut self, now: Duration) {
        for arc in &mut self.arcs {
            arc.anim.cancel();
        }
        self.advance(now);
    }

    pub fn pending_fetches(&self) -> usize {
        self.in_flight
    }
}

// ============================================================================
// Setup
// ============================================================================

fn load_view(config: &FlowMapConfig) -> Result<MapView> {
    let mut view = config.view.clone();
    if let Some(url) = &config.map_config_url {
        let map_config = fetch_map_config(url, config.timeout)?;
        view.access_token = Some(map_config.access_token);
    }
    Ok(view)
}

fn load_table(config: &FlowMapConfig) -> CoordinateTable {
    let Some(url) = &config.coords_url else {
        return CoordinateTable::builtin();
    };

    match CoordinateTable::fetch_bulk(url, config.timeout) {
        Ok(table) => {
            tracing::info!(countries = table.len(), "loaded country coordinates");
            table
        }
        Err(err) => {
            tracing::warn!(error = %err, "bulk coordinates unavailable, using built-in table");
            CoordinateTable::builtin()
        }
    }
}

pub fn build_source(config: &FlowMapConfig, table: &CoordinateTable) -> Result<Box<dyn EventSource>> {
    Ok(match config.source {
        SourceKind::Remote => Box::new(RemoteSource::new(
            config.endpoint.clone(),
            config.date_range.clone(),
            config.timeout,
        )),
        SourceKind::Radar => Box::new(RadarSource::new(
            config.radar_base.clone(),
            config.radar_token.clone(),
            config.date_range.clone().unwrap_or_else(|| crate::config::DEFAULT_DATE_RANGE.to_string()),
            config.timeout,
        )),
        SourceKind::Synthetic => Box::new(
            SyntheticSource::new(table, config.seed)?.with_count(config.synthetic_flows.clone()),
        ),
    })
}

// ============================================================================
// One-shot export
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UnresolvedEntry {
    pub origin: String,
    pub target: String,
}

/// Map view plus the flow source, as handed to a GeoJSON map client
#[derive(Debug, Serialize)]
pub struct MapDocument {
    pub view: MapView,
    pub source: &'static str,
    pub data: FeatureCollection,
    pub unresolved: Vec<UnresolvedEntry>,
}

/// Run exactly one declarative cycle
pub fn snapshot(config: &FlowMapConfig) -> Result<MapDocument> {
    let view = load_view(config)?;
    let table = load_table(config);
    let mut source = build_source(config, &table)?;

    let resolution = resolve_flows(source.fetch()?, &table);
    Ok(MapDocument {
        view,
        source: FLOW_SOURCE,
        data: build_feature_collection(&resolution.drawable),
        unresolved: resolution
            .unresolved
            .into_iter()
            .map(|u| UnresolvedEntry { origin: u.record.origin, target: u.record.target })
            .collect(),
    })
}

// ============================================================================
// Interactive loop
// ============================================================================

/// Drive the session on the terminal until the user quits
pub fn run(mut session: Session, frame_time: f32) -> io::Result<()> {
    let mut term = Terminal::new()?;
    let (mut width, mut height) = term.size();
    let mut canvas = BrailleCanvas::new(width, height);
    let mut colors = ColorState::new(0);
    let mut paused = false;
    let mut show_help = false;

    let mut clock = Duration::ZERO;
    let mut last = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((width, height));
        if (w, h) != (width, height) {
            width = w;
            height = h;
            term.resize(w, h);
            term.clear_screen()?;
            canvas = BrailleCanvas::new(w, h);
        }

        while let Some((code, _mods)) = term.check_key()? {
            if colors.handle_key(code) {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    session.shutdown(clock);
                    return Ok(());
                }
                KeyCode::Char(' ') => paused = !paused,
                KeyCode::Char('?') => show_help = !show_help,
                KeyCode::Char('r') => session.refresh_now(),
                KeyCode::Up | KeyCode::Char('k') => session.map_mut().pan(5.0, 0.0),
                KeyCode::Down | KeyCode::Char('j') => session.map_mut().pan(-5.0, 0.0),
                KeyCode::Left | KeyCode::Char('h') => session.map_mut().pan(0.0, -10.0),
                KeyCode::Right | KeyCode::Char('l') => session.map_mut().pan(0.0, 10.0),
                KeyCode::Char('+') | KeyCode::Char('=') => session.map_mut().zoom_by(1.25),
                KeyCode::Char('-') | KeyCode::Char('_') => session.map_mut().zoom_by(0.8),
                KeyCode::Char('0') => session.map_mut().reset_camera(),
                _ => {}
            }
        }

        let dt = last.elapsed();
        last = Instant::now();
        if !paused {
            clock += dt;
        }

        session.drain(clock);
        if !paused {
            session.tick(clock);
            session.advance(clock);
        }

        term.clear();
        session.map().draw(&mut canvas, &mut term, colors.scheme);
        let status = session.status();
        let mut text = status.text.clone();
        if session.pending_fetches() > 0 {
            text.push_str(" · fetching");
        }
        if paused {
            text.push_str(" · paused");
        }
        render_status(&mut term, colors.scheme, &text, status.color);
        if show_help {
            render_help_overlay(&mut term, HELP);
        }
        term.present()?;
        term.sleep(frame_time);
    }
}
