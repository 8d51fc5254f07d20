use crate::error::{FlowError, Result};
use crate::geo::GeoPoint;
use crate::map::MapView;
use crate::settings::Settings;
use crate::source::{CLOUDFLARE_RADAR_BASE, DEFAULT_TIMEOUT};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/events";
pub const DEFAULT_DATE_RANGE: &str = "1h";

/// Environment variable read when `[radar].api_token` is not set
pub const RADAR_TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";

/// How flows are put on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Declarative,  // weighted lines + target points, replaced each cycle
    Animated,     // one self-removing arc per flow
}

impl RenderMode {
    /// Refresh cadence when neither CLI nor settings give one
    pub fn default_interval(self) -> Duration {
        match self {
            RenderMode::Declarative => Duration::from_secs(30),
            RenderMode::Animated => Duration::from_secs(2),
        }
    }

    pub fn default_source(self) -> SourceKind {
        match self {
            RenderMode::Declarative => SourceKind::Remote,
            RenderMode::Animated => SourceKind::Synthetic,
        }
    }
}

/// Where flow records come from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Radar,
    Synthetic,
}

impl SourceKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "remote" | "http" | "events" => Some(SourceKind::Remote),
            "radar" | "cloudflare" => Some(SourceKind::Radar),
            "synthetic" | "random" | "demo" => Some(SourceKind::Synthetic),
            _ => None,
        }
    }
}

/// Values given on the command line; `None` falls back to settings
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub source: Option<SourceKind>,
    pub endpoint: Option<String>,
    pub date_range: Option<String>,
    pub no_date_range: bool,
    pub interval: Option<f64>,
    pub coords_url: Option<String>,
    pub seed: Option<u64>,
    pub frame_time: Option<f32>,
}

/// Fully resolved runtime configuration
#[derive(Clone, Debug)]
pub struct FlowMapConfig {
    pub mode: RenderMode,
    pub source: SourceKind,
    pub endpoint: String,
    pub date_range: Option<String>,
    pub interval: Duration,
    pub timeout: Duration,
    pub frame_time: f32,
    pub seed: Option<u64>,
    pub coords_url: Option<String>,
    pub radar_base: String,
    pub radar_token: Option<String>,
    pub map_config_url: Option<String>,
    pub view: MapView,
    pub synthetic_flows: RangeInclusive<usize>,
}

impl FlowMapConfig {
    pub fn resolve(mode: RenderMode, cli: Overrides, settings: Settings) -> Result<Self> {
        let interval_secs = cli.interval.or(settings.events.interval_secs);
        let interval = match interval_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                Duration::try_from_secs_f64(secs).map_err(|_| FlowError::Config {
                    message: format!("refresh interval of {} seconds is too large", secs),
                })?
            }
            Some(secs) => {
                return Err(FlowError::Config {
                    message: format!("refresh interval must be positive, got {}", secs),
                })
            }
            None => mode.default_interval(),
        };

        let date_range = if cli.no_date_range {
            None
        } else {
            cli.date_range
                .or(settings.events.date_range)
                .or_else(|| Some(DEFAULT_DATE_RANGE.to_string()))
        };

        let min_flows = settings.synthetic.min_flows.unwrap_or(3);
        let max_flows = settings.synthetic.max_flows.unwrap_or(7);
        if min_flows == 0 || min_flows > max_flows {
            return Err(FlowError::Config {
                message: format!("synthetic flow count {}..={} is not a valid range", min_flows, max_flows),
            });
        }

        let defaults = MapView::default();
        let view = MapView {
            center: settings
                .map
                .center
                .map(|[lat, lon]| GeoPoint::new(lat, lon))
                .unwrap_or(defaults.center),
            zoom: settings.map.zoom.unwrap_or(defaults.zoom),
            style_url: settings.map.style_url.unwrap_or(defaults.style_url),
            attribution: settings.map.attribution.unwrap_or(defaults.attribution),
            access_token: None,
        };

        Ok(Self {
            mode,
            source: cli.source.unwrap_or_else(|| mode.default_source()),
            endpoint: cli
                .endpoint
                .or(settings.events.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            date_range,
            interval,
            timeout: settings
                .events
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            frame_time: cli.frame_time.unwrap_or(0.03).clamp(0.005, 1.0),
            seed: cli.seed,
            coords_url: cli.coords_url.or(settings.coords.bulk_url),
            radar_base: settings
                .radar
                .base_url
                .unwrap_or_else(|| CLOUDFLARE_RADAR_BASE.to_string()),
            radar_token: radar_token(settings.radar.api_token, std::env::var(RADAR_TOKEN_ENV).ok()),
            map_config_url: settings.map.config_url,
            view,
            synthetic_flows: min_flows..=max_flows,
        })
    }
}

/// The settings file wins; blank values count as unset
fn radar_token(configured: Option<String>, env: Option<String>) -> Option<String> {
    configured
        .filter(|t| !t.trim().is_empty())
        .or_else(|| env.filter(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarative_defaults() {
        let cfg = FlowMapConfig::resolve(RenderMode::Declarative, Overrides::default(), Settings::default()).unwrap();
        assert_eq!(cfg.source, SourceKind::Remote);
        assert_eq!(cfg.interval, Duration::from_secs(30));
        assert_eq!(cfg.date_range.as_deref(), Some("1h"));
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.synthetic_flows, 3..=7);
        assert_eq!(cfg.view, MapView::default());
    }

    #[test]
    fn animated_defaults() {
        let cfg = FlowMapConfig::resolve(RenderMode::Animated, Overrides::default(), Settings::default()).unwrap();
        assert_eq!(cfg.source, SourceKind::Synthetic);
        assert_eq!(cfg.interval, Duration::from_secs(2));
    }

    #[test]
    fn cli_beats_settings() {
        let settings = Settings::parse(
            "[events]\nendpoint = \"http://settings/events\"\ninterval_secs = 60.0\ndate_range = \"7d\"",
        )
        .unwrap();
        let cli = Overrides {
            endpoint: Some("http://cli/events".into()),
            interval: Some(5.0),
            ..Overrides::default()
        };

        let cfg = FlowMapConfig::resolve(RenderMode::Declarative, cli, settings).unwrap();
        assert_eq!(cfg.endpoint, "http://cli/events");
        assert_eq!(cfg.interval, Duration::from_secs(5));
        assert_eq!(cfg.date_range.as_deref(), Some("7d"));
    }

    #[test]
    fn date_range_can_be_disabled() {
        let cli = Overrides { no_date_range: true, ..Overrides::default() };
        let cfg = FlowMapConfig::resolve(RenderMode::Declarative, cli, Settings::default()).unwrap();
        assert!(cfg.date_range.is_none());
    }

    #[test]
    fn rejects_bad_interval_and_counts() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e20] {
            let cli = Overrides { interval: Some(secs), ..Overrides::default() };
            assert!(
                matches!(
                    FlowMapConfig::resolve(RenderMode::Animated, cli, Settings::default()),
                    Err(FlowError::Config { .. })
                ),
                "interval {} accepted",
                secs
            );
        }

        let settings = Settings::parse("[events]\ninterval_secs = 1e20").unwrap();
        assert!(FlowMapConfig::resolve(RenderMode::Declarative, Overrides::default(), settings).is_err());

        let settings = Settings::parse("[synthetic]\nmin_flows = 5\nmax_flows = 2").unwrap();
        assert!(FlowMapConfig::resolve(RenderMode::Animated, Overrides::default(), settings).is_err());
    }

    #[test]
    fn map_view_from_settings() {
        let settings = Settings::parse("[map]\ncenter = [45.0, 90.0]\nzoom = 2.0").unwrap();
        let cfg = FlowMapConfig::resolve(RenderMode::Declarative, Overrides::default(), settings).unwrap();
        assert_eq!(cfg.view.center, GeoPoint::new(45.0, 90.0));
        assert_eq!(cfg.view.zoom, 2.0);
    }

    #[test]
    fn radar_token_falls_back_to_environment() {
        assert_eq!(radar_token(Some("file".into()), Some("env".into())).as_deref(), Some("file"));
        assert_eq!(radar_token(None, Some("env".into())).as_deref(), Some("env"));
        assert_eq!(radar_token(Some("  ".into()), Some("env".into())).as_deref(), Some("env"));
        assert_eq!(radar_token(None, Some(String::new())), None);
        assert_eq!(radar_token(None, None), None);
    }

    #[test]
    fn source_names() {
        assert_eq!(SourceKind::parse("Radar"), Some(SourceKind::Radar));
        assert_eq!(SourceKind::parse("random"), Some(SourceKind::Synthetic));
        assert_eq!(SourceKind::parse("events"), Some(SourceKind::Remote));
        assert_eq!(SourceKind::parse("ftp"), None);
    }
}
