use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`; every key is optional and CLI flags win
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub events: EventSettings,
    #[serde(default)]
    pub radar: RadarSettings,
    #[serde(default)]
    pub coords: CoordSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub synthetic: SyntheticSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventSettings {
    pub endpoint: Option<String>,
    pub date_range: Option<String>,
    pub interval_secs: Option<f64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RadarSettings {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoordSettings {
    pub bulk_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapSettings {
    pub config_url: Option<String>,
    pub center: Option<[f64; 2]>,  // [lat, lon]
    pub zoom: Option<f64>,
    pub style_url: Option<String>,
    pub attribution: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyntheticSettings {
    pub min_flows: Option<usize>,
    pub max_flows: Option<usize>,
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file gives defaults; an unreadable or invalid one is
    /// logged and also gives defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read settings file");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flowmap")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let s = Settings::parse("").unwrap();
        assert!(s.events.endpoint.is_none());
        assert!(s.map.center.is_none());
    }

    #[test]
    fn parses_every_table() {
        let s = Settings::parse(
            r#"
            [events]
            endpoint = "http://localhost:9000/events"
            date_range = "7d"
            interval_secs = 45.0

            [radar]
            api_token = "abc"

            [coords]
            bulk_url = "https://restcountries.com/v3.1/all?fields=cca2,latlng"

            [map]
            center = [10.0, 20.0]
            zoom = 2.5
            attribution = "tiles"

            [synthetic]
            min_flows = 1
            max_flows = 2
            "#,
        )
        .unwrap();

        assert_eq!(s.events.endpoint.as_deref(), Some("http://localhost:9000/events"));
        assert_eq!(s.events.date_range.as_deref(), Some("7d"));
        assert_eq!(s.events.interval_secs, Some(45.0));
        assert_eq!(s.radar.api_token.as_deref(), Some("abc"));
        assert!(s.coords.bulk_url.is_some());
        assert_eq!(s.map.center, Some([10.0, 20.0]));
        assert_eq!(s.map.zoom, Some(2.5));
        assert_eq!(s.synthetic.max_flows, Some(2));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(Some(&dir.path().join("nope.toml")));
        assert!(s.events.endpoint.is_none());
    }

    #[test]
    fn load_invalid_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[events\nendpoint = 3").unwrap();
        let s = Settings::load(Some(file.path()));
        assert!(s.events.endpoint.is_none());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[events]\nendpoint = \"http://x/events\"").unwrap();
        let s = Settings::load(Some(file.path()));
        assert_eq!(s.events.endpoint.as_deref(), Some("http://x/events"));
    }
}
