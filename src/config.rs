use crate::app_dirs::AppDirs;
use crate::quality::Band;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every tunable of the simulation. Pixel values are in canvas space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// ideal advance speed, mm/s
    pub speed_band: Band,
    /// ideal oscillation frequency, Hz
    pub frequency_band: Band,
    pub pixel_to_mm: f64,
    pub guide_amplitude: f64,
    pub guide_frequency: f64,
    pub center_y: f64,
    pub peak_noise_threshold: f64,
    pub peak_window_ms: f64,
    pub tracking_tolerance: f64,
    /// fraction of the canvas width that ends the run
    pub end_fraction: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_band: Band::new(30.0, 35.0),
            frequency_band: Band::new(60.0, 65.0),
            pixel_to_mm: 0.5,
            guide_amplitude: 20.0,
            guide_frequency: 0.08,
            center_y: 200.0,
            peak_noise_threshold: 5.0,
            peak_window_ms: 1000.0,
            tracking_tolerance: 10.0,
            end_fraction: 0.95,
            canvas_width: 800.0,
            canvas_height: 400.0,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_band(field: &'static str, band: &Band) -> Result<(), ConfigError> {
    if !band.min.is_finite() || !band.max.is_finite() || band.min < 0.0 {
        return Err(invalid(field, "bounds must be finite and non-negative"));
    }
    if band.min > band.max {
        return Err(invalid(
            field,
            format!("min {} is above max {}", band.min, band.max),
        ));
    }
    Ok(())
}

fn check_positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must be a positive number")))
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_band("speed_band", &self.speed_band)?;
        check_band("frequency_band", &self.frequency_band)?;
        check_positive("pixel_to_mm", self.pixel_to_mm)?;
        check_positive("peak_window_ms", self.peak_window_ms)?;
        check_positive("tracking_tolerance", self.tracking_tolerance)?;
        check_positive("canvas_width", self.canvas_width)?;
        check_positive("canvas_height", self.canvas_height)?;
        if !(self.peak_noise_threshold.is_finite() && self.peak_noise_threshold >= 0.0) {
            return Err(invalid("peak_noise_threshold", "must be non-negative"));
        }
        if !(self.guide_amplitude.is_finite()
            && self.guide_frequency.is_finite()
            && self.center_y.is_finite())
        {
            return Err(invalid("guide", "amplitude, frequency and center must be finite"));
        }
        if !(self.end_fraction > 0.0 && self.end_fraction <= 1.0) {
            return Err(invalid("end_fraction", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Horizontal position at which the run is over
    pub fn end_x(&self) -> f64 {
        self.canvas_width * self.end_fraction
    }

    /// Where the torch rests before the first sample arrives
    pub fn origin(&self) -> (f64, f64) {
        (self.canvas_width / 10.0, self.center_y)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("welder_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, falling back to defaults. The error says why the file
    /// was not used; a missing file is not an error.
    pub fn load_with_fallback(&self) -> (Config, Option<ConfigError>) {
        match self.try_load() {
            Ok(cfg) => (cfg, None),
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                (Config::default(), None)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "falling back to default config");
                (Config::default(), Some(e))
            }
        }
    }

    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        let cfg = serde_json::from_slice::<Config>(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        self.load_with_fallback().0
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.end_x() - 760.0).abs() < 1e-9);
        assert_eq!(cfg.origin(), (80.0, 200.0));
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            speed_band: Band::new(20.0, 25.0),
            tracking_tolerance: 15.0,
            canvas_width: 600.0,
            ..Config::default()
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tracking_tolerance": 12.5 }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.tracking_tolerance, 12.5);
        assert_eq!(cfg.speed_band, Band::new(30.0, 35.0));
    }

    #[test]
    fn missing_or_garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let missing = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(missing.load(), Config::default());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_matches!(store.try_load(), Err(ConfigError::Parse(_)));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn fallback_reports_why_the_file_was_skipped() {
        let dir = tempdir().unwrap();
        let missing = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_matches!(missing.load_with_fallback(), (_, None));

        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "speed_band": { "min": 40.0, "max": 30.0 } }"#).unwrap();
        let (cfg, err) = FileConfigStore::with_path(&path).load_with_fallback();
        assert_eq!(cfg, Config::default());
        assert_matches!(
            err,
            Some(ConfigError::Invalid {
                field: "speed_band",
                ..
            })
        );
    }

    #[test]
    fn inverted_band_is_rejected() {
        let cfg = Config {
            frequency_band: Band::new(65.0, 60.0),
            ..Config::default()
        };
        assert_matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "frequency_band",
                ..
            })
        );
    }

    #[test]
    fn bad_scalars_are_rejected() {
        let zero_scale = Config {
            pixel_to_mm: 0.0,
            ..Config::default()
        };
        assert!(zero_scale.validate().is_err());

        let end = Config {
            end_fraction: 1.5,
            ..Config::default()
        };
        assert_matches!(
            end.validate(),
            Err(ConfigError::Invalid {
                field: "end_fraction",
                ..
            })
        );

        let nan_width = Config {
            canvas_width: f64::NAN,
            ..Config::default()
        };
        assert!(nan_width.validate().is_err());
    }

    #[test]
    fn invalid_config_is_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            tracking_tolerance: -1.0,
            ..Config::default()
        };
        assert!(store.save(&cfg).is_err());
        assert!(!path.exists());
    }
}
