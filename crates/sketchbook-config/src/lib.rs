//! Configuration for the sketchbook.
//!
//! Settings live in `config.toml` under the platform config directory. Every
//! field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sketchbook_core::{ColorTheme, SketchKind};
use thiserror::Error;
use tracing::debug;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Longest flee button label, in characters.
pub const MAX_LABEL_CHARS: usize = 64;

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no home directory available to locate the config file")]
    NoConfigDir,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sketch shown at startup.
    pub sketch: SketchKind,
    /// Foreground colour theme.
    pub color_theme: ColorTheme,
    /// Target frames per second for animations.
    pub frame_rate: u32,
    pub particles: ParticlesConfig,
    pub flee: FleeConfig,
    pub raster: RasterConfig,
    pub reveal: RevealConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sketch: SketchKind::default(),
            color_theme: ColorTheme::default(),
            frame_rate: 60,
            particles: ParticlesConfig::default(),
            flee: FleeConfig::default(),
            raster: RasterConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

/// Particle field settings. Sizes are in columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    /// Number of shapes on the canvas.
    pub density: usize,
    pub min_size: f64,
    pub max_size: f64,
    /// Probability that a shape is drawn at double size.
    pub large_chance: f64,
    pub ease_min: f64,
    pub ease_max: f64,
    /// Radius of the gathering spiral as a fraction of the smaller canvas side.
    pub spread: f64,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            density: 800,
            min_size: 0.6,
            max_size: 6.0,
            large_chance: 0.2,
            ease_min: 0.06,
            ease_max: 0.15,
            spread: 0.15,
        }
    }
}

/// Flee button settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleeConfig {
    /// Upper bound on buttons, the first one included.
    pub max_buttons: usize,
    pub label: String,
}

impl Default for FleeConfig {
    fn default() -> Self {
        Self {
            max_buttons: 100,
            label: "Click me".to_string(),
        }
    }
}

/// Raster reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Tiles per side at which the full image is shown.
    pub max_cells: u32,
    /// Local image to use instead of a remote one.
    pub image: Option<PathBuf>,
    /// Fetch a random image from picsum.photos when no local image is set.
    pub fetch_remote: bool,
    /// Quiet period after a resize before the raster resets.
    pub resize_debounce_ms: u64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            max_cells: 200,
            image: None,
            fetch_remote: true,
            resize_debounce_ms: 200,
        }
    }
}

/// Scroll reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of the viewport height a section must scroll above to reveal.
    pub threshold: f32,
    /// Number of image sections on the page.
    pub sections: usize,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            sections: 8,
        }
    }
}

impl Config {
    /// Default location of the config file, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sketchbook").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the sketches cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(1..=240).contains(&self.frame_rate) {
            return Err(invalid("frame_rate", "must be between 1 and 240"));
        }

        let p = &self.particles;
        if !(p.min_size > 0.0 && p.min_size < p.max_size) {
            return Err(invalid(
                "particles.min_size",
                "must be positive and below particles.max_size",
            ));
        }
        if !(0.0..=1.0).contains(&p.large_chance) {
            return Err(invalid("particles.large_chance", "must be within 0..=1"));
        }
        if !(p.ease_min > 0.0 && p.ease_min < p.ease_max && p.ease_max <= 1.0) {
            return Err(invalid(
                "particles.ease_min",
                "ease range must satisfy 0 < ease_min < ease_max <= 1",
            ));
        }
        if !(p.spread > 0.0 && p.spread <= 1.0) {
            return Err(invalid("particles.spread", "must be within (0, 1]"));
        }

        if self.flee.max_buttons == 0 {
            return Err(invalid("flee.max_buttons", "must be at least 1"));
        }
        if self.flee.label.trim().is_empty() {
            return Err(invalid("flee.label", "must not be empty"));
        }
        if self.flee.label.chars().count() > MAX_LABEL_CHARS {
            return Err(invalid(
                "flee.label",
                format!("must be at most {MAX_LABEL_CHARS} characters"),
            ));
        }

        if self.raster.max_cells == 0 {
            return Err(invalid("raster.max_cells", "must be at least 1"));
        }

        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(invalid("reveal.threshold", "must be within (0, 1]"));
        }
        if !(1..=1000).contains(&self.reveal.sections) {
            return Err(invalid("reveal.sections", "must be between 1 and 1000"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
sketch = "raster"
color_theme = "magenta"

[raster]
max_cells = 40
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sketch, SketchKind::Raster);
        assert_eq!(config.color_theme, ColorTheme::Magenta);
        assert_eq!(config.raster.max_cells, 40);
        assert!(config.raster.fetch_remote);
        assert_eq!(config.particles, ParticlesConfig::default());
        assert_eq!(config.frame_rate, 60);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.flee.label = "Catch me".to_string();
        config.raster.image = Some(PathBuf::from("/tmp/cat.png"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "frame_rate = \"fast\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn caps_the_flee_label_length() {
        let mut config = Config::default();
        config.flee.label = "é".repeat(MAX_LABEL_CHARS);
        config.validate().unwrap();

        config.flee.label.push('x');
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "flee.label",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = Config::default();
        config.frame_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "frame_rate",
                ..
            })
        ));

        let mut config = Config::default();
        config.particles.ease_min = 0.5;
        config.particles.ease_max = 0.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reveal.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
