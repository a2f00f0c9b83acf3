//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use sketchbook_config::Config;
use sketchbook_core::SketchKind;

/// Interactive terminal sketches
#[derive(Parser, Debug, Default)]
#[command(name = "sketchbook")]
#[command(about = "Interactive terminal sketches driven by an easing animator")]
#[command(version)]
pub struct Cli {
    /// Sketch to open with (particles, flee, raster, reveal)
    #[arg(short, long)]
    pub sketch: Option<SketchKind>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local image for the raster sketch
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Never fetch images over the network
    #[arg(long)]
    pub offline: bool,

    /// Animation frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Where to write the log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(sketch) = self.sketch {
            config.sketch = sketch;
        }
        if let Some(image) = &self.image {
            config.raster.image = Some(image.clone());
        }
        if self.offline {
            config.raster.fetch_remote = false;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "sketchbook",
            "--sketch",
            "raster",
            "--offline",
            "--fps",
            "30",
            "--image",
            "cat.png",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.sketch, SketchKind::Raster);
        assert!(!config.raster.fetch_remote);
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.raster.image, Some(PathBuf::from("cat.png")));
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::parse_from(["sketchbook"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_sketch_is_rejected() {
        assert!(Cli::try_parse_from(["sketchbook", "--sketch", "clock"]).is_err());
    }
}
