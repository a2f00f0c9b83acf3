//! Image loading for the raster sketch.
//!
//! Images come from a local file, the picsum placeholder service or, when
//! offline, a generated gradient. Loading happens on a background thread and
//! results are handed back over a channel.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use image::{Rgb, RgbImage};
use rand::Rng;
use sketchbook_config::RasterConfig;
use sketchbook_sketches::hsl_to_rgb8;
use thiserror::Error;
use tracing::{debug, error, info};

/// Timeout for HTTP requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder image service.
const PICSUM_URL: &str = "https://picsum.photos/seed";

/// Errors raised while loading an image.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Where images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Remote,
    Generated,
}

impl ImageSource {
    pub fn from_config(config: &RasterConfig) -> Self {
        match &config.image {
            Some(path) => ImageSource::File(path.clone()),
            None if config.fetch_remote => ImageSource::Remote,
            None => ImageSource::Generated,
        }
    }

    /// Load an image of roughly `width` x `height` pixels.
    pub fn load(&self, width: u32, height: u32) -> Result<RgbImage, ImageLoadError> {
        match self {
            ImageSource::File(path) => {
                let bytes = fs::read(path).map_err(|source| ImageLoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(image::load_from_memory(&bytes)?.to_rgb8())
            }
            ImageSource::Remote => fetch_remote(&picsum_url(random_seed(), width, height)),
            ImageSource::Generated => Ok(gradient(width, height, random_seed())),
        }
    }
}

/// Seed for a new placeholder image: the current time plus some jitter.
fn random_seed() -> u64 {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    now_ms + rand::thread_rng().gen_range(0..10_000)
}

/// Placeholder URL for an image of the given size.
pub fn picsum_url(seed: u64, width: u32, height: u32) -> String {
    format!("{PICSUM_URL}/{seed}/{}/{}", width.max(1), height.max(1))
}

fn fetch_remote(url: &str) -> Result<RgbImage, ImageLoadError> {
    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent();

    let bytes = agent.get(url).call()?.body_mut().read_to_vec()?;
    debug!(url, bytes = bytes.len(), "fetched image");
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

/// A diagonal colour gradient, for when no image can be fetched.
pub fn gradient(width: u32, height: u32, seed: u64) -> RgbImage {
    let (width, height) = (width.max(1), height.max(1));
    let base = (seed % 360) as f32;
    RgbImage::from_fn(width, height, |x, y| {
        let u = x as f32 / width as f32;
        let v = y as f32 / height as f32;
        Rgb(hsl_to_rgb8(base + (u + v) * 90.0, 0.65, 0.3 + 0.4 * v))
    })
}

type LoadResult = (u64, Result<RgbImage, ImageLoadError>);

/// Loads images on a background thread.
#[derive(Debug)]
pub struct ImageLoader {
    source: ImageSource,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
    /// Id of the latest request; older results are dropped.
    generation: u64,
}

impl ImageLoader {
    pub fn new(source: ImageSource) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            generation: 0,
        }
    }

    /// Start loading an image, superseding any load in flight.
    pub fn request(&mut self, width: u32, height: u32) {
        self.generation += 1;
        let generation = self.generation;
        let source = self.source.clone();
        let tx = self.tx.clone();
        info!(?source, width, height, "loading image");

        thread::spawn(move || {
            let result = source.load(width, height);
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send((generation, result));
        });
    }

    /// The result of the latest request, once it is in.
    pub fn poll(&mut self) -> Option<Result<RgbImage, ImageLoadError>> {
        loop {
            match self.rx.try_recv() {
                Ok((generation, result)) if generation == self.generation => {
                    if let Err(e) = &result {
                        error!(error = %e, "image load failed");
                    }
                    return Some(result);
                }
                Ok(_) => continue,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_for(loader: &mut ImageLoader) -> Result<RgbImage, ImageLoadError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn source_follows_config() {
        let mut config = RasterConfig::default();
        assert_eq!(ImageSource::from_config(&config), ImageSource::Remote);

        config.fetch_remote = false;
        assert_eq!(ImageSource::from_config(&config), ImageSource::Generated);

        config.image = Some(PathBuf::from("cat.png"));
        assert_eq!(
            ImageSource::from_config(&config),
            ImageSource::File(PathBuf::from("cat.png"))
        );
    }

    #[test]
    fn picsum_url_has_seed_and_size() {
        assert_eq!(
            picsum_url(42, 80, 48),
            "https://picsum.photos/seed/42/80/48"
        );
        assert_eq!(picsum_url(1, 0, 0), "https://picsum.photos/seed/1/1/1");
    }

    #[test]
    fn gradient_has_requested_size() {
        let image = gradient(16, 9, 7);
        assert_eq!(image.dimensions(), (16, 9));
        assert_eq!(gradient(0, 0, 7).dimensions(), (1, 1));
    }

    #[test]
    fn generated_images_load_in_the_background() {
        let mut loader = ImageLoader::new(ImageSource::Generated);
        loader.request(20, 10);
        let image = wait_for(&mut loader).expect("generated image");
        assert_eq!(image.dimensions(), (20, 10));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let path = PathBuf::from("/definitely/not/here.png");
        let mut loader = ImageLoader::new(ImageSource::File(path.clone()));
        loader.request(10, 10);
        match wait_for(&mut loader) {
            Err(ImageLoadError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn superseded_requests_are_dropped() {
        let mut loader = ImageLoader::new(ImageSource::Generated);
        loader.request(4, 4);
        loader.request(6, 3);
        // Give the first load time to land before the second is read.
        thread::sleep(Duration::from_millis(50));
        let image = wait_for(&mut loader).expect("generated image");
        assert_eq!(image.dimensions(), (6, 3));
    }
}
