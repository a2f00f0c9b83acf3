//! Raster reveal: an image shown as a grid of flat tiles that gets finer with
//! every click.
//!
//! The canvas is measured in pixels of half a cell: each terminal cell shows
//! two vertically stacked pixels through an upper half block.

use std::time::{Duration, Instant};

use image::RgbImage;
use ratatui::{Frame, layout::Rect, style::Color};
use sketchbook_config::RasterConfig;
use tracing::{debug, info};

use crate::FrameContext;
use crate::canvas::{Canvas, Cell};
use crate::chars::UPPER_HALF;
use crate::color::{pixel_color, theme_shade};

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One tile of the raster: where it is drawn and what it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub dest: PixelRect,
    pub source: PixelRect,
}

/// The centred part of an `image_width` x `image_height` image that covers a
/// canvas of the given size without distortion.
pub fn cover_crop(
    image_width: u32,
    image_height: u32,
    canvas_width: u32,
    canvas_height: u32,
) -> PixelRect {
    let full = PixelRect {
        x: 0,
        y: 0,
        width: image_width,
        height: image_height,
    };
    if image_width == 0 || image_height == 0 || canvas_width == 0 || canvas_height == 0 {
        return full;
    }

    let image_ratio = image_width as f64 / image_height as f64;
    let canvas_ratio = canvas_width as f64 / canvas_height as f64;

    if image_ratio > canvas_ratio {
        // Too wide: crop the sides.
        let width = ((image_height as f64 * canvas_ratio).floor() as u32).clamp(1, image_width);
        PixelRect {
            x: (image_width - width) / 2,
            width,
            ..full
        }
    } else {
        let height = ((image_width as f64 / canvas_ratio).floor() as u32).clamp(1, image_height);
        PixelRect {
            y: (image_height - height) / 2,
            height,
            ..full
        }
    }
}

/// Lay out a `cells` x `cells` grid over the canvas, sampling from `crop`.
///
/// Tiles are slightly oversized so neighbours overlap instead of leaving
/// seams; later tiles are drawn over earlier ones.
pub fn tiles(cells: u32, canvas_width: u32, canvas_height: u32, crop: PixelRect) -> Vec<Tile> {
    let cells = cells.max(1);
    let n = cells as f64;
    let cell_w = canvas_width as f64 / n;
    let cell_h = canvas_height as f64 / n;
    let src_w = ((crop.width as f64 / n).round() as u32).max(1);
    let src_h = ((crop.height as f64 / n).round() as u32).max(1);

    let mut out = Vec::with_capacity((cells * cells) as usize);
    for y in 0..cells {
        for x in 0..cells {
            let ux = x as f64 / n;
            let uy = y as f64 / n;
            out.push(Tile {
                dest: PixelRect {
                    x: (x as f64 * cell_w).floor() as u32,
                    y: (y as f64 * cell_h).floor() as u32,
                    width: (cell_w + 0.5).ceil() as u32,
                    height: (cell_h + 0.5).ceil() as u32,
                },
                source: PixelRect {
                    x: (crop.x as f64 + ux * crop.width as f64).floor() as u32,
                    y: (crop.y as f64 + uy * crop.height as f64).floor() as u32,
                    width: src_w,
                    height: src_h,
                },
            });
        }
    }
    out
}

/// Mean colour of `rect`, clipped to the image. Black if nothing overlaps.
pub fn mean_color(image: &RgbImage, rect: PixelRect) -> [u8; 3] {
    let x1 = rect.x.saturating_add(rect.width).min(image.width());
    let y1 = rect.y.saturating_add(rect.height).min(image.height());
    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for y in rect.y..y1 {
        for x in rect.x..x1 {
            let p = image.get_pixel(x, y).0;
            sum[0] += p[0] as u64;
            sum[1] += p[1] as u64;
            sum[2] += p[2] as u64;
            count += 1;
        }
    }

    if count == 0 {
        return [0, 0, 0];
    }
    [
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ]
}

/// Draw `image` onto a `width` x `height` pixel buffer (row major).
///
/// With `cells` below `max_cells` the image is drawn as flat tiles; at the
/// cap it is drawn at full canvas resolution.
pub fn rasterize(
    image: &RgbImage,
    cells: u32,
    max_cells: u32,
    width: u32,
    height: u32,
) -> Vec<[u8; 3]> {
    let crop = cover_crop(image.width(), image.height(), width, height);
    let mut pixels = vec![[0u8; 3]; (width * height) as usize];
    if image.width() == 0 || image.height() == 0 {
        return pixels;
    }

    if cells >= max_cells {
        for py in 0..height {
            for px in 0..width {
                let sx = crop.x + (px as u64 * crop.width as u64 / width as u64) as u32;
                let sy = crop.y + (py as u64 * crop.height as u64 / height as u64) as u32;
                let sx = sx.min(image.width() - 1);
                let sy = sy.min(image.height() - 1);
                pixels[(py * width + px) as usize] = image.get_pixel(sx, sy).0;
            }
        }
        return pixels;
    }

    for tile in tiles(cells, width, height, crop) {
        let color = mean_color(image, tile.source);
        let x1 = (tile.dest.x + tile.dest.width).min(width);
        let y1 = (tile.dest.y + tile.dest.height).min(height);
        for py in tile.dest.y..y1 {
            for px in tile.dest.x..x1 {
                pixels[(py * width + px) as usize] = color;
            }
        }
    }
    pixels
}

/// Where the image currently is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
struct RenderCache {
    cells: u32,
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

/// The raster reveal sketch.
#[derive(Debug)]
pub struct RasterReveal {
    image: Option<RgbImage>,
    cells: u32,
    max_cells: u32,
    status: RasterStatus,
    debounce: Duration,
    /// When a pending resize settles.
    resize_at: Option<Instant>,
    /// Pixel size of an image that should be loaded.
    wanted: Option<(u32, u32)>,
    cache: Option<RenderCache>,
    /// Last rendered area.
    area: Rect,
}

impl RasterReveal {
    pub fn new(config: &RasterConfig) -> Self {
        Self {
            image: None,
            cells: 1,
            max_cells: config.max_cells.max(1),
            status: RasterStatus::Loading,
            debounce: Duration::from_millis(config.resize_debounce_ms),
            resize_at: None,
            wanted: None,
            cache: None,
            area: Rect::default(),
        }
    }

    pub fn cells(&self) -> u32 {
        self.cells
    }

    pub fn status(&self) -> &RasterStatus {
        &self.status
    }

    /// Canvas size in pixels for the last rendered area.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.area.width as u32, self.area.height as u32 * 2)
    }

    /// Adopt a new area. The first one asks for an image straight away;
    /// later ones wait for the resize to settle.
    pub fn fit(&mut self, area: Rect, now: Instant) {
        if area == self.area {
            return;
        }
        let first = self.area == Rect::default();
        self.area = area;
        self.cache = None;

        if first {
            self.wanted = Some(self.pixel_size());
        } else {
            self.resize_at = Some(now + self.debounce);
        }
    }

    /// Reset to one tile once a resize has settled.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.resize_at
            && now >= at
        {
            self.resize_at = None;
            self.reload();
        }
    }

    /// Drop back to one tile and ask for a fresh image sized to the canvas.
    pub fn reload(&mut self) {
        self.cells = 1;
        self.cache = None;
        self.wanted = Some(self.pixel_size());
    }

    /// Take a pending image request, marking the sketch as loading.
    pub fn take_request(&mut self) -> Option<(u32, u32)> {
        let wanted = self.wanted.take()?;
        self.status = RasterStatus::Loading;
        Some(wanted)
    }

    /// Time until a pending resize settles.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.resize_at.map(|at| at.saturating_duration_since(now))
    }

    pub fn set_image(&mut self, image: RgbImage) {
        debug!(width = image.width(), height = image.height(), "raster image ready");
        self.image = Some(image);
        self.status = RasterStatus::Ready;
        self.cache = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.status = RasterStatus::Failed(message.into());
    }

    /// Refine the raster by one tile per side. Ignored until an image is loaded.
    pub fn on_click(&mut self) -> Option<u32> {
        self.image.as_ref()?;
        self.cells = (self.cells + 1).min(self.max_cells);
        info!(cells = self.cells, "raster refined");
        Some(self.cells)
    }

    fn pixels(&mut self, width: u32, height: u32) -> Option<&[[u8; 3]]> {
        let image = self.image.as_ref()?;
        let stale = !matches!(
            &self.cache,
            Some(c) if c.cells == self.cells && c.width == width && c.height == height
        );
        if stale {
            self.cache = Some(RenderCache {
                cells: self.cells,
                width,
                height,
                pixels: rasterize(image, self.cells, self.max_cells, width, height),
            });
        }
        self.cache.as_ref().map(|c| c.pixels.as_slice())
    }

    /// Render the raster.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &FrameContext) {
        self.fit(area, ctx.now);

        let mut canvas = Canvas::new(area.width, area.height);
        let (width, height) = self.pixel_size();
        let text = theme_shade(ctx.theme, 0.6);

        match self.status.clone() {
            RasterStatus::Loading if self.image.is_none() => {
                canvas.put_centered(area.height as i32 / 2, "loading image…", text);
            }
            RasterStatus::Failed(message) if self.image.is_none() => {
                canvas.put_centered(area.height as i32 / 2, "image load failed", text);
                canvas.put_centered(area.height as i32 / 2 + 1, &message, Color::DarkGray);
            }
            _ => {
                if let Some(pixels) = self.pixels(width, height) {
                    for cy in 0..area.height as u32 {
                        for cx in 0..width {
                            let top = pixels[(2 * cy * width + cx) as usize];
                            let bottom = pixels[((2 * cy + 1) * width + cx) as usize];
                            canvas.set(
                                cx as i32,
                                cy as i32,
                                Cell::new(UPPER_HALF, pixel_color(top))
                                    .with_bg(pixel_color(bottom)),
                            );
                        }
                    }
                }
            }
        }

        canvas.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn quadrants() -> RgbImage {
        // Left half red, right half blue.
        RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        })
    }

    #[test]
    fn cover_crop_trims_the_long_side() {
        // Wide image on a square canvas: sides are cut.
        assert_eq!(cover_crop(200, 100, 50, 50), PixelRect {
            x: 50,
            y: 0,
            width: 100,
            height: 100
        });
        // Tall image on a wide canvas: top and bottom are cut.
        assert_eq!(cover_crop(100, 200, 100, 50), PixelRect {
            x: 0,
            y: 75,
            width: 100,
            height: 50
        });
        // Same ratio: untouched.
        assert_eq!(cover_crop(80, 40, 160, 80), PixelRect {
            x: 0,
            y: 0,
            width: 80,
            height: 40
        });
    }

    #[test]
    fn tile_grid_geometry() {
        let crop = PixelRect {
            x: 10,
            y: 0,
            width: 100,
            height: 100,
        };
        let grid = tiles(4, 40, 20, crop);
        assert_eq!(grid.len(), 16);

        let last = grid[15];
        assert_eq!(last.dest.x, 30);
        assert_eq!(last.dest.y, 15);
        assert_eq!(last.dest.width, 11);
        assert_eq!(last.dest.height, 6);
        assert_eq!(last.source, PixelRect {
            x: 85,
            y: 75,
            width: 25,
            height: 25
        });
    }

    #[test]
    fn single_tile_is_the_mean() {
        let pixels = rasterize(&quadrants(), 1, 200, 4, 4);
        assert!(pixels.iter().all(|p| *p == [127, 0, 127]));
    }

    #[test]
    fn two_tiles_split_the_halves() {
        let pixels = rasterize(&quadrants(), 2, 200, 4, 4);
        assert_eq!(pixels[0], [255, 0, 0]);
        assert_eq!(pixels[3], [0, 0, 255]);
    }

    #[test]
    fn full_resolution_at_the_cap() {
        let pixels = rasterize(&quadrants(), 5, 5, 8, 8);
        assert_eq!(pixels[3], [255, 0, 0]);
        assert_eq!(pixels[4], [0, 0, 255]);
    }

    #[test]
    fn mean_of_rect_outside_image_is_black() {
        let rect = PixelRect {
            x: 50,
            y: 50,
            width: 3,
            height: 3,
        };
        assert_eq!(mean_color(&quadrants(), rect), [0, 0, 0]);
    }

    #[test]
    fn clicks_wait_for_the_image_and_stop_at_the_cap() {
        let config = RasterConfig {
            max_cells: 3,
            ..RasterConfig::default()
        };
        let mut raster = RasterReveal::new(&config);
        assert_eq!(raster.on_click(), None);
        assert_eq!(raster.cells(), 1);

        raster.set_image(quadrants());
        assert_eq!(raster.on_click(), Some(2));
        assert_eq!(raster.on_click(), Some(3));
        assert_eq!(raster.on_click(), Some(3));
    }

    #[test]
    fn first_fit_requests_an_image_sized_to_the_canvas() {
        let mut raster = RasterReveal::new(&RasterConfig::default());
        raster.fit(Rect::new(0, 0, 40, 10), Instant::now());
        assert_eq!(raster.take_request(), Some((40, 20)));
        assert_eq!(raster.take_request(), None);
        assert_eq!(raster.status(), &RasterStatus::Loading);
    }

    #[test]
    fn resize_is_debounced_then_resets() {
        let config = RasterConfig {
            resize_debounce_ms: 200,
            ..RasterConfig::default()
        };
        let mut raster = RasterReveal::new(&config);
        let start = Instant::now();
        raster.fit(Rect::new(0, 0, 40, 10), start);
        raster.take_request();
        raster.set_image(quadrants());
        raster.on_click();
        raster.on_click();

        raster.fit(Rect::new(0, 0, 60, 12), start);
        raster.tick(start + Duration::from_millis(100));
        assert_eq!(raster.cells(), 3);
        assert_eq!(raster.take_request(), None);

        raster.tick(start + Duration::from_millis(200));
        assert_eq!(raster.cells(), 1);
        assert_eq!(raster.take_request(), Some((60, 24)));
    }
}
