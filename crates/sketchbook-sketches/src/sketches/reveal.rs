//! Scroll reveal: a long page whose image sections fade in as they scroll
//! into view.

use std::time::{Duration, Instant};

use ratatui::{Frame, layout::Rect, style::Color};
use sketchbook_config::RevealConfig;
use sketchbook_core::{FrameClock, FrameScheduler, FrameToken};
use tracing::{debug, info};

use crate::FrameContext;
use crate::canvas::{Canvas, Cell};
use crate::chars::SHADES;
use crate::color::{hsl_to_rgb, theme_shade};

/// Rows above the first section.
pub const HEADER_ROWS: u16 = 6;

/// Height of one section, border included.
pub const SECTION_ROWS: u16 = 8;

/// Blank rows between sections.
pub const SECTION_GAP: u16 = 2;

/// How long a revealed section takes to fade in.
pub const FADE: Duration = Duration::from_millis(600);

/// One image placeholder on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// First page row.
    pub top: u16,
    pub height: u16,
    /// When the section first came into view.
    pub revealed_at: Option<Instant>,
}

impl Section {
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    /// Fade-in progress in `[0, 1]`.
    pub fn intensity(&self, now: Instant) -> f32 {
        match self.revealed_at {
            Some(at) => {
                (now.saturating_duration_since(at).as_secs_f32() / FADE.as_secs_f32()).min(1.0)
            }
            None => 0.0,
        }
    }
}

/// The scroll reveal sketch.
#[derive(Debug)]
pub struct ScrollReveal {
    sections: Vec<Section>,
    /// First visible page row.
    scroll: u16,
    threshold: f32,
    clock: FrameClock,
    /// Reveal check waiting for the next frame.
    pending: Option<FrameToken>,
    /// Last rendered area.
    area: Rect,
}

impl ScrollReveal {
    pub fn new(config: &RevealConfig, fps: u32) -> Self {
        let sections = (0..config.sections as u16)
            .map(|i| Section {
                top: HEADER_ROWS + i * (SECTION_ROWS + SECTION_GAP),
                height: SECTION_ROWS,
                revealed_at: None,
            })
            .collect();
        Self {
            sections,
            scroll: 0,
            threshold: config.threshold,
            clock: FrameClock::new(fps),
            pending: None,
            area: Rect::default(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Total page height in rows.
    pub fn page_rows(&self) -> u16 {
        self.sections
            .last()
            .map_or(HEADER_ROWS, |s| s.top + s.height + SECTION_GAP)
    }

    fn max_scroll(&self) -> u16 {
        self.page_rows().saturating_sub(self.area.height)
    }

    /// Adopt a new area and check visibility straight away.
    pub fn fit(&mut self, area: Rect, now: Instant) {
        if area == self.area {
            return;
        }
        self.area = area;
        self.scroll = self.scroll.min(self.max_scroll());
        self.reveal_visible(now);
    }

    /// Scroll by `rows` (negative is up). The reveal check runs on the next
    /// frame; scrolling again before then replaces that frame.
    pub fn scroll_by(&mut self, rows: i32) {
        let target = (self.scroll as i32 + rows).clamp(0, self.max_scroll() as i32) as u16;
        if target == self.scroll {
            return;
        }
        self.scroll = target;

        if let Some(token) = self.pending.take() {
            self.clock.cancel_frame(token);
        }
        self.pending = Some(self.clock.request_frame());
    }

    /// Run the pending reveal check if its frame is due.
    pub fn tick(&mut self, now: Instant) {
        for token in self.clock.due(now) {
            if self.pending == Some(token) {
                self.pending = None;
                self.reveal_visible(now);
            }
        }
    }

    /// Time until the pending reveal check or the next fade frame, if any.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        let fade = self.is_fading(now).then(|| self.clock.interval());
        [self.clock.until_next(now), fade].into_iter().flatten().min()
    }

    /// Whether any revealed section is still fading in.
    pub fn is_fading(&self, now: Instant) -> bool {
        self.sections
            .iter()
            .any(|s| s.is_revealed() && s.intensity(now) < 1.0)
    }

    /// Whether the section has crossed into the top part of the viewport.
    pub fn is_in_viewport(&self, section: &Section) -> bool {
        let top = section.top as f32 - self.scroll as f32;
        let bottom = top + section.height as f32;
        top < self.area.height as f32 * self.threshold && bottom > 0.0
    }

    /// Reveal every section now in view. Returns how many were newly revealed.
    pub fn reveal_visible(&mut self, now: Instant) -> usize {
        let visible: Vec<bool> = self
            .sections
            .iter()
            .map(|s| !s.is_revealed() && self.is_in_viewport(s))
            .collect();

        let mut revealed = 0;
        for (index, (section, show)) in self.sections.iter_mut().zip(visible).enumerate() {
            if show {
                section.revealed_at = Some(now);
                revealed += 1;
                info!(index, "section revealed");
            }
        }
        if revealed > 0 {
            debug!(total = self.revealed_count(), "reveal check");
        }
        revealed
    }

    pub fn revealed_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_revealed()).count()
    }

    /// Render the visible part of the page.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &FrameContext) {
        self.fit(area, ctx.now);

        let mut canvas = Canvas::new(area.width, area.height);
        let scroll = self.scroll as i32;
        let text = theme_shade(ctx.theme, 0.7);
        let frame_color = theme_shade(ctx.theme, 0.3);

        canvas.put_centered(2 - scroll, "Scroll down", text);
        canvas.put_centered(
            3 - scroll,
            "sections fade in as they come into view",
            Color::DarkGray,
        );

        let width = area.width.saturating_sub(4);
        for (index, section) in self.sections.iter().enumerate() {
            let y = section.top as i32 - scroll;
            if y >= area.height as i32 || y + section.height as i32 <= 0 {
                continue;
            }
            canvas.draw_box(2, y, width, section.height, frame_color);

            let intensity = section.intensity(ctx.now);
            if intensity <= 0.0 {
                continue;
            }

            // Each section gets its own hue band.
            let base = ctx.theme.hue() + index as f32 * 40.0;
            let saturation = if ctx.theme.is_neutral() { 0.0 } else { 0.6 };
            let shade = SHADES[((intensity * (SHADES.len() - 1) as f32).round() as usize)
                .min(SHADES.len() - 1)];
            let inner_w = width.saturating_sub(2) as i32;
            for row in 1..section.height as i32 - 1 {
                for col in 0..inner_w {
                    let t = col as f32 / inner_w.max(1) as f32;
                    let color = hsl_to_rgb(base + t * 60.0, saturation, 0.15 + 0.4 * intensity);
                    canvas.set(3 + col, y + row, Cell::new(shade, color));
                }
            }
        }

        canvas.render(frame, area);
    }
}
