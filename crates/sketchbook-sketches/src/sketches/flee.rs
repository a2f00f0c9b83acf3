//! Flee buttons: a button that jumps away when hovered and leaves a clone behind.

use rand::{Rng, rngs::StdRng};
use ratatui::{
    Frame,
    layout::{Position, Rect},
};
use sketchbook_config::FleeConfig;
use tracing::info;

use crate::FrameContext;
use crate::canvas::Canvas;
use crate::color::theme_shade;

/// Top-left corner of a button, relative to the sketch area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub x: u16,
    pub y: u16,
}

/// Result of moving the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    /// No new button was entered.
    Missed,
    /// A button fled and was cloned; carries the new button count.
    Cloned(usize),
    /// A button fled but the clone limit is reached.
    LimitReached,
}

/// The flee buttons sketch.
#[derive(Debug)]
pub struct FleeButtons {
    buttons: Vec<Button>,
    label: String,
    max_buttons: usize,
    /// Index of the button currently under the pointer.
    hovered: Option<usize>,
    rng: StdRng,
    /// Last rendered area.
    area: Rect,
}

impl FleeButtons {
    pub fn new(config: FleeConfig, rng: StdRng) -> Self {
        Self {
            buttons: Vec::new(),
            label: config.label,
            max_buttons: config.max_buttons,
            hovered: None,
            rng,
            area: Rect::default(),
        }
    }

    /// Button size including its border.
    pub fn button_size(&self) -> (u16, u16) {
        let label = u16::try_from(self.label.chars().count()).unwrap_or(u16::MAX);
        (label.saturating_add(4), 3)
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Adopt a new area: place the first button centred, then keep every
    /// button inside the area.
    pub fn fit(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        self.area = area;

        let (bw, bh) = self.button_size();
        let max_x = area.width.saturating_sub(bw);
        let max_y = area.height.saturating_sub(bh);

        if self.buttons.is_empty() {
            self.buttons.push(Button {
                x: max_x / 2,
                y: max_y / 2,
            });
            return;
        }
        for button in &mut self.buttons {
            button.x = button.x.min(max_x);
            button.y = button.y.min(max_y);
        }
    }

    /// Topmost button containing the area-local point.
    fn button_at(&self, x: u16, y: u16) -> Option<usize> {
        let (bw, bh) = self.button_size();
        self.buttons.iter().rposition(|b| {
            Rect::new(b.x, b.y, bw, bh).contains(Position::new(x, y))
        })
    }

    fn random_button(&mut self) -> Button {
        let (bw, bh) = self.button_size();
        let max_x = self.area.width.saturating_sub(bw);
        let max_y = self.area.height.saturating_sub(bh);
        Button {
            x: self.rng.gen_range(0..=max_x),
            y: self.rng.gen_range(0..=max_y),
        }
    }

    /// Handle pointer movement to a terminal position.
    pub fn on_pointer(&mut self, column: u16, row: u16) -> Hover {
        let (Some(x), Some(y)) = (
            column.checked_sub(self.area.x),
            row.checked_sub(self.area.y),
        ) else {
            self.hovered = None;
            return Hover::Missed;
        };

        let under = self.button_at(x, y);
        let entered = match under {
            Some(index) if self.hovered != Some(index) => index,
            _ => {
                self.hovered = under;
                return Hover::Missed;
            }
        };

        let target = self.random_button();
        self.buttons[entered] = target;

        let count = self.buttons.len();
        let outcome = if count < self.max_buttons {
            let clone = self.random_button();
            self.buttons.push(clone);
            info!(count = count + 1, "button cloned");
            Hover::Cloned(count + 1)
        } else {
            info!(limit = self.max_buttons, "button limit reached");
            Hover::LimitReached
        };

        // Whatever now sits under the pointer counts as already entered.
        self.hovered = self.button_at(x, y);
        outcome
    }

    /// Render the buttons.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &FrameContext) {
        self.fit(area);

        let (bw, bh) = self.button_size();
        let mut canvas = Canvas::new(area.width, area.height);
        let border = theme_shade(ctx.theme, 0.45);
        let text = theme_shade(ctx.theme, 0.7);

        for b in &self.buttons {
            let (x, y) = (b.x as i32, b.y as i32);
            canvas.draw_box(x, y, bw, bh, border);
            // Clear the inside so overlapping buttons read as stacked.
            canvas.put_str(x + 1, y + 1, &" ".repeat(bw.saturating_sub(2) as usize), text);
            canvas.put_str(x + 2, y + 1, &self.label, text);
        }

        canvas.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sketch(max_buttons: usize) -> FleeButtons {
        let config = FleeConfig {
            max_buttons,
            label: "Click me".to_string(),
        };
        let mut sketch = FleeButtons::new(config, StdRng::seed_from_u64(11));
        sketch.fit(Rect::new(0, 0, 80, 24));
        sketch
    }

    /// Point inside the first button.
    fn first_button_centre(sketch: &FleeButtons) -> (u16, u16) {
        let b = sketch.buttons()[0];
        (b.x + 2, b.y + 1)
    }

    #[test]
    fn starts_with_one_centred_button() {
        let sketch = sketch(100);
        let (bw, bh) = sketch.button_size();
        assert_eq!(sketch.buttons().len(), 1);
        assert_eq!(sketch.buttons()[0], Button {
            x: (80 - bw) / 2,
            y: (24 - bh) / 2
        });
    }

    #[test]
    fn hovering_moves_and_clones() {
        let mut sketch = sketch(100);
        let (x, y) = first_button_centre(&sketch);

        let outcome = sketch.on_pointer(x, y);
        assert_eq!(outcome, Hover::Cloned(2));
        assert_eq!(sketch.buttons().len(), 2);
    }

    #[test]
    fn moving_within_the_same_button_does_not_retrigger() {
        let mut sketch = sketch(100);
        let (x, y) = first_button_centre(&sketch);
        let before = sketch.buttons()[0];

        // The pointer is already resting on the only button.
        sketch.hovered = Some(0);
        assert_eq!(sketch.on_pointer(x, y), Hover::Missed);
        assert_eq!(sketch.on_pointer(x + 1, y), Hover::Missed);
        assert_eq!(sketch.buttons(), &[before]);
    }

    #[test]
    fn leaving_and_coming_back_triggers_again() {
        let mut sketch = sketch(100);
        let (x, y) = first_button_centre(&sketch);
        sketch.hovered = Some(0);

        assert_eq!(sketch.on_pointer(0, 0), Hover::Missed);
        assert_eq!(sketch.hovered, None);
        assert_eq!(sketch.on_pointer(x, y), Hover::Cloned(2));
    }

    #[test]
    fn stops_cloning_at_the_limit() {
        let mut sketch = sketch(3);
        let mut outcomes = Vec::new();
        for _ in 0..20 {
            // Leave, then enter the first button wherever it is now.
            sketch.on_pointer(u16::MAX, u16::MAX);
            let (x, y) = first_button_centre(&sketch);
            sketch.hovered = None;
            outcomes.push(sketch.on_pointer(x, y));
        }

        assert_eq!(sketch.buttons().len(), 3);
        assert_eq!(&outcomes[..2], &[Hover::Cloned(2), Hover::Cloned(3)]);
        assert!(outcomes[2..].iter().all(|o| *o == Hover::LimitReached));
    }

    #[test]
    fn buttons_stay_inside_area() {
        let mut sketch = sketch(50);
        for _ in 0..30 {
            let (x, y) = first_button_centre(&sketch);
            sketch.hovered = None;
            sketch.on_pointer(x, y);
        }

        sketch.fit(Rect::new(0, 0, 30, 8));
        let (bw, bh) = sketch.button_size();
        for b in sketch.buttons() {
            assert!(b.x + bw <= 30);
            assert!(b.y + bh <= 8);
        }
    }

    #[test]
    fn oversized_label_saturates_the_width() {
        let config = FleeConfig {
            max_buttons: 1,
            label: "x".repeat(70_000),
        };
        let sketch = FleeButtons::new(config, StdRng::seed_from_u64(1));
        assert_eq!(sketch.button_size(), (u16::MAX, 3));
    }

    #[test]
    fn tiny_area_pins_buttons_to_origin() {
        let mut sketch = sketch(5);
        sketch.fit(Rect::new(0, 0, 4, 2));
        sketch.hovered = None;
        sketch.on_pointer(0, 0);
        assert!(sketch.buttons().iter().all(|b| b.x == 0 && b.y == 0));
    }
}
