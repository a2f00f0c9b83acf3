//! A cell buffer the sketches draw into before handing it to ratatui.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::chars::{
    BOX_BOTTOM_LEFT, BOX_BOTTOM_RIGHT, BOX_HORIZONTAL, BOX_TOP_LEFT, BOX_TOP_RIGHT, BOX_VERTICAL,
};

/// One drawn terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn new(ch: char, fg: Color) -> Self {
        Self { ch, fg, bg: None }
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// Grid of optional cells; empty cells render as blanks.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Draw a cell; positions outside the canvas are ignored.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Some(cell);
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Write a string starting at `(x, y)`, clipped to the canvas.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i as i32, y, Cell::new(ch, fg));
        }
    }

    /// Write a string centred horizontally on row `y`.
    pub fn put_centered(&mut self, y: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        self.put_str((self.width as i32 - len) / 2, y, text, fg);
    }

    /// Draw a single-line box outline.
    pub fn draw_box(&mut self, x: i32, y: i32, width: u16, height: u16, fg: Color) {
        if width < 2 || height < 2 {
            return;
        }
        let right = x + width as i32 - 1;
        let bottom = y + height as i32 - 1;

        for cx in x + 1..right {
            self.set(cx, y, Cell::new(BOX_HORIZONTAL, fg));
            self.set(cx, bottom, Cell::new(BOX_HORIZONTAL, fg));
        }
        for cy in y + 1..bottom {
            self.set(x, cy, Cell::new(BOX_VERTICAL, fg));
            self.set(right, cy, Cell::new(BOX_VERTICAL, fg));
        }
        self.set(x, y, Cell::new(BOX_TOP_LEFT, fg));
        self.set(right, y, Cell::new(BOX_TOP_RIGHT, fg));
        self.set(x, bottom, Cell::new(BOX_BOTTOM_LEFT, fg));
        self.set(right, bottom, Cell::new(BOX_BOTTOM_RIGHT, fg));
    }

    /// Convert the buffer into styled lines.
    pub fn into_lines(self) -> Vec<Line<'static>> {
        let width = self.width.max(1) as usize;
        self.cells
            .chunks(width)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Some(cell) => {
                            let mut style = Style::new().fg(cell.fg);
                            if let Some(bg) = cell.bg {
                                style = style.bg(bg);
                            }
                            Span::styled(cell.ch.to_string(), style)
                        }
                        None => Span::raw(" "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    /// Render the buffer into `area`.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.into_lines()), area);
    }
}
