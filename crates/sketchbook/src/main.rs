mod cli;
mod image_source;
mod logging;

use std::io::stdout;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::{Line, Span},
};
use sketchbook_config::Config;
use sketchbook_core::{ColorTheme, SketchKind};
use sketchbook_sketches::{FrameContext, Sketchbook};
use tracing::info;

use crate::cli::Cli;
use crate::image_source::{ImageLoader, ImageSource};

/// Longest wait for input while nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Rows moved by one wheel notch.
const WHEEL_ROWS: i32 = 3;

/// Rows moved by page up/down.
const PAGE_ROWS: i32 = 10;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate()?;

    let log_path = logging::init(cli.log_file.as_deref());
    info!(?log_path, sketch = %config.sketch, "starting sketchbook");

    let terminal = ratatui::init();
    let result = run(terminal, &config);
    ratatui::restore();
    result
}

fn run(terminal: DefaultTerminal, config: &Config) -> color_eyre::Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    let result = App::new(config).run(terminal);
    execute!(stdout(), DisableMouseCapture)?;
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Sketch on screen.
    sketch: SketchKind,
    /// Current color theme.
    color_theme: ColorTheme,
    sketches: Sketchbook,
    loader: ImageLoader,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        Self {
            running: false,
            sketch: config.sketch,
            color_theme: config.color_theme,
            sketches: Sketchbook::new(config),
            loader: ImageLoader::new(ImageSource::from_config(&config.raster)),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            self.sketches.tick(Instant::now());
            self.poll_image();
            terminal.draw(|frame| self.render(frame))?;
            // The raster asks for an image once it knows its size.
            if let Some((width, height)) = self.sketches.raster.take_request() {
                self.loader.request(width, height);
            }
            self.handle_crossterm_events()?;
        }
        info!("quitting");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let chunks =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(frame.area());

        let ctx = FrameContext {
            theme: self.color_theme,
            now: Instant::now(),
        };
        self.sketches.render(frame, chunks[0], self.sketch, &ctx);

        frame.render_widget(self.help_line(), chunks[1]);
    }

    /// Key hints for the current sketch.
    fn help_line(&self) -> Line<'static> {
        let color = self.color_theme.color();
        let hints: &[(&'static str, &'static str)] = match self.sketch {
            SketchKind::Particles => &[("click", "gather"), ("space", "shuffle")],
            SketchKind::Flee => &[("hover", "chase")],
            SketchKind::Raster => &[("click", "refine"), ("r", "reload")],
            SketchKind::Reveal => &[("↑↓", "scroll"), ("pgup/pgdn", "page")],
        };
        let common = [("tab", "next"), ("1-4", "pick"), ("c", "color"), ("q", "quit")];

        let mut spans: Vec<Span> = vec![self.sketch.label().bold().fg(color), "   ".into()];
        for (key, action) in hints.iter().chain(common.iter()) {
            spans.push(key.bold().fg(color));
            spans.push(format!(" {action}  ").dark_gray());
        }
        Line::from(spans).centered()
    }

    /// Hand a finished image load to the raster sketch.
    fn poll_image(&mut self) {
        match self.loader.poll() {
            Some(Ok(image)) => self.sketches.raster.set_image(image),
            Some(Err(e)) => self.sketches.raster.set_failed(e.to_string()),
            None => {}
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next animation frame.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self
            .sketches
            .until_next(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Tab) => self.select(self.sketch.next()),
            (_, KeyCode::Char(c @ '1'..='4')) => {
                if let Some(kind) = c
                    .to_digit(10)
                    .and_then(|d| SketchKind::from_index(d as usize))
                {
                    self.select(kind);
                }
            }
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char(' ')) if self.sketch == SketchKind::Particles => {
                self.sketches.particles.regenerate();
            }
            (_, KeyCode::Char('r')) if self.sketch == SketchKind::Raster => {
                self.sketches.raster.reload();
            }
            (_, KeyCode::Up) => self.scroll(-1),
            (_, KeyCode::Down) => self.scroll(1),
            (_, KeyCode::PageUp) => self.scroll(-PAGE_ROWS),
            (_, KeyCode::PageDown) => self.scroll(PAGE_ROWS),
            _ => {}
        }
    }

    /// Route pointer input to the sketch on screen.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match (self.sketch, mouse.kind) {
            (SketchKind::Particles, MouseEventKind::Down(MouseButton::Left)) => {
                self.sketches.particles.on_click(mouse.column, mouse.row);
            }
            (SketchKind::Raster, MouseEventKind::Down(MouseButton::Left)) => {
                self.sketches.raster.on_click();
            }
            (SketchKind::Flee, MouseEventKind::Moved | MouseEventKind::Drag(_)) => {
                self.sketches.flee.on_pointer(mouse.column, mouse.row);
            }
            (_, MouseEventKind::ScrollUp) => self.scroll(-WHEEL_ROWS),
            (_, MouseEventKind::ScrollDown) => self.scroll(WHEEL_ROWS),
            _ => {}
        }
    }

    fn scroll(&mut self, rows: i32) {
        if self.sketch == SketchKind::Reveal {
            self.sketches.reveal.scroll_by(rows);
        }
    }

    fn select(&mut self, sketch: SketchKind) {
        info!(%sketch, "switching sketch");
        self.sketch = sketch;
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.color_theme = self.color_theme.next();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let mut app = App::new(&Config::default());
        app.running = true;
        app
    }

    #[test]
    fn tab_and_digits_switch_sketches() {
        let mut app = app();
        assert_eq!(app.sketch, SketchKind::Particles);

        app.on_key_event(press(KeyCode::Tab));
        assert_eq!(app.sketch, SketchKind::Flee);

        app.on_key_event(press(KeyCode::Char('4')));
        assert_eq!(app.sketch, SketchKind::Reveal);

        app.on_key_event(press(KeyCode::Char('1')));
        assert_eq!(app.sketch, SketchKind::Particles);
    }

    #[test]
    fn c_cycles_color_and_ctrl_c_quits() {
        let mut app = app();
        let before = app.color_theme;
        app.on_key_event(press(KeyCode::Char('c')));
        assert_eq!(app.color_theme, before.next());
        assert!(app.running);

        app.on_key_event(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char('c'))
        });
        assert!(!app.running);
    }

    #[test]
    fn q_and_esc_quit() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            app.on_key_event(press(code));
            assert!(!app.running);
        }
    }

    #[test]
    fn help_line_names_the_sketch() {
        let app = app();
        let text: String = app
            .help_line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.starts_with("particles"));
        assert!(text.contains("gather"));
        assert!(text.contains("quit"));
    }
}
