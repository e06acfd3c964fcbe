use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result, bail};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::snake::Direction;
use crate::surface::{Color, EventSource, InputEvent, Key, Rect, Surface, TextAnchor};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::WHITE, bg: Color::BLACK };

// Never drawn, so the first present repaints everything
const UNKNOWN: Cell = Cell { ch: '\0', fg: Color::BLACK, bg: Color::BLACK };

/// Off-screen cell buffer, kept apart from the terminal so drawing can be tested.
struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(width: u16, height: u16, fill: Cell) -> Self {
        Canvas { width, height, cells: vec![fill; width as usize * height as usize] }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }

    fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    fn update<F: FnOnce(&mut Cell)>(&mut self, x: u16, y: u16, f: F) {
        if let Some(i) = self.index(x, y) {
            f(&mut self.cells[i]);
        }
    }

    fn fill(&mut self, color: Color) {
        for cell in self.cells.iter_mut() {
            *cell = Cell { ch: ' ', fg: Color::WHITE, bg: color };
        }
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        for y in rect.y..rect.y.saturating_add(rect.h) {
            for x in rect.x..rect.x.saturating_add(rect.w) {
                self.update(x, y, |cell| *cell = Cell { ch: ' ', fg: cell.fg, bg: color });
            }
        }
    }

    fn outline_rect(&mut self, color: Color, rect: Rect) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }

        let (left, top) = (rect.x, rect.y);
        let right = rect.x.saturating_add(rect.w - 1);
        let bottom = rect.y.saturating_add(rect.h - 1);

        for y in top..=bottom {
            for x in left..=right {
                if let Some(ch) = outline_char(x, y, left, top, right, bottom) {
                    self.update(x, y, |cell| {
                        cell.ch = ch;
                        cell.fg = color;
                    });
                }
            }
        }
    }

    fn print(&mut self, x: u16, y: u16, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.update(x.saturating_add(i as u16), y, |cell| {
                cell.ch = ch;
                cell.fg = color;
                cell.bg = Color::BLACK;
            });
        }
    }
}

/// Border glyph for position `(x, y)` of a rectangle, or None for its interior.
/// Single-row rectangles are bracketed so grid cells read as `[]`.
fn outline_char(x: u16, y: u16, left: u16, top: u16, right: u16, bottom: u16) -> Option<char> {
    if top == bottom {
        return Some(if x == left { '[' } else if x == right { ']' } else { '-' });
    }

    let on_x_edge = x == left || x == right;
    let on_y_edge = y == top || y == bottom;

    match (on_x_edge, on_y_edge) {
        (true, true) => Some('+'),
        (false, true) => Some('-'),
        (true, false) => Some('|'),
        (false, false) => None,
    }
}

fn to_term_color(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}

fn map_key(ev: &KeyEvent) -> Option<InputEvent> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }

    if ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }

    let key = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Key::Move(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Key::Move(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Key::Move(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Key::Move(Direction::Right),
        KeyCode::Char(' ') => Key::Restart,
        KeyCode::Esc => Key::Pause,
        KeyCode::Char('q') => return Some(InputEvent::Quit),
        _ => return None,
    };

    Some(InputEvent::KeyDown(key))
}

pub struct TermManager {
    stdout: Stdout,
    frame: Canvas,
    shown: Canvas,
    active: bool,
}

impl TermManager {
    /// Checks that the terminal can fit `required` before touching it.
    pub fn new(required: Rect) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let (need_w, need_h) = (required.x + required.w, required.y + required.h);

        if width < need_w || height < need_h {
            bail!(
                "Terminal is {}x{}, but the game needs at least {}x{}",
                width, height, need_w, need_h
            );
        }

        Ok(TermManager {
            stdout: stdout(),
            frame: Canvas::new(width, height, BLANK),
            shown: Canvas::new(width, height, UNKNOWN),
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )
        .context("Error preparing the screen")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
        .context("Error leaving alt screen")?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Errors can't go anywhere useful from here
        let _ = self.restore();
    }
}

impl Surface for TermManager {
    fn clear(&mut self, color: Color) {
        self.frame.fill(color);
    }

    fn draw_rect(&mut self, color: Color, rect: Rect, stroke: u16) {
        if stroke == 0 {
            self.frame.fill_rect(color, rect);
        } else {
            self.frame.outline_rect(color, rect);
        }
    }

    fn draw_text(&mut self, text: &str, color: Color, anchor: TextAnchor) {
        let (x, y) = match anchor {
            TextAnchor::TopLeft(x, y) => (x, y),
            TextAnchor::Centered(cx, cy) => {
                // Padded by a space on each side
                let len = text.chars().count() as u16 + 2;
                self.frame.print(cx.saturating_sub(len / 2), cy, &format!(" {} ", text), color);
                return;
            }
        };

        self.frame.print(x, y, text, color);
    }

    /// Only cells that changed since the last present are written out.
    fn present(&mut self) -> Result<()> {
        let mut cursor_at: Option<(u16, u16)> = None;
        let mut colors: Option<(Color, Color)> = None;

        for y in 0..self.frame.height {
            for x in 0..self.frame.width {
                let (cell, old) = match (self.frame.get(x, y), self.shown.get(x, y)) {
                    (Some(cell), Some(old)) => (cell, old),
                    _ => continue,
                };
                if cell == old {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.stdout, cursor::MoveTo(x, y))?;
                }
                if colors != Some((cell.fg, cell.bg)) {
                    queue!(
                        self.stdout,
                        style::SetForegroundColor(to_term_color(cell.fg)),
                        style::SetBackgroundColor(to_term_color(cell.bg))
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                queue!(self.stdout, style::Print(cell.ch))?;

                cursor_at = Some((x + 1, y));
                self.shown.update(x, y, |shown| *shown = cell);
            }
        }

        self.stdout.flush().context("Error flushing")?;
        Ok(())
    }
}

impl EventSource for TermManager {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = vec![];

        while event::poll(Duration::from_millis(0)).context("Error polling input")? {
            if let Event::Key(ev) = event::read().context("Error reading input")? {
                if let Some(input) = map_key(&ev) {
                    events.push(input);
                }
            }
        }

        Ok(events)
    }
}
