use anyhow::Result;

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(100, 100, 100);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(150, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Subtracts `amount` from every channel, clamping at 0.
    pub fn darken(self, amount: u8) -> Self {
        Color {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }
}

/// Rectangle in surface units (terminal columns and rows).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Rect { x, y, w, h }
    }

    pub fn center(&self) -> (u16, u16) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft(u16, u16),
    Centered(u16, u16),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Restart,
    Pause,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Drawing side of the frontend. Nothing shows up until `present`.
pub trait Surface {
    fn clear(&mut self, color: Color);

    /// Fills `rect` when `stroke` is 0, otherwise draws its outline.
    fn draw_rect(&mut self, color: Color, rect: Rect, stroke: u16);

    fn draw_text(&mut self, text: &str, color: Color, anchor: TextAnchor);

    fn present(&mut self) -> Result<()>;
}

/// Input side of the frontend.
pub trait EventSource {
    /// Returns every event queued since the last call without blocking.
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;
}
