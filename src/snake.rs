use std::collections::VecDeque;

use rand::Rng;

use crate::Coords;
use crate::config::{BASE_SPEED, COLOR_CHANGE_INTERVAL, FOOD_REWARD, INITIAL_GROWTH, SPEED_INCREASE};
use crate::grid::Grid;
use crate::surface::{Color, Surface};
use Direction::*;
use MoveResult::*;

const COLOR_CYCLE: [Color; 6] = [
    Color::rgb(0, 255, 0),   // green
    Color::rgb(0, 255, 255), // cyan
    Color::rgb(255, 0, 255), // magenta
    Color::rgb(255, 255, 0), // yellow
    Color::rgb(255, 165, 0), // orange
    Color::rgb(255, 0, 0),   // red
];

const OUTLINE_DARKEN: u8 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed(Collision)
}

pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    grow_pending: u32,
    score: u32,
    speed: f64,
    color_index: usize,
    color_timer: u32,
}

impl Snake {
    pub fn new<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Self {
        let mut snake = Snake {
            body: VecDeque::new(),
            direction: Right,
            grow_pending: 0,
            score: 0,
            speed: BASE_SPEED,
            color_index: 0,
            color_timer: 0,
        };
        snake.reset(grid, rng);
        snake
    }

    /// Straight snake with `head` first and the rest trailing behind it.
    #[cfg(test)]
    pub fn straight(head: Coords, size: i32, direction: Direction) -> Self {
        let diff = direction.delta();
        let body = (0..size)
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake {
            body,
            direction,
            grow_pending: 0,
            score: 0,
            speed: BASE_SPEED,
            color_index: 0,
            color_timer: 0,
        }
    }

    /// Back to a single cell at the center, growing to three over the next ticks.
    pub fn reset<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.body.clear();
        self.body.push_back(grid.center());
        self.direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        self.grow_pending = INITIAL_GROWTH;
        self.score = 0;
        self.speed = BASE_SPEED;
        self.color_index = 0;
        self.color_timer = 0;
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn occupies(&self, cell: Coords) -> bool {
        self.body.contains(&cell)
    }

    pub fn update(&mut self, grid: &Grid) -> MoveResult {
        let old_head = self.head();
        let diff = self.direction.delta();
        let new_head = (old_head.0 + diff.0, old_head.1 + diff.1);

        if !grid.contains(new_head) {
            return Crashed(Collision::Wall);
        }

        // The tail still counts: it only moves out of the way after the head moves in
        if self.body.iter().skip(1).any(|pos| *pos == new_head) {
            return Crashed(Collision::Body);
        }

        self.body.push_front(new_head);

        let old_tail = if self.grow_pending > 0 {
            self.grow_pending -= 1;
            None
        } else {
            self.body.pop_back()
        };

        self.color_timer += 1;
        if self.color_timer >= COLOR_CHANGE_INTERVAL {
            self.color_index = (self.color_index + 1) % COLOR_CYCLE.len();
            self.color_timer = 0;
        }

        Moved { new_head, old_tail }
    }

    /// Returns false when `new_direction` would reverse the snake onto itself.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self) {
        self.grow_pending += 1;
        self.score += FOOD_REWARD;
        self.speed += SPEED_INCREASE;
    }

    pub fn award(&mut self, points: u32) {
        self.score += points;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn color(&self) -> Color {
        COLOR_CYCLE[self.color_index]
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, grid: &Grid) {
        let fill = self.color();
        let outline = fill.darken(OUTLINE_DARKEN);

        for pos in &self.body {
            let rect = grid.cell_rect(*pos);
            surface.draw_rect(fill, rect, 0);
            surface.draw_rect(outline, rect, 1);
        }
    }
}
