use rand::Rng;

use crate::Coords;
use crate::grid::Grid;
use crate::surface::{Color, Surface};

pub struct Food {
    position: Coords,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Self {
        let mut food = Food { position: (0, 0) };
        food.randomize_position(grid, rng);
        food
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    /// Moves to a uniformly random cell. Avoiding the snake is up to the caller.
    pub fn randomize_position<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.position = (rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
    }

    pub fn place_at(&mut self, cell: Coords) {
        self.position = cell;
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, grid: &Grid) {
        let rect = grid.cell_rect(self.position);
        surface.draw_rect(Color::RED, rect, 0);
        surface.draw_rect(Color::DARK_RED, rect, 1);
    }
}
