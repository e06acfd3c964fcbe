use anyhow::Result;
use rand::{Rng, seq::SliceRandom};
use tracing::{debug, info};

use crate::Coords;
use crate::clock::{Clock, ScoreTimer};
use crate::config::{MAX_FOOD_REROLLS, SCORE_INTERVAL_MS};
use crate::food::Food;
use crate::grid::Grid;
use crate::snake::{Collision, Direction, MoveResult::*, Snake};
use crate::surface::{Color, EventSource, InputEvent, Key, Surface, TextAnchor};

const GAME_OVER_TEXT: &str = "GAME OVER! Press SPACE to restart";
const WIN_TEXT: &str = "YOU WIN! Press SPACE to play again";
const PAUSED_TEXT: &str = "PAUSED - Esc to resume, Ctrl+C to quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    /// No free cell was left for the food.
    GridFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver(Outcome),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame<R> {
    grid: Grid,
    snake: Snake,
    food: Food,
    state: GameState,
    dir_change: Option<Direction>,
    score_timer: ScoreTimer,
    rng: R,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(grid: Grid, mut rng: R) -> Self {
        let snake = Snake::new(&grid, &mut rng);
        let food = Food::new(&grid, &mut rng);

        let mut game = SnakeGame {
            grid,
            snake,
            food,
            state: GameState::Playing,
            dir_change: None,
            score_timer: ScoreTimer::new(SCORE_INTERVAL_MS),
            rng,
        };
        game.relocate_food();
        game
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.snake.score()
    }

    /// Frames per second for the driver; the whole loop speeds up as the snake does.
    pub fn tick_rate(&self) -> f64 {
        self.snake.speed()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        let key = match event {
            InputEvent::Quit => return Flow::Quit,
            InputEvent::KeyDown(key) => key,
        };

        match (self.state, key) {
            (GameState::Playing, Key::Move(dir)) => {
                // Latest request wins, but never the reverse of where we're heading now
                if dir != self.snake.get_direction().opposite() {
                    self.dir_change = Some(dir);
                }
            }
            (GameState::Playing, Key::Pause) => {
                self.state = GameState::Paused;
                info!(score = self.score(), "paused");
            }
            (GameState::Paused, Key::Pause) => {
                self.state = GameState::Playing;
                info!("resumed");
            }
            (GameState::GameOver(_), Key::Restart) => self.restart(),
            _ => {}
        }

        Flow::Continue
    }

    /// One tick: move, eat, and hand out time points.
    pub fn step(&mut self, now_ms: u64) {
        if self.state == GameState::Playing {
            self.advance_snake();
        }

        let points = self.score_timer.advance(now_ms, self.state == GameState::Playing);
        if points > 0 {
            self.snake.award(points);
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let frame = self.grid.frame_rect();

        surface.clear(Color::BLACK);
        surface.draw_rect(Color::GRAY, frame, 1);
        self.snake.render(surface, &self.grid);
        self.food.render(surface, &self.grid);

        let score_text = format!(" Score: {} ", self.score());
        surface.draw_text(&score_text, Color::WHITE, TextAnchor::TopLeft(2, 0));

        let overlay = match self.state {
            GameState::Playing => None,
            GameState::Paused => Some(PAUSED_TEXT),
            GameState::GameOver(Outcome::GridFull) => Some(WIN_TEXT),
            GameState::GameOver(Outcome::Crashed(_)) => Some(GAME_OVER_TEXT),
        };

        if let Some(text) = overlay {
            let (x, y) = frame.center();
            surface.draw_text(text, Color::WHITE, TextAnchor::Centered(x, y));
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn advance_snake(&mut self) {
        if let Some(dir) = self.dir_change.take() {
            self.snake.set_direction(dir);
        }

        match self.snake.update(&self.grid) {
            Crashed(collision) => {
                info!(score = self.score(), length = self.snake.body().len(), ?collision, "game over");
                self.state = GameState::GameOver(Outcome::Crashed(collision));
            }
            Moved { new_head, old_tail } => {
                if new_head == self.food.position() {
                    self.snake.grow();
                    debug!(?new_head, ?old_tail, score = self.score(), speed = self.snake.speed(), "food eaten");

                    if !self.relocate_food() {
                        info!(score = self.score(), "grid full");
                        self.state = GameState::GameOver(Outcome::GridFull);
                    }
                }
            }
        }
    }

    fn restart(&mut self) {
        self.snake.reset(&self.grid, &mut self.rng);
        self.dir_change = None;
        self.score_timer.reset();
        self.state = GameState::Playing;

        if !self.relocate_food() {
            self.state = GameState::GameOver(Outcome::GridFull);
        }

        info!(direction = ?self.snake.get_direction(), "restarted");
    }

    /// Puts the food on a cell the snake doesn't occupy. Returns false if there is none.
    fn relocate_food(&mut self) -> bool {
        for _ in 0..MAX_FOOD_REROLLS {
            self.food.randomize_position(&self.grid, &mut self.rng);
            if !self.snake.occupies(self.food.position()) {
                return true;
            }
        }

        // Random rolls keep landing on the snake, so pick among what's left
        let snake = &self.snake;
        let free: Vec<Coords> = self.grid.cells().filter(|pos| !snake.occupies(*pos)).collect();
        debug!(free = free.len(), "food reroll limit reached");

        match free.choose(&mut self.rng) {
            Some(cell) => {
                self.food.place_at(*cell);
                true
            }
            None => false,
        }
    }
}

/// Runs frames until the player quits.
pub fn run<R, F, C>(game: &mut SnakeGame<R>, frontend: &mut F, clock: &mut C) -> Result<()>
where
    R: Rng,
    F: Surface + EventSource,
    C: Clock,
{
    loop {
        for event in frontend.poll_events()? {
            if game.handle_event(event) == Flow::Quit {
                info!(score = game.score(), "quit");
                return Ok(());
            }
        }

        game.step(clock.now_ms());
        game.render(frontend);
        frontend.present()?;
        clock.tick(game.tick_rate());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use crate::surface::testing::{DrawCall, RecordingFrontend};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn game_with(grid: Grid, snake: Snake, food: Coords) -> SnakeGame<StdRng> {
        let mut game = SnakeGame::new(grid, StdRng::seed_from_u64(99));
        game.snake = snake;
        game.food.place_at(food);
        game
    }

    fn key(dir: Direction) -> InputEvent {
        InputEvent::KeyDown(Key::Move(dir))
    }

    #[derive(Default)]
    struct FakeClock {
        now: u64,
        rates: Vec<f64>,
    }

    impl Clock for FakeClock {
        fn tick(&mut self, rate: f64) -> Duration {
            self.rates.push(rate);
            let frame = (1000.0 / rate) as u64;
            self.now += frame;
            Duration::from_millis(frame)
        }

        fn now_ms(&self) -> u64 {
            self.now
        }
    }

    #[test]
    fn new_game_keeps_food_off_the_snake() {
        for seed in 0..50 {
            let game = SnakeGame::new(Grid::new(40, 30), StdRng::seed_from_u64(seed));
            assert_eq!(game.state(), GameState::Playing);
            assert!(!game.snake().occupies(game.food().position()));
        }
    }

    #[test]
    fn eating_grows_scores_and_moves_food() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (6, 5));

        game.step(0);

        assert_eq!(game.score(), 10);
        assert!(game.tick_rate() > 10.0);
        assert!(!game.snake().occupies(game.food().position()));

        game.step(1);
        assert_eq!(game.snake().body().len(), 4);
    }

    #[test]
    fn reverse_input_is_ignored() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (30, 20));

        game.handle_event(key(Left));
        game.step(0);
        assert_eq!(game.snake().head(), (6, 5));
        assert_eq!(game.snake().get_direction(), Right);

        game.handle_event(key(Down));
        game.step(1);
        assert_eq!(game.snake().head(), (6, 6));
    }

    #[test]
    fn only_one_direction_change_per_tick() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (30, 20));

        // Up then Left in the same tick would fold the snake back onto itself
        game.handle_event(key(Up));
        game.handle_event(key(Left));
        game.step(0);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.snake().head(), (5, 4));
        assert_eq!(game.snake().get_direction(), Up);
    }

    #[test]
    fn wall_crash_ends_the_game_and_freezes_input() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((39, 5), 3, Right), (0, 0));

        game.step(0);
        assert_eq!(game.state(), GameState::GameOver(Outcome::Crashed(Collision::Wall)));

        let body = game.snake().body().clone();
        game.handle_event(key(Down));
        game.step(5000);
        assert_eq!(game.snake().body(), &body);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn restart_resets_snake_score_and_timer() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((39, 5), 3, Right), (0, 0));
        game.snake.award(35);
        game.step(0);
        game.step(1500);

        game.handle_event(InputEvent::KeyDown(Key::Restart));

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().body().len(), 1);
        assert_eq!(game.snake().head(), grid.center());
        assert!(!game.snake().occupies(game.food().position()));

        // Keep the food out of the way so only time points can count
        game.snake = Snake::straight((5, 5), 1, Down);
        game.food.place_at((30, 20));
        game.step(10_000);
        game.step(11_900);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn restart_is_ignored_while_playing() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (30, 20));

        game.handle_event(InputEvent::KeyDown(Key::Restart));
        assert_eq!(game.snake().body().len(), 3);
    }

    #[test]
    fn time_adds_a_point_every_two_seconds() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((0, 0), 1, Down), (39, 0));
        let mut last_score = 0;

        for tick in 0..=25u64 {
            game.step(tick * 200);
            assert!(game.score() >= last_score);
            last_score = game.score();
        }

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn pause_stops_movement_and_time_points() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (30, 20));
        game.step(0);

        game.handle_event(InputEvent::KeyDown(Key::Pause));
        game.handle_event(key(Down));
        game.step(1000);
        game.step(9000);
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.snake().head(), (6, 5));
        assert_eq!(game.score(), 0);

        game.handle_event(InputEvent::KeyDown(Key::Pause));
        game.step(9100);
        assert_eq!(game.snake().head(), (7, 5));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn full_grid_is_a_win() {
        // Two free cells in a row: eating the last food leaves nothing to relocate to
        let grid = Grid::new(3, 1);
        let mut game = game_with(grid, Snake::straight((1, 0), 2, Right), (2, 0));
        game.snake.grow();

        game.step(0);

        assert_eq!(game.snake().body().len(), 3);
        assert_eq!(game.state(), GameState::GameOver(Outcome::GridFull));
    }

    #[test]
    fn relocation_falls_back_to_the_last_free_cell() {
        let grid = Grid::new(3, 1);
        let mut game = game_with(grid, Snake::straight((1, 0), 2, Right), (2, 0));

        for _ in 0..20 {
            assert!(game.relocate_food());
            assert_eq!(game.food().position(), (2, 0));
        }
    }

    #[test]
    fn render_draws_frame_score_and_overlay() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((39, 5), 3, Right), (0, 0));
        let mut surface = RecordingFrontend::default();

        game.render(&mut surface);
        assert_eq!(surface.calls[0], DrawCall::Clear(Color::BLACK));
        assert_eq!(surface.outlines()[0], (Color::GRAY, grid.frame_rect()));
        assert_eq!(surface.texts(), vec![" Score: 0 "]);

        game.step(0);
        let mut surface = RecordingFrontend::default();
        game.render(&mut surface);
        assert_eq!(surface.texts(), vec![" Score: 0 ", GAME_OVER_TEXT]);
        assert!(surface.calls.contains(&DrawCall::Text {
            text: GAME_OVER_TEXT.to_string(),
            color: Color::WHITE,
            anchor: TextAnchor::Centered(41, 16),
        }));
    }

    #[test]
    fn run_paces_frames_at_snake_speed_until_quit() {
        let grid = Grid::new(40, 30);
        let mut game = game_with(grid, Snake::straight((5, 5), 3, Right), (6, 5));
        let mut frontend = RecordingFrontend::with_script(vec![
            vec![],
            vec![key(Down)],
            vec![InputEvent::KeyDown(Key::Pause), InputEvent::Quit],
        ]);
        let mut clock = FakeClock::default();

        run(&mut game, &mut frontend, &mut clock).unwrap();

        assert_eq!(frontend.polls, 3);
        assert_eq!(clock.rates.len(), 2);
        assert!(clock.rates[0] > 10.0);
        assert_eq!(game.snake().head(), (6, 6));
        assert_eq!(game.state(), GameState::Paused);
        let presents = frontend.calls.iter().filter(|c| **c == DrawCall::Present).count();
        assert_eq!(presents, 2);
    }
}
