pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod snake;
pub mod surface;
pub mod term;

/// Grid cell as `(x, y)`. Signed so a head can step off the grid before it's rejected.
pub type Coords = (i32, i32);
