use std::time::Instant;

use crate::config::GameConfig;
use crate::entity::{Cell, Component, Drawable, Intersect};
use crate::schedule::{FrameRequest, Interval};
use crate::snake::{Direction::{self, *}, Snake};
use crate::surface::{Color, Surface};
use crate::vector::Vector;
use crate::wall::Wall;

use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info};
use rand::{rngs::ThreadRng, Rng};

const GAME_OVER_TEXT: &str = "GAME OVER!";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Over,
}

/// Owns every entity and both schedules of one play-through.
pub struct Game<S: Surface, R: Rng = ThreadRng> {
    config: GameConfig,
    surface: S,
    rng: R,
    motion: Vector,
    obstructions: Vec<Wall>,
    food: Option<Cell>,
    snake: Snake,
    interval: Option<Interval>,
    animation: Option<FrameRequest>,
    listening: bool,
    state: State,
}

impl<S: Surface> Game<S> {
    pub fn new(config: GameConfig, surface: S) -> Self {
        Game::with_rng(config, surface, rand::thread_rng())
    }
}

impl<S: Surface, R: Rng> Game<S, R> {
    pub fn with_rng(config: GameConfig, surface: S, rng: R) -> Self {
        let block = config.block_size;
        let snake = Snake::new(Vector::new(block, block), block);

        Game {
            config,
            surface,
            rng,
            motion: Vector::ZERO,
            obstructions: vec![],
            food: None,
            snake,
            interval: None,
            animation: None,
            listening: false,
            state: State::Idle,
        }
    }

    /// Builds the walls, places the first food, attaches input and schedules
    /// the first tick and frame.
    pub fn start(&mut self, now: Instant) {
        if self.state != State::Idle {
            return;
        }

        let GameConfig { width, height, block_size: block, .. } = self.config;
        if self.config.build_walls {
            let (cols, rows) = self.config.cells();
            self.obstructions.push(Wall::new(Vector::ZERO, cols, Right, block));
            self.obstructions.push(Wall::new(Vector::new(0, height - block), cols, Right, block));
            self.obstructions.push(Wall::new(Vector::new(width - block, 0), rows, Down, block));
            self.obstructions.push(Wall::new(Vector::ZERO, rows, Down, block));
        }

        let food = new_food(&self.config, &mut self.rng);
        info!("Game started: {:?}, snake at {}, food at {}", self.config, self.snake.position(), food.position());
        self.food = Some(food);

        self.listening = true;
        self.animation = Some(FrameRequest::immediate(now));
        self.interval = Some(Interval::start(self.config.tick, now));
        self.state = State::Running;
    }

    /// Replaces the pending motion if `key` is a direction. Returns whether
    /// the key was taken.
    pub fn key_down(&mut self, key: &KeyEvent) -> bool {
        if !self.listening {
            return false;
        }

        match direction_for(key) {
            Some(dir) => {
                self.motion = dir.delta(self.config.block_size);
                debug!("Motion set to {:?}", dir);
                true
            }
            None => false,
        }
    }

    /// Runs whatever tick and frame are due at `now`.
    pub fn pump(&mut self, now: Instant) -> crossterm::Result<()> {
        let tick_due = match self.interval.as_mut() {
            Some(interval) => interval.fire(now),
            None => false,
        };
        if tick_due {
            self.game_loop()?;
        }

        let frame_due = self.animation.as_ref().map_or(false, |frame| frame.is_due(now));
        if frame_due {
            self.animation = None;
            self.draw(now)?;
        }

        Ok(())
    }

    /// One step of game logic.
    pub fn game_loop(&mut self) -> crossterm::Result<()> {
        if self.state != State::Running {
            return Ok(());
        }

        let start = self.snake.position();
        if self.food.as_ref().map_or(false, |food| food.position() == start) {
            let food = new_food(&self.config, &mut self.rng);
            self.snake.grow();
            debug!("Food eaten, size now {}, next food at {}", self.snake.size(), food.position());
            self.food = Some(food);
        }

        self.snake.move_by(self.motion);
        let head = self.snake.position();

        if self.obstructions.iter().any(|wall| wall.intersect(head)) {
            info!("Snake hit a wall at {}", head);
            return self.end_game();
        }

        if self.snake.intersect(head) {
            info!("Snake ran into itself at {}", head);
            return self.end_game();
        }

        Ok(())
    }

    /// Repaints the whole field and asks for the next frame.
    pub fn draw(&mut self, now: Instant) -> crossterm::Result<()> {
        let surface: &mut dyn Surface = &mut self.surface;
        surface.clear_rect(0, 0, self.config.width, self.config.height);

        for wall in &self.obstructions {
            wall.render(surface);
        }
        self.snake.render(surface);
        if let Some(food) = &self.food {
            food.render(surface);
        }
        surface.present()?;

        if self.state == State::Running {
            self.animation = Some(FrameRequest::request(now));
        }

        Ok(())
    }

    /// Cancels both schedules, detaches input and paints the game over text.
    /// Only the first call has any effect.
    pub fn end_game(&mut self) -> crossterm::Result<()> {
        if self.state == State::Over {
            return Ok(());
        }

        self.interval = None;
        self.animation = None;
        self.listening = false;
        self.state = State::Over;
        info!("Game over with size {}", self.snake.size());

        self.surface.set_fill_style(Color::Red);
        self.surface.fill_text(GAME_OVER_TEXT, self.config.width / 2, self.config.height / 2);
        self.surface.present()
    }

    pub fn dispose(&mut self) {
        for wall in self.obstructions.iter_mut() {
            wall.dispose();
        }
        self.snake.dispose();
        if let Some(food) = self.food.as_mut() {
            food.dispose();
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == State::Over
    }

    #[cfg(test)]
    pub fn motion(&self) -> Vector {
        self.motion
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> Option<&Cell> {
        self.food.as_ref()
    }

    #[cfg(test)]
    pub fn obstructions(&self) -> &[Wall] {
        &self.obstructions
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    fn set_food(&mut self, position: Vector) {
        self.food = Some(Cell::food(position, self.config.block_size));
    }

    #[cfg(test)]
    fn is_scheduled(&self) -> (bool, bool) {
        (self.interval.is_some(), self.animation.is_some())
    }
}

fn direction_for(key: &KeyEvent) -> Option<Direction> {
    match key.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn new_food<R: Rng>(config: &GameConfig, rng: &mut R) -> Cell {
    let block = config.block_size;
    let x = random_aligned(rng, block, config.width - block, block);
    let y = random_aligned(rng, block, config.height - block, block);
    Cell::food(Vector::new(x, y), block)
}

/// Uniform in `[min, max)`, rounded down to a multiple of `block`.
fn random_aligned<R: Rng>(rng: &mut R, min: i32, max: i32, block: i32) -> i32 {
    let value = rng.gen_range(min..max);
    value - value % block
}
