use crate::entity::{Cell, Drawable, Intersect};
use crate::group::Group;
use crate::surface::Surface;
use crate::vector::Vector;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// One step of `length` units in this direction.
    pub fn delta(self, length: i32) -> Vector {
        match self {
            Up => Vector::new(0, -length),
            Down => Vector::new(0, length),
            Left => Vector::new(-length, 0),
            Right => Vector::new(length, 0),
        }
    }
}

pub struct Snake {
    position: Vector,
    size: usize,
    trail: Group,
    head: Cell,
    block_size: i32,
}

impl Snake {
    pub fn new(position: Vector, block_size: i32) -> Self {
        Snake {
            position,
            size: 1,
            trail: Group::new(),
            head: Cell::body(position, block_size),
            block_size,
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    /// Target length, head included.
    pub fn size(&self) -> usize {
        self.size
    }

    #[cfg(test)]
    pub fn trail(&self) -> &Group {
        &self.trail
    }

    pub fn move_by(&mut self, delta: Vector) {
        // The old head position becomes the newest trail segment
        self.trail.add_component(Box::new(Cell::body(self.position, self.block_size)));
        self.position.add(delta);
        self.head = Cell::body(self.position, self.block_size);

        // Checked after the push, so a fresh growth shows up one move late
        if self.trail.len() + 1 > self.size {
            self.trail.shift_component();
        }
    }

    /// Raises the target length. The trail catches up over the next moves.
    pub fn grow(&mut self) {
        self.size += 1;
    }
}

impl Drawable for Snake {
    fn render(&self, surface: &mut dyn Surface) {
        self.trail.render(surface);
        self.head.render(surface);
    }

    fn dispose(&mut self) {
        self.trail.dispose();
        self.head.dispose();
    }
}

/// Checks the trail only. The head is never part of it.
impl Intersect for Snake {
    fn intersect(&self, point: Vector) -> bool {
        self.trail.intersect(point)
    }
}
