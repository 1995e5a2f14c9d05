use std::fmt;

/// Integer position on the drawing surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Vector { x, y }
    }

    /// Adds `other` in place. Returns `self` so calls can be chained.
    pub fn add(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    /// Subtracts `other` in place. Returns `self` so calls can be chained.
    #[allow(dead_code)]
    pub fn subtract(&mut self, other: Vector) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
