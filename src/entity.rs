use crate::surface::{Color, Surface};
use crate::vector::Vector;

/// Something that can paint itself and release what it holds.
pub trait Drawable {
    fn render(&self, surface: &mut dyn Surface);

    fn dispose(&mut self);
}

/// A drawable that occupies a single position.
pub trait Component: Drawable {
    fn position(&self) -> Vector;
}

/// Answers whether a point is occupied.
pub trait Intersect {
    fn intersect(&self, point: Vector) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Wall segment, fatal on contact
    Dead,
    Food,
    Body,
}

impl CellKind {
    pub fn color(self) -> Color {
        match self {
            CellKind::Dead => Color::Black,
            CellKind::Food => Color::Green,
            CellKind::Body => Color::Blue,
        }
    }
}

/// One grid square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Vector,
    kind: CellKind,
    size: i32,
}

impl Cell {
    pub fn new(position: Vector, kind: CellKind, size: i32) -> Self {
        Cell { position, kind, size }
    }

    pub fn dead(position: Vector, size: i32) -> Self {
        Cell::new(position, CellKind::Dead, size)
    }

    pub fn food(position: Vector, size: i32) -> Self {
        Cell::new(position, CellKind::Food, size)
    }

    pub fn body(position: Vector, size: i32) -> Self {
        Cell::new(position, CellKind::Body, size)
    }
}

impl Drawable for Cell {
    fn render(&self, surface: &mut dyn Surface) {
        surface.set_fill_style(self.kind.color());
        surface.fill_rect(self.position.x, self.position.y, self.size, self.size);
    }

    fn dispose(&mut self) {}
}

impl Component for Cell {
    fn position(&self) -> Vector {
        self.position
    }
}
