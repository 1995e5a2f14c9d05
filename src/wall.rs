use crate::entity::{Cell, Drawable, Intersect};
use crate::group::Group;
use crate::snake::Direction;
use crate::surface::Surface;
use crate::vector::Vector;

/// A straight run of dead cells. Never changes once built.
pub struct Wall {
    cells: Group,
}

impl Wall {
    pub fn new(origin: Vector, length: i32, direction: Direction, block_size: i32) -> Self {
        let step = direction.delta(block_size);
        let mut cells = Group::new();

        for index in 0..length {
            let position = Vector::new(origin.x + index * step.x, origin.y + index * step.y);
            cells.add_component(Box::new(Cell::dead(position, block_size)));
        }

        Wall { cells }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.cells.positions()
    }
}

impl Drawable for Wall {
    fn render(&self, surface: &mut dyn Surface) {
        self.cells.render(surface);
    }

    fn dispose(&mut self) {
        self.cells.dispose();
    }
}

impl Intersect for Wall {
    fn intersect(&self, point: Vector) -> bool {
        self.cells.intersect(point)
    }
}
