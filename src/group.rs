use std::collections::VecDeque;

use crate::entity::{Component, Drawable, Intersect};
use crate::surface::Surface;
use crate::vector::Vector;

/// Ordered collection of components. Insertion order is render order, and
/// the oldest component is the first one evicted.
#[derive(Default)]
pub struct Group {
    components: VecDeque<Box<dyn Component>>,
}

impl Group {
    pub fn new() -> Self {
        Group { components: VecDeque::new() }
    }

    pub fn add_component(&mut self, component: Box<dyn Component>) {
        self.components.push_back(component);
    }

    /// Removes the first component occupying `position`.
    #[allow(dead_code)]
    pub fn delete_component(&mut self, position: Vector) -> Option<Box<dyn Component>> {
        let index = self.components.iter().position(|c| c.position() == position)?;
        self.components.remove(index)
    }

    /// Removes the oldest component.
    pub fn shift_component(&mut self) -> Option<Box<dyn Component>> {
        self.components.pop_front()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[cfg(test)]
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.components.iter().map(|c| c.position())
    }
}

impl Drawable for Group {
    fn render(&self, surface: &mut dyn Surface) {
        for component in &self.components {
            component.render(surface);
        }
    }

    fn dispose(&mut self) {
        for component in self.components.iter_mut() {
            component.dispose();
        }
    }
}

impl Intersect for Group {
    fn intersect(&self, point: Vector) -> bool {
        self.components.iter().any(|c| c.position() == point)
    }
}
