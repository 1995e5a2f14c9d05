/// Fill colours the game paints with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Green,
    Blue,
    Red,
}

/// A 2-D drawing surface, in the same units as entity positions.
pub trait Surface {
    fn set_fill_style(&mut self, color: Color);

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32);

    fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32);

    /// Paints `text` centred on `(x, y)` in the current fill style.
    fn fill_text(&mut self, text: &str, x: i32, y: i32);

    /// Makes everything painted since the last call visible.
    fn present(&mut self) -> crossterm::Result<()> {
        Ok(())
    }
}

impl<T: Surface + ?Sized> Surface for &mut T {
    fn set_fill_style(&mut self, color: Color) {
        (**self).set_fill_style(color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        (**self).fill_rect(x, y, w, h)
    }

    fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        (**self).clear_rect(x, y, w, h)
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32) {
        (**self).fill_text(text, x, y)
    }

    fn present(&mut self) -> crossterm::Result<()> {
        (**self).present()
    }
}

#[cfg(test)]
pub mod recording {
    use super::{Color, Surface};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Op {
        Fill { color: Color, x: i32, y: i32, w: i32, h: i32 },
        Clear { x: i32, y: i32, w: i32, h: i32 },
        Text { color: Color, text: String, x: i32, y: i32 },
        Present,
    }

    /// Surface double that records every call.
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
        fill: Color,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            RecordingSurface { ops: vec![], fill: Color::Black }
        }

        pub fn fills(&self) -> Vec<(Color, i32, i32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Fill { color, x, y, .. } => Some((*color, *x, *y)),
                    _ => None,
                })
                .collect()
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn reset(&mut self) {
            self.ops.clear();
        }
    }

    impl Surface for RecordingSurface {
        fn set_fill_style(&mut self, color: Color) {
            self.fill = color;
        }

        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.ops.push(Op::Fill { color: self.fill, x, y, w, h });
        }

        fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.ops.push(Op::Clear { x, y, w, h });
        }

        fn fill_text(&mut self, text: &str, x: i32, y: i32) {
            self.ops.push(Op::Text { color: self.fill, text: text.to_string(), x, y });
        }

        fn present(&mut self) -> crossterm::Result<()> {
            self.ops.push(Op::Present);
            Ok(())
        }
    }
}
