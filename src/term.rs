use crate::surface::{Color, Surface};
use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, ops::Range, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

// One grid cell is two characters wide so squares look square
const CELL_WIDTH: TermInt = 2;
const FILLED_CELL: &str = "██";
const EMPTY_CELL: &str = "  ";

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    grid: Grid,
    fill: Color,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

/// Cell colours in grid space, plus what the terminal currently shows.
struct Grid {
    block: i32,
    cols: i32,
    rows: i32,
    cells: Vec<Option<Color>>,
    // None means unknown, so the cell is repainted on the next present
    shown: Vec<Option<Option<Color>>>,
}

impl TermManager {
    pub fn new() -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        Ok(TermManager { width, height, stdout, grid: Grid::new(1, 0, 0), fill: Color::Black, current_msg: None })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    /// Undoes `setup`. Takes no manager so it can run from a drop guard.
    pub fn restore() -> crossterm::Result<()> {
        let mut stdout = stdout();
        terminal::disable_raw_mode()?;
        execute!(stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(stdout, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> crossterm::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Grid cells the terminal can show, leaving the last row for status.
    pub fn visible_cells(&self) -> (i32, i32) {
        ((self.width / CELL_WIDTH) as i32, self.height.saturating_sub(1) as i32)
    }

    /// Sizes the back buffer for a `width` x `height` field of `block` units.
    /// Returns false if the field is clipped by the terminal.
    pub fn set_field(&mut self, width: i32, height: i32, block: i32) -> bool {
        let visible = self.visible_cells();
        self.grid = Grid::for_field(width, height, block, visible);
        width / block <= visible.0 && height / block <= visible.1
    }

    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        let center = (self.width / 2, self.height / 2);
        self.show_message_at(center, lines, None)
    }

    pub fn hide_message(&mut self) -> crossterm::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Forget what the box covered so the field underneath is repainted
        let top_left = msg.top_left();
        let first_col = (top_left.0 / CELL_WIDTH) as i32;
        let last_col = ((top_left.0 + msg.width()) / CELL_WIDTH) as i32;
        let rows = top_left.1 as i32..(top_left.1 + msg.height()) as i32;
        self.grid.invalidate(first_col..last_col + 1, rows);

        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                self.print_at_no_save((top_left.0 + x_diff, top_left.1 + y_diff), " ")?;
            }
        }

        self.present()
    }

    /// Replaces the line below the field.
    pub fn print_status(&mut self, text: &str) -> crossterm::Result<()> {
        let row = self.height.saturating_sub(1);
        queue!(self.stdout, cursor::MoveTo(0, row), terminal::Clear(ClearType::CurrentLine), style::Print(text))?;
        self.flush()
    }

    pub fn clear(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.grid.invalidate(0..self.grid.cols, 0..self.grid.rows);
        Ok(())
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_message_at(&mut self, center: Coords, lines: &[&str], color: Option<Color>) -> crossterm::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        if let Some(color) = color {
            queue!(self.stdout, style::SetForegroundColor(term_color(color)))?;
        }

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), " ")?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_at_no_save((top_left.0, y), &padded_line)?;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    fn print_at_no_save(&mut self, pos: Coords, text: &str) -> crossterm::Result<()> {
        // Messages bypass the grid, which keeps what lies underneath them
        if pos.0 < self.width && pos.1 < self.height {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text))?;
        }
        Ok(())
    }
}

impl Surface for TermManager {
    fn set_fill_style(&mut self, color: Color) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let fill = self.fill;
        self.grid.paint(x, y, w, h, Some(fill));
    }

    fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.grid.paint(x, y, w, h, None);
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32) {
        let (col, row) = self.grid.cell_of(x, y);
        let center = ((col.max(0) as TermInt) * CELL_WIDTH, row.max(0) as TermInt);
        let color = self.fill;

        if let Err(err) = self.show_message_at(center, &[text], Some(color)) {
            log::warn!("Could not show message {:?}: {}", text, err);
        }
    }

    fn present(&mut self) -> crossterm::Result<()> {
        let (cols, rows) = self.visible_cells();

        for (col, row, cell) in self.grid.changes(cols, rows) {
            let pos = ((col as TermInt) * CELL_WIDTH, row as TermInt);
            match cell {
                Some(color) => queue!(
                    self.stdout,
                    cursor::MoveTo(pos.0, pos.1),
                    style::SetForegroundColor(term_color(color)),
                    style::Print(FILLED_CELL)
                )?,
                None => queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(EMPTY_CELL))?,
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }
}

fn term_color(color: Color) -> style::Color {
    match color {
        // Black cells would vanish on a dark terminal
        Color::Black => style::Color::DarkGrey,
        Color::Green => style::Color::Green,
        Color::Blue => style::Color::Blue,
        Color::Red => style::Color::Red,
    }
}

impl Grid {
    fn new(block: i32, cols: i32, rows: i32) -> Self {
        let (cols, rows) = (cols.max(0), rows.max(0));
        let len = cols as usize * rows as usize;
        Grid { block, cols, rows, cells: vec![None; len], shown: vec![None; len] }
    }

    /// Grid for a `width` x `height` field, cut down to what the terminal shows.
    fn for_field(width: i32, height: i32, block: i32, visible: (i32, i32)) -> Self {
        let cols = (width / block).min(visible.0);
        let rows = (height / block).min(visible.1);
        Grid::new(block, cols, rows)
    }

    fn cell_of(&self, x: i32, y: i32) -> (i32, i32) {
        (x.div_euclid(self.block), y.div_euclid(self.block))
    }

    /// Cells touched by `[start, start + len)`, clamped to `0..limit`.
    fn span(&self, start: i32, len: i32, limit: i32) -> Range<i32> {
        if len <= 0 {
            return 0..0;
        }
        let first = start.div_euclid(self.block);
        let last = (start + len - 1).div_euclid(self.block);
        first.max(0)..(last + 1).min(limit)
    }

    fn paint(&mut self, x: i32, y: i32, w: i32, h: i32, value: Option<Color>) {
        let cols = self.span(x, w, self.cols);
        let rows = self.span(y, h, self.rows);

        for row in rows {
            for col in cols.clone() {
                let index = self.index(col, row);
                self.cells[index] = value;
            }
        }
    }

    fn invalidate(&mut self, cols: Range<i32>, rows: Range<i32>) {
        let cols = cols.start.max(0)..cols.end.min(self.cols);
        for row in rows.start.max(0)..rows.end.min(self.rows) {
            for col in cols.clone() {
                let index = self.index(col, row);
                self.shown[index] = None;
            }
        }
    }

    /// Cells within `cols` x `rows` whose colour differs from what is shown.
    /// They count as shown once returned.
    fn changes(&mut self, cols: i32, rows: i32) -> Vec<(i32, i32, Option<Color>)> {
        let mut changed = vec![];

        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                let index = self.index(col, row);
                let cell = self.cells[index];
                if self.shown[index] != Some(cell) {
                    self.shown[index] = Some(cell);
                    changed.push((col, row, cell));
                }
            }
        }

        changed
    }

    fn index(&self, col: i32, row: i32) -> usize {
        row as usize * self.cols as usize + col as usize
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_covers_every_touched_cell() {
        let grid = Grid::new(10, 50, 50);
        assert_eq!(grid.span(0, 10, 50), 0..1);
        assert_eq!(grid.span(20, 10, 50), 2..3);
        assert_eq!(grid.span(5, 10, 50), 0..2);
        assert_eq!(grid.span(0, 500, 50), 0..50);
        assert_eq!(grid.span(-15, 30, 50), 0..2);
        assert_eq!(grid.span(490, 30, 50), 49..50);
        assert_eq!(grid.span(40, 0, 50), 0..0);
    }

    #[test]
    fn only_changed_cells_are_repainted() {
        let mut grid = Grid::new(10, 4, 3);

        let first = grid.changes(4, 3);
        assert_eq!(first.len(), 12);
        assert!(first.iter().all(|&(_, _, cell)| cell.is_none()));

        grid.paint(10, 20, 10, 10, Some(Color::Blue));
        assert_eq!(grid.changes(4, 3), vec![(1, 2, Some(Color::Blue))]);
        assert!(grid.changes(4, 3).is_empty());

        grid.paint(0, 0, 40, 30, None);
        assert_eq!(grid.changes(4, 3), vec![(1, 2, None)]);
    }

    #[test]
    fn invalidated_cells_come_back() {
        let mut grid = Grid::new(10, 4, 3);
        grid.paint(0, 0, 10, 10, Some(Color::Green));
        grid.changes(4, 3);

        grid.invalidate(0..2, 0..1);
        assert_eq!(grid.changes(4, 3), vec![(0, 0, Some(Color::Green)), (1, 0, None)]);
    }

    #[test]
    fn clipped_cells_stay_pending() {
        let mut grid = Grid::new(10, 4, 3);
        grid.paint(30, 20, 10, 10, Some(Color::Black));

        let visible = grid.changes(2, 2);
        assert_eq!(visible.len(), 4);
        assert!(grid.changes(4, 3).contains(&(3, 2, Some(Color::Black))));
    }

    #[test]
    fn field_grid_is_cut_to_the_terminal() {
        let grid = Grid::for_field(1_000_000, 1_000_000, 10, (80, 23));
        assert_eq!((grid.cols, grid.rows), (80, 23));
        assert_eq!(grid.cells.len(), 80 * 23);
        assert_eq!(grid.shown.len(), 80 * 23);

        let small = Grid::for_field(300, 200, 10, (80, 23));
        assert_eq!((small.cols, small.rows), (30, 20));

        let empty = Grid::for_field(500, 500, 10, (0, 0));
        assert!(empty.cells.is_empty());
    }

    #[test]
    fn indices_past_i32_do_not_overflow() {
        let grid = Grid { block: 10, cols: 50_000, rows: 50_000, cells: vec![], shown: vec![] };
        assert_eq!(grid.index(49_999, 49_999), 2_499_999_999);
    }

    #[test]
    fn text_positions_map_to_grid_cells() {
        let grid = Grid::new(10, 50, 50);
        assert_eq!(grid.cell_of(250, 250), (25, 25));
        assert_eq!(grid.cell_of(259, 241), (25, 24));
    }

    #[test]
    fn terminal_colours_stay_visible() {
        assert_eq!(term_color(Color::Black), style::Color::DarkGrey);
        assert_eq!(term_color(Color::Red), style::Color::Red);
    }
}
