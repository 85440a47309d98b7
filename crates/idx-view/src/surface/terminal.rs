use std::io::{self, Write};

use tracing::warn;

use super::{Accessory, GridHandle, Section, Surface, Widget};
use crate::color::parse_hex;

/// Surface that paints grids as 24-bit ANSI background colors.
///
/// A grid is printed when it is appended and again whenever its index input
/// changes. Write failures are kept and reported by [`TerminalSurface::finish`].
pub struct TerminalSurface<W: Write> {
    out: W,
    grids: Vec<(usize, usize, Vec<[u8; 3]>)>,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            grids: Vec::new(),
            error: None,
        }
    }

    fn print_grid(&mut self, grid: GridHandle) -> io::Result<()> {
        let (rows, cols, cells) = &self.grids[grid.0];
        for row in 0..*rows {
            for [r, g, b] in &cells[row * cols..(row + 1) * cols] {
                write!(self.out, "\x1b[48;2;{r};{g};{b}m  ")?;
            }
            writeln!(self.out, "\x1b[0m")?;
        }
        Ok(())
    }

    fn print_widget(&mut self, section: Section, widget: &Widget) -> io::Result<()> {
        writeln!(self.out, "[{}]", section.name())?;
        self.print_grid(widget.grid)?;
        match &widget.accessory {
            Accessory::None => {}
            Accessory::Caption(caption) => writeln!(self.out, "{}", caption.text)?,
            Accessory::IndexInput { value } => writeln!(self.out, "index: {value}")?,
        }
        self.out.flush()
    }

    fn keep(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if self.error.is_none() {
                warn!(error = %err, "terminal output failed");
                self.error = Some(err);
            }
        }
    }

    /// Returns the first write error, if any, and the writer.
    pub fn finish(mut self) -> io::Result<W> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn create_grid(&mut self, rows: usize, cols: usize) -> GridHandle {
        self.grids.push((rows, cols, vec![[255, 255, 255]; rows * cols]));
        GridHandle(self.grids.len() - 1)
    }

    fn set_cell_color(&mut self, grid: GridHandle, row: usize, col: usize, color: &str) {
        let (_, cols, cells) = &mut self.grids[grid.0];
        if let Some(rgb) = parse_hex(color) {
            cells[row * *cols + col] = rgb;
        }
    }

    fn append(&mut self, section: Section, widget: Widget) {
        let result = self.print_widget(section, &widget);
        self.keep(result);
    }

    fn input_changed(&mut self, grid: GridHandle, value: usize) {
        let result = self.print_grid(grid).and_then(|()| {
            writeln!(self.out, "index: {value}")?;
            self.out.flush()
        });
        self.keep(result);
    }
}
