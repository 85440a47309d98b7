//! Grid surfaces the viewers paint on.
//!
//! A surface owns grids of colored cells and places them, together with a
//! caption or a numeric index input, into one of the page sections.

mod html;
mod memory;
mod terminal;

pub use html::HtmlSurface;
pub use memory::{GridState, MemorySurface};
pub use terminal::TerminalSurface;

/// Opaque reference to a grid created by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridHandle(pub usize);

/// Page area a widget is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Parameters,
    Browser,
    Mismatches,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Parameters, Section::Browser, Section::Mismatches];

    pub fn name(self) -> &'static str {
        match self {
            Section::Parameters => "parameters",
            Section::Browser => "browser",
            Section::Mismatches => "mismatches",
        }
    }
}

/// Text shown under a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    /// Keep whitespace and line breaks as written.
    pub preformatted: bool,
}

impl Caption {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preformatted: false,
        }
    }

    pub fn preformatted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preformatted: true,
        }
    }
}

/// What accompanies a grid inside its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessory {
    None,
    Caption(Caption),
    /// Numeric input holding the index currently shown.
    IndexInput { value: usize },
}

/// A grid plus its accessory, appended as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub grid: GridHandle,
    pub accessory: Accessory,
}

pub trait Surface {
    /// Creates a `rows x cols` grid. Its shape is fixed for its lifetime.
    fn create_grid(&mut self, rows: usize, cols: usize) -> GridHandle;

    fn set_cell_color(&mut self, grid: GridHandle, row: usize, col: usize, color: &str);

    fn append(&mut self, section: Section, widget: Widget);

    /// Called after a navigable grid was repainted for a new index.
    fn input_changed(&mut self, _grid: GridHandle, _value: usize) {}
}
