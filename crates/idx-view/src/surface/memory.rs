use super::{Accessory, GridHandle, Section, Surface, Widget};

/// Cells of one grid, row-major. `None` until painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Option<String>>,
}

impl GridState {
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells[row * self.cols + col].as_deref()
    }
}

/// Surface that only records what was drawn.
#[derive(Debug, Default)]
pub struct MemorySurface {
    grids: Vec<GridState>,
    widgets: Vec<(Section, Widget)>,
    input_changes: Vec<(GridHandle, usize)>,
    paints: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self, handle: GridHandle) -> &GridState {
        &self.grids[handle.0]
    }

    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    pub fn widgets(&self, section: Section) -> impl Iterator<Item = &Widget> + '_ {
        self.widgets
            .iter()
            .filter(move |(s, _)| *s == section)
            .map(|(_, widget)| widget)
    }

    /// Caption texts of a section, in append order.
    pub fn captions(&self, section: Section) -> Vec<&str> {
        self.widgets(section)
            .filter_map(|widget| match &widget.accessory {
                Accessory::Caption(caption) => Some(caption.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Section of every appended widget, in append order.
    pub fn sections(&self) -> Vec<Section> {
        self.widgets.iter().map(|(section, _)| *section).collect()
    }

    pub fn input_changes(&self) -> &[(GridHandle, usize)] {
        &self.input_changes
    }

    /// Total number of `set_cell_color` calls.
    pub fn paints(&self) -> usize {
        self.paints
    }
}

impl Surface for MemorySurface {
    fn create_grid(&mut self, rows: usize, cols: usize) -> GridHandle {
        self.grids.push(GridState {
            rows,
            cols,
            cells: vec![None; rows * cols],
        });
        GridHandle(self.grids.len() - 1)
    }

    fn set_cell_color(&mut self, grid: GridHandle, row: usize, col: usize, color: &str) {
        let state = &mut self.grids[grid.0];
        state.cells[row * state.cols + col] = Some(color.to_string());
        self.paints += 1;
    }

    fn append(&mut self, section: Section, widget: Widget) {
        self.widgets.push((section, widget));
    }

    fn input_changed(&mut self, grid: GridHandle, value: usize) {
        self.input_changes.push((grid, value));
    }
}
