//! Single image viewers.
//!
//! A [`StaticViewer`] shows one fixed image with an optional caption. A
//! [`DynamicViewer`] shows one image of a collection at a time next to a
//! numeric input; each navigation event clamps the requested index into
//! range and repaints the same grid.

use std::sync::Arc;

use idx_format::{Image, ImageCollection, LookupError};
use tracing::debug;

use crate::color::color_for;
use crate::surface::{Accessory, Caption, GridHandle, Section, Surface, Widget};

/// Paints every cell of `grid` from `image`.
pub fn paint<S: Surface + ?Sized>(surface: &mut S, grid: GridHandle, image: Image<'_>) {
    for (i, row) in image.rows_iter().enumerate() {
        for (j, &pixel) in row.iter().enumerate() {
            surface.set_cell_color(grid, i, j, &color_for(pixel));
        }
    }
}

fn create_painted<S: Surface + ?Sized>(surface: &mut S, image: Image<'_>) -> GridHandle {
    let grid = surface.create_grid(image.rows(), image.cols());
    paint(surface, grid, image);
    grid
}

/// Viewer bound to one index for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticViewer {
    grid: GridHandle,
    index: usize,
}

impl StaticViewer {
    /// Paints `images[index]` and appends it to `section` with `caption`.
    pub fn render<S: Surface + ?Sized>(
        surface: &mut S,
        images: &ImageCollection,
        index: usize,
        section: Section,
        caption: Option<Caption>,
    ) -> Result<Self, LookupError> {
        let image = images.get(index)?;
        let grid = create_painted(surface, image);
        let accessory = caption.map_or(Accessory::None, Accessory::Caption);
        surface.append(section, Widget { grid, accessory });
        Ok(Self { grid, index })
    }

    pub fn grid(&self) -> GridHandle {
        self.grid
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Outcome of one navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The viewer now shows `index`; `clamped` when the request was out of range.
    Moved { index: usize, clamped: bool },
    /// Input was not an integer; nothing changed.
    Ignored,
}

/// Parses navigation input as a strict integer.
///
/// Surrounding whitespace is allowed; anything else that is not an `i64`
/// (including fractions and empty input) is rejected.
pub fn parse_navigation(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Navigable viewer over a whole collection.
#[derive(Debug, Clone)]
pub struct DynamicViewer {
    images: Arc<ImageCollection>,
    grid: GridHandle,
    current_index: usize,
}

impl DynamicViewer {
    /// Paints `images[start_index]` and appends it with an index input.
    pub fn render<S: Surface + ?Sized>(
        surface: &mut S,
        images: Arc<ImageCollection>,
        start_index: usize,
    ) -> Result<Self, LookupError> {
        let grid = create_painted(surface, images.get(start_index)?);
        surface.append(
            Section::Browser,
            Widget {
                grid,
                accessory: Accessory::IndexInput { value: start_index },
            },
        );
        Ok(Self {
            images,
            grid,
            current_index: start_index,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn grid(&self) -> GridHandle {
        self.grid
    }

    pub fn images(&self) -> &Arc<ImageCollection> {
        &self.images
    }

    /// Handles one input-change event carrying raw text.
    pub fn navigate<S: Surface + ?Sized>(&mut self, surface: &mut S, input: &str) -> Navigation {
        match parse_navigation(input) {
            Some(candidate) => self.go_to(surface, candidate),
            None => {
                debug!(input, "ignoring non-numeric navigation input");
                Navigation::Ignored
            }
        }
    }

    /// Moves to `candidate`, clamped into `[0, len - 1]`, and repaints.
    pub fn go_to<S: Surface + ?Sized>(&mut self, surface: &mut S, candidate: i64) -> Navigation {
        let Some(index) = self.images.clamp_index(candidate) else {
            return Navigation::Ignored;
        };
        let Some(image) = self.images.image(index) else {
            return Navigation::Ignored;
        };
        paint(surface, self.grid, image);
        self.current_index = index;
        surface.input_changed(self.grid, index);
        Navigation::Moved {
            index,
            clamped: i64::try_from(index).map_or(true, |i| i != candidate),
        }
    }
}
