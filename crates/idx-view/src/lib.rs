//! Viewer for IDX image datasets.
//!
//! Decoded collections are painted onto a [`Surface`](surface::Surface) as
//! grids of gray cells. A navigable browser shows one image at a time, and
//! misclassified examples from a JSON list are rendered in batches that yield
//! to the runtime in between, so input handling stays responsive while
//! thousands of records are drawn.
//!
//! ```
//! use idx_format::{ImageCollection, Shape};
//! use idx_view::surface::{MemorySurface, Section};
//! use idx_view::viewer::DynamicViewer;
//! use std::sync::Arc;
//!
//! let images = Arc::new(ImageCollection::from_pixels(3, Shape::new(1, 2), vec![0; 6]).unwrap());
//! let mut surface = MemorySurface::new();
//! let mut browser = DynamicViewer::render(&mut surface, images, 0).unwrap();
//! browser.navigate(&mut surface, "17");
//! assert_eq!(browser.current_index(), 2);
//! assert_eq!(surface.widgets(Section::Browser).count(), 1);
//! ```

pub mod batch;
pub mod color;
pub mod config;
pub mod error;
pub mod mismatch;
pub mod session;
pub mod source;
pub mod surface;
pub mod telemetry;
pub mod text;
pub mod viewer;

pub use batch::{BatchRenderer, CancelToken, RenderReport};
pub use color::color_for;
pub use config::ViewerConfig;
pub use error::{ConfigError, Error, FetchError, RenderError, Result};
pub use mismatch::{parse_mismatches, MismatchRecord};
pub use session::{Session, SessionOutput, SessionReport};
pub use source::{DirSource, Source};
pub use text::{ascii_art, csv_row_major};
pub use viewer::{DynamicViewer, Navigation, StaticViewer};
