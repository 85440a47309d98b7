//! Batch comparison renderer.
//!
//! Renders every mismatch record as a captioned static viewer, `batch_size`
//! records at a time, and gives control back to the runtime between batches
//! so input handling on the same thread is never blocked for longer than one
//! batch. Records keep their input order. A record whose image index is out
//! of range is skipped and the run continues; the skips are logged once at
//! the end of the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idx_format::ImageCollection;
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::error::RenderError;
use crate::mismatch::MismatchRecord;
use crate::surface::{Section, Surface};
use crate::viewer::StaticViewer;

/// Shared flag that stops a batch render at the next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one pass over a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: usize,
    /// Image indices of the records that were skipped, in input order.
    pub skipped: Vec<usize>,
    pub batches: usize,
    pub cancelled: bool,
}

/// Clears the running flag when a pass finishes or is dropped.
#[derive(Debug)]
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, RenderError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RenderError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct BatchRenderer {
    batch_size: usize,
    delay: Duration,
    running: AtomicBool,
}

impl BatchRenderer {
    /// A renderer that draws `batch_size` records per turn, pausing `delay`
    /// in between. A zero `batch_size` is treated as 1.
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay,
            running: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.batch_size, config.batch_delay())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pause between two batches.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Claims the renderer for one pass over a record list.
    ///
    /// The caller drives the pass with [`BatchRun::render_batch`] and decides
    /// what runs between batches. Fails while another pass is in progress.
    pub fn start(&self) -> Result<BatchRun<'_>, RenderError> {
        let guard = RunGuard::acquire(&self.running)?;
        Ok(BatchRun {
            batch_size: self.batch_size,
            _guard: guard,
            cursor: 0,
            report: RenderReport::default(),
        })
    }

    /// Appends one captioned viewer per valid record to the mismatch section,
    /// pausing between batches.
    pub async fn render_all<S: Surface + ?Sized>(
        &self,
        records: &[MismatchRecord],
        images: &ImageCollection,
        surface: &mut S,
        cancel: &CancelToken,
    ) -> Result<RenderReport, RenderError> {
        let mut run = self.start()?;
        while run.render_batch(records, images, surface) {
            self.pause().await;
            if cancel.is_cancelled() {
                return Ok(run.cancelled());
            }
        }
        Ok(run.finish())
    }
}

/// One pass of a [`BatchRenderer`] over a record list.
///
/// Holds the renderer until it is finished or dropped.
#[derive(Debug)]
pub struct BatchRun<'r> {
    batch_size: usize,
    _guard: RunGuard<'r>,
    cursor: usize,
    report: RenderReport,
}

impl BatchRun<'_> {
    /// Position of the next record to render.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Renders the next batch of `records`. Returns `true` while records
    /// remain.
    pub fn render_batch<S: Surface + ?Sized>(
        &mut self,
        records: &[MismatchRecord],
        images: &ImageCollection,
        surface: &mut S,
    ) -> bool {
        let end = records.len().min(self.cursor.saturating_add(self.batch_size));
        for record in records.get(self.cursor..end).unwrap_or_default() {
            let caption = Some(record.caption());
            match StaticViewer::render(surface, images, record.image_index, Section::Mismatches, caption) {
                Ok(_) => self.report.rendered += 1,
                Err(_) => self.report.skipped.push(record.image_index),
            }
        }
        if end > self.cursor {
            self.cursor = end;
            self.report.batches += 1;
            debug!(batch = self.report.batches, cursor = end, total = records.len(), "rendered mismatch batch");
        }
        self.cursor < records.len()
    }

    /// Stops the pass early.
    pub fn cancelled(mut self) -> RenderReport {
        self.report.cancelled = true;
        debug!(cursor = self.cursor, "mismatch rendering cancelled");
        self.finish()
    }

    /// Releases the renderer and reports what was drawn.
    pub fn finish(self) -> RenderReport {
        if let Some(&first) = self.report.skipped.first() {
            warn!(
                count = self.report.skipped.len(),
                first_index = first,
                "skipped mismatch records with out-of-range image indices"
            );
        }
        self.report
    }
}

impl Default for BatchRenderer {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use idx_format::Shape;

    fn images(count: usize) -> ImageCollection {
        let pixels = (0..count).map(|k| k as u8).collect();
        ImageCollection::from_pixels(count, Shape::new(1, 1), pixels).unwrap()
    }

    fn records(indices: impl IntoIterator<Item = usize>) -> Vec<MismatchRecord> {
        indices
            .into_iter()
            .map(|i| MismatchRecord::new(i, (i % 10) as u64, ((i + 1) % 10) as u64))
            .collect()
    }

    #[tokio::test]
    async fn renders_partial_last_batch() {
        let renderer = BatchRenderer::new(10, Duration::ZERO);
        let mut surface = MemorySurface::new();
        let report = renderer
            .render_all(&records(0..23), &images(30), &mut surface, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(report.rendered, 23);
        assert_eq!(report.batches, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(surface.widgets(Section::Mismatches).count(), 23);
        assert!(!renderer.is_running());
    }

    #[tokio::test]
    async fn one_past_the_end_is_skipped() {
        let renderer = BatchRenderer::new(2, Duration::ZERO);
        let mut surface = MemorySurface::new();
        let list = records([0, 5, 1, 2]);
        let report = renderer
            .render_all(&list, &images(5), &mut surface, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(report.rendered, 3);
        assert_eq!(report.skipped, vec![5]);
        assert_eq!(
            surface.captions(Section::Mismatches),
            vec!["predicted: 1\nactual:    0", "predicted: 2\nactual:    1", "predicted: 3\nactual:    2"]
        );
    }

    #[tokio::test]
    async fn empty_list_renders_nothing() {
        let renderer = BatchRenderer::default();
        let mut surface = MemorySurface::new();
        let report = renderer
            .render_all(&[], &images(1), &mut surface, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(report, RenderReport::default());
    }

    #[test]
    fn stepped_pass_holds_the_renderer() {
        let renderer = BatchRenderer::new(4, Duration::ZERO);
        let list = records(0..10);
        let collection = images(10);
        let mut surface = MemorySurface::new();

        let mut run = renderer.start().unwrap();
        assert_eq!(renderer.start().unwrap_err(), RenderError::AlreadyRunning);
        assert!(run.render_batch(&list, &collection, &mut surface));
        assert_eq!(run.cursor(), 4);
        assert!(run.render_batch(&list, &collection, &mut surface));
        assert!(!run.render_batch(&list, &collection, &mut surface));
        let report = run.finish();
        assert_eq!((report.rendered, report.batches), (10, 3));
        assert!(!renderer.is_running());

        let dropped = renderer.start().unwrap();
        drop(dropped);
        assert!(renderer.start().is_ok());
    }

    #[test]
    fn zero_batch_size_becomes_one() {
        assert_eq!(BatchRenderer::new(0, Duration::ZERO).batch_size(), 1);
    }
}
