//! One page load: fetch, decode, then render each section as its data lands.
//!
//! The image, mismatch and parameter fetches run concurrently on the current
//! task and may complete in any order. The browser is painted as soon as the
//! images are decoded. Mismatch records that arrive before the images are
//! held until the collection exists, so the batch renderer never runs
//! without it. A failed fetch or decode only affects its own section.
//!
//! Mismatches are drawn one batch per turn of the session loop. Between two
//! batches the loop keeps polling the pending fetches and the navigation
//! input, so the browser stays usable while a long list is rendered.

use std::sync::Arc;

use idx_format::ImageCollection;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::batch::{BatchRenderer, BatchRun, CancelToken, RenderReport};
use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::mismatch::{load_mismatches, MismatchRecord};
use crate::source::Source;
use crate::surface::{Caption, Section, Surface};
use crate::viewer::{DynamicViewer, Navigation, StaticViewer};

/// What one session rendered, and what failed.
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Index the browser opened at, if it was rendered.
    pub browser_index: Option<usize>,
    pub mismatches: Option<RenderReport>,
    /// Number of parameter images rendered.
    pub parameters: Option<usize>,
    /// Navigation events applied to the browser.
    pub navigations: usize,
    pub failures: Vec<(Section, Error)>,
}

impl SessionReport {
    fn fail(&mut self, section: Section, err: Error) {
        error!(section = section.name(), error = %err, "section failed to load");
        self.failures.push((section, err));
    }
}

/// Result of [`Session::run`].
#[derive(Debug)]
pub struct SessionOutput {
    pub images: Option<Arc<ImageCollection>>,
    pub browser: Option<DynamicViewer>,
    pub report: SessionReport,
}

pub struct Session<'c> {
    config: &'c ViewerConfig,
    renderer: BatchRenderer,
}

/// A mismatch pass in progress, with everything it reads.
struct ActiveBatch<'r> {
    run: BatchRun<'r>,
    records: Vec<MismatchRecord>,
    images: Arc<ImageCollection>,
}

async fn fetch_collection<Src: Source>(source: &Src, resource: &str) -> Result<ImageCollection> {
    let bytes = source.fetch(resource).await?;
    let images = idx_format::decode(&bytes)?;
    info!(resource, images = images.len(), "decoded image collection");
    Ok(images)
}

/// Next navigation line, or never when there is no input.
async fn next_input(input: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match input {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl<'c> Session<'c> {
    pub fn new(config: &'c ViewerConfig) -> Self {
        Self {
            config,
            renderer: BatchRenderer::from_config(config),
        }
    }

    fn render_browser<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        images: &Arc<ImageCollection>,
        report: &mut SessionReport,
    ) -> Option<DynamicViewer> {
        let start = i64::try_from(self.config.start_index).unwrap_or(i64::MAX);
        let Some(index) = images.clamp_index(start) else {
            warn!("image collection is empty, nothing to browse");
            return None;
        };
        match DynamicViewer::render(surface, Arc::clone(images), index) {
            Ok(viewer) => {
                report.browser_index = Some(index);
                Some(viewer)
            }
            Err(err) => {
                report.fail(Section::Browser, err.into());
                None
            }
        }
    }

    fn render_parameters<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        parameters: &ImageCollection,
    ) -> usize {
        let mut rendered = 0;
        for index in 0..parameters.len() {
            let caption = Some(Caption::plain(index.to_string()));
            if StaticViewer::render(surface, parameters, index, Section::Parameters, caption).is_ok() {
                rendered += 1;
            }
        }
        rendered
    }

    /// Claims the renderer and draws the first batch right away.
    fn start_batch<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        records: Vec<MismatchRecord>,
        images: Arc<ImageCollection>,
        report: &mut SessionReport,
    ) -> Option<ActiveBatch<'_>> {
        let run = match self.renderer.start() {
            Ok(run) => run,
            Err(err) => {
                report.fail(Section::Mismatches, err.into());
                return None;
            }
        };
        info!(records = records.len(), "rendering mismatches");
        self.step_batch(
            surface,
            ActiveBatch {
                run,
                records,
                images,
            },
            report,
        )
    }

    /// Draws one batch. Returns the pass while records remain.
    fn step_batch<'r, S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        mut batch: ActiveBatch<'r>,
        report: &mut SessionReport,
    ) -> Option<ActiveBatch<'r>> {
        if batch.run.render_batch(&batch.records, &batch.images, surface) {
            return Some(batch);
        }
        report.mismatches = Some(batch.run.finish());
        None
    }

    /// Runs the load against `source`, painting onto `surface`.
    pub async fn run<Src: Source, S: Surface + ?Sized>(
        &self,
        source: &Src,
        surface: &mut S,
        cancel: &CancelToken,
    ) -> SessionOutput {
        self.run_with_input(source, surface, None, cancel).await
    }

    /// Like [`Session::run`], and also applies every line received on
    /// `input` to the browser as a navigation event.
    ///
    /// Returns once every section has settled and `input` is closed.
    pub async fn run_with_input<Src: Source, S: Surface + ?Sized>(
        &self,
        source: &Src,
        surface: &mut S,
        mut input: Option<mpsc::Receiver<String>>,
        cancel: &CancelToken,
    ) -> SessionOutput {
        let config = self.config;
        let mut report = SessionReport::default();
        let mut images: Option<Arc<ImageCollection>> = None;
        let mut browser: Option<DynamicViewer> = None;
        let mut pending: Option<Vec<MismatchRecord>> = None;
        let mut active: Option<ActiveBatch<'_>> = None;

        let images_fut = fetch_collection(source, &config.images);
        let mismatches_fut = load_mismatches(source, &config.mismatches);
        let parameters_fut = async {
            match &config.parameters {
                Some(resource) => Some(fetch_collection(source, resource).await),
                None => None,
            }
        };
        let pause = tokio::time::sleep(self.renderer.delay());
        tokio::pin!(images_fut, mismatches_fut, parameters_fut, pause);
        let (mut images_done, mut mismatches_done, mut parameters_done) = (false, false, false);

        loop {
            let mut drew_batch = false;
            tokio::select! {
                result = &mut images_fut, if !images_done => {
                    images_done = true;
                    match result {
                        Ok(collection) => {
                            let collection = Arc::new(collection);
                            browser = self.render_browser(surface, &collection, &mut report);
                            if let Some(records) = pending.take() {
                                active = self.start_batch(surface, records, Arc::clone(&collection), &mut report);
                                drew_batch = true;
                            }
                            images = Some(collection);
                        }
                        Err(err) => {
                            report.fail(Section::Browser, err);
                            if pending.take().is_some() {
                                warn!("dropping mismatch records: no image collection to look them up in");
                            }
                        }
                    }
                }
                result = &mut mismatches_fut, if !mismatches_done => {
                    mismatches_done = true;
                    match result {
                        Ok(records) => match &images {
                            Some(collection) => {
                                active = self.start_batch(surface, records, Arc::clone(collection), &mut report);
                                drew_batch = true;
                            }
                            None if !images_done => pending = Some(records),
                            None => warn!("dropping mismatch records: no image collection to look them up in"),
                        },
                        Err(err) => report.fail(Section::Mismatches, err.into()),
                    }
                }
                result = &mut parameters_fut, if !parameters_done => {
                    parameters_done = true;
                    match result {
                        Some(Ok(parameters)) => {
                            report.parameters = Some(self.render_parameters(surface, &parameters));
                        }
                        Some(Err(err)) => report.fail(Section::Parameters, err),
                        None => {}
                    }
                }
                line = next_input(&mut input), if input.is_some() => match line {
                    Some(line) => match browser.as_mut() {
                        Some(viewer) => {
                            if viewer.navigate(surface, &line) == Navigation::Ignored {
                                warn!(input = %line, "expected an image index");
                            } else {
                                report.navigations += 1;
                            }
                        }
                        None => debug!(input = %line, "browser not ready, dropping navigation input"),
                    },
                    None => input = None,
                },
                () = &mut pause, if active.is_some() => {
                    if let Some(batch) = active.take() {
                        if cancel.is_cancelled() {
                            report.mismatches = Some(batch.run.cancelled());
                        } else {
                            active = self.step_batch(surface, batch, &mut report);
                            drew_batch = true;
                        }
                    }
                }
                else => break,
            }

            if drew_batch && active.is_some() {
                pause.as_mut().reset(Instant::now() + self.renderer.delay());
            }
        }

        SessionOutput {
            images,
            browser,
            report,
        }
    }
}
