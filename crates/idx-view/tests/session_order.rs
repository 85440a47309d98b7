use std::collections::HashMap;
use std::time::Duration;

use idx_format::{encode, ImageCollection, Shape};
use idx_view::surface::{Accessory, GridHandle, MemorySurface, Section, Surface, Widget};
use idx_view::{CancelToken, Error, FetchError, Session, Source, ViewerConfig};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// In-memory source whose resources become available after a fixed delay.
#[derive(Default)]
struct DelayedSource {
    resources: HashMap<String, (Duration, Vec<u8>)>,
}

impl DelayedSource {
    fn with(mut self, resource: &str, delay_ms: u64, bytes: Vec<u8>) -> Self {
        self.resources
            .insert(resource.to_string(), (Duration::from_millis(delay_ms), bytes));
        self
    }
}

impl Source for DelayedSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, FetchError> {
        match self.resources.get(resource) {
            Some((delay, bytes)) => {
                tokio::time::sleep(*delay).await;
                Ok(bytes.clone())
            }
            None => Err(FetchError::NotFound {
                resource: resource.to_string(),
            }),
        }
    }
}

fn idx_bytes(count: usize) -> Vec<u8> {
    let pixels = (0..count * 4).map(|k| (k * 7 % 256) as u8).collect();
    encode(&ImageCollection::from_pixels(count, Shape::new(2, 2), pixels).unwrap()).unwrap()
}

fn config() -> ViewerConfig {
    ViewerConfig {
        batch_size: 4,
        batch_delay_ms: 10,
        ..ViewerConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn mismatches_arriving_first_wait_for_the_images() {
    let source = DelayedSource::default()
        .with("test-images", 50, idx_bytes(30))
        .with("incorrect_predictions", 5, b"[[3, 5, 6], [99, 1, 2], [0, 9, 4]]".to_vec());
    let config = config();
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    assert!(output.report.failures.is_empty());
    assert_eq!(output.report.browser_index, Some(0));
    let mismatches = output.report.mismatches.unwrap();
    assert_eq!(mismatches.rendered, 2);
    assert_eq!(mismatches.skipped, vec![99]);
    assert_eq!(
        surface.sections(),
        vec![Section::Browser, Section::Mismatches, Section::Mismatches]
    );
    assert_eq!(output.images.unwrap().len(), 30);
}

#[tokio::test(start_paused = true)]
async fn images_arriving_first_render_the_browser_immediately() {
    let source = DelayedSource::default()
        .with("test-images", 5, idx_bytes(3))
        .with("incorrect_predictions", 50, b"[[2, 0, 1]]".to_vec());
    let config = ViewerConfig {
        start_index: 40,
        ..config()
    };
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    assert_eq!(output.report.browser_index, Some(2));
    assert_eq!(output.browser.unwrap().current_index(), 2);
    assert_eq!(surface.sections(), vec![Section::Browser, Section::Mismatches]);
    let browser = surface.widgets(Section::Browser).next().unwrap();
    assert_eq!(browser.accessory, Accessory::IndexInput { value: 2 });
}

#[tokio::test(start_paused = true)]
async fn failed_image_fetch_leaves_parameters_working() {
    let source = DelayedSource::default()
        .with("incorrect_predictions", 5, b"[[0, 1, 2]]".to_vec())
        .with("parameters", 20, idx_bytes(4));
    let config = ViewerConfig {
        parameters: Some("parameters".to_string()),
        ..config()
    };
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    assert!(output.browser.is_none());
    assert!(output.report.mismatches.is_none());
    assert_eq!(output.report.parameters, Some(4));
    assert_eq!(surface.captions(Section::Parameters), vec!["0", "1", "2", "3"]);
    assert_eq!(output.report.failures.len(), 1);
    assert!(matches!(
        &output.report.failures[0],
        (Section::Browser, Error::Fetch(FetchError::NotFound { resource })) if resource == "test-images"
    ));
}

#[tokio::test(start_paused = true)]
async fn truncated_images_fail_only_their_section() {
    let mut bytes = idx_bytes(5);
    bytes.truncate(bytes.len() - 1);
    let source = DelayedSource::default()
        .with("test-images", 5, bytes)
        .with("incorrect_predictions", 10, b"[[0, 1, 2]]".to_vec());
    let config = config();
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    assert!(output.images.is_none());
    assert_eq!(surface.grid_count(), 0);
    assert!(matches!(
        output.report.failures.as_slice(),
        [(Section::Browser, Error::Decode(_))]
    ));
}

#[tokio::test(start_paused = true)]
async fn malformed_mismatch_list_keeps_the_browser() {
    let source = DelayedSource::default()
        .with("test-images", 5, idx_bytes(2))
        .with("incorrect_predictions", 1, b"{\"index\": 1}".to_vec());
    let config = config();
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    assert!(output.browser.is_some());
    assert!(matches!(
        output.report.failures.as_slice(),
        [(Section::Mismatches, Error::Fetch(FetchError::Malformed { .. }))]
    ));
    assert_eq!(surface.sections(), vec![Section::Browser]);
}

#[tokio::test(start_paused = true)]
async fn large_lists_render_in_batches() {
    let records: Vec<String> = (0..23).map(|i| format!("[{i}, 1, 2]")).collect();
    let json = format!("[{}]", records.join(","));
    let source = DelayedSource::default()
        .with("test-images", 5, idx_bytes(23))
        .with("incorrect_predictions", 5, json.into_bytes());
    let config = config();
    let mut surface = MemorySurface::new();

    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;

    let mismatches = output.report.mismatches.unwrap();
    assert_eq!(mismatches.rendered, 23);
    assert_eq!(mismatches.batches, 6);
    assert_eq!(surface.widgets(Section::Mismatches).count(), 23);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Appended(Section),
    Navigated(usize),
}

/// Records every append and navigation with its offset from `start`.
struct TimelineSurface {
    inner: MemorySurface,
    start: Instant,
    events: Vec<(u128, Event)>,
}

impl TimelineSurface {
    fn new() -> Self {
        Self {
            inner: MemorySurface::new(),
            start: Instant::now(),
            events: Vec::new(),
        }
    }

    fn record(&mut self, event: Event) {
        let ms = (Instant::now() - self.start).as_millis();
        self.events.push((ms, event));
    }

    fn times_of(&self, wanted: Event) -> Vec<u128> {
        self.events
            .iter()
            .filter(|(_, event)| *event == wanted)
            .map(|(ms, _)| *ms)
            .collect()
    }
}

impl Surface for TimelineSurface {
    fn create_grid(&mut self, rows: usize, cols: usize) -> GridHandle {
        self.inner.create_grid(rows, cols)
    }

    fn set_cell_color(&mut self, grid: GridHandle, row: usize, col: usize, color: &str) {
        self.inner.set_cell_color(grid, row, col, color);
    }

    fn append(&mut self, section: Section, widget: Widget) {
        self.inner.append(section, widget);
        self.record(Event::Appended(section));
    }

    fn input_changed(&mut self, grid: GridHandle, value: usize) {
        self.inner.input_changed(grid, value);
        self.record(Event::Navigated(value));
    }
}

#[tokio::test(start_paused = true)]
async fn browser_and_parameters_stay_live_between_batches() {
    let records: Vec<String> = (0..50).map(|i| format!("[{i}, 3, 8]")).collect();
    let source = DelayedSource::default()
        .with("test-images", 5, idx_bytes(60))
        .with("incorrect_predictions", 5, format!("[{}]", records.join(",")).into_bytes())
        .with("parameters", 20, idx_bytes(3));
    let config = ViewerConfig {
        batch_size: 10,
        batch_delay_ms: 100,
        parameters: Some("parameters".to_string()),
        ..ViewerConfig::default()
    };
    let mut surface = TimelineSurface::new();
    let (tx, rx) = mpsc::channel(4);
    let typist = async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        tx.send("7".to_string()).await.unwrap();
        tx.send("seven".to_string()).await.unwrap();
    };

    let session = Session::new(&config);
    let cancel = CancelToken::new();
    let (output, ()) = tokio::join!(
        session.run_with_input(&source, &mut surface, Some(rx), &cancel),
        typist,
    );

    assert_eq!(output.report.navigations, 1);
    assert_eq!(output.browser.unwrap().current_index(), 7);
    assert_eq!(surface.times_of(Event::Navigated(7)), vec![150]);
    assert_eq!(surface.times_of(Event::Appended(Section::Parameters)), vec![20; 3]);

    let batches = surface.times_of(Event::Appended(Section::Mismatches));
    assert_eq!(batches.len(), 50);
    assert_eq!(batches[0], 5);
    assert_eq!(batches[49], 405);
    assert_eq!(batches.iter().filter(|&&ms| ms < 150).count(), 20);
    assert_eq!(output.report.mismatches.unwrap().batches, 5);
}

#[tokio::test(start_paused = true)]
async fn cancelled_session_stops_mismatches_but_keeps_input() {
    let records: Vec<String> = (0..30).map(|i| format!("[{i}, 0, 1]")).collect();
    let source = DelayedSource::default()
        .with("test-images", 1, idx_bytes(30))
        .with("incorrect_predictions", 1, format!("[{}]", records.join(",")).into_bytes());
    let config = ViewerConfig {
        batch_size: 10,
        batch_delay_ms: 100,
        ..ViewerConfig::default()
    };
    let mut surface = MemorySurface::new();
    let cancel = CancelToken::new();
    let (tx, rx) = mpsc::channel(4);
    let quit = {
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send("-3".to_string()).await.unwrap();
            cancel.cancel();
        }
    };

    let session = Session::new(&config);
    let (output, ()) = tokio::join!(
        session.run_with_input(&source, &mut surface, Some(rx), &cancel),
        quit,
    );

    let mismatches = output.report.mismatches.unwrap();
    assert!(mismatches.cancelled);
    assert_eq!(mismatches.rendered, 10);
    assert_eq!(output.report.navigations, 1);
    assert_eq!(output.browser.unwrap().current_index(), 0);
}
