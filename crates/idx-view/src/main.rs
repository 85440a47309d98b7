//! idx-view command line tool
//!
//! # Commands
//!
//! - `info` - Print the header of an IDX file
//! - `show` - ASCII-art dump of one image
//! - `csv` - Inverted hex CSV of one image
//! - `crop` - Crop a border off every image and write a new IDX file
//! - `html` - Render a data directory into a standalone HTML page
//! - `browse` - Browse a data directory in the terminal

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use idx_buffers::print_octets_at;
use idx_format::{decode, decode_strict, encode, Header, ImageCollection};
use idx_view::surface::{HtmlSurface, TerminalSurface};
use idx_view::{
    ascii_art, csv_row_major, telemetry, CancelToken, DirSource, FetchError, Result, Session,
    SessionReport, ViewerConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Number of body bytes previewed by `info`.
const PREVIEW_BYTES: usize = 16;

/// Browse IDX image datasets and inspect misclassified examples
#[derive(Parser)]
#[command(name = "idx-view")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with viewer settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header of an IDX file
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reject files whose magic or data type is not `00 00 08`
        #[arg(long)]
        strict: bool,
    },
    /// Print one image as ASCII art
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, default_value = "0")]
        index: usize,
    },
    /// Export one image as inverted hex values, one line per row
    Csv {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Remove a border from every image
    ///
    /// Examples:
    ///   idx-view crop data/test-images --border 4
    Crop {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rows and columns removed from each edge
        #[arg(short, long)]
        border: usize,

        /// Output file (`cropped-<name>` next to the input if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render a data directory into an HTML page
    ///
    /// Examples:
    ///   idx-view html data --out report.html --batch-size 25
    Html {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(short, long, default_value = "index.html")]
        out: PathBuf,

        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long)]
        start_index: Option<usize>,

        /// Resource with parameter images shown above the browser
        #[arg(long)]
        parameters: Option<String>,
    },
    /// Browse a data directory in the terminal
    ///
    /// Each line read from stdin moves the browser to that index; `q` quits.
    Browse {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(long)]
        start_index: Option<usize>,

        #[arg(long)]
        batch_size: Option<usize>,
    },
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let resource = path.display().to_string();
    fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FetchError::NotFound { resource }.into()
        } else {
            FetchError::Io { resource, source }.into()
        }
    })
}

fn load_collection(path: &Path) -> Result<ImageCollection> {
    let images = decode(&read_file(path)?)?;
    info!(path = %path.display(), images = images.len(), "decoded image collection");
    Ok(images)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text)?,
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let config = match path {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    Ok(config)
}

fn summarize(report: &SessionReport) -> bool {
    if let Some(mismatches) = &report.mismatches {
        info!(
            rendered = mismatches.rendered,
            skipped = mismatches.skipped.len(),
            batches = mismatches.batches,
            "mismatch rendering finished"
        );
    }
    report.failures.is_empty()
}

fn cmd_info(path: &Path, strict: bool) -> Result<()> {
    let bytes = read_file(path)?;
    let header = Header::parse(&bytes)?;
    if strict {
        decode_strict(&bytes)?;
    }
    let mut out = std::io::stdout().lock();
    writeln!(out, "magic:      {:02x} {:02x}", header.magic[0], header.magic[1])?;
    writeln!(out, "data type:  {}", header.data_type)?;
    writeln!(out, "dimensions: {:?}", header.dimensions)?;
    writeln!(out, "elements:   {}", header.element_count()?)?;
    match header.body_len()? {
        Some(len) => writeln!(out, "body size:  {len} bytes")?,
        None => writeln!(out, "body size:  unknown element width")?,
    }
    writeln!(out, "size:       {} bytes (header {})", bytes.len(), header.byte_len())?;
    writeln!(
        out,
        "body:       {}",
        print_octets_at(&bytes, header.byte_len(), PREVIEW_BYTES)
    )?;
    Ok(())
}

fn cmd_crop(path: &Path, border: usize, out: Option<PathBuf>) -> Result<()> {
    let cropped = load_collection(path)?.crop_borders(border)?;
    let out = out.unwrap_or_else(|| {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("cropped-{name}"))
    });
    fs::write(&out, encode(&cropped)?)?;
    info!(out = %out.display(), images = cropped.len(), "wrote cropped collection");
    Ok(())
}

async fn cmd_html(dir: PathBuf, out: PathBuf, config: ViewerConfig) -> Result<bool> {
    let source = DirSource::new(dir);
    let mut surface = HtmlSurface::new(format!("idx-view: {}", source.root().display()));
    let output = Session::new(&config)
        .run(&source, &mut surface, &CancelToken::new())
        .await;
    fs::write(&out, surface.render())?;
    info!(out = %out.display(), "wrote page");
    Ok(summarize(&output.report))
}

/// Forwards stdin lines to the session until `q` or end of input, then
/// stops any mismatch rendering still in progress.
async fn forward_stdin(tx: mpsc::Sender<String>, cancel: &CancelToken) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result: Result<()> = loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim() == "q" => break Ok(()),
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break Ok(());
                }
            }
            Ok(None) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    };
    cancel.cancel();
    result
}

async fn cmd_browse(dir: PathBuf, config: ViewerConfig) -> Result<bool> {
    let source = DirSource::new(dir);
    let mut surface = TerminalSurface::new(std::io::stdout());
    let cancel = CancelToken::new();
    let (tx, rx) = mpsc::channel(16);
    let session = Session::new(&config);

    let (output, input) = tokio::join!(
        session.run_with_input(&source, &mut surface, Some(rx), &cancel),
        forward_stdin(tx, &cancel),
    );
    input?;
    info!(navigations = output.report.navigations, "browse session closed");
    let ok = summarize(&output.report);
    surface.finish()?;
    Ok(ok)
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Info { file, strict } => cmd_info(&file, strict).map(|()| true),
        Commands::Show { file, index } => {
            let images = load_collection(&file)?;
            write_output(None, &ascii_art(images.get(index)?))?;
            Ok(true)
        }
        Commands::Csv { file, index, out } => {
            let images = load_collection(&file)?;
            write_output(out.as_deref(), &csv_row_major(images.get(index)?))?;
            Ok(true)
        }
        Commands::Crop { file, border, out } => cmd_crop(&file, border, out).map(|()| true),
        Commands::Html {
            dir,
            out,
            batch_size,
            start_index,
            parameters,
        } => {
            config.batch_size = batch_size.unwrap_or(config.batch_size);
            config.start_index = start_index.unwrap_or(config.start_index);
            config.parameters = parameters.or(config.parameters);
            config.validate()?;
            runtime()?.block_on(cmd_html(dir, out, config))
        }
        Commands::Browse {
            dir,
            start_index,
            batch_size,
        } => {
            config.batch_size = batch_size.unwrap_or(config.batch_size);
            config.start_index = start_index.unwrap_or(config.start_index);
            config.validate()?;
            runtime()?.block_on(cmd_browse(dir, config))
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = telemetry::init_tracing(&cli.log_level) {
        eprintln!("{err}");
    }
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("some sections failed to load");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "idx-view failed");
            ExitCode::FAILURE
        }
    }
}
