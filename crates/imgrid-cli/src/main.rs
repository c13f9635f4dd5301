//! imgrid-cli: Render a directory of labeled images as an imgrid widget.
//!
//! Walks a dataset directory laid out one folder per class
//! (`root/<label>/<image>`), labels each image by its parent folder, and
//! renders a grid, class tabs or class representatives. Output goes to
//! stdout in the evcxr display protocol, or to a standalone HTML file.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin imgrid-cli -- [OPTIONS] <DIR>
//! cargo run --bin imgrid-cli -- data/pets --mode tabs --output pets.html
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use imgrid::{
    DisplaySink, EvcxrSink, HtmlFileSink, ImageBatch, ImageRef, Label, LabeledCollection,
    PlotConfig, RenderError, Renderer, ResizeFilter, SequentialIds,
};
use walkdir::WalkDir;

/// File extensions picked up when walking the dataset directory.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Render a directory of labeled images as an HTML image grid.
///
/// Each image is labeled with the name of the folder that contains it.
#[derive(Parser)]
#[command(name = "imgrid-cli", version)]
struct Cli {
    /// Dataset directory (one sub-folder per label).
    dir: PathBuf,

    /// Widget to render.
    #[arg(long, value_enum, default_value_t = Mode::Grid)]
    mode: Mode,

    /// Write a standalone HTML document here instead of evcxr output on
    /// stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Label to leave out (representatives mode). Repeatable.
    #[arg(long = "ignore-label")]
    ignore_labels: Vec<String>,

    /// Labels to show, in this order (tabs and representatives modes).
    /// Repeatable. Unlisted labels are left out.
    #[arg(long = "order")]
    order: Vec<String>,

    /// Tile width in pixels.
    #[arg(long, default_value_t = PlotConfig::DEFAULT_IMG_WIDTH, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    img_width: u32,

    /// Scale applied to a tile when clicked.
    #[arg(long, default_value_t = PlotConfig::DEFAULT_ZOOM_SCALE)]
    zoom_scale: f64,

    /// Hide the path caption under each image.
    #[arg(long)]
    no_url: bool,

    /// Embed images as base64 instead of linking their paths.
    #[arg(long)]
    force_b64: bool,

    /// Downscale embedded images to the tile width.
    #[arg(long)]
    resize_image: bool,

    /// Resampling filter for --resize-image.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    resize_filter: Filter,

    /// Do not show the collapsible HTML source viewer.
    #[arg(long)]
    no_html_viewer: bool,

    /// Most images in grid mode.
    #[arg(long, default_value_t = PlotConfig::DEFAULT_MAX_IMAGES)]
    max_images: usize,

    /// Most images per tab in tabs mode.
    #[arg(long, default_value_t = PlotConfig::DEFAULT_MAX_IMGS_PER_TAB)]
    max_imgs_per_tab: usize,

    /// Full plot config as a JSON string.
    ///
    /// When provided, all other display flags are ignored. Missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Use deterministic element ids (for diffable output).
    #[arg(long)]
    sequential_ids: bool,
}

/// Widget selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// All images in one zoomable grid.
    Grid,
    /// One tab per label.
    Tabs,
    /// One image per label.
    Representatives,
}

/// Resampling filter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Maps an [`imgrid::ResizeFilter`] to the local CLI [`Filter`] enum.
const fn filter_from_config(f: ResizeFilter) -> Filter {
    match f {
        ResizeFilter::Nearest => Filter::Nearest,
        ResizeFilter::Triangle => Filter::Triangle,
        ResizeFilter::CatmullRom => Filter::CatmullRom,
        ResizeFilter::Gaussian => Filter::Gaussian,
        ResizeFilter::Lanczos3 => Filter::Lanczos3,
    }
}

/// The CLI default filter, derived from [`PlotConfig::DEFAULT_RESIZE_FILTER`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_config(PlotConfig::DEFAULT_RESIZE_FILTER);

/// Build a [`PlotConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual display flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<PlotConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(PlotConfig {
        img_width: cli.img_width,
        zoom_scale: cli.zoom_scale,
        show_url: !cli.no_url,
        force_b64: cli.force_b64,
        resize_image: cli.resize_image,
        resize_filter: match cli.resize_filter {
            Filter::Nearest => ResizeFilter::Nearest,
            Filter::Triangle => ResizeFilter::Triangle,
            Filter::CatmullRom => ResizeFilter::CatmullRom,
            Filter::Gaussian => ResizeFilter::Gaussian,
            Filter::Lanczos3 => ResizeFilter::Lanczos3,
        },
        show_html_viewer: !cli.no_html_viewer,
        max_images: cli.max_images,
        max_imgs_per_tab: cli.max_imgs_per_tab,
    })
}

/// Parse a label given on the command line or taken from a folder name.
///
/// Canonical integers become [`Label::Int`] so numeric class folders
/// sort numerically; everything else is text. `01` and `+1` stay text so
/// they do not merge with folder `1`.
fn parse_label(s: &str) -> Label {
    match s.parse::<i64>() {
        Ok(n) if n.to_string() == s => Label::Int(n),
        _ => Label::Text(s.to_owned()),
    }
}

/// Label for an image: the name of its parent folder.
fn label_for(path: &Path) -> Label {
    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_label(&parent)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Walk `root` in file-name order and pair every image with its label.
fn collect_dataset(root: &Path) -> Result<LabeledCollection<ImageRef>, String> {
    let mut images = Vec::new();
    let mut labels = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("Error walking {}: {e}", root.display()))?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            labels.push(label_for(entry.path()));
            images.push(ImageRef::from(entry.path().to_string_lossy().into_owned()));
        }
    }

    LabeledCollection::new(images, labels).map_err(|e| e.to_string())
}

fn labels_arg(values: &[String]) -> Option<Vec<Label>> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|v| parse_label(v)).collect())
    }
}

/// Label-selection flags that were given but are unused by the mode.
fn ineffective_flags(cli: &Cli) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if !cli.ignore_labels.is_empty() && cli.mode != Mode::Representatives {
        flags.push("--ignore-label");
    }
    if !cli.order.is_empty() && cli.mode == Mode::Grid {
        flags.push("--order");
    }
    flags
}

fn render(
    cli: &Cli,
    renderer: &mut Renderer,
    sink: &mut dyn DisplaySink,
    dataset: &LabeledCollection<ImageRef>,
) -> Result<(), RenderError> {
    let order = labels_arg(&cli.order);
    let ignore = labels_arg(&cli.ignore_labels);
    for flag in ineffective_flags(cli) {
        tracing::warn!(flag, mode = ?cli.mode, "flag has no effect in this mode");
    }

    match cli.mode {
        Mode::Grid => {
            let batch = ImageBatch::from_refs(dataset.items().to_vec());
            renderer.plot_images(sink, &batch, Some(dataset.labels()), None)
        }
        Mode::Tabs => renderer.plot_class_tabs(sink, dataset, order.as_deref()),
        Mode::Representatives => renderer.plot_class_representations(
            sink,
            dataset,
            ignore.as_deref(),
            order.as_deref(),
        ),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let dataset = match collect_dataset(&cli.dir) {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        dir = %cli.dir.display(),
        images = dataset.len(),
        mode = ?cli.mode,
        "collected dataset"
    );

    let mut renderer = Renderer::new(config);
    if cli.sequential_ids {
        renderer = renderer.with_ids(SequentialIds::default());
    }

    let result = match cli.output {
        Some(ref path) => {
            let mut sink = HtmlFileSink::new(path);
            render(&cli, &mut renderer, &mut sink, &dataset)
                .and_then(|()| sink.finish().map_err(RenderError::from))
                .map(|written| {
                    tracing::info!(path = %written.display(), "wrote html");
                })
        }
        None => render(&cli, &mut renderer, &mut EvcxrSink::stdout(), &dataset),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
