use bandmatch::io::{load_gray_image, load_rgb_image, owned_gray_from_rgb, save_rgb_image};
use bandmatch::{draw_bounding_box, BoxStyle, Match, MatchConfig, Matcher, Method, Template};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate a template in an image by band-parallel correlation")]
struct Cli {
    /// Optional JSON configuration file; flags below override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Reference image (colour).
    #[arg(long, value_name = "PATH")]
    image: Option<String>,
    /// Template image (converted to grayscale).
    #[arg(long, value_name = "PATH")]
    template: Option<String>,
    /// Which search strategy to run.
    #[arg(long, value_enum)]
    mode: Option<ModeConfig>,
    /// Worker count for parallel mode (default: all cores).
    #[arg(short, long)]
    workers: Option<usize>,
    /// Correlation method.
    #[arg(long, value_enum)]
    method: Option<MethodConfig>,
    /// Directory for result images.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
enum ModeConfig {
    Parallel,
    Sequential,
    Both,
}

impl ModeConfig {
    fn runs(self) -> &'static [RunKind] {
        match self {
            ModeConfig::Parallel => &[RunKind::Parallel],
            ModeConfig::Sequential => &[RunKind::Sequential],
            ModeConfig::Both => &[RunKind::Sequential, RunKind::Parallel],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunKind {
    Sequential,
    Parallel,
}

impl RunKind {
    fn file_stem(self) -> &'static str {
        match self {
            RunKind::Sequential => "result_seq",
            RunKind::Parallel => "result_par",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
enum MethodConfig {
    Ccoeff,
    CcoeffNormed,
    Ccorr,
    CcorrNormed,
    Sqdiff,
}

impl From<MethodConfig> for Method {
    fn from(value: MethodConfig) -> Self {
        match value {
            MethodConfig::Ccoeff => Method::Ccoeff,
            MethodConfig::CcoeffNormed => Method::CcoeffNormed,
            MethodConfig::Ccorr => Method::Ccorr,
            MethodConfig::CcorrNormed => Method::CcorrNormed,
            MethodConfig::Sqdiff => Method::Sqdiff,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    template_path: String,
    output_dir: String,
    mode: ModeConfig,
    workers: Option<usize>,
    method: MethodConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: "l.png".to_string(),
            template_path: "k.png".to_string(),
            output_dir: ".".to_string(),
            mode: ModeConfig::Parallel,
            workers: None,
            method: MethodConfig::Ccoeff,
        }
    }
}

impl Config {
    fn load(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut config: Config = match &cli.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        if let Some(image) = &cli.image {
            config.image_path = image.clone();
        }
        if let Some(template) = &cli.template {
            config.template_path = template.clone();
        }
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(mode) = cli.mode {
            config.mode = mode;
        }
        if let Some(workers) = cli.workers {
            config.workers = Some(workers);
        }
        if let Some(method) = cli.method {
            config.method = method;
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct RunRecord {
    mode: RunKind,
    workers: usize,
    x: usize,
    y: usize,
    bottom_right: [usize; 2],
    score: f32,
    elapsed_ms: f64,
    output_path: String,
}

impl RunRecord {
    fn new(mode: RunKind, workers: usize, found: &Match, elapsed_ms: f64, path: &Path) -> Self {
        Self {
            mode,
            workers,
            x: found.location.x,
            y: found.location.y,
            bottom_right: [found.bbox.bottom_right.x, found.bbox.bottom_right.y],
            score: found.score,
            elapsed_ms,
            output_path: path.display().to_string(),
        }
    }
}

fn output_extension(image_path: &str) -> &str {
    Path::new(image_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png")
}

fn run(cli: &Cli) -> Result<Vec<RunRecord>, Box<dyn Error>> {
    let config = Config::load(cli)?;

    let reference = load_rgb_image(&config.image_path)?;
    let gray = owned_gray_from_rgb(&reference)?;
    let template = Template::from(load_gray_image(&config.template_path)?);

    let match_cfg = MatchConfig {
        method: config.method.into(),
        workers: config.workers,
        ..MatchConfig::default()
    };
    let matcher = Matcher::new(&template)?.with_config(match_cfg);
    let workers = matcher.config().worker_count();
    let extension = output_extension(&config.image_path);

    let mut records = Vec::new();
    for &kind in config.mode.runs() {
        let start = Instant::now();
        let found = match kind {
            RunKind::Sequential => matcher.match_sequential(gray.view())?,
            RunKind::Parallel => matcher.match_parallel(gray.view())?,
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        tracing::info!(
            mode = ?kind,
            x = found.location.x,
            y = found.location.y,
            elapsed_ms,
            "match found"
        );

        let annotated = draw_bounding_box(&reference, &found.bbox, &BoxStyle::default());
        let path = Path::new(&config.output_dir).join(format!("{}.{extension}", kind.file_stem()));
        save_rgb_image(&path, &annotated)?;

        let used = match kind {
            RunKind::Sequential => 1,
            RunKind::Parallel => workers,
        };
        records.push(RunRecord::new(kind, used, &found, elapsed_ms, &path));
    }
    Ok(records)
}

fn execute(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("bandmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let records = run(cli)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Reports a failure on stderr and maps the outcome to the process status.
fn exit_status(result: Result<(), Box<dyn Error>>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("bandmatch: {err}");
            1
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    ExitCode::from(exit_status(execute(&cli)))
}
