// Command-line entry point for callview.

use anyhow::{Context, Result};
use callview::application::{VisualizeRequest, VisualizeUsecase};
use callview::domain::error::LoadError;
use callview::infrastructure::concurrency::init_thread_pool;
use callview::infrastructure::config::{AppConfig, Overrides, Settings};
use callview::infrastructure::{JsonFileSource, OutputFormat, WindowViewer};
use callview::ports::{DocumentSource, Viewer};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Call graph JSON file [default: call_graph.json]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Source file whose functions are drawn [default: ingestion.py]
    #[arg(short = 'f', long = "file")]
    target_file: Option<String>,

    /// Also write the drawing to this file (nothing is written when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Seed for the layout's initial placement
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum layout iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Configuration file (callview.toml in the working directory is used when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not open the interactive window
    #[arg(long)]
    no_open: bool,

    /// List source files in the document with their function counts
    #[arg(long)]
    list_files: bool,

    /// Layout worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            input: self.input.clone(),
            target_file: self.target_file.clone(),
            output: self.output.clone(),
            format: self.format,
            seed: self.seed,
            iterations: self.iterations,
            no_open: self.no_open,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LoadError>() {
                Some(load_error) => eprintln!("{}", load_error),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = AppConfig::load(cli.config.as_deref(), &cwd)?;
    let settings = Settings::resolve(config, cli.overrides())?;
    let source = JsonFileSource::new(&settings.input);

    if cli.list_files {
        let doc = source.load()?;
        for (file, count) in doc.functions.files() {
            println!("{:>6}  {}", count, file);
        }
        return Ok(());
    }

    init_thread_pool(cli.threads)?;

    let window = WindowViewer;
    let usecase = VisualizeUsecase {
        source: &source,
        exporter: settings.format.exporter(),
        viewer: settings.open_window.then_some(&window as &dyn Viewer),
    };
    let request = VisualizeRequest {
        target_file: settings.target_file.clone(),
        layout: settings.layout.clone(),
        canvas: settings.canvas.clone(),
        palette: settings.palette.clone(),
        output: settings.output.clone(),
    };

    let report = usecase.run(&request)?;

    if let Some(path) = &report.output {
        println!("Call graph rendered: {}", path.display());
    }
    println!(
        "Functions: {} of {} in {}",
        report.nodes, report.total_functions, settings.target_file
    );
    println!(
        "Calls: {} ({} to functions outside the file)",
        report.edges, report.dropped_calls
    );
    Ok(())
}
