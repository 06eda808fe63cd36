use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tinybench::config::{self, Overrides, Settings};
use tinybench::discover::ExternalRuntime;
use tinybench::display;
use tinybench::errors::{ERROR_PREFIX, TinybenchError};
use tinybench::parse;
use tinybench::session;
use tinybench::stats;

#[derive(Parser)]
#[command(
    name = "tinybench",
    version,
    about = "Compare JavaScript snippets by timing repeated runs of an external interpreter"
)]
struct Cli {
    /// JavaScript file containing one or more marked benchmark regions
    file: Option<PathBuf>,

    /// Seconds to spend sampling each benchmark
    #[arg(short, long, value_name = "SECONDS")]
    window: Option<f64>,

    /// Interpreter name or path used to run each benchmark
    #[arg(long, value_name = "NAME")]
    runtime: Option<String>,

    /// Flag that makes the interpreter evaluate its next argument as code
    #[arg(long, value_name = "FLAG", allow_hyphen_values = true)]
    eval_flag: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log sampling details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.file.ok_or(TinybenchError::InputMissing)?;

    let file_config = config::load_file_config(cli.config.as_deref())?;
    let settings = Settings::resolve(
        file_config,
        Overrides {
            window: cli.window,
            runtime: cli.runtime,
            eval_flag: cli.eval_flag,
        },
    )?;

    if std::io::stdout().is_terminal() {
        print!("{}", display::CLEAR_SCREEN);
    }
    println!("{}", display::format_banner());

    let document = parse::read_document(&path)?;

    let segments = parse::extract(&document, &settings.markers)?;
    tracing::debug!(fragments = segments.fragments.len(), "extracted benchmarks");

    let runtime = ExternalRuntime::locate(&settings.runtime, &settings.eval_flag)?;

    let results = session::run_benchmarks(&segments, &runtime, settings.window)?;
    let ranking = stats::rank(&results).ok_or(TinybenchError::NoFragmentsFound {
        start: settings.markers.start.clone(),
        stop: settings.markers.stop.clone(),
    })?;

    print!("{}", display::format_results(&results, &ranking));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}{}", ERROR_PREFIX, err);
        process::exit(1);
    }
}
