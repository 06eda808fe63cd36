use std::path::PathBuf;
use std::process::ExitStatus;

/// Printed in front of every user-facing error.
pub const ERROR_PREFIX: &str = " Error: ";

#[derive(thiserror::Error, Debug)]
pub enum TinybenchError {
    #[error("Please provide a path to a valid JS file.")]
    InputMissing,

    #[error("Failed to read {path}: {source}")]
    DocumentUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "No benchmarks found. Please define at least one benchmark:\n\t{start}\n\t{{{{ CODE TO BENCHMARK }}}}\n\t{stop}"
    )]
    NoFragmentsFound { start: String, stop: String },

    #[error("{name} not found. Please install {name} and try again.")]
    RuntimeNotFound { name: String },

    #[error("Failed to start {path}: {source}")]
    RunSpawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Benchmark run failed ({status})")]
    RunFailed { status: ExitStatus },

    #[error("No benchmark run completed within the {window:?} sampling window. Try a longer --window.")]
    NoSamples { window: std::time::Duration },

    #[error("Invalid sampling window '{value}'. Expected a positive number of seconds.")]
    InvalidWindow { value: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParse { path: PathBuf, detail: String },
}
