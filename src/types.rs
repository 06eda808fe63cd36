use std::fmt;
use std::time::Duration;

pub const DEFAULT_START_MARKER: &str = "// tinybench start";
pub const DEFAULT_STOP_MARKER: &str = "// tinybench stop";

/// The pair of literal lines delimiting a benchmark region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub stop: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            start: DEFAULT_START_MARKER.to_string(),
            stop: DEFAULT_STOP_MARKER.to_string(),
        }
    }
}

/// A document split into shared code and benchmark fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    /// Every line outside a marked region, newline-terminated, in document order.
    pub preamble: String,
    /// One entry per complete region, in document order.
    pub fragments: Vec<String>,
}

/// Summary of one fragment's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentResult {
    pub iterations: usize,
    pub min: Duration,
    pub max: Duration,
    pub median: Duration,
}

/// How a fragment's median compares to the fastest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Fastest,
    /// Rounded percentage slower than the fastest median.
    Slower(u64),
    /// The fastest median is zero, so no percentage exists.
    Incomparable,
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Fastest => f.write_str("Fastest"),
            Delta::Slower(pct) => write!(f, "{}% Slower", pct),
            Delta::Incomparable => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub fastest: usize,
    /// Parallel to the ranked results.
    pub deltas: Vec<Delta>,
}
