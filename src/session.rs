use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use crate::discover::Runtime;
use crate::display;
use crate::errors::TinybenchError;
use crate::sampler;
use crate::stats;
use crate::types::{FragmentResult, Segments};

/// Sample every fragment in document order, one at a time, printing progress
/// to stdout as it goes.
///
/// The first failure aborts the session and discards earlier results.
pub fn run_benchmarks<R>(
    segments: &Segments,
    runtime: &R,
    window: Duration,
) -> Result<Vec<FragmentResult>>
where
    R: Runtime + ?Sized,
{
    let mut results = Vec::with_capacity(segments.fragments.len());

    for (i, fragment) in segments.fragments.iter().enumerate() {
        let ordinal = i + 1;
        print!("{}", display::format_fragment_header(ordinal, fragment));
        flush_stdout();

        let program = format!("{}{}", segments.preamble, fragment);
        let _span = tracing::info_span!("fragment", ordinal).entered();
        tracing::debug!(?window, bytes = program.len(), "sampling fragment");

        let samples = sampler::sample(runtime, &program, window, || {
            print!(".");
            flush_stdout();
        })?;
        println!(" done!");

        let result = stats::reduce(samples).ok_or(TinybenchError::NoSamples { window })?;
        tracing::info!(
            iterations = result.iterations,
            median_ms = result.median.as_millis() as u64,
            "fragment sampled"
        );
        results.push(result);
    }

    Ok(results)
}

fn flush_stdout() {
    // Progress output only; a closed stdout shows up again when the table prints.
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every program it is asked to run.
    #[derive(Default)]
    struct RecordingRuntime {
        programs: Mutex<Vec<String>>,
        fail_when_contains: Option<&'static str>,
    }

    impl Runtime for RecordingRuntime {
        fn execute(&self, program: &str) -> Result<()> {
            self.programs.lock().unwrap().push(program.to_string());
            std::thread::sleep(Duration::from_millis(2));
            if let Some(needle) = self.fail_when_contains
                && program.contains(needle)
            {
                anyhow::bail!("program containing {needle} failed");
            }
            Ok(())
        }
    }

    fn segments(fragments: &[&str]) -> Segments {
        Segments {
            preamble: "const shared = 1;\n".to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn one_result_per_fragment_in_order() {
        let runtime = RecordingRuntime::default();
        let segs = segments(&["first();\n", "second();\n"]);
        let results = run_benchmarks(&segs, &runtime, Duration::from_millis(40)).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.iterations >= 1));

        let programs = runtime.programs.lock().unwrap();
        let first_second = programs.iter().position(|p| p.contains("second")).unwrap();
        assert!(programs[..first_second].iter().all(|p| p.contains("first")));
        assert!(programs[first_second..].iter().all(|p| p.contains("second")));
        assert_eq!(programs[0], "const shared = 1;\nfirst();\n");
    }

    #[test]
    fn iteration_count_matches_runs() {
        let runtime = RecordingRuntime::default();
        let segs = segments(&["only();\n"]);
        let results = run_benchmarks(&segs, &runtime, Duration::from_millis(30)).unwrap();
        assert_eq!(results[0].iterations, runtime.programs.lock().unwrap().len());
    }

    #[test]
    fn failure_in_later_fragment_aborts_session() {
        let runtime = RecordingRuntime {
            fail_when_contains: Some("broken"),
            ..RecordingRuntime::default()
        };
        let segs = segments(&["fine();\n", "broken();\n", "never();\n"]);
        let err = run_benchmarks(&segs, &runtime, Duration::from_millis(30)).unwrap_err();

        assert!(err.to_string().contains("broken failed"));
        let programs = runtime.programs.lock().unwrap();
        assert!(!programs.iter().any(|p| p.contains("never")));
    }
}
