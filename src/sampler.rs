use std::panic;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::discover::Runtime;
use crate::errors::TinybenchError;

/// Longest single sleep of the controller between progress ticks.
pub const TICK: Duration = Duration::from_secs(1);

/// Run `program` back to back on `runtime` for `window` and return the
/// duration of every completed run.
///
/// Runs happen on a dedicated worker thread that owns the sample buffer.
/// The calling thread sleeps in ticks of at most [`TICK`], calling `on_tick`
/// after each, then signals stop and joins the worker; the run in flight at
/// that point is allowed to finish and is counted. A failing run ends the
/// window early and its error is returned.
pub fn sample<R, F>(
    runtime: &R,
    program: &str,
    window: Duration,
    mut on_tick: F,
) -> Result<Vec<Duration>>
where
    R: Runtime + ?Sized,
    F: FnMut(),
{
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let samples = thread::scope(|scope| {
        let worker = scope.spawn(move || collect(runtime, program, &stop_rx));

        let started = Instant::now();
        loop {
            let elapsed = started.elapsed();
            if elapsed >= window || worker.is_finished() {
                break;
            }
            thread::sleep((window - elapsed).min(TICK));
            on_tick();
        }

        // Fails only if the worker already returned after a failed run.
        let _ = stop_tx.send(());
        match worker.join() {
            Ok(samples) => samples,
            Err(payload) => panic::resume_unwind(payload),
        }
    })?;

    if samples.is_empty() {
        return Err(TinybenchError::NoSamples { window }.into());
    }

    tracing::debug!(samples = samples.len(), ?window, "sampling window closed");
    Ok(samples)
}

fn collect<R>(runtime: &R, program: &str, stop: &Receiver<()>) -> Result<Vec<Duration>>
where
    R: Runtime + ?Sized,
{
    let mut samples = Vec::new();
    while let Err(TryRecvError::Empty) = stop.try_recv() {
        let started = Instant::now();
        runtime.execute(program)?;
        let elapsed = started.elapsed();
        tracing::trace!(?elapsed, run = samples.len() + 1, "run finished");
        samples.push(elapsed);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeps for a fixed time per run and fails on a chosen run.
    struct StubRuntime {
        run_time: Duration,
        fail_on: Option<usize>,
        runs: AtomicUsize,
        programs: Mutex<Vec<String>>,
    }

    impl StubRuntime {
        fn new(run_time: Duration) -> Self {
            StubRuntime {
                run_time,
                fail_on: None,
                runs: AtomicUsize::new(0),
                programs: Mutex::new(Vec::new()),
            }
        }
    }

    impl Runtime for StubRuntime {
        fn execute(&self, program: &str) -> Result<()> {
            let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            self.programs.lock().unwrap().push(program.to_string());
            thread::sleep(self.run_time);
            if self.fail_on == Some(run) {
                anyhow::bail!("stub run {} failed", run);
            }
            Ok(())
        }
    }

    #[test]
    fn collects_samples_for_the_whole_window() {
        let runtime = StubRuntime::new(Duration::from_millis(10));
        let samples = sample(&runtime, "x", Duration::from_millis(200), || {}).unwrap();

        assert!(samples.len() >= 2, "got {} samples", samples.len());
        assert_eq!(samples.len(), runtime.runs.load(Ordering::SeqCst));
        assert!(samples.iter().all(|d| *d >= Duration::from_millis(10)));
    }

    #[test]
    fn every_run_gets_the_same_program() {
        let runtime = StubRuntime::new(Duration::from_millis(5));
        sample(&runtime, "preamble;\nfragment;\n", Duration::from_millis(50), || {}).unwrap();

        let programs = runtime.programs.lock().unwrap();
        assert!(!programs.is_empty());
        assert!(programs.iter().all(|p| p == "preamble;\nfragment;\n"));
    }

    #[test]
    fn in_flight_run_finishes_after_window() {
        let runtime = StubRuntime::new(Duration::from_millis(150));
        let started = Instant::now();
        let samples = sample(&runtime, "x", Duration::from_millis(20), || {}).unwrap();

        assert_eq!(samples.len(), 1);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn ticks_are_reported_while_waiting() {
        let runtime = StubRuntime::new(Duration::from_millis(1));
        let mut ticks = 0;
        sample(&runtime, "x", Duration::from_millis(30), || ticks += 1).unwrap();
        assert_eq!(ticks, 1);
    }

    #[test]
    fn failing_run_aborts_early() {
        let runtime = StubRuntime {
            fail_on: Some(2),
            ..StubRuntime::new(Duration::from_millis(5))
        };
        let started = Instant::now();
        let err = sample(&runtime, "x", Duration::from_secs(30), || {}).unwrap_err();

        assert!(err.to_string().contains("stub run 2 failed"));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(runtime.runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn zero_window_yields_no_samples_error() {
        let runtime = StubRuntime::new(Duration::from_millis(1));
        let result = sample(&runtime, "x", Duration::ZERO, || {});

        // The worker may or may not have started a run before the stop
        // signal arrived; an empty buffer must surface as NoSamples.
        match result {
            Ok(samples) => assert!(!samples.is_empty()),
            Err(err) => assert!(matches!(
                err.downcast_ref::<TinybenchError>(),
                Some(TinybenchError::NoSamples { .. })
            )),
        }
    }
}
