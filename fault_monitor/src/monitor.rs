use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;

use data_transfer_objects::MonitorParameters;

use crate::cancellation::CancellationToken;
use crate::channel_window_buffers::SharedWindows;
use crate::error::{MonitorError, Result};
use crate::generator::{ReadingSource, TelemetryGenerator, UniformReadingSource};
use crate::rules_engine::{FaultEvaluator, VerdictSink};

pub fn run_monitor<S: VerdictSink>(parameters: &MonitorParameters, sink: &mut S) -> Result<()> {
    parameters
        .validate()
        .map_err(MonitorError::InvalidParameters)?;
    let source = UniformReadingSource::from_clock(parameters.bounds);
    run_with_source(parameters, source, sink)
}

/// Runs the generator on its own thread and the evaluator on the calling
/// thread until `run_for` elapses, or forever without it.
pub fn run_with_source<R, S>(parameters: &MonitorParameters, source: R, sink: &mut S) -> Result<()>
where
    R: ReadingSource + 'static,
    S: VerdictSink,
{
    let windows = SharedWindows::new(parameters.window_size);
    let token = CancellationToken::new();
    let generator = TelemetryGenerator::new(source, parameters.generation_interval)
        .spawn(windows.clone(), token.clone())?;
    let timer = match parameters.run_for {
        Some(run_for) => match spawn_run_timer(run_for, token.clone()) {
            Ok(timer) => Some(timer),
            Err(e) => {
                token.cancel();
                let _ = generator.join();
                return Err(e);
            }
        },
        None => None,
    };
    info!(
        "Monitoring a {} sample window, evaluating every {:?}",
        parameters.window_size, parameters.evaluation_interval
    );
    let evaluator = FaultEvaluator::new(parameters.thresholds, parameters.evaluation_interval);
    let evaluated = evaluator.run(&windows, &token, sink);
    token.cancel();
    let ticks = generator
        .join()
        .map_err(|_| MonitorError::ThreadPanicked("telemetry generator"))?;
    if let Some(timer) = timer {
        timer
            .join()
            .map_err(|_| MonitorError::ThreadPanicked("run timer"))?;
    }
    let evaluations = evaluated?;
    info!(
        "Monitor stopped after {ticks} ticks and {evaluations} evaluations with {} samples in the window",
        windows.len()
    );
    Ok(())
}

fn spawn_run_timer(run_for: Duration, token: CancellationToken) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(String::from("run-timer"))
        .spawn(move || {
            if !token.wait_timeout(run_for) {
                info!("Run time of {run_for:?} elapsed");
                token.cancel();
            }
        })
        .map_err(|source| MonitorError::Spawn {
            name: "run timer",
            source,
        })
}
