use std::io::{self, Write};
use std::time::Duration;

use log::debug;

use data_transfer_objects::{Channel, FaultChecks, FaultThresholds, FaultVerdict};

use crate::alarm::AlarmLatch;
use crate::cancellation::CancellationToken;
use crate::channel_window_buffers::{SharedWindows, WindowSnapshot};
use crate::error::Result;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Evaluation {
    pub verdict: FaultVerdict,
    /// `None` while the window is still warming up.
    pub checks: Option<FaultChecks>,
}

pub fn evaluate(snapshot: &WindowSnapshot, thresholds: &FaultThresholds) -> Evaluation {
    if !snapshot.is_full() {
        return Evaluation {
            verdict: FaultVerdict::NoFault,
            checks: None,
        };
    }
    let checks = utils::averages_indicate_fault(
        snapshot.mean(Channel::Pressure),
        snapshot.mean(Channel::Setpoint),
        snapshot.mean(Channel::MotorSpeed),
        thresholds,
    );
    Evaluation {
        verdict: FaultVerdict::from(checks.is_fault()),
        checks: Some(checks),
    }
}

pub trait VerdictSink {
    fn report(&mut self, verdict: FaultVerdict) -> Result<()>;
}

/// Writes one `FAULT DETECTION IS: <0|1>` line per verdict.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> WriterSink<W> {
        WriterSink { writer }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> WriterSink<io::Stdout> {
        WriterSink::new(io::stdout())
    }
}

impl<W: Write> VerdictSink for WriterSink<W> {
    fn report(&mut self, verdict: FaultVerdict) -> Result<()> {
        writeln!(self.writer, "FAULT DETECTION IS: {verdict}")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct FaultEvaluator {
    thresholds: FaultThresholds,
    interval: Duration,
    alarm: AlarmLatch,
}

impl FaultEvaluator {
    pub fn new(thresholds: FaultThresholds, interval: Duration) -> FaultEvaluator {
        FaultEvaluator {
            thresholds,
            interval,
            alarm: AlarmLatch::new(),
        }
    }

    pub fn evaluate_once(&mut self, windows: &SharedWindows) -> Evaluation {
        let snapshot = windows.snapshot();
        let evaluation = evaluate(&snapshot, &self.thresholds);
        match &evaluation.checks {
            None => debug!(
                "Not enough data to run FDD ({}/{} samples)",
                snapshot.len(),
                snapshot.window_size
            ),
            Some(checks) => {
                debug!(
                    "Evaluating {} samples spanning {:.1}s",
                    snapshot.len(),
                    snapshot.span_secs()
                );
                debug!("{}: {}", Channel::Pressure, checks.pressure_mean);
                debug!("{}: {}", Channel::Setpoint, checks.setpoint_mean);
                debug!("{}: {}", Channel::MotorSpeed, checks.motor_speed_mean);
                debug!(
                    "pressure_check is {}, fan_check is {}",
                    checks.pressure_check, checks.fan_check
                );
            }
        }
        self.alarm.update(evaluation.verdict);
        evaluation
    }

    /// Evaluates immediately and then once per interval until `token` is
    /// cancelled. Returns the number of evaluations.
    pub fn run<S: VerdictSink>(
        mut self,
        windows: &SharedWindows,
        token: &CancellationToken,
        sink: &mut S,
    ) -> Result<usize> {
        let mut evaluations = 0;
        while !token.is_cancelled() {
            let evaluation = self.evaluate_once(windows);
            sink.report(evaluation.verdict)?;
            evaluations += 1;
            if token.wait_timeout(self.interval) {
                break;
            }
        }
        debug!(
            "Exiting evaluator after {evaluations} evaluations, alarm {:?}",
            self.alarm.state()
        );
        Ok(evaluations)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use data_transfer_objects::{FaultThresholds, FaultVerdict, TickReading};

    use super::*;
    use crate::alarm::AlarmState;

    fn snapshot_of(samples: usize, pressure: f64, setpoint: f64, motor_speed: f64) -> WindowSnapshot {
        let windows = SharedWindows::new(300);
        for tick in 0..samples as u64 {
            windows.push_tick(&TickReading {
                tick,
                timestamp: 0.0,
                pressure,
                setpoint,
                motor_speed,
            });
        }
        windows.snapshot()
    }

    fn verdict(pressure: f64, setpoint: f64, motor_speed: f64) -> FaultVerdict {
        evaluate(
            &snapshot_of(300, pressure, setpoint, motor_speed),
            &FaultThresholds::default(),
        )
        .verdict
    }

    #[test]
    fn it_shall_not_flag_a_warming_up_window() {
        let evaluation = evaluate(&snapshot_of(299, 0.0, 1.2, 1.0), &FaultThresholds::default());
        assert_eq!(FaultVerdict::NoFault, evaluation.verdict);
        assert_eq!(None, evaluation.checks);
        let empty = evaluate(&snapshot_of(0, 0.0, 0.0, 0.0), &FaultThresholds::default());
        assert_eq!(FaultVerdict::NoFault, empty.verdict);
    }

    #[test]
    fn it_shall_cover_the_truth_table() {
        assert_eq!(FaultVerdict::Fault, verdict(1.05, 1.2, 0.95));
        assert_eq!(FaultVerdict::NoFault, verdict(1.15, 1.2, 0.95));
        assert_eq!(FaultVerdict::NoFault, verdict(1.05, 1.2, 0.93));
        assert_eq!(FaultVerdict::NoFault, verdict(1.15, 1.2, 0.93));
    }

    #[test]
    fn it_shall_flag_fan_speed_exactly_at_the_limit() {
        let evaluation = evaluate(&snapshot_of(300, 0.9, 1.2, 0.94), &FaultThresholds::default());
        let checks = evaluation.checks.unwrap();
        assert_eq!(0.94, checks.motor_speed_mean);
        assert!(checks.fan_check);
        assert_eq!(FaultVerdict::Fault, evaluation.verdict);
    }

    #[test]
    fn it_shall_not_flag_pressure_exactly_at_the_limit() {
        let evaluation = evaluate(&snapshot_of(300, 1.1, 1.2, 0.95), &FaultThresholds::default());
        let checks = evaluation.checks.unwrap();
        assert_eq!(1.1, checks.pressure_mean);
        assert_eq!(1.2, checks.setpoint_mean);
        assert!(!checks.pressure_check);
        assert_eq!(FaultVerdict::NoFault, evaluation.verdict);
    }

    #[test]
    fn it_shall_expose_the_window_means() {
        let evaluation = evaluate(&snapshot_of(300, 1.05, 1.2, 0.95), &FaultThresholds::default());
        let checks = evaluation.checks.unwrap();
        assert!((checks.pressure_mean - 1.05).abs() < 1e-9);
        assert!((checks.setpoint_mean - 1.2).abs() < 1e-9);
        assert!((checks.motor_speed_mean - 0.95).abs() < 1e-9);
        assert!(checks.pressure_check && checks.fan_check);
    }

    #[test]
    fn it_shall_keep_raw_motor_speed_by_default() {
        // raw percent readings always exceed the fractional fan limit
        assert_eq!(FaultVerdict::Fault, verdict(0.9, 1.2, 50.0));
    }

    #[test]
    fn it_shall_scale_percent_motor_speed() {
        let percent = FaultThresholds {
            motor_speed_scale: 0.01,
            ..FaultThresholds::default()
        };
        let fault = evaluate(&snapshot_of(300, 0.9, 1.2, 96.0), &percent);
        assert_eq!(FaultVerdict::Fault, fault.verdict);
        let no_fault = evaluate(&snapshot_of(300, 0.9, 1.2, 50.0), &percent);
        assert_eq!(FaultVerdict::NoFault, no_fault.verdict);
    }

    #[test]
    fn it_shall_write_the_report_line() {
        let mut sink = WriterSink::new(Vec::new());
        sink.report(FaultVerdict::NoFault).unwrap();
        sink.report(FaultVerdict::Fault).unwrap();
        assert_eq!(
            "FAULT DETECTION IS: 0\nFAULT DETECTION IS: 1\n",
            String::from_utf8(sink.writer).unwrap()
        );
    }

    #[test]
    fn it_shall_latch_the_alarm_on_fault() {
        let windows = SharedWindows::new(2);
        let mut evaluator = FaultEvaluator::new(FaultThresholds::default(), Duration::from_secs(1));
        evaluator.evaluate_once(&windows);
        assert_eq!(AlarmState::Inactive, evaluator.alarm.state());
        for tick in 0..2 {
            windows.push_tick(&TickReading {
                tick,
                timestamp: 0.0,
                pressure: 0.9,
                setpoint: 1.2,
                motor_speed: 0.97,
            });
        }
        assert!(evaluator.evaluate_once(&windows).verdict.is_fault());
        assert_eq!(AlarmState::Active, evaluator.alarm.state());
    }

    #[test]
    fn it_shall_report_once_and_stop_when_cancelled_during_wait() {
        let windows = SharedWindows::new(300);
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });
        let mut sink = WriterSink::new(Vec::new());
        let evaluator = FaultEvaluator::new(FaultThresholds::default(), Duration::from_secs(300));
        let evaluations = evaluator.run(&windows, &token, &mut sink).unwrap();
        handle.join().unwrap();
        assert_eq!(1, evaluations);
        assert_eq!("FAULT DETECTION IS: 0\n", String::from_utf8(sink.writer).unwrap());
    }
}
