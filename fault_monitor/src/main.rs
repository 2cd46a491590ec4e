use std::process;
use std::time::Duration;

use clap::Parser;
use env_logger::Target;
use log::{error, info};

use data_transfer_objects::{
    FaultThresholds, GeneratorBounds, MonitorParameters, DEFAULT_WINDOW_SIZE, PRESSURE_ERR_THRES,
    VFD_SPEED_ERR_THRES, VFD_SPEED_MAX_THRES,
};

use crate::rules_engine::WriterSink;

mod alarm;
mod cancellation;
mod channel_window_buffers;
mod error;
mod generator;
mod monitor;
mod rules_engine;
mod sliding_window;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Number of samples per channel in the rolling window
    #[clap(long, value_parser, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    /// Telemetry generation interval in milliseconds
    #[clap(long, value_parser, default_value_t = 1000)]
    generation_interval_ms: u64,

    /// Fault evaluation interval in seconds
    #[clap(long, value_parser, default_value_t = 300)]
    evaluation_interval_secs: u64,

    /// Allowed static pressure deviation below the setpoint
    #[clap(long, value_parser, default_value_t = PRESSURE_ERR_THRES)]
    pressure_err_thres: f64,

    /// VFD maximum speed threshold, as a fraction of full speed
    #[clap(long, value_parser, default_value_t = VFD_SPEED_MAX_THRES)]
    vfd_speed_max_thres: f64,

    /// VFD speed error threshold, as a fraction of full speed
    #[clap(long, value_parser, default_value_t = VFD_SPEED_ERR_THRES)]
    vfd_speed_err_thres: f64,

    /// Factor applied to the motor speed mean before the fan check (0.01 for percent readings)
    #[clap(long, value_parser, default_value_t = 1.0)]
    motor_speed_scale: f64,

    /// Stop after this many seconds instead of running until terminated
    #[clap(long, value_parser)]
    run_for: Option<u64>,
}

impl Args {
    fn into_monitor_parameters(self) -> MonitorParameters {
        MonitorParameters {
            window_size: self.window_size,
            generation_interval: Duration::from_millis(self.generation_interval_ms),
            evaluation_interval: Duration::from_secs(self.evaluation_interval_secs),
            thresholds: FaultThresholds {
                pressure_err_thres: self.pressure_err_thres,
                vfd_speed_max_thres: self.vfd_speed_max_thres,
                vfd_speed_err_thres: self.vfd_speed_err_thres,
                motor_speed_scale: self.motor_speed_scale,
            },
            bounds: GeneratorBounds::default(),
            run_for: self.run_for.map(Duration::from_secs),
        }
    }
}

fn main() {
    env_logger::builder().target(Target::Stderr).init();
    let parameters = Args::parse().into_monitor_parameters();
    info!("Starting fault monitor with {parameters:?}");
    let mut sink = WriterSink::stdout();
    if let Err(e) = monitor::run_monitor(&parameters, &mut sink) {
        error!("Fault monitor failed: {e}");
        process::exit(1);
    }
}
