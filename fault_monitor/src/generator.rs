use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use data_transfer_objects::{ChannelBounds, GeneratorBounds, TickReading};

use crate::cancellation::CancellationToken;
use crate::channel_window_buffers::SharedWindows;
use crate::error::{MonitorError, Result};

/// Produces one reading of every channel per tick.
pub trait ReadingSource: Send {
    fn next_reading(&mut self, tick: u64) -> TickReading;
}

/// Draws every channel independently from a uniform distribution.
pub struct UniformReadingSource {
    rng: SmallRng,
    bounds: GeneratorBounds,
}

impl UniformReadingSource {
    pub fn seeded(seed: u64, bounds: GeneratorBounds) -> UniformReadingSource {
        UniformReadingSource {
            rng: SmallRng::seed_from_u64(seed),
            bounds,
        }
    }

    pub fn from_clock(bounds: GeneratorBounds) -> UniformReadingSource {
        let seed = utils::get_now_duration().as_nanos() as u64;
        debug!("Seeding telemetry generator with {seed}");
        UniformReadingSource::seeded(seed, bounds)
    }

    fn draw(&mut self, bounds: ChannelBounds) -> f64 {
        utils::round_to_hundredths(self.rng.gen_range(bounds.low..=bounds.high))
    }
}

impl ReadingSource for UniformReadingSource {
    fn next_reading(&mut self, tick: u64) -> TickReading {
        TickReading {
            tick,
            timestamp: utils::get_now_secs(),
            pressure: self.draw(self.bounds.pressure),
            setpoint: self.draw(self.bounds.setpoint),
            motor_speed: self.draw(self.bounds.motor_speed),
        }
    }
}

pub struct TelemetryGenerator<S> {
    source: S,
    interval: Duration,
    tick: u64,
}

impl<S: ReadingSource> TelemetryGenerator<S> {
    pub fn new(source: S, interval: Duration) -> TelemetryGenerator<S> {
        TelemetryGenerator {
            source,
            interval,
            tick: 0,
        }
    }

    /// Publishes one reading per interval until `token` is cancelled and
    /// returns the number of ticks produced.
    pub fn run(mut self, windows: SharedWindows, token: CancellationToken) -> u64 {
        while !token.is_cancelled() {
            let reading = self.source.next_reading(self.tick);
            windows.push_tick(&reading);
            trace!("{reading:?}");
            self.tick += 1;
            if token.wait_timeout(self.interval) {
                break;
            }
        }
        debug!("Exiting generator after {} ticks", self.tick);
        self.tick
    }
}

impl<S: ReadingSource + 'static> TelemetryGenerator<S> {
    pub fn spawn(self, windows: SharedWindows, token: CancellationToken) -> Result<JoinHandle<u64>> {
        thread::Builder::new()
            .name(String::from("telemetry-generator"))
            .spawn(move || self.run(windows, token))
            .map_err(|source| MonitorError::Spawn {
                name: "telemetry generator",
                source,
            })
    }
}
