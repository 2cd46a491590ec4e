use std::ops::Index;
use std::sync::Arc;

use parking_lot::Mutex;

use data_transfer_objects::{Channel, TickReading};

use crate::sliding_window::SlidingWindow;

/// The three channel windows plus tick index and timestamp of every retained
/// sample, always advanced together.
#[derive(Debug)]
pub struct ChannelWindowBuffers {
    pressure: SlidingWindow<f64>,
    setpoint: SlidingWindow<f64>,
    motor_speed: SlidingWindow<f64>,
    ticks: SlidingWindow<u64>,
    timestamps: SlidingWindow<f64>,
}

impl ChannelWindowBuffers {
    pub fn new(window_size: usize) -> ChannelWindowBuffers {
        ChannelWindowBuffers {
            pressure: SlidingWindow::new(window_size),
            setpoint: SlidingWindow::new(window_size),
            motor_speed: SlidingWindow::new(window_size),
            ticks: SlidingWindow::new(window_size),
            timestamps: SlidingWindow::new(window_size),
        }
    }

    pub fn push_tick(&mut self, reading: &TickReading) {
        self.pressure.add(reading.pressure);
        self.setpoint.add(reading.setpoint);
        self.motor_speed.add(reading.motor_speed);
        self.ticks.add(reading.tick);
        self.timestamps.add(reading.timestamp);
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            window_size: self.ticks.capacity(),
            ticks: self.ticks.snapshot(),
            timestamps: self.timestamps.snapshot(),
            pressure: self[Channel::Pressure].snapshot(),
            setpoint: self[Channel::Setpoint].snapshot(),
            motor_speed: self[Channel::MotorSpeed].snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }
}

impl Index<Channel> for ChannelWindowBuffers {
    type Output = SlidingWindow<f64>;

    fn index(&self, channel: Channel) -> &Self::Output {
        match channel {
            Channel::Pressure => &self.pressure,
            Channel::Setpoint => &self.setpoint,
            Channel::MotorSpeed => &self.motor_speed,
        }
    }
}

/// Owned, tick-aligned copy of the channel windows.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub window_size: usize,
    pub ticks: Vec<u64>,
    pub timestamps: Vec<f64>,
    pub pressure: Vec<f64>,
    pub setpoint: Vec<f64>,
    pub motor_speed: Vec<f64>,
}

impl WindowSnapshot {
    pub fn channel(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Pressure => &self.pressure,
            Channel::Setpoint => &self.setpoint,
            Channel::MotorSpeed => &self.motor_speed,
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Whether every channel holds a complete window.
    pub fn is_full(&self) -> bool {
        Channel::ALL
            .iter()
            .all(|channel| self.channel(*channel).len() >= self.window_size)
    }

    pub fn mean(&self, channel: Channel) -> f64 {
        utils::calc_mean(self.channel(channel))
    }

    /// Seconds between the oldest and the newest sample.
    pub fn span_secs(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(oldest), Some(newest)) => newest - oldest,
            _ => 0f64,
        }
    }
}

/// Handle to the windows shared by the generator (writer) and the evaluator
/// (reader). One lock guards all channels, so a snapshot holds either all or
/// none of a tick's samples.
#[derive(Clone)]
pub struct SharedWindows {
    buffers: Arc<Mutex<ChannelWindowBuffers>>,
}

impl SharedWindows {
    pub fn new(window_size: usize) -> SharedWindows {
        SharedWindows {
            buffers: Arc::new(Mutex::new(ChannelWindowBuffers::new(window_size))),
        }
    }

    pub fn push_tick(&self, reading: &TickReading) {
        self.buffers.lock().push_tick(reading);
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.buffers.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.buffers.lock().len()
    }
}
