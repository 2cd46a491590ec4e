use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_WINDOW_SIZE: usize = 300;
pub const DEFAULT_GENERATION_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_EVALUATION_INTERVAL: Duration = Duration::from_secs(300);

pub const PRESSURE_ERR_THRES: f64 = 0.1;
pub const VFD_SPEED_MAX_THRES: f64 = 0.99;
pub const VFD_SPEED_ERR_THRES: f64 = 0.05;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Channel {
    Pressure,
    Setpoint,
    MotorSpeed,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Pressure, Channel::Setpoint, Channel::MotorSpeed];
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Channel::Pressure => "Supply Air Duct Static Pressure",
            Channel::Setpoint => "Supply Air Duct Static Pressure Setpoint",
            Channel::MotorSpeed => "Supply Fan Speed Output",
        };
        write!(f, "{}", name)
    }
}

/// One sample of every channel, taken at the same simulated moment.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TickReading {
    pub tick: u64,
    pub timestamp: f64,
    pub pressure: f64,
    pub setpoint: f64,
    pub motor_speed: f64,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct ChannelBounds {
    pub low: f64,
    pub high: f64,
}

impl ChannelBounds {
    pub const fn new(low: f64, high: f64) -> ChannelBounds {
        ChannelBounds { low, high }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct GeneratorBounds {
    pub pressure: ChannelBounds,
    pub setpoint: ChannelBounds,
    pub motor_speed: ChannelBounds,
}

impl GeneratorBounds {
    pub fn get(&self, channel: Channel) -> ChannelBounds {
        match channel {
            Channel::Pressure => self.pressure,
            Channel::Setpoint => self.setpoint,
            Channel::MotorSpeed => self.motor_speed,
        }
    }
}

impl Default for GeneratorBounds {
    fn default() -> Self {
        GeneratorBounds {
            pressure: ChannelBounds::new(0.5, 1.5),
            setpoint: ChannelBounds::new(1.0, 1.4),
            motor_speed: ChannelBounds::new(20.5, 95.5),
        }
    }
}

/// Thresholds of fault condition one.
///
/// `motor_speed_scale` multiplies the motor speed mean before it is compared
/// against the fractional VFD thresholds. It defaults to `1.0`, which keeps
/// the raw readings (20.5..95.5) on a fractional scale (<1); use `0.01` to
/// read the speed as percent of full scale.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct FaultThresholds {
    pub pressure_err_thres: f64,
    pub vfd_speed_max_thres: f64,
    pub vfd_speed_err_thres: f64,
    pub motor_speed_scale: f64,
}

impl FaultThresholds {
    pub fn pressure_limit(&self, setpoint_mean: f64) -> f64 {
        setpoint_mean - self.pressure_err_thres
    }

    pub fn fan_speed_limit(&self) -> f64 {
        self.vfd_speed_max_thres - self.vfd_speed_err_thres
    }
}

impl Default for FaultThresholds {
    fn default() -> Self {
        FaultThresholds {
            pressure_err_thres: PRESSURE_ERR_THRES,
            vfd_speed_max_thres: VFD_SPEED_MAX_THRES,
            vfd_speed_err_thres: VFD_SPEED_ERR_THRES,
            motor_speed_scale: 1.0,
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct FaultChecks {
    pub pressure_mean: f64,
    pub setpoint_mean: f64,
    pub motor_speed_mean: f64,
    pub pressure_check: bool,
    pub fan_check: bool,
}

impl FaultChecks {
    pub fn is_fault(&self) -> bool {
        self.pressure_check && self.fan_check
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum FaultVerdict {
    NoFault,
    Fault,
}

impl FaultVerdict {
    pub fn is_fault(&self) -> bool {
        *self == FaultVerdict::Fault
    }

    pub fn as_flag(&self) -> u8 {
        match self {
            FaultVerdict::NoFault => 0,
            FaultVerdict::Fault => 1,
        }
    }
}

impl From<bool> for FaultVerdict {
    fn from(in_fault: bool) -> Self {
        if in_fault {
            FaultVerdict::Fault
        } else {
            FaultVerdict::NoFault
        }
    }
}

impl Display for FaultVerdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct MonitorParameters {
    pub window_size: usize,
    pub generation_interval: Duration,
    pub evaluation_interval: Duration,
    pub thresholds: FaultThresholds,
    pub bounds: GeneratorBounds,
    pub run_for: Option<Duration>,
}

impl MonitorParameters {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 {
            return Err(String::from("window size has to be at least 1"));
        }
        if self.generation_interval.is_zero() {
            return Err(String::from("generation interval has to be positive"));
        }
        if self.evaluation_interval.is_zero() {
            return Err(String::from("evaluation interval has to be positive"));
        }
        let thresholds = [
            ("pressure error threshold", self.thresholds.pressure_err_thres),
            ("VFD max speed threshold", self.thresholds.vfd_speed_max_thres),
            ("VFD speed error threshold", self.thresholds.vfd_speed_err_thres),
            ("motor speed scale", self.thresholds.motor_speed_scale),
        ];
        if let Some((name, value)) = thresholds.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} has to be finite, got {value}"));
        }
        for channel in Channel::ALL {
            let bounds = self.bounds.get(channel);
            if !(bounds.low.is_finite() && bounds.high.is_finite() && bounds.low < bounds.high) {
                return Err(format!(
                    "bounds of {channel} have to be finite with low < high, got [{}, {}]",
                    bounds.low, bounds.high
                ));
            }
        }
        Ok(())
    }
}

impl Default for MonitorParameters {
    fn default() -> Self {
        MonitorParameters {
            window_size: DEFAULT_WINDOW_SIZE,
            generation_interval: DEFAULT_GENERATION_INTERVAL,
            evaluation_interval: DEFAULT_EVALUATION_INTERVAL,
            thresholds: FaultThresholds::default(),
            bounds: GeneratorBounds::default(),
            run_for: None,
        }
    }
}
