use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::trace;

use data_transfer_objects::{FaultChecks, FaultThresholds};

pub fn get_now_duration() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

pub fn get_now_secs() -> f64 {
    get_now_duration().as_secs_f64()
}

/// Arithmetic mean using Neumaier summation, `0.0` for no values.
pub fn calc_mean<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sum = 0f64;
    let mut compensation = 0f64;
    let mut count = 0usize;
    for value in values {
        let total = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - total) + value;
        } else {
            compensation += (value - total) + sum;
        }
        sum = total;
        count += 1;
    }
    if count == 0 {
        0f64
    } else {
        (sum + compensation) / count as f64
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/**
G36 fault condition one: the duct static pressure is too low while the supply fan
runs at (or near) maximum speed.
    pressure_check: pressure mean < setpoint mean - pressure error threshold
    fan_check: scaled motor speed mean >= VFD max speed threshold - VFD speed error threshold
 **/
pub fn averages_indicate_fault(
    pressure_mean: f64,
    setpoint_mean: f64,
    motor_speed_mean: f64,
    thresholds: &FaultThresholds,
) -> FaultChecks {
    let pressure_check = pressure_mean < thresholds.pressure_limit(setpoint_mean);
    let fan_check =
        motor_speed_mean * thresholds.motor_speed_scale >= thresholds.fan_speed_limit();
    trace!("pressure_check is {pressure_check}, fan_check is {fan_check}");
    FaultChecks {
        pressure_mean,
        setpoint_mean,
        motor_speed_mean,
        pressure_check,
        fan_check,
    }
}
