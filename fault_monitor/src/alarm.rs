use log::{info, warn};

use data_transfer_objects::FaultVerdict;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum AlarmState {
    Inactive,
    Active,
}

/// Latched fault condition one alarm, only changed on verdict transitions.
#[derive(Debug)]
pub struct AlarmLatch {
    state: AlarmState,
}

impl AlarmLatch {
    pub fn new() -> AlarmLatch {
        AlarmLatch {
            state: AlarmState::Inactive,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Returns the new state if the verdict flipped the alarm.
    pub fn update(&mut self, verdict: FaultVerdict) -> Option<AlarmState> {
        let next = if verdict.is_fault() {
            AlarmState::Active
        } else {
            AlarmState::Inactive
        };
        if next == self.state {
            return None;
        }
        self.state = next;
        match next {
            AlarmState::Active => warn!("FC1 flag set to active!"),
            AlarmState::Inactive => info!("FC1 flag set to inactive!"),
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use data_transfer_objects::FaultVerdict::{Fault, NoFault};

    use super::{AlarmLatch, AlarmState};

    #[test]
    fn it_shall_only_report_transitions() {
        let mut latch = AlarmLatch::new();
        assert_eq!(None, latch.update(NoFault));
        assert_eq!(Some(AlarmState::Active), latch.update(Fault));
        assert_eq!(None, latch.update(Fault));
        assert_eq!(AlarmState::Active, latch.state());
        assert_eq!(Some(AlarmState::Inactive), latch.update(NoFault));
        assert_eq!(AlarmState::Inactive, latch.state());
    }
}
