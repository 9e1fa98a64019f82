//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, update a status item, etc.

use core::fmt;

use crate::classifier::{BatterySample, BatteryState};
use crate::config::ThresholdConfig;

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Monitoring started (periodic sampling scheduled).
    Started,

    /// Severity moved between bands.
    StateChanged { from: BatteryState, to: BatteryState },

    /// The critical border width was latched.
    CriticalLatched { width: f32 },

    /// Flashing began or ended.
    Flashing(bool),

    /// Thresholds changed (after clamping).
    ThresholdsChanged(ThresholdConfig),

    /// New status text for the menu-bar item.
    Status(StatusLabel),

    /// The sampler produced nothing this tick; previous directive kept.
    SampleMissing,

    /// Monitoring stopped; `torn_down` when the service is gone for good.
    Stopped { torn_down: bool },
}

/// Compact status text: `"42%"` while discharging, `"⚡42"` while charging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLabel {
    pub percent: u8,
    pub charging: bool,
}

impl StatusLabel {
    /// Level is truncated, not rounded.
    pub fn from_sample(sample: &BatterySample) -> Self {
        Self {
            percent: sample.level() as u8,
            charging: sample.is_charging(),
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.charging {
            write!(f, "\u{26a1}{}", self.percent)
        } else {
            write!(f, "{}%", self.percent)
        }
    }
}
