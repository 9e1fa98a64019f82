//! Battery samples and the severity classifier.

use core::fmt;

use crate::config::ThresholdConfig;

/// One reading from the power source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySample {
    level: f32,
    is_charging: bool,
}

impl BatterySample {
    /// Build a sample. Non-finite levels yield `None` (treated as "no sample
    /// this tick"); finite levels are clamped into `[0, 100]`.
    pub fn new(level: f32, is_charging: bool) -> Option<Self> {
        if !level.is_finite() {
            return None;
        }
        Some(Self {
            level: level.clamp(0.0, 100.0),
            is_charging,
        })
    }

    /// Charge percentage, `0.0..=100.0`.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }
}

/// Severity of the current battery condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryState {
    Normal,
    Alert,
    Critical,
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Alert => write!(f, "Alert"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Map a sample onto a severity. Charging always wins.
pub fn classify(sample: &BatterySample, thresholds: &ThresholdConfig) -> BatteryState {
    if sample.is_charging() {
        return BatteryState::Normal;
    }
    let level = sample.level();
    if level <= f32::from(thresholds.critical()) {
        BatteryState::Critical
    } else if level <= f32::from(thresholds.alert()) {
        BatteryState::Alert
    } else {
        BatteryState::Normal
    }
}
