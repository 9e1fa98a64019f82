//! System configuration parameters
//!
//! Two groups live here:
//!
//! - [`ThresholdConfig`]: the operator-tunable alert/critical percentages.
//!   Every mutation goes through a clamping setter, so an invalid pair can
//!   never be observed.
//! - [`MonitorConfig`]: timing and geometry constants for the run-loop.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest alert percentage an operator may choose.
pub const ALERT_MIN_PERCENT: u8 = 10;
/// Highest alert percentage.
pub const ALERT_MAX_PERCENT: u8 = 100;
/// Lowest critical percentage. Critical is further capped by the alert level.
pub const CRITICAL_MIN_PERCENT: u8 = 2;

pub const DEFAULT_ALERT_PERCENT: u8 = 20;
pub const DEFAULT_CRITICAL_PERCENT: u8 = 10;

// ═══════════════════════════════════════════════════════════════
//  Thresholds
// ═══════════════════════════════════════════════════════════════

/// Alert and critical battery percentages.
///
/// Invariant: `CRITICAL_MIN_PERCENT <= critical <= alert`, and
/// `alert ∈ [ALERT_MIN_PERCENT, ALERT_MAX_PERCENT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    alert: u8,
    critical: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            alert: DEFAULT_ALERT_PERCENT,
            critical: DEFAULT_CRITICAL_PERCENT,
        }
    }
}

impl ThresholdConfig {
    /// Build from raw (possibly persisted or user-supplied) values.
    ///
    /// Applies the same corrections as the setters: alert first, then
    /// critical against the corrected alert.
    pub fn new(alert: u8, critical: u8) -> Self {
        let mut cfg = Self::default();
        cfg.set_alert(alert);
        cfg.set_critical(critical);
        cfg
    }

    /// Set the alert percentage, clamped into `[10, 100]`.
    ///
    /// The settings surface never offers values outside that range, so for
    /// any value it can produce this acts exactly like a plain assignment.
    /// The clamp only matters for callers that bypass it (hand-edited
    /// stores, the CLI), and keeps `critical <= alert` satisfiable.
    /// Lowering alert below the current critical pulls critical down to the
    /// new alert.
    pub fn set_alert(&mut self, value: u8) {
        let alert = value.clamp(ALERT_MIN_PERCENT, ALERT_MAX_PERCENT);
        if self.critical > alert {
            self.critical = alert;
        }
        self.alert = alert;
    }

    /// Set the critical percentage, clamped into `[2, alert]`.
    pub fn set_critical(&mut self, value: u8) {
        self.critical = value.clamp(CRITICAL_MIN_PERCENT, self.alert);
    }

    pub fn alert(&self) -> u8 {
        self.alert
    }

    pub fn critical(&self) -> u8 {
        self.critical
    }

    /// `(alert, critical)`.
    pub fn get(&self) -> (u8, u8) {
        (self.alert, self.critical)
    }

    /// Level at or below which the warning text is shown while critical.
    pub fn warning_level(&self) -> f32 {
        f32::from(self.critical) / 2.0
    }

    /// Re-apply the invariant to a value that bypassed the setters
    /// (deserialised from storage).
    pub fn normalized(self) -> Self {
        Self::new(self.alert, self.critical)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Run-loop configuration
// ═══════════════════════════════════════════════════════════════

/// Timing and geometry parameters for the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Battery sample interval (milliseconds)
    pub sample_interval_ms: u64,
    /// Flash toggle period while critical (milliseconds)
    pub flash_period_ms: u64,
    /// Max border width as a fraction of the smallest screen dimension
    pub border_width_fraction: f32,
    /// Dimension assumed when no screen is known (points)
    pub fallback_screen_dimension: f32,
    /// Text drawn across the screen once the warning flag is raised
    pub warning_text: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 2000, // 0.5 Hz
            flash_period_ms: 500,     // 2 Hz
            border_width_fraction: 0.016,
            fallback_screen_dimension: 1080.0,
            warning_text: "CHARGE NOW".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            return Err(Error::Config("sample_interval_ms must be > 0"));
        }
        if self.flash_period_ms == 0 {
            return Err(Error::Config("flash_period_ms must be > 0"));
        }
        if self.flash_period_ms >= self.sample_interval_ms {
            return Err(Error::Config(
                "flash_period_ms must be shorter than sample_interval_ms",
            ));
        }
        if !(self.border_width_fraction > 0.0 && self.border_width_fraction <= 0.5) {
            return Err(Error::Config("border_width_fraction must be in (0, 0.5]"));
        }
        if !(self.fallback_screen_dimension.is_finite() && self.fallback_screen_dimension > 0.0) {
            return Err(Error::Config("fallback_screen_dimension must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed monitor config JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
