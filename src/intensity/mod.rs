//! Intensity engine: battery severity to border rendering.
//!
//! ```text
//!             ┌──────────── charging / level > alert ─────────────┐
//!             ▼                                                   │
//!          NORMAL ──[level ≤ alert]──▶ ALERT ──[level ≤ crit]──▶ CRITICAL
//!          (hidden)                 (width grows             (width latched,
//!                                    linearly)                 flashing)
//! ```
//!
//! The engine holds two pieces of memory across samples:
//!
//! - the critical width, latched on entry to Critical and held until the
//!   battery is back to Normal (or charging), so the border does not keep
//!   growing once it already signals the worst case;
//! - the flash phase, flipped by flash-clock ticks while Critical.
//!
//! It never touches timers itself. After each call the owner inspects
//! [`IntensityEngine::is_flashing`] and starts or cancels the flash timer.

pub mod directive;
pub mod flash;

use log::{debug, info};

use crate::classifier::{BatterySample, BatteryState};
use crate::config::ThresholdConfig;
use directive::{RenderCommand, RenderDirective};
use flash::FlashClock;

/// Memory carried between samples.
#[derive(Debug, Clone, Default)]
struct IntensityState {
    /// Width latched when Critical was entered; cleared on Normal.
    frozen_critical_width: Option<f32>,
    /// Last observed level, used by flash ticks between samples.
    current_level: f32,
}

/// Stateful mapping from classified samples to render commands.
#[derive(Debug, Clone)]
pub struct IntensityEngine {
    state: IntensityState,
    flash: FlashClock,
    phase: BatteryState,
}

impl Default for IntensityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntensityEngine {
    pub fn new() -> Self {
        Self {
            state: IntensityState {
                frozen_critical_width: None,
                current_level: 100.0,
            },
            flash: FlashClock::new(),
            phase: BatteryState::Normal,
        }
    }

    /// Process one battery sample.
    ///
    /// `state` is the classifier's verdict for `sample`; `max_border_width`
    /// is an opaque upper bound supplied by the geometry provider.
    pub fn on_sample(
        &mut self,
        sample: &BatterySample,
        state: BatteryState,
        thresholds: &ThresholdConfig,
        max_border_width: f32,
    ) -> RenderCommand {
        let level = sample.level();
        let max_width = sanitize_width(max_border_width);
        self.state.current_level = level;

        if sample.is_charging() {
            self.stop_flashing();
            self.state.frozen_critical_width = None;
            self.enter(BatteryState::Normal);
            return RenderCommand::Hide;
        }

        self.enter(state);
        match state {
            BatteryState::Critical => {
                let width = match self.state.frozen_critical_width {
                    Some(w) => w,
                    None => {
                        info!("Intensity: critical width latched at {:.2}", max_width);
                        self.state.frozen_critical_width = Some(max_width);
                        max_width
                    }
                };
                if self.flash.start() {
                    debug!("Intensity: flashing started");
                }
                RenderCommand::Show(RenderDirective {
                    width,
                    visible: self.flash.is_visible(),
                    show_warning_text: level <= thresholds.warning_level(),
                })
            }
            BatteryState::Alert => {
                self.stop_flashing();
                RenderCommand::Show(RenderDirective {
                    width: alert_width(level, thresholds.alert(), max_width),
                    visible: true,
                    show_warning_text: false,
                })
            }
            BatteryState::Normal => {
                self.stop_flashing();
                self.state.frozen_critical_width = None;
                RenderCommand::Hide
            }
        }
    }

    /// Process one flash-clock tick.
    ///
    /// Returns `None` when flashing is not active (a stale tick); the caller
    /// must then leave the sink alone.
    pub fn on_flash_tick(&mut self, thresholds: &ThresholdConfig) -> Option<RenderDirective> {
        let width = self.state.frozen_critical_width?;
        let visible = self.flash.toggle()?;
        Some(RenderDirective {
            width,
            visible,
            show_warning_text: self.state.current_level <= thresholds.warning_level(),
        })
    }

    /// Stop flashing; forces the flash phase back to visible.
    pub fn stop_flashing(&mut self) -> bool {
        let stopped = self.flash.stop();
        if stopped {
            debug!("Intensity: flashing stopped");
        }
        stopped
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_running()
    }

    pub fn is_flash_visible(&self) -> bool {
        self.flash.is_visible()
    }

    pub fn frozen_critical_width(&self) -> Option<f32> {
        self.state.frozen_critical_width
    }

    /// Severity of the most recent sample (charging counts as Normal).
    pub fn phase(&self) -> BatteryState {
        self.phase
    }

    // ── Internal ──────────────────────────────────────────────────

    fn enter(&mut self, next: BatteryState) {
        if next != self.phase {
            info!("Intensity transition: {} -> {}", self.phase, next);
            self.phase = next;
        }
    }
}

/// Width for the Alert band: 0 at the alert threshold, `max_width` at 0 %.
pub fn alert_width(level: f32, alert_threshold: u8, max_width: f32) -> f32 {
    let alert = f32::from(alert_threshold);
    if alert <= 0.0 {
        return max_width;
    }
    (max_width * (alert - level) / alert).clamp(0.0, max_width)
}

fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}
