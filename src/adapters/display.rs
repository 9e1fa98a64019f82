//! Screen geometry and a log-backed overlay.
//!
//! [`ScreenGeometry`] answers [`GeometryPort`]: the maximum border width is a
//! fraction of the smallest dimension across all known screens.
//! [`LogOverlay`] pairs it with a [`RenderSink`] that writes each change of
//! the drawn border to the log, which is what the host binary paints with.

use log::{debug, info};

use crate::app::ports::{GeometryPort, RenderSink};
use crate::config::MonitorConfig;
use crate::intensity::directive::RenderDirective;

/// Size of one screen, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Static screen layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGeometry {
    screens: Vec<ScreenSize>,
    fraction: f32,
    fallback_dimension: f32,
}

impl ScreenGeometry {
    pub fn new(screens: Vec<ScreenSize>, config: &MonitorConfig) -> Self {
        Self {
            screens,
            fraction: config.border_width_fraction,
            fallback_dimension: config.fallback_screen_dimension,
        }
    }

    /// Replace the screen layout (monitor plugged or unplugged).
    pub fn set_screens(&mut self, screens: Vec<ScreenSize>) {
        self.screens = screens;
    }

    pub fn screens(&self) -> &[ScreenSize] {
        &self.screens
    }

    fn smallest_dimension(&self) -> f32 {
        self.screens
            .iter()
            .map(ScreenSize::min_dimension)
            .filter(|d| d.is_finite() && *d > 0.0)
            .reduce(f32::min)
            .unwrap_or(self.fallback_dimension)
    }
}

impl GeometryPort for ScreenGeometry {
    fn max_border_width(&self) -> f32 {
        self.smallest_dimension() * self.fraction
    }
}

/// Overlay that reports what it would draw.
pub struct LogOverlay {
    geometry: ScreenGeometry,
    warning_text: String,
    shown: Option<RenderDirective>,
    draws: u64,
}

impl LogOverlay {
    pub fn new(geometry: ScreenGeometry, warning_text: impl Into<String>) -> Self {
        Self {
            geometry,
            warning_text: warning_text.into(),
            shown: None,
            draws: 0,
        }
    }

    /// Directive currently on screen, `None` while hidden.
    pub fn shown(&self) -> Option<RenderDirective> {
        self.shown
    }

    /// Number of `apply` calls so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RenderSink for LogOverlay {
    fn apply(&mut self, directive: &RenderDirective) {
        self.draws += 1;
        if self.shown == Some(*directive) {
            return;
        }
        if directive.visible {
            info!(
                "DRAW  | width={:.2} level={:?}{}",
                directive.width,
                directive.overlay_level(),
                if directive.warning_label_visible() {
                    format!(" text=\"{}\"", self.warning_text)
                } else {
                    String::new()
                }
            );
        } else {
            debug!("DRAW  | blank phase");
        }
        self.shown = Some(*directive);
    }

    fn hide(&mut self) {
        if self.shown.take().is_some() {
            info!("DRAW  | hidden");
        }
    }
}

impl GeometryPort for LogOverlay {
    fn max_border_width(&self) -> f32 {
        self.geometry.max_border_width()
    }
}
