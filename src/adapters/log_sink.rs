//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! `log` facade (the binary routes it to stderr through `tracing-subscriber`).
//! A menu-bar or notification adapter would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink {
    last_status: Option<String>,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent status text, as a menu-bar title would show it.
    pub fn status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | monitoring"),
            AppEvent::StateChanged { from, to } => info!("STATE | {} -> {}", from, to),
            AppEvent::CriticalLatched { width } => info!("LATCH | critical width={:.2}", width),
            AppEvent::Flashing(on) => info!("FLASH | {}", if *on { "on" } else { "off" }),
            AppEvent::ThresholdsChanged(t) => {
                info!("THRESH | alert={} critical={}", t.alert(), t.critical());
            }
            AppEvent::Status(label) => {
                let text = label.to_string();
                if self.last_status.as_deref() != Some(text.as_str()) {
                    info!("STATUS | {}", text);
                    self.last_status = Some(text);
                }
            }
            AppEvent::SampleMissing => warn!("SAMPLE | no power source data"),
            AppEvent::Stopped { torn_down } => {
                if *torn_down {
                    info!("STOP  | torn down");
                } else {
                    debug!("STOP  | monitoring paused");
                }
            }
        }
    }
}
