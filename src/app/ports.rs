//! Port traits: the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Power-source polling, preference persistence, screen geometry and
//! painting are all platform concerns.  The [`MonitorService`](super::service::MonitorService)
//! consumes them through these traits so the core never touches a platform
//! API directly.

use crate::classifier::BatterySample;
use crate::intensity::directive::RenderDirective;
use crate::scheduler::TimerFired;

// ───────────────────────────────────────────────────────────────
// Sampler port (driven adapter: power source → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the power source.
pub trait SamplerPort {
    /// Read the current charge level and charging flag.
    ///
    /// `None` means no usable power source was found this tick; the monitor
    /// then leaves the previous directive in effect.
    fn read(&mut self) -> Option<BatterySample>;
}

// ───────────────────────────────────────────────────────────────
// Render sink (driven adapter: domain → overlay window)
// ───────────────────────────────────────────────────────────────

/// Paints directives.  Called at most at 2 Hz in steady state.
pub trait RenderSink {
    /// Bring the overlay to front and draw `directive`.
    fn apply(&mut self, directive: &RenderDirective);

    /// Take the overlay off screen.
    fn hide(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Geometry provider
// ───────────────────────────────────────────────────────────────

/// Supplies the upper bound for the border width.  Recomputed on every
/// call because the screen configuration may change at any time.
pub trait GeometryPort {
    fn max_border_width(&self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / status surfaces)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ preference store)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Writes must be atomic: a reader sees either the old or the new value.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the event queue)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a timer is due.
///
/// The run-loop implements this by pushing into the
/// [`EventQueue`](crate::events::EventQueue); the scheduler itself knows
/// nothing about events.
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, fired: TimerFired);
}

/// Which periodic source a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Battery sampling (~2 s).
    Sample,
    /// Critical-state flashing (0.5 s).
    Flash,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Requested key does not exist.
    NotFound,
    /// Stored value failed to decode.
    Corrupted,
    /// Caller's buffer is smaller than the stored value.
    BufferTooSmall,
    /// Generic I/O error from the backend.
    IoError,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Corrupted => write!(f, "value corrupted"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StoreError {}
