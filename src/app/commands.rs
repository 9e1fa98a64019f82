//! Inbound commands to the monitor service.
//!
//! These represent actions requested by the settings surface or the host
//! that the [`MonitorService`](super::service::MonitorService) interprets.

/// Commands that external adapters can send into the monitor core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Set the alert percentage (clamped, may pull critical down).
    SetAlert(u8),

    /// Set the critical percentage (clamped into `[2, alert]`).
    SetCritical(u8),

    /// Re-sample immediately so new thresholds take effect now.
    Apply,

    /// Begin periodic sampling.
    StartMonitoring,

    /// Cancel sampling and flashing.
    StopMonitoring,
}
