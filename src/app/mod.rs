//! Application core: pure domain logic, zero I/O.
//!
//! Business rules for the monitor: classification, intensity, flash timing
//! and threshold management.  All interaction with the platform happens
//! through **port traits** defined in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
