//! Borderwatch library.
//!
//! Turns a stream of battery samples into screen-border render directives:
//! hidden while healthy, a border that grows as the charge drops below the
//! alert threshold, and a latched, flashing border (with a warning label
//! near the end) once the charge is critical.
//!
//! Everything platform-specific sits behind the port traits in
//! [`app::ports`]; the modules here are pure logic and run anywhere.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod intensity;
pub mod monitor;
pub mod pubsub;
pub mod scheduler;
pub mod settings;

pub use error::{Error, Result};
