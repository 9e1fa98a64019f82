//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters, driven by a virtual millisecond clock.

mod mock_hw;
mod service_tests;
mod settings_tests;
