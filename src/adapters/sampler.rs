//! Scripted power source.
//!
//! Replays a fixed list of readings, one per [`SamplerPort::read`].  Used by
//! the `run` subcommand and by tests in place of a platform battery API.
//!
//! Script syntax, comma separated:
//!
//! | Step   | Meaning                          |
//! |--------|----------------------------------|
//! | `42`   | 42 %, discharging                |
//! | `42+`  | 42 %, charging                   |
//! | `-`    | no power source this tick        |

use std::collections::VecDeque;

use log::debug;

use crate::app::ports::SamplerPort;
use crate::classifier::BatterySample;
use crate::error::{Error, Result};

/// Replays a script of readings.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    steps: VecDeque<Option<BatterySample>>,
    hold_last: bool,
    last: Option<BatterySample>,
}

impl ScriptedSampler {
    pub fn new(steps: impl IntoIterator<Item = Option<BatterySample>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            hold_last: false,
            last: None,
        }
    }

    /// Parse the comma-separated script format.
    pub fn parse(script: &str) -> Result<Self> {
        let steps = script
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_step)
            .collect::<Result<Vec<_>>>()?;
        if steps.is_empty() {
            return Err(Error::Sample("empty sample script"));
        }
        Ok(Self::new(steps))
    }

    /// Keep reporting the last reading once the script runs out, instead of
    /// reporting no source.
    pub fn hold_last(mut self, hold: bool) -> Self {
        self.hold_last = hold;
        self
    }

    /// Steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

fn parse_step(step: &str) -> Result<Option<BatterySample>> {
    if step == "-" {
        return Ok(None);
    }
    let (level, charging) = match step.strip_suffix('+') {
        Some(level) => (level, true),
        None => (step, false),
    };
    let level: f32 = level
        .trim()
        .parse()
        .map_err(|_| Error::Sample("level is not a number"))?;
    BatterySample::new(level, charging)
        .map(Some)
        .ok_or(Error::Sample("level is not finite"))
}

impl SamplerPort for ScriptedSampler {
    fn read(&mut self) -> Option<BatterySample> {
        match self.steps.pop_front() {
            Some(step) => {
                if step.is_some() {
                    self.last = step;
                }
                step
            }
            None if self.hold_last => self.last,
            None => {
                debug!("ScriptedSampler: script exhausted");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_step_kinds() {
        let mut s = ScriptedSampler::parse("50, 9.5, 4+, -").unwrap();
        assert_eq!(s.remaining(), 4);
        assert_eq!(s.read(), BatterySample::new(50.0, false));
        assert_eq!(s.read(), BatterySample::new(9.5, false));
        assert_eq!(s.read(), BatterySample::new(4.0, true));
        assert_eq!(s.read(), None);
        assert_eq!(s.read(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            ScriptedSampler::parse("50,abc").unwrap_err(),
            Error::Sample("level is not a number")
        );
        assert!(ScriptedSampler::parse("NaN").is_err());
        assert!(ScriptedSampler::parse(" , ").is_err());
    }

    #[test]
    fn hold_last_repeats_final_reading() {
        let mut s = ScriptedSampler::parse("30,-").unwrap().hold_last(true);
        s.read();
        assert_eq!(s.read(), None);
        assert_eq!(s.read(), BatterySample::new(30.0, false));
        assert_eq!(s.read(), BatterySample::new(30.0, false));
    }
}
