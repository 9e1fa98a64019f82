//! Battery monitor: polls the sampler port and fans samples out.
//!
//! The monitor is driven by the sample timer; it does not own a timer
//! itself.  Every successful [`BatteryMonitor::check`] notifies all
//! subscribers in subscription order and hands the sample back to the
//! caller, which feeds it to the intensity engine.

use log::debug;

use crate::app::ports::SamplerPort;
use crate::classifier::BatterySample;
use crate::pubsub::{SubscriptionId, Subscribers};

/// Sampler wrapper with observer fan-out.
pub struct BatteryMonitor<S: SamplerPort> {
    sampler: S,
    subscribers: Subscribers<BatterySample>,
    last: Option<BatterySample>,
    misses: u64,
}

impl<S: SamplerPort> BatteryMonitor<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            subscribers: Subscribers::new(),
            last: None,
            misses: 0,
        }
    }

    /// Register an observer.  The last known sample, if any, is replayed to
    /// it right away; after that it sees every sample delivered by
    /// [`check`](Self::check).
    ///
    /// Never reads the sampler; with no sample yet, the caller follows up
    /// with a `check`.
    pub fn subscribe(&mut self, callback: impl FnMut(&BatterySample) + 'static) -> SubscriptionId {
        let id = self.subscribers.subscribe(callback);
        if let Some(sample) = self.last {
            self.subscribers.notify_one(id, &sample);
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Read the power source once.  `None` when no source reported; the
    /// previous sample stays the last known one.
    pub fn check(&mut self) -> Option<BatterySample> {
        match self.sampler.read() {
            Some(sample) => {
                self.last = Some(sample);
                self.subscribers.notify(&sample);
                Some(sample)
            }
            None => {
                self.misses = self.misses.saturating_add(1);
                debug!("BatteryMonitor: no power source data (misses={})", self.misses);
                None
            }
        }
    }

    /// Most recent successful sample.
    pub fn last_sample(&self) -> Option<BatterySample> {
        self.last
    }

    /// Reads that produced no sample.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }
}
