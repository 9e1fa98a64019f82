//! Persisted threshold settings.
//!
//! Wraps a [`ThresholdConfig`] with a [`StoragePort`] and a change feed.
//! Every mutation is clamped, persisted, then broadcast.  Store failures are
//! logged and otherwise ignored: the in-memory value always wins, so the
//! operator can never be told "no".
//!
//! ## Persistence
//!
//! The pair is stored as a `postcard` blob under `borderwatch::thresholds`.
//! A missing or undecodable blob yields the defaults (20 / 10), which are
//! written back.  A decoded blob is re-normalised in case it was written by
//! something that bypassed the setters, and the repaired pair replaces it.

use log::{info, warn};

use crate::app::ports::{StoreError, StoragePort};
use crate::config::ThresholdConfig;
use crate::pubsub::{SubscriptionId, Subscribers};

const NAMESPACE: &str = "borderwatch";
const THRESHOLDS_KEY: &str = "thresholds";
const MAX_BLOB_SIZE: usize = 16;

/// The process-wide threshold store.  Construct one and pass it around.
pub struct ThresholdSettings<S: StoragePort> {
    store: S,
    current: ThresholdConfig,
    subscribers: Subscribers<ThresholdConfig>,
}

impl<S: StoragePort> ThresholdSettings<S> {
    /// Load thresholds from `store`, falling back to defaults.
    pub fn load(mut store: S) -> Self {
        let current = match read_thresholds(&store) {
            Ok(stored) => {
                let normalized = stored.normalized();
                if normalized != stored {
                    warn!(
                        "Settings: stored thresholds {:?} violated invariant, using {:?}",
                        stored.get(),
                        normalized.get()
                    );
                    if let Err(e) = write_thresholds(&mut store, &normalized) {
                        warn!("Settings: could not persist normalised thresholds: {}", e);
                    }
                }
                info!(
                    "Settings: loaded alert={} critical={}",
                    normalized.alert(),
                    normalized.critical()
                );
                normalized
            }
            Err(StoreError::IoError) => {
                warn!("Settings: store unreadable, using defaults");
                ThresholdConfig::default()
            }
            Err(e) => {
                info!("Settings: no usable stored thresholds ({}), writing defaults", e);
                let defaults = ThresholdConfig::default();
                if let Err(e) = write_thresholds(&mut store, &defaults) {
                    warn!("Settings: could not persist defaults: {}", e);
                }
                defaults
            }
        };
        Self {
            store,
            current,
            subscribers: Subscribers::new(),
        }
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        self.current
    }

    pub fn alert(&self) -> u8 {
        self.current.alert()
    }

    pub fn critical(&self) -> u8 {
        self.current.critical()
    }

    /// Set alert; critical follows it down if needed.  Returns the
    /// resulting pair.
    pub fn set_alert(&mut self, value: u8) -> ThresholdConfig {
        self.current.set_alert(value);
        self.commit();
        self.current
    }

    /// Set critical, clamped into `[2, alert]`.  Returns the resulting pair.
    pub fn set_critical(&mut self, value: u8) -> ThresholdConfig {
        self.current.set_critical(value);
        self.commit();
        self.current
    }

    /// Register a change observer.  It is called right away with the
    /// current values, then after every mutation.
    pub fn on_change(&mut self, callback: impl FnMut(&ThresholdConfig) + 'static) -> SubscriptionId {
        let id = self.subscribers.subscribe(callback);
        let current = self.current;
        self.subscribers.notify_one(id, &current);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Internal ──────────────────────────────────────────────────

    fn commit(&mut self) {
        info!(
            "Settings: alert={} critical={}",
            self.current.alert(),
            self.current.critical()
        );
        if let Err(e) = write_thresholds(&mut self.store, &self.current) {
            warn!("Settings: persist failed ({}), keeping in-memory value", e);
        }
        let current = self.current;
        self.subscribers.notify(&current);
    }
}

fn read_thresholds(store: &impl StoragePort) -> Result<ThresholdConfig, StoreError> {
    let mut buf = [0u8; MAX_BLOB_SIZE];
    let n = store.read(NAMESPACE, THRESHOLDS_KEY, &mut buf)?;
    match postcard::take_from_bytes::<ThresholdConfig>(&buf[..n]) {
        Ok((cfg, [])) => Ok(cfg),
        _ => Err(StoreError::Corrupted),
    }
}

fn write_thresholds(store: &mut impl StoragePort, cfg: &ThresholdConfig) -> Result<(), StoreError> {
    let bytes = postcard::to_allocvec(cfg).map_err(|_| StoreError::Corrupted)?;
    store.write(NAMESPACE, THRESHOLDS_KEY, &bytes)
}
