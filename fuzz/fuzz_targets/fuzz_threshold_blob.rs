//! Fuzz target: loading thresholds from an arbitrary persisted blob.
//!
//! Whatever bytes sit in the store, `ThresholdSettings::load` must not panic
//! and must come back with `10 <= alert <= 100` and `2 <= critical <= alert`.
//!
//! cargo fuzz run fuzz_threshold_blob

#![no_main]

use borderwatch::adapters::store::MemoryStore;
use borderwatch::app::ports::StoragePort;
use borderwatch::settings::ThresholdSettings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut store = MemoryStore::new();
    if store.write("borderwatch", "thresholds", data).is_err() {
        return;
    }
    let mut settings = ThresholdSettings::load(store);

    let check = |alert: u8, critical: u8| {
        assert!((10..=100).contains(&alert), "alert {alert} out of range");
        assert!(critical >= 2 && critical <= alert, "critical {critical} out of range");
    };
    let (alert, critical) = settings.thresholds().get();
    check(alert, critical);

    // Mutations driven by the same bytes keep the invariant too.
    for pair in data.chunks(2) {
        let t = match pair {
            [a, c] => {
                settings.set_alert(*a);
                settings.set_critical(*c)
            }
            [a] => settings.set_alert(*a),
            _ => continue,
        };
        let (alert, critical) = t.get();
        check(alert, critical);
    }
});
