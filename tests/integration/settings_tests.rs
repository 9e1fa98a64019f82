//! Integration tests for threshold persistence across process restarts.

use borderwatch::adapters::store::FileStore;
use borderwatch::app::ports::StoragePort;
use borderwatch::settings::ThresholdSettings;

#[test]
fn thresholds_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut settings = ThresholdSettings::load(FileStore::open(dir.path()).unwrap());
        settings.set_alert(45);
        settings.set_critical(12);
    }
    let settings = ThresholdSettings::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(settings.thresholds().get(), (45, 12));
}

#[test]
fn garbage_file_falls_back_to_defaults_and_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.write("borderwatch", "thresholds", b"not postcard at all").unwrap();

    let settings = ThresholdSettings::load(store);
    assert_eq!(settings.thresholds().get(), (20, 10));

    let reloaded = ThresholdSettings::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(reloaded.thresholds().get(), (20, 10));
}

#[test]
fn out_of_range_requests_are_clamped_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = ThresholdSettings::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(settings.set_alert(250).get(), (100, 10));
    assert_eq!(settings.set_critical(1).get(), (100, 2));
    assert_eq!(settings.set_critical(200).get(), (100, 100));
    assert_eq!(settings.set_alert(0).get(), (10, 10));
}
