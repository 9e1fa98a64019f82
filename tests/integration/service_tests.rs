//! Integration tests for the sampler → classifier → engine → sink pipeline,
//! driven through `MonitorService` with a virtual clock.

use super::mock_hw::{DisplayCall, MAX_WIDTH, MockDisplay, RecordingSink, SharedSampler};

use borderwatch::adapters::store::MemoryStore;
use borderwatch::app::commands::AppCommand;
use borderwatch::app::events::AppEvent;
use borderwatch::app::service::MonitorService;
use borderwatch::classifier::BatteryState;
use borderwatch::config::MonitorConfig;
use borderwatch::events::Event;

type Service = MonitorService<SharedSampler, MemoryStore>;

fn make_service() -> (Service, SharedSampler, MockDisplay, RecordingSink) {
    let sampler = SharedSampler::new();
    let svc = MonitorService::new(MonitorConfig::default(), sampler.clone(), MemoryStore::new())
        .expect("default config is valid");
    (svc, sampler, MockDisplay::new(), RecordingSink::new())
}

/// Step the clock in 500 ms increments up to and including `until`.
fn run_until(svc: &mut Service, display: &mut MockDisplay, sink: &mut RecordingSink, until: u64) {
    let mut t = svc.now_ms();
    while t <= until {
        svc.advance(t, display, sink);
        t += 500;
    }
}

fn states(sink: &RecordingSink) -> Vec<BatteryState> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn discharge_scenario_end_to_end() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    for level in [50.0, 15.0, 9.0, 4.0, 25.0] {
        sampler.push(level, false);
    }
    svc.start_monitoring(&mut sink);

    // t=0: Normal, hidden.
    svc.advance(0, &mut display, &mut sink);
    assert_eq!(display.last(), Some(DisplayCall::Hide));

    // t=2000: Alert, quarter width.
    run_until(&mut svc, &mut display, &mut sink, 2000);
    let alert = display.last_directive().unwrap();
    assert!((alert.width - 0.25 * MAX_WIDTH).abs() < 1e-4);
    assert!(alert.visible);
    assert!(!alert.show_warning_text);

    // t=4000: Critical, latched at full width, flashing, no warning yet.
    run_until(&mut svc, &mut display, &mut sink, 4000);
    assert!(sink.contains(&AppEvent::CriticalLatched { width: MAX_WIDTH }));
    assert!(svc.is_flash_timer_live());
    assert!(!display.last_directive().unwrap().show_warning_text);

    // Flash ticks between samples alternate visibility at constant width.
    run_until(&mut svc, &mut display, &mut sink, 5500);
    let flashes: Vec<_> = display.applied().into_iter().rev().take(3).collect();
    assert_eq!(
        flashes.iter().map(|d| d.visible).collect::<Vec<_>>(),
        vec![false, true, false]
    );
    assert!(flashes.iter().all(|d| (d.width - MAX_WIDTH).abs() < 1e-4));

    // t=6000: Critical at 4 %, warning text on, width unchanged.
    run_until(&mut svc, &mut display, &mut sink, 6000);
    let warned: Vec<_> = display
        .applied()
        .into_iter()
        .filter(|d| d.show_warning_text)
        .collect();
    assert!(!warned.is_empty());
    assert!(warned.iter().all(|d| (d.width - MAX_WIDTH).abs() < 1e-4));

    // t=8000: back to Normal, hidden, flashing stopped, latch cleared.
    run_until(&mut svc, &mut display, &mut sink, 8000);
    assert_eq!(display.last(), Some(DisplayCall::Hide));
    assert!(!svc.is_flash_timer_live());
    assert_eq!(svc.engine().frozen_critical_width(), None);
    assert!(svc.engine().is_flash_visible());

    assert_eq!(
        states(&sink),
        vec![BatteryState::Alert, BatteryState::Critical, BatteryState::Normal]
    );
}

#[test]
fn flash_tick_queued_with_recovering_sample_is_dropped() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(8.0, false);
    sampler.push(60.0, false);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    assert!(svc.is_flash_timer_live());

    // At t=2000 the sample and a flash fire are both due; the sample runs
    // first, hides the border and cancels flashing, and the already-queued
    // flash fire must not resurrect it.
    run_until(&mut svc, &mut display, &mut sink, 1500);
    let flashes_before = display.applied().len();
    svc.advance(2000, &mut display, &mut sink);
    assert_eq!(display.applied().len(), flashes_before);
    assert_eq!(display.last(), Some(DisplayCall::Hide));
    assert!(!svc.is_flash_timer_live());
}

#[test]
fn stale_flash_handle_is_ignored() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(8.0, false);
    sampler.push(50.0, false);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    let old = svc.flash_timer().unwrap();

    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);
    let calls = display.calls.len();
    svc.handle_event(Event::FlashTick(old), &mut display, &mut sink);
    assert_eq!(display.calls.len(), calls);
}

#[test]
fn missing_sample_keeps_previous_directive() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(15.0, false);
    sampler.push_missing();
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    let before = display.calls.len();

    svc.advance(2000, &mut display, &mut sink);
    assert_eq!(display.calls.len(), before);
    assert!(sink.contains(&AppEvent::SampleMissing));
    assert!(svc.last_command().is_some_and(|c| !c.is_hidden()));
    assert_eq!(svc.last_sample().map(|s| s.level()), Some(15.0));
}

#[test]
fn charging_during_critical_hides_immediately() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(3.0, false);
    sampler.push(3.0, true);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    svc.advance(2000, &mut display, &mut sink);

    assert_eq!(display.last(), Some(DisplayCall::Hide));
    assert!(!svc.engine().is_flashing());
    assert!(sink.contains(&AppEvent::Flashing(false)));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Status(label) if label.to_string() == "\u{26a1}3"
    )));
}

#[test]
fn latched_width_ignores_geometry_until_normal() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    for level in [9.0, 8.0, 50.0, 9.0] {
        sampler.push(level, false);
    }
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);

    display.max_width = 40.0;
    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);
    assert_eq!(svc.engine().frozen_critical_width(), Some(MAX_WIDTH));

    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);
    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);
    assert_eq!(svc.engine().frozen_critical_width(), Some(40.0));
}

#[test]
fn threshold_change_applies_on_resample() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(30.0, false);
    sampler.push(30.0, false);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    assert_eq!(display.last(), Some(DisplayCall::Hide));

    svc.handle_command(AppCommand::SetAlert(40), &mut display, &mut sink);
    svc.handle_command(AppCommand::SetCritical(35), &mut display, &mut sink);
    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);

    assert_eq!(svc.thresholds().get(), (40, 35));
    assert_eq!(svc.engine().phase(), BatteryState::Critical);
    assert!(sink.count(|e| matches!(e, AppEvent::ThresholdsChanged(_))) == 2);
}

#[test]
fn stop_then_restart_resumes_sampling() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(15.0, false);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);

    svc.stop_monitoring(&mut display, &mut sink);
    assert!(!svc.is_monitoring());
    sampler.push(12.0, false);
    svc.advance(10_000, &mut display, &mut sink);
    assert_eq!(sampler.pending(), 1);

    assert!(svc.start_monitoring(&mut sink));
    svc.advance(10_000, &mut display, &mut sink);
    assert_eq!(sampler.pending(), 0);
    assert_eq!(svc.last_sample().map(|s| s.level()), Some(12.0));
}

#[test]
fn shutdown_via_event_silences_everything() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(5.0, false);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);

    assert!(svc.post(Event::Shutdown));
    svc.advance(100, &mut display, &mut sink);
    assert!(svc.is_torn_down());
    assert!(sink.contains(&AppEvent::Stopped { torn_down: true }));

    let calls = display.calls.len();
    sampler.push(5.0, false);
    for t in (500..=10_000).step_by(500) {
        assert_eq!(svc.advance(t, &mut display, &mut sink), 0);
    }
    svc.handle_command(AppCommand::Apply, &mut display, &mut sink);
    assert_eq!(display.calls.len(), calls);
    assert_eq!(svc.next_deadline(), None);
}

#[test]
fn sample_subscribers_see_every_reading() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(70.0, false);
    sampler.push(60.0, false);
    sampler.push(50.0, false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let id = svc.subscribe_samples(
        move |s| log.borrow_mut().push(s.level()),
        &mut display,
        &mut sink,
    );

    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);
    assert!(svc.unsubscribe_samples(id));
    svc.advance(2000, &mut display, &mut sink);

    assert_eq!(*seen.borrow(), vec![70.0, 60.0]);
    assert_eq!(sampler.pending(), 0);
}

#[test]
fn first_subscriber_reading_reaches_the_border() {
    let (mut svc, sampler, mut display, mut sink) = make_service();
    sampler.push(8.0, false);
    svc.subscribe_samples(|_| {}, &mut display, &mut sink);
    svc.start_monitoring(&mut sink);
    svc.advance(0, &mut display, &mut sink);

    let first = display.applied()[0];
    assert!((first.width - MAX_WIDTH).abs() < 1e-4);
    assert_eq!(svc.engine().frozen_critical_width(), Some(MAX_WIDTH));
    assert_eq!(svc.last_sample().map(|s| s.level()), Some(8.0));
    assert!(sink.contains(&AppEvent::CriticalLatched { width: MAX_WIDTH }));
    assert!(svc.is_flash_timer_live());
}
