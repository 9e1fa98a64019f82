//! Application service: the hexagonal core.
//!
//! [`MonitorService`] owns the threshold settings, the battery monitor, the
//! intensity engine and both periodic timers.  It is the single logical
//! owner of the intensity state: every mutation happens inside
//! [`MonitorService::advance`] or a command handler, one event at a time.
//!
//! ```text
//!  SamplerPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                  │       MonitorService        │
//!  StoragePort ◀──▶│ settings · engine · timers  │ ──▶ RenderSink
//!                  └────────────────────────────┘ ◀── GeometryPort
//! ```
//!
//! The sampler and the store are owned.  Display ports and the event sink are
//! passed in at call sites, so one painter can serve several services and
//! tests can inspect what was drawn without reaching into the service.

use log::{debug, info, warn};

use crate::app::ports::{GeometryPort, RenderSink, SamplerPort, StoragePort, TimerKind};
use crate::classifier::{BatterySample, classify};
use crate::config::{MonitorConfig, ThresholdConfig};
use crate::error::Result;
use crate::events::{Event, EventQueue};
use crate::intensity::IntensityEngine;
use crate::intensity::directive::RenderCommand;
use crate::monitor::BatteryMonitor;
use crate::pubsub::SubscriptionId;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::settings::ThresholdSettings;

use super::commands::AppCommand;
use super::events::{AppEvent, StatusLabel};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// Orchestrates sampling, classification, rendering and flashing.
pub struct MonitorService<S: SamplerPort, P: StoragePort> {
    config: MonitorConfig,
    settings: ThresholdSettings<P>,
    monitor: BatteryMonitor<S>,
    engine: IntensityEngine,
    scheduler: Scheduler,
    queue: EventQueue,
    sample_timer: Option<TaskHandle>,
    flash_timer: Option<TaskHandle>,
    last_command: Option<RenderCommand>,
    torn_down: bool,
}

impl<S: SamplerPort, P: StoragePort> MonitorService<S, P> {
    /// Build the service.  Thresholds are loaded from `store` right away.
    ///
    /// Does **not** start sampling; call
    /// [`start_monitoring`](Self::start_monitoring) next.
    pub fn new(config: MonitorConfig, sampler: S, store: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            settings: ThresholdSettings::load(store),
            monitor: BatteryMonitor::new(sampler),
            engine: IntensityEngine::new(),
            scheduler: Scheduler::new(),
            queue: EventQueue::new(),
            sample_timer: None,
            flash_timer: None,
            last_command: None,
            torn_down: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Schedule periodic sampling.  The first sample is taken on the next
    /// [`advance`](Self::advance).  Returns `false` if already monitoring or
    /// torn down.
    pub fn start_monitoring(&mut self, sink: &mut impl EventSink) -> bool {
        if self.torn_down || self.is_monitoring() {
            return false;
        }
        match self.scheduler.schedule_periodic(
            "battery-sample",
            TimerKind::Sample,
            self.config.sample_interval_ms,
            0,
        ) {
            Some(handle) => {
                self.sample_timer = Some(handle);
                sink.emit(&AppEvent::Started);
                info!(
                    "MonitorService started (sample every {}ms)",
                    self.config.sample_interval_ms
                );
                true
            }
            None => {
                warn!("MonitorService: no timer slot for sampling");
                false
            }
        }
    }

    /// Cancel both timers and stop flashing.  The last directive stays on
    /// screen (fully visible if it was flashing).
    pub fn stop_monitoring(&mut self, display: &mut impl RenderSink, sink: &mut impl EventSink) {
        if self.torn_down {
            return;
        }
        self.halt(display, sink);
        sink.emit(&AppEvent::Stopped { torn_down: false });
        info!("MonitorService stopped");
    }

    /// Stop for good.  Every later call, queued event or timer fire is a
    /// no-op.
    pub fn shutdown(&mut self, display: &mut impl RenderSink, sink: &mut impl EventSink) {
        if self.torn_down {
            return;
        }
        self.halt(display, sink);
        self.scheduler.cancel_all();
        while self.queue.pop().is_some() {}
        self.torn_down = true;
        sink.emit(&AppEvent::Stopped { torn_down: true });
        info!("MonitorService torn down");
    }

    // ── Run-loop ──────────────────────────────────────────────

    /// Move the virtual clock to `now_ms`, then process every due timer and
    /// queued host event to completion, FIFO.  Returns the number of events
    /// handled.
    pub fn advance(
        &mut self,
        now_ms: u64,
        display: &mut (impl RenderSink + GeometryPort),
        sink: &mut impl EventSink,
    ) -> usize {
        if self.torn_down {
            return 0;
        }
        self.scheduler.advance(now_ms, &mut self.queue);
        let mut handled = 0;
        while let Some(event) = self.queue.pop() {
            self.handle_event(event, display, sink);
            handled += 1;
        }
        handled
    }

    /// Queue a host event for the next [`advance`](Self::advance).
    pub fn post(&mut self, event: Event) -> bool {
        if self.torn_down {
            return false;
        }
        self.queue.push(event)
    }

    /// Handle one event immediately.
    pub fn handle_event(
        &mut self,
        event: Event,
        display: &mut (impl RenderSink + GeometryPort),
        sink: &mut impl EventSink,
    ) {
        if self.torn_down {
            debug!("MonitorService: {:?} after teardown ignored", event);
            return;
        }
        match event {
            Event::SampleTick(handle) => {
                if self.sample_timer == Some(handle) && self.scheduler.is_live(handle) {
                    self.process_sample(display, sink);
                } else {
                    debug!("MonitorService: stale sample tick ignored");
                }
            }
            Event::FlashTick(handle) => self.handle_flash_tick(handle, display, sink),
            Event::ResampleRequested => self.process_sample(display, sink),
            Event::Shutdown => self.shutdown(display, sink),
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command (settings surface, CLI).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        display: &mut (impl RenderSink + GeometryPort),
        sink: &mut impl EventSink,
    ) {
        if self.torn_down {
            debug!("MonitorService: {:?} after teardown ignored", cmd);
            return;
        }
        match cmd {
            AppCommand::SetAlert(value) => {
                let thresholds = self.settings.set_alert(value);
                sink.emit(&AppEvent::ThresholdsChanged(thresholds));
            }
            AppCommand::SetCritical(value) => {
                let thresholds = self.settings.set_critical(value);
                sink.emit(&AppEvent::ThresholdsChanged(thresholds));
            }
            AppCommand::Apply => self.process_sample(display, sink),
            AppCommand::StartMonitoring => {
                self.start_monitoring(sink);
            }
            AppCommand::StopMonitoring => self.stop_monitoring(display, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn thresholds(&self) -> ThresholdConfig {
        self.settings.thresholds()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn engine(&self) -> &IntensityEngine {
        &self.engine
    }

    /// The last command handed to the render sink.
    pub fn last_command(&self) -> Option<RenderCommand> {
        self.last_command
    }

    pub fn last_sample(&self) -> Option<BatterySample> {
        self.monitor.last_sample()
    }

    pub fn is_monitoring(&self) -> bool {
        self.sample_timer.is_some_and(|h| self.scheduler.is_live(h))
    }

    pub fn is_flash_timer_live(&self) -> bool {
        self.flash_timer.is_some_and(|h| self.scheduler.is_live(h))
    }

    /// Handle of the current flash timer, if any.
    pub fn flash_timer(&self) -> Option<TaskHandle> {
        self.flash_timer
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// When the run-loop next needs to call [`advance`](Self::advance).
    pub fn next_deadline(&self) -> Option<u64> {
        if self.torn_down {
            return None;
        }
        self.scheduler.next_deadline()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// The owned sampler, for run-loops that watch their source.
    pub fn sampler_mut(&mut self) -> &mut S {
        self.monitor.sampler_mut()
    }

    // ── Sample subscriptions ──────────────────────────────────

    /// Observe every battery sample.  The subscriber gets one immediately:
    /// the last known sample is replayed, or, when nothing has been read
    /// yet, a fresh sample is taken through the full pipeline so the border
    /// and every other subscriber see it too.
    pub fn subscribe_samples(
        &mut self,
        callback: impl FnMut(&BatterySample) + 'static,
        display: &mut (impl RenderSink + GeometryPort),
        sink: &mut impl EventSink,
    ) -> SubscriptionId {
        let id = self.monitor.subscribe(callback);
        if !self.torn_down && self.monitor.last_sample().is_none() {
            self.process_sample(display, sink);
        }
        id
    }

    pub fn unsubscribe_samples(&mut self, id: SubscriptionId) -> bool {
        self.monitor.unsubscribe(id)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Sample → classify → engine → sink, then reconcile the flash timer.
    fn process_sample(
        &mut self,
        display: &mut (impl RenderSink + GeometryPort),
        sink: &mut impl EventSink,
    ) {
        let Some(sample) = self.monitor.check() else {
            sink.emit(&AppEvent::SampleMissing);
            return;
        };
        let thresholds = self.settings.thresholds();
        let state = classify(&sample, &thresholds);
        let prev = self.engine.phase();
        let was_latched = self.engine.frozen_critical_width().is_some();

        let cmd = self
            .engine
            .on_sample(&sample, state, &thresholds, display.max_border_width());
        match cmd {
            RenderCommand::Show(directive) => display.apply(&directive),
            RenderCommand::Hide => display.hide(),
        }
        self.last_command = Some(cmd);

        let next = self.engine.phase();
        if next != prev {
            sink.emit(&AppEvent::StateChanged { from: prev, to: next });
        }
        if !was_latched {
            if let Some(width) = self.engine.frozen_critical_width() {
                sink.emit(&AppEvent::CriticalLatched { width });
            }
        }
        sink.emit(&AppEvent::Status(StatusLabel::from_sample(&sample)));
        self.sync_flash_timer(sink);
    }

    fn handle_flash_tick(
        &mut self,
        handle: TaskHandle,
        display: &mut impl RenderSink,
        sink: &mut impl EventSink,
    ) {
        if self.flash_timer != Some(handle) || !self.scheduler.is_live(handle) {
            debug!("MonitorService: stale flash tick ignored");
            return;
        }
        let thresholds = self.settings.thresholds();
        match self.engine.on_flash_tick(&thresholds) {
            Some(directive) => {
                display.apply(&directive);
                self.last_command = Some(RenderCommand::Show(directive));
            }
            None => self.sync_flash_timer(sink),
        }
    }

    /// Start or cancel the flash timer so it runs exactly while the engine
    /// is flashing.
    fn sync_flash_timer(&mut self, sink: &mut impl EventSink) {
        let wanted = self.engine.is_flashing();
        let live = self.is_flash_timer_live();
        if wanted && !live {
            let period = self.config.flash_period_ms;
            match self
                .scheduler
                .schedule_periodic("flash", TimerKind::Flash, period, period)
            {
                Some(handle) => {
                    self.flash_timer = Some(handle);
                    sink.emit(&AppEvent::Flashing(true));
                }
                None => warn!("MonitorService: no timer slot for flashing"),
            }
        } else if !wanted && live {
            self.cancel_flash_timer(sink);
        }
    }

    fn cancel_flash_timer(&mut self, sink: &mut impl EventSink) {
        if let Some(handle) = self.flash_timer.take() {
            if self.scheduler.cancel(handle) {
                sink.emit(&AppEvent::Flashing(false));
            }
        }
    }

    /// Shared by stop and shutdown: both timers gone, flashing off, border
    /// left fully visible.
    fn halt(&mut self, display: &mut impl RenderSink, sink: &mut impl EventSink) {
        if let Some(handle) = self.sample_timer.take() {
            self.scheduler.cancel(handle);
        }
        let was_flashing = self.engine.stop_flashing();
        self.cancel_flash_timer(sink);
        if was_flashing {
            if let Some(RenderCommand::Show(mut directive)) = self.last_command {
                directive.visible = true;
                display.apply(&directive);
                self.last_command = Some(RenderCommand::Show(directive));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
