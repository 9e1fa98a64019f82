//! Mock adapters for integration tests.
//!
//! Records every render and event call so tests can assert on the full
//! history without a real screen or power source.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use borderwatch::app::events::AppEvent;
use borderwatch::app::ports::{EventSink, GeometryPort, RenderSink, SamplerPort};
use borderwatch::classifier::BatterySample;
use borderwatch::intensity::directive::RenderDirective;

pub const MAX_WIDTH: f32 = 16.0;

// ── Sampler ───────────────────────────────────────────────────

/// Sampler fed from the test body; clones share one queue.
#[derive(Clone, Default)]
pub struct SharedSampler {
    queue: Rc<RefCell<VecDeque<Option<BatterySample>>>>,
}

#[allow(dead_code)]
impl SharedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: f32, charging: bool) {
        self.queue
            .borrow_mut()
            .push_back(BatterySample::new(level, charging));
    }

    /// Queue a tick with no power-source data.
    pub fn push_missing(&self) {
        self.queue.borrow_mut().push_back(None);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl SamplerPort for SharedSampler {
    fn read(&mut self) -> Option<BatterySample> {
        self.queue.borrow_mut().pop_front().flatten()
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayCall {
    Apply(RenderDirective),
    Hide,
}

pub struct MockDisplay {
    pub calls: Vec<DisplayCall>,
    pub max_width: f32,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            max_width: MAX_WIDTH,
        }
    }

    pub fn last(&self) -> Option<DisplayCall> {
        self.calls.last().copied()
    }

    pub fn last_directive(&self) -> Option<RenderDirective> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::Apply(d) => Some(*d),
            DisplayCall::Hide => None,
        })
    }

    pub fn applied(&self) -> Vec<RenderDirective> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Apply(d) => Some(*d),
                DisplayCall::Hide => None,
            })
            .collect()
    }
}

impl RenderSink for MockDisplay {
    fn apply(&mut self, directive: &RenderDirective) {
        self.calls.push(DisplayCall::Apply(*directive));
    }

    fn hide(&mut self) {
        self.calls.push(DisplayCall::Hide);
    }
}

impl GeometryPort for MockDisplay {
    fn max_border_width(&self) -> f32 {
        self.max_width
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
