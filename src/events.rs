//! Run-loop event queue.
//!
//! Events are produced by the [`Scheduler`](crate::scheduler::Scheduler)
//! (via the [`SchedulerDelegate`] impl below) and by the host (commands,
//! shutdown).  They are consumed by the run-loop, one at a time, in FIFO
//! order; each one is processed to completion before the next.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ sample timer│────▶│              │     │                │
//! │ flash timer │────▶│  EventQueue  │────▶│ MonitorService │
//! │ host        │────▶│  (bounded)   │     │  (consumer)    │
//! └─────────────┘     └──────────────┘     └────────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::app::ports::{SchedulerDelegate, TimerKind};
use crate::scheduler::{TaskHandle, TimerFired};

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 32;

/// Run-loop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Battery sample timer fired.
    SampleTick(TaskHandle),
    /// Flash timer fired.
    FlashTick(TaskHandle),
    /// Host asked for a fresh sample outside the timer cadence.
    ResampleRequested,
    /// Host is tearing the monitor down.
    Shutdown,
}

/// Bounded FIFO of pending events.
pub struct EventQueue {
    queue: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        if self.queue.push_back(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("EventQueue full, dropped {:?}", event);
            return false;
        }
        true
    }

    /// Pop the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Drain all pending events into a callback, FIFO.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Events lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl SchedulerDelegate for EventQueue {
    fn on_timer_fired(&mut self, fired: TimerFired) {
        let event = match fired.kind {
            TimerKind::Sample => Event::SampleTick(fired.handle),
            TimerKind::Flash => Event::FlashTick(fired.handle),
        };
        self.push(event);
    }
}
