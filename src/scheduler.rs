//! Periodic timer engine.
//!
//! Two independent periodic sources feed the run-loop: the battery sample
//! timer (~2 s) and the flash timer (0.5 s, Critical only).  The scheduler
//! owns both.  When a timer is due it notifies a [`SchedulerDelegate`]; the
//! run-loop implements the delegate by pushing into the
//! [`EventQueue`](crate::events::EventQueue).
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Scheduler                               │
//! │   ┌───────────────┐            ┌───────────────┐             │
//! │   │ sample 2000ms │            │ flash  500ms  │             │
//! │   └───────┬───────┘            └───────┬───────┘             │
//! │           └──────────┬─────────────────┘                     │
//! │                      ▼                                       │
//! │            SchedulerDelegate::on_timer_fired                 │
//! │                      │                                       │
//! │                      ▼                                       │
//! │                 EventQueue ──▶ MonitorService                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//!
//! Every handle carries the generation of its slot.  Cancelling bumps the
//! slot generation, so a fire notification that was already queued when the
//! task was cancelled can be recognised as stale with [`Scheduler::is_live`]
//! and dropped.  A cancelled handle never becomes live again, even if the
//! slot is reused.

use log::{debug, info};

use crate::app::ports::{SchedulerDelegate, TimerKind};

/// Maximum number of concurrent timers (stack-allocated).
const MAX_TASKS: usize = 4;

/// Identifies one scheduled task instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    slot: u8,
    generation: u32,
}

/// Notification passed to the delegate when a task is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub label: &'static str,
    pub kind: TimerKind,
    pub handle: TaskHandle,
    /// Scheduler time at which the fire was issued.
    pub at_ms: u64,
}

/// Internal bookkeeping for a live task.
#[derive(Debug, Clone)]
struct TaskEntry {
    label: &'static str,
    kind: TimerKind,
    period_ms: u64,
    next_due_ms: u64,
    generation: u32,
}

/// The timer engine.  Time is supplied by the caller as a monotonic
/// millisecond count, so tests can drive it with a virtual clock.
pub struct Scheduler {
    slots: [Option<TaskEntry>; MAX_TASKS],
    generations: [u32; MAX_TASKS],
    now_ms: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
            generations: [0; MAX_TASKS],
            now_ms: 0,
        }
    }

    /// Schedule a periodic task.  The first fire is due `first_delay_ms`
    /// after the current scheduler time (`0` fires on the next `advance`).
    ///
    /// Returns `None` if `period_ms` is zero or all slots are taken.
    pub fn schedule_periodic(
        &mut self,
        label: &'static str,
        kind: TimerKind,
        period_ms: u64,
        first_delay_ms: u64,
    ) -> Option<TaskHandle> {
        if period_ms == 0 {
            return None;
        }
        let slot = self.slots.iter().position(Option::is_none)?;
        let generation = self.generations[slot];
        self.slots[slot] = Some(TaskEntry {
            label,
            kind,
            period_ms,
            next_due_ms: self.now_ms.saturating_add(first_delay_ms),
            generation,
        });
        info!(
            "Scheduler: '{}' every {}ms (slot {}, gen {})",
            label, period_ms, slot, generation
        );
        Some(TaskHandle {
            slot: slot as u8,
            generation,
        })
    }

    /// Cancel a task.  Returns `false` for a handle that was already
    /// cancelled (or never issued by this scheduler).
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let slot = handle.slot as usize;
        if let Some(entry) = self.slots[slot].take() {
            info!("Scheduler: cancelled '{}' (slot {})", entry.label, slot);
        }
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        true
    }

    /// Cancel every task.
    pub fn cancel_all(&mut self) {
        for slot in 0..MAX_TASKS {
            if let Some(entry) = self.slots[slot].take() {
                debug!("Scheduler: cancelled '{}' (slot {})", entry.label, slot);
                self.generations[slot] = self.generations[slot].wrapping_add(1);
            }
        }
    }

    /// True while `handle` refers to a scheduled, uncancelled task.
    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.slots
            .get(handle.slot as usize)
            .and_then(Option::as_ref)
            .is_some_and(|e| e.generation == handle.generation)
    }

    /// Move the clock to `now_ms` and notify the delegate of every due task,
    /// earliest deadline first (ties by slot).  A task that missed several
    /// periods fires once and realigns to its period grid.
    ///
    /// Returns the number of fires issued.  Time never moves backwards.
    pub fn advance(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) -> usize {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;

        let mut due: heapless::Vec<(u64, usize), MAX_TASKS> = heapless::Vec::new();
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some(e) = entry {
                if e.next_due_ms <= now {
                    // Capacity equals slot count; cannot overflow.
                    let _ = due.push((e.next_due_ms, slot));
                }
            }
        }
        due.sort_unstable();

        for &(_, slot) in &due {
            let Some(entry) = self.slots[slot].as_mut() else {
                continue;
            };
            let fired = TimerFired {
                label: entry.label,
                kind: entry.kind,
                handle: TaskHandle {
                    slot: slot as u8,
                    generation: entry.generation,
                },
                at_ms: now,
            };
            let missed = (now - entry.next_due_ms) / entry.period_ms + 1;
            entry.next_due_ms += missed * entry.period_ms;
            if missed > 1 {
                debug!("Scheduler: '{}' coalesced {} periods", entry.label, missed);
            }
            delegate.on_timer_fired(fired);
        }
        due.len()
    }

    /// Earliest pending deadline, if any task is scheduled.
    pub fn next_deadline(&self) -> Option<u64> {
        self.slots
            .iter()
            .flatten()
            .map(|e| e.next_due_ms)
            .min()
    }

    /// Current scheduler time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of scheduled tasks.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
