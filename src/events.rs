//! Timer-driven cycle trigger.
//!
//! The periodic control timer fires from interrupt (or timer-task)
//! context and only marks a cycle as ready; the main loop takes the mark
//! and runs the full pipeline.
//!
//! ```text
//! ┌─────────────┐  signal()  ┌──────────────┐  take()  ┌──────────────┐
//! │ Timer ISR   │───────────▶│ ready slot   │─────────▶│  Main Loop   │
//! └─────────────┘            │ (one flag)   │          │  (consumer)  │
//!                            └──────────────┘          └──────────────┘
//! ```
//!
//! The slot holds at most one pending cycle.  A tick that arrives while a
//! cycle is already pending (because the loop is still busy with the
//! previous one) is merged into it and counted, never queued: the next
//! cycle always samples fresh data instead of working through a backlog.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-slot, overwrite-on-full cycle signal.  Lock-free, ISR-safe.
pub struct CycleTrigger {
    ready: AtomicBool,
    coalesced: AtomicU32,
}

impl CycleTrigger {
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            coalesced: AtomicU32::new(0),
        }
    }

    /// Mark a cycle ready.  Safe to call from interrupt context.
    ///
    /// Returns `false` when a cycle was already pending and this tick was
    /// merged into it.
    pub fn signal(&self) -> bool {
        let was_pending = self.ready.swap(true, Ordering::AcqRel);
        if was_pending {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
        }
        !was_pending
    }

    /// Consume the pending cycle, if any.  Main loop only.
    pub fn take(&self) -> bool {
        self.ready.swap(false, Ordering::AcqRel)
    }

    /// Whether a cycle is waiting.
    pub fn is_pending(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Ticks merged into an already-pending cycle since boot.
    pub fn coalesced_ticks(&self) -> u32 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

impl Default for CycleTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// Board-wide trigger written by the control timer callback.
pub static CONTROL_TICK: CycleTrigger = CycleTrigger::new();
