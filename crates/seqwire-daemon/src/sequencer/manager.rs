//! The live queue slot: atomic replace, generation-tagged firing, loop/one-
//! shot lifecycle.
//!
//! The slot cell is the only state shared between the receive task and the
//! firing task. Both go through one mutex, and a firing holds the guard
//! across delivery, so a reader sees the whole old queue or the whole new
//! one, never a mixture.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use seqwire_core::protocol::{QueueUpdate, TimedEvent};

use crate::sequencer::EventSink;

/// Lifecycle of the logical queue slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No active queue.
    Idle,
    /// Events pending (or looping).
    Active,
    /// One-shot queue whose last event has fired, about to go idle.
    Draining,
}

struct Slot {
    state: SlotState,
    /// Bumped on every replace. Firings bound to an older generation are
    /// silently suppressed.
    generation: u64,
    firing: Option<JoinHandle<()>>,
}

/// Owns the live playback queue.
///
/// `apply` is the atomic replace: a new queue always preempts whatever is
/// current, regardless of prior state. The superseded firing task is aborted
/// and its generation invalidated; there is no in-place merge.
pub struct QueueManager {
    slot: Arc<Mutex<Slot>>,
    sink: Arc<dyn EventSink>,
    min_loop: Duration,
}

impl QueueManager {
    pub fn new(sink: Arc<dyn EventSink>, min_loop: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: SlotState::Idle,
                generation: 0,
                firing: None,
            })),
            sink,
            min_loop,
        }
    }

    /// Replace the live queue with `update`.
    ///
    /// An empty event list clears the slot. Otherwise the queue activates
    /// now: events already due fire immediately, in ascending-offset order
    /// with insertion-order tie-break.
    pub async fn apply(&self, update: QueueUpdate) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        let generation = slot.generation;

        if let Some(task) = slot.firing.take() {
            task.abort();
        }

        tracing::info!(
            queue = %update.name,
            one_shot = update.one_shot,
            events = update.events.len(),
            generation,
            "queue replaced"
        );

        if update.events.is_empty() {
            slot.state = SlotState::Idle;
            return;
        }

        let mut events = update.events;
        // Stable sort keeps insertion order for equal offsets.
        events.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(Ordering::Equal));

        slot.state = SlotState::Active;
        slot.firing = Some(tokio::spawn(run_queue(
            Arc::clone(&self.slot),
            generation,
            update.name,
            update.one_shot,
            events,
            Arc::clone(&self.sink),
            self.min_loop,
        )));
    }

    /// Current lifecycle state of the slot.
    pub async fn state(&self) -> SlotState {
        self.slot.lock().await.state
    }

    /// Current generation (bumped on every replace).
    pub async fn generation(&self) -> u64 {
        self.slot.lock().await.generation
    }

    /// Cancel the firing task and clear the slot. Used on shutdown so no
    /// timer fires after the receive loop is gone.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        if let Some(task) = slot.firing.take() {
            task.abort();
        }
        slot.state = SlotState::Idle;
    }
}

fn offset_duration(offset: f32) -> Duration {
    // Offsets are range-checked at decode. A hand-composed queue can still
    // carry NaN, infinities, or oversized floats; those must never reach the
    // panicking conversion, so they schedule as immediately due.
    Duration::try_from_secs_f32(offset).unwrap_or(Duration::ZERO)
}

async fn run_queue(
    slot: Arc<Mutex<Slot>>,
    generation: u64,
    name: String,
    one_shot: bool,
    events: Vec<TimedEvent>,
    sink: Arc<dyn EventSink>,
    min_loop: Duration,
) {
    let mut activation = Instant::now();
    // Loop period is the largest offset (events are sorted), floored so a
    // zero-length loop cannot busy-spin.
    let period = events
        .last()
        .map(|ev| offset_duration(ev.offset))
        .unwrap_or(Duration::ZERO)
        .max(min_loop);

    loop {
        for event in &events {
            sleep_until(activation + offset_duration(event.offset)).await;

            // Hold the guard across delivery: once a replace has gone
            // through, no event of this generation can fire.
            let guard = slot.lock().await;
            if guard.generation != generation {
                return; // stale generation, silent no-op
            }
            if let Err(e) = sink.deliver(&event.message).await {
                tracing::warn!(
                    queue = %name,
                    addr = %event.message.addr,
                    kind = e.kind().as_str(),
                    error = %e,
                    "event delivery failed"
                );
            } else {
                tracing::debug!(queue = %name, addr = %event.message.addr, offset = event.offset, "event fired");
            }
            drop(guard);
        }

        if one_shot {
            {
                let mut guard = slot.lock().await;
                if guard.generation != generation {
                    return;
                }
                guard.state = SlotState::Draining;
            }
            tokio::task::yield_now().await;
            let mut guard = slot.lock().await;
            if guard.generation == generation {
                guard.state = SlotState::Idle;
                guard.firing = None;
                tracing::info!(queue = %name, "one-shot queue drained");
            }
            return;
        }

        // Persistent queue: re-activate from offset 0.
        activation += period;
        tracing::debug!(queue = %name, "queue loop restart");
    }
}
