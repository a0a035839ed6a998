//=========================================================================
// Event Scheduler
//=========================================================================
//
// Tick-driven, delay-aware dispatcher of pooled events.
//
// Architecture:
//   schedule<E>(delay) ─→ pool<E>.acquire() ─→ incoming
//                                                 │ (flushed)
//   tick(advance) ─→ now += advance ─→ queue: BinaryHeap<(due, seq)>
//                                         │ pop while due <= now
//                                         ▼
//                        Event::execute(cx) ─→ listeners<E>
//                                         │
//                                         └─→ pool<E>.release()
//
// Ordering: due time ascending, then enqueue sequence. Events scheduled
// while a tick is running join the same tick when they are already due.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::models::ModelRegistry;
use event::Dispatch;
use event_pool::EventPools;

//=== Module Declarations =================================================

mod event;
mod event_pool;

//=== Public API ==========================================================

pub use event::{Event, EventContext};

/// Callback invoked after each execution of one event kind.
type Listener<E> = Box<dyn FnMut(&E) + Send>;

//=== Scheduled Entry =====================================================

/// Queue slot: an event plus its ordering key.
struct Entry {
    due: Duration,
    seq: u64,
    event: Box<dyn Dispatch>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap, the earliest entry must win.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

//=== Scheduler ===========================================================

/// Central dispatcher for gameplay events.
///
/// Explicitly owned by whatever drives the simulation loop. Every
/// `schedule` call is deferred, even with a zero delay, so the caller can
/// finish filling in the payload through the returned handle before the
/// event can run.
#[derive(Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Entry>,
    incoming: Vec<Entry>,
    pools: EventPools,
    listeners: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl Scheduler {
    /// Creates a scheduler at simulation time zero with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Scheduling -------------------------------------------------------

    /// Queues an event of kind `E` to run `delay` after the current time.
    ///
    /// The instance comes from `E`'s pool (or is constructed on first use)
    /// in its neutral state. Fill in its payload through the returned
    /// handle.
    pub fn schedule<E: Event>(&mut self, delay: Duration) -> &mut E {
        let event = self.pools.acquire::<E>();
        // A delay past the end of time is simply never due.
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;

        trace!("Scheduled {} (seq {}) due at {:?}", std::any::type_name::<E>(), seq, due);

        self.incoming.push(Entry { due, seq, event });
        self.incoming
            .last_mut()
            .and_then(|entry| entry.event.as_any_mut().downcast_mut::<E>())
            .expect("Freshly scheduled event has the requested kind")
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances simulation time by `advance` and runs everything due.
    ///
    /// Events that schedule further due events extend the same tick, so a
    /// whole causal chain resolves in one call unless a link carries a
    /// positive delay. Returns the number of events executed.
    pub fn tick(&mut self, advance: Duration, models: &mut ModelRegistry) -> usize {
        self.now = self.now.saturating_add(advance);
        let mut executed = 0;

        loop {
            self.flush_incoming();

            let due = matches!(self.queue.peek(), Some(entry) if entry.due <= self.now);
            if !due {
                break;
            }

            let Some(mut entry) = self.queue.pop() else {
                break;
            };

            trace!("Executing {} (seq {})", entry.event.kind(), entry.seq);

            let mut cx = EventContext {
                scheduler: self,
                models: &mut *models,
            };
            if entry.event.dispatch(&mut cx) {
                executed += 1;
            } else {
                debug!("Skipped {}: precondition not met", entry.event.kind());
            }

            entry.event.recycle(&mut self.pools);
        }

        executed
    }

    /// Drops every pending event back into its pool without running it.
    pub fn clear(&mut self) {
        self.flush_incoming();
        let dropped = self.queue.len();
        for entry in self.queue.drain() {
            entry.event.recycle(&mut self.pools);
        }
        debug!("Cleared {} pending events", dropped);
    }

    //--- Listeners --------------------------------------------------------

    /// Registers a callback run after every execution of kind `E`.
    ///
    /// Listeners observe the event with its payload still intact, before it
    /// is reset and pooled.
    pub fn on_execute<E, F>(&mut self, listener: F)
    where
        E: Event,
        F: FnMut(&E) + Send + 'static,
    {
        self.listeners
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<Listener<E>>::new()))
            .downcast_mut::<Vec<Listener<E>>>()
            .expect("Type mismatch in listener registry")
            .push(Box::new(listener));
    }

    fn notify<E: Event>(&mut self, event: &E) {
        let listeners = self
            .listeners
            .get_mut(&TypeId::of::<E>())
            .and_then(|listeners| listeners.downcast_mut::<Vec<Listener<E>>>());

        if let Some(listeners) = listeners {
            for listener in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// Current simulation time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of events waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len() + self.incoming.len()
    }

    /// Number of `E` instances ever constructed.
    pub fn allocated<E: Event>(&self) -> usize {
        self.pools.allocated::<E>()
    }

    /// Number of idle `E` instances waiting for reuse.
    pub fn pooled<E: Event>(&self) -> usize {
        self.pools.idle::<E>()
    }

    //--- Internal Helpers -------------------------------------------------

    fn flush_incoming(&mut self) {
        self.queue.extend(self.incoming.drain(..));
    }
}

//=========================================================================
// Tests
//=========================================================================
