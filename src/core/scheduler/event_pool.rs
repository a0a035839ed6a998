//=========================================================================
// Event Pools
//=========================================================================
//
// Per-kind free lists of consumed event instances.
//
// Type-erased so the scheduler can keep every kind's pool in one
// HashMap without knowing the concrete event types.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::Event;

//=========================================================================

/// Type-erased view of one kind's pool.
pub(super) trait PoolStorage: Send {
    /// Number of idle instances ready for reuse.
    fn idle(&self) -> usize;

    /// Number of instances ever constructed for this kind.
    fn allocated(&self) -> usize;

    /// Downcasts to `&mut dyn Any` for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

/// Free list for a single event kind.
pub(super) struct EventPool<E: Event> {
    free: Vec<Box<E>>,
    allocated: usize,
}

impl<E: Event> EventPool<E> {
    fn new() -> Self {
        Self {
            free: Vec::new(),
            allocated: 0,
        }
    }

    /// Hands out an idle instance, or constructs one if none is idle.
    fn acquire(&mut self) -> Box<E> {
        match self.free.pop() {
            Some(event) => event,
            None => {
                self.allocated += 1;
                Box::<E>::default()
            }
        }
    }

    /// Takes a consumed instance back. Its payload is cleared first so the
    /// pool never holds on to references from a previous run.
    fn release(&mut self, mut event: Box<E>) {
        event.reset();
        self.free.push(event);
    }
}

impl<E: Event> PoolStorage for EventPool<E> {
    fn idle(&self) -> usize {
        self.free.len()
    }

    fn allocated(&self) -> usize {
        self.allocated
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================

/// All pools, keyed by event kind.
#[derive(Default)]
pub(super) struct EventPools {
    pools: HashMap<TypeId, Box<dyn PoolStorage>>,
}

impl EventPools {
    pub fn acquire<E: Event>(&mut self) -> Box<E> {
        self.pool_mut::<E>().acquire()
    }

    pub fn release<E: Event>(&mut self, event: Box<E>) {
        self.pool_mut::<E>().release(event);
    }

    pub fn allocated<E: Event>(&self) -> usize {
        self.pools
            .get(&TypeId::of::<E>())
            .map(|pool| pool.allocated())
            .unwrap_or(0)
    }

    pub fn idle<E: Event>(&self) -> usize {
        self.pools
            .get(&TypeId::of::<E>())
            .map(|pool| pool.idle())
            .unwrap_or(0)
    }

    fn pool_mut<E: Event>(&mut self) -> &mut EventPool<E> {
        self.pools
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(EventPool::<E>::new()))
            .as_any_mut()
            .downcast_mut::<EventPool<E>>()
            .expect("Type mismatch in event pool")
    }
}

//=========================================================================
// Tests
//=========================================================================
