//=========================================================================
// Event Trait
//=========================================================================
//
// A unit of deferred gameplay work.
//
// Concrete kinds carry a small payload (actor ids, a point delta) and
// implement `execute`. The scheduler stores them type-erased behind
// `Dispatch`, which also knows how to hand the instance back to its
// kind's pool once it has run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::event_pool::EventPools;
use super::Scheduler;
use crate::core::models::ModelRegistry;

//=== Event ===============================================================

/// A deferred command scheduled through the [`Scheduler`].
///
/// `Default` is the neutral payload an instance is reset to between
/// uses. Kinds are identified by type, so scheduling an unknown kind
/// cannot be expressed.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use platformer_core::core::models::{ModelRegistry, Score};
/// use platformer_core::core::scheduler::{Event, EventContext, Scheduler};
///
/// #[derive(Default)]
/// struct Bonus {
///     points: i32,
/// }
///
/// impl Event for Bonus {
///     fn execute(&mut self, cx: &mut EventContext<'_>) {
///         let _ = cx.models_mut().get::<Score>().try_apply(self.points);
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// let mut models = ModelRegistry::new();
///
/// scheduler.schedule::<Bonus>(Duration::ZERO).points = 5;
/// scheduler.tick(Duration::ZERO, &mut models);
///
/// assert_eq!(models.get::<Score>().current_total(), 5);
/// ```
pub trait Event: Default + Send + 'static {
    /// Checked right before execution. Returning false skips the event;
    /// it is still returned to its pool.
    fn precondition(&self, _models: &ModelRegistry) -> bool {
        true
    }

    /// Runs the event's gameplay rule.
    fn execute(&mut self, cx: &mut EventContext<'_>);

    /// Restores the neutral payload.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

//=== EventContext ========================================================

/// What an executing event can touch.
///
/// Anything scheduled through the context is deferred: it runs later in
/// the same tick at the earliest, never inside the current `execute`. The
/// scheduler itself stays out of reach, so an event cannot tick or clear
/// the queue it is running from:
///
/// ```compile_fail
/// use std::time::Duration;
/// use platformer_core::core::scheduler::{Event, EventContext};
///
/// #[derive(Default)]
/// struct Nested;
///
/// impl Event for Nested {
///     fn execute(&mut self, cx: &mut EventContext<'_>) {
///         cx.scheduler.clear();
///     }
/// }
/// ```
pub struct EventContext<'a> {
    pub(super) scheduler: &'a mut Scheduler,
    pub(super) models: &'a mut ModelRegistry,
}

impl EventContext<'_> {
    /// Queues an event of kind `E` to run `delay` after the current time.
    pub fn schedule<E: Event>(&mut self, delay: Duration) -> &mut E {
        self.scheduler.schedule::<E>(delay)
    }

    /// Current simulation time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn models(&self) -> &ModelRegistry {
        &*self.models
    }

    /// Shared gameplay state, for reading and writing models.
    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut *self.models
    }
}

//=== Dispatch ============================================================

/// Object-safe face of [`Event`] used by the scheduler's queue.
pub(super) trait Dispatch: Send {
    /// Runs the event if its precondition holds. Returns whether it ran.
    fn dispatch(&mut self, cx: &mut EventContext<'_>) -> bool;

    /// Returns the instance to its kind's pool.
    fn recycle(self: Box<Self>, pools: &mut EventPools);

    fn kind(&self) -> &'static str;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Event> Dispatch for E {
    fn dispatch(&mut self, cx: &mut EventContext<'_>) -> bool {
        if !self.precondition(cx.models) {
            return false;
        }

        self.execute(cx);
        cx.scheduler.notify(&*self);
        true
    }

    fn recycle(self: Box<Self>, pools: &mut EventPools) {
        pools.release(self);
    }

    fn kind(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
