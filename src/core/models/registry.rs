//=========================================================================
// Model Registry
//=========================================================================
//
// Typed singleton store for shared gameplay state.
//
// Architecture:
//   Events ──→ get<T>() ──→ HashMap<TypeId, Box<dyn Any>>
//                               │ (absent → T::default())
//   Setup  ──→ set<T>() ────────┘
//   Tests  ──→ reset() clears every kind at once
//
// At most one live instance exists per type. Callers only ever borrow
// the instance; the registry owns it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

use log::debug;

//=== Public API ==========================================================

/// Marker trait for types that can live in the [`ModelRegistry`].
///
/// Automatically implemented for every `Default + Send + 'static` type.
/// `Default` is what makes a missing model recoverable: the first
/// [`ModelRegistry::get`] builds one.
pub trait Model: Default + Send + 'static {}

// Blanket implementation
impl<T: Default + Send + 'static> Model for T {}

//=========================================================================

/// Type-keyed singleton store.
///
/// Holds the shared mutable state events read and write while they
/// execute: the actor roster, the score, the camera rig and the gameplay
/// tunables. Owned by the simulation for the whole process lifetime.
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    //--- Access -----------------------------------------------------------

    /// Returns the singleton of kind `T`, constructing a default instance
    /// on first access.
    pub fn get<T: Model>(&mut self) -> &mut T {
        self.models
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!("Model {} created with defaults", std::any::type_name::<T>());
                Box::new(T::default())
            })
            .downcast_mut::<T>()
            .expect("Type mismatch in ModelRegistry")
    }

    /// Returns the singleton of kind `T` if one has been created.
    ///
    /// Unlike [`get`](Self::get) this never constructs, so it works
    /// through a shared borrow.
    pub fn try_get<T: Model>(&self) -> Option<&T> {
        self.models
            .get(&TypeId::of::<T>())
            .and_then(|model| model.downcast_ref::<T>())
    }

    /// Replaces the singleton of kind `T`, returning the previous one.
    pub fn set<T: Model>(&mut self, model: T) -> Option<T> {
        self.models
            .insert(TypeId::of::<T>(), Box::new(model))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|previous| *previous)
    }

    /// Removes the singleton of kind `T`. The next `get` rebuilds it.
    pub fn remove<T: Model>(&mut self) -> Option<T> {
        self.models
            .remove(&TypeId::of::<T>())
            .and_then(|model| model.downcast::<T>().ok())
            .map(|model| *model)
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if a singleton of kind `T` currently exists.
    pub fn contains<T: Model>(&self) -> bool {
        self.models.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drops every registered model in one step.
    pub fn reset(&mut self) {
        debug!("Resetting model registry ({} kinds)", self.models.len());
        self.models.clear();
    }
}

//=========================================================================
// Tests
//=========================================================================
