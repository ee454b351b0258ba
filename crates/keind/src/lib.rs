/// keind is a deterministic, fixed step game engine. It steps a registry of
/// entities, integrates simple rigid bodies, reports overlaps between
/// subscribed entity types, and runs deferred work through a step based
/// scheduler.
///
/// Everything runs on one thread, inline with the caller's frame loop.
///
mod engine;
mod entity;
mod event;
mod physics;
pub mod prelude;
mod scheduler;
mod system;

#[cfg(test)]
mod test;

#[doc(hidden)]
pub use tracing;

/// The engine is single threaded, there is no use for atomics.
pub use std::rc::Rc as RefPointer;

use serde::Serialize;
use std::fmt::Debug;

/// Number of engine steps in one simulated second.
pub const STEPS_PER_SECOND: u64 = 60;
/// Length of a single step in seconds.
pub const STEP_LEN_S: f32 = 1.0 / STEPS_PER_SECOND as f32;

/// Convert a duration in seconds to a whole number of steps, rounding to the
/// nearest step.
pub fn seconds_to_steps(seconds: f32) -> u64 {
    (seconds * STEPS_PER_SECOND as f32).round().max(0.0) as u64
}

pub trait KPoly {
    /// Retrieve a runtime TypeId for an instance.
    fn type_id(&self) -> std::any::TypeId;

    fn as_any(&self) -> &dyn std::any::Any;
    fn extract_ref<T: 'static>(&self) -> Option<&T>;
    fn extract_mut<T: 'static>(&mut self) -> Option<&mut T>;
}

pub trait GameLogic: Clone + 'static {
    type Entity: entity::SEEntity<Self> + KPoly + Debug + Clone + Serialize; // Enum wrapping all possible entities
    type System: system::EEntitySystem<Self> + KPoly + Debug + Clone + Serialize; // Enum wrapping all possible systems
    type Input: Default + Clone; // User input
    type Event: Clone + Debug; // Game event, distinct from Engine event, which is internal to keind

    /// Invoked once per step for every overlapping pair of a subscribed
    /// type pair, after all entities have moved. `a` is always an instance
    /// of the first type of the subscription.
    ///
    /// Game events may be registered here.
    fn handle_overlap(engine: &engine::GameEngine<Self>, a: &Self::Entity, b: &Self::Entity);
}
