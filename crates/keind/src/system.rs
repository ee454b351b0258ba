use std::any::Any;

use crate::prelude::*;

/// Behavior attached to an entity by pointer. A patrol route or a watch for
/// some condition can live here without the entity type knowing about it.
///
/// Systems are immutable between steps. To change, a system returns a new
/// version of itself from `step`.
pub trait EEntitySystem<G: GameLogic>: Any {
    /// Inspect the entity as it was at the start of the step. Return true to
    /// get write access through `step`. Game events may be registered here.
    fn prestep(&self, _engine: &GameEngine<G>, _entity: &G::Entity) -> bool {
        true
    }

    /// Mutate the next version of the entity, e.g. through
    /// `next_entity.extract_mut::<EnemyEntity>()`.
    ///
    /// Runs after the entity's own step, oldest system first. Returning
    /// `None` detaches the system.
    fn step(
        &self,
        _engine: &GameEngine<G>,
        _entity: &G::Entity,
        _next_entity: &mut G::Entity,
    ) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
