use crate::prelude::*;

/// Registry changes requested during a step. They are applied after every
/// entity has moved, in the order they were registered.
#[derive(Clone, Debug)]
pub enum EngineEvent<G: GameLogic> {
    RemoveEntity { entity_id: u128 },
    SpawnEntity { entity: RefPointer<G::Entity> },
}
