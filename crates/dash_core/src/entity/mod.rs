use crate::prelude::*;

pub mod coin;
pub mod enemy;
pub mod goal;
pub mod platform;
pub mod player;

/// The outcome of the player touching another entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// The entity is picked up.
    Collect,
    /// The player dies.
    Lethal,
    /// Touching, with no effect.
    Harmless,
    /// The level is cleared.
    Goal,
}

/// Entities that react to being touched by the player.
pub trait PlayerContact {
    /// Classify a contact with `player`. `None` means the entity does not
    /// take part in player contacts at all.
    fn contact_with(&self, _player: &PlayerEntity) -> Option<Contact> {
        None
    }
}

impl PlayerContact for EngineEntity {
    fn contact_with(&self, player: &PlayerEntity) -> Option<Contact> {
        match self {
            EngineEntity::Coin(coin) => coin.contact_with(player),
            EngineEntity::Enemy(enemy) => enemy.contact_with(player),
            EngineEntity::Goal(goal) => goal.contact_with(player),
            EngineEntity::Ground(_) | EngineEntity::Platform(_) | EngineEntity::Player(_) => None,
        }
    }
}
