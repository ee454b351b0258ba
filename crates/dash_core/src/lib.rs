use serde::Deserialize;
use serde::Serialize;

use keind::prelude::*;

pub mod audio;
pub mod config;
pub mod hud;
pub mod input;
pub mod level;
pub mod prelude;
pub mod scene;
pub mod session;

mod entity;
mod system;

use prelude::*;

/// Inputs applied to the player each step.
#[derive(Default, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct EntityInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge triggered, true only on the step the key went down.
    pub jump: bool,
}

impl EntityInput {
    pub fn from_source(source: &dyn InputSource) -> Self {
        Self {
            move_left: source.is_held(Key::Left),
            move_right: source.is_held(Key::Right),
            jump: source.was_pressed(Key::Jump),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player overlaps a coin.
    CoinTouched { coin_id: u128 },
    /// The player overlaps an enemy. `lethal` is decided by the contact
    /// direction.
    EnemyContact { enemy_id: u128, lethal: bool },
    /// The player overlaps the goal.
    GoalReached,
    /// The player dropped below the fall threshold.
    PlayerFell,
    /// The player left the ground by jumping.
    Jumped,
}

#[derive(EntitySystem, Debug, Clone, Serialize, Deserialize)]
pub enum EngineEntitySystem {
    FallDeath(FallDeathSystem),
    Patrol(PatrolSystem),
}

#[derive(EngineEntity, Debug, Clone, Serialize, Deserialize)]
pub enum EngineEntity {
    Coin(CoinEntity),
    Enemy(EnemyEntity),
    Goal(GoalEntity),
    Ground(GroundEntity),
    Platform(PlatformEntity),
    Player(PlayerEntity),
}

/// A wrapper containing the game logic structures
/// exposed to the game by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashGameLogic;

impl GameLogic for DashGameLogic {
    type Entity = EngineEntity;
    type System = EngineEntitySystem;
    type Event = GameEvent;
    type Input = EntityInput;

    fn handle_overlap(engine: &GameEngine<Self>, a: &Self::Entity, b: &Self::Entity) {
        let Some(player) = a.extract_ref::<PlayerEntity>() else {
            return;
        };
        let event = match b.contact_with(player) {
            Some(Contact::Collect) => GameEvent::CoinTouched { coin_id: b.id() },
            Some(Contact::Lethal) => GameEvent::EnemyContact {
                enemy_id: b.id(),
                lethal: true,
            },
            Some(Contact::Harmless) => GameEvent::EnemyContact {
                enemy_id: b.id(),
                lethal: false,
            },
            Some(Contact::Goal) => GameEvent::GoalReached,
            None => return,
        };
        engine.register_game_event(event);
    }
}
