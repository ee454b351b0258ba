use serde::Deserialize;
use serde::Serialize;

use keind::prelude::*;

use crate::prelude::*;

/// Reports `GameEvent::PlayerFell` once a living player drops below
/// `threshold_y`. Never mutates the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallDeathSystem {
    pub threshold_y: f32,
}

impl FallDeathSystem {
    pub fn new(threshold_y: f32) -> Self {
        Self { threshold_y }
    }
}

impl EEntitySystem<DashGameLogic> for FallDeathSystem {
    fn prestep(&self, engine: &GameEngine<DashGameLogic>, entity: &EngineEntity) -> bool {
        if entity.position().y <= self.threshold_y {
            return false;
        }
        if let Some(player) = entity.extract_ref::<PlayerEntity>() {
            if player.alive {
                engine.register_game_event(GameEvent::PlayerFell);
            }
        }
        false
    }
}
