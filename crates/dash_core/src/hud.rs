use std::fmt;

use crate::prelude::*;

/// Everything a host needs to draw the interface for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    pub scene: SceneId,
    pub lives: u32,
    pub coins: u32,
    pub time_left: u32,
}

impl HudSnapshot {
    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }

    pub fn coins_label(&self) -> String {
        format!("Coins: {}", self.coins)
    }

    pub fn time_label(&self) -> String {
        format!("Time: {}s", self.time_left)
    }

    /// Text lines for the current scene, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        match self.scene {
            SceneId::Idle => vec![],
            SceneId::Main => vec![self.lives_label(), self.coins_label(), self.time_label()],
            SceneId::GameOver => vec!["GAME OVER".into(), "Press space to restart".into()],
            SceneId::Clear => vec![
                "CLEAR!".into(),
                format!("Coins collected: {}", self.coins),
                "Press space to restart".into(),
            ],
        }
    }
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.scene, self.lines().join(" | "))
    }
}
