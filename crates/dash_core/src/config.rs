use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::ensure;
use bevy_math::Vec2;
use serde::Deserialize;
use serde::Serialize;

use crate::level;

const BUNDLED_CONFIG_STR: &str = include_str!("../assets/level.json5");

/// Every tuning constant of the game. Missing keys in a config file fall
/// back to the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration, units per second².
    pub gravity: f32,
    pub initial_lives: u32,
    /// Seconds on the countdown at the start of every run.
    pub time_limit_s: u32,
    pub level_width: f32,
    pub level_height: f32,
    /// A player whose top edge is below this y has fallen out of the level.
    pub fall_death_y: f32,
    /// Horizontal span in which platforms, coins and enemies are placed.
    pub object_x: (f32, f32),
    /// When true a timeout costs a life like any other death. When false
    /// it ends the game regardless of lives left.
    pub timeout_costs_life: bool,
    pub player: PlayerConfig,
    pub ground: GroundConfig,
    pub platforms: PlatformConfig,
    pub coins: CoinConfig,
    pub enemies: EnemyConfig,
    pub goal: GoalConfig,
    pub transitions: TransitionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub jump_impulse: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub y: f32,
    pub tile_size: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub count: usize,
    pub y: f32,
    pub size: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub count: usize,
    pub y_range: (f32, f32),
    pub size: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub count: usize,
    pub y: f32,
    pub size: Vec2,
    pub speed: f32,
    /// Range of the patrol half-width, drawn once per enemy.
    pub move_distance: (f32, f32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub position: Vec2,
    pub size: Vec2,
}

/// Delays of the win and lose sequences, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// From the end of play to the stinger sound.
    pub stinger_delay_s: f32,
    /// From the stinger to the scene switch.
    pub switch_delay_s: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.,
            initial_lives: 3,
            time_limit_s: 20,
            level_width: 2500.,
            level_height: 1080.,
            fall_death_y: 1000.,
            object_x: (300., 1800.),
            timeout_costs_life: true,
            player: PlayerConfig::default(),
            ground: GroundConfig::default(),
            platforms: PlatformConfig::default(),
            coins: CoinConfig::default(),
            enemies: EnemyConfig::default(),
            goal: GoalConfig::default(),
            transitions: TransitionConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(120., 200.),
            size: Vec2::new(48., 48.),
            speed: 300.,
            jump_impulse: 1000.,
        }
    }
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            y: 500.,
            tile_size: 32.,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            count: 5,
            y: 350.,
            size: Vec2::new(96., 32.),
        }
    }
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            count: 10,
            y_range: (250., 300.),
            size: Vec2::new(32., 32.),
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: 4,
            y: 450.,
            size: Vec2::new(32., 32.),
            speed: 100.,
            move_distance: (50., 100.),
        }
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(2000., 372.),
            size: Vec2::new(32., 128.),
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            stinger_delay_s: 0.1,
            switch_delay_s: 0.5,
        }
    }
}

impl GameConfig {
    /// The config shipped in `assets/level.json5`.
    pub fn bundled() -> Result<Self> {
        Self::from_json5(BUNDLED_CONFIG_STR)
    }

    pub fn from_json5(data_str: &str) -> Result<Self> {
        let config: Self = json5::from_str(data_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json5(&data_str).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.gravity.is_finite() && self.gravity >= 0., "gravity must be finite and non-negative");
        ensure!(self.initial_lives > 0, "initial_lives must be positive");
        ensure!(self.time_limit_s > 0, "time_limit_s must be positive");
        ensure!(
            self.level_width.is_finite() && self.level_width > 0.,
            "level_width must be positive"
        );
        ensure!(
            self.level_height.is_finite() && self.level_height > 0.,
            "level_height must be positive"
        );
        ensure!(self.fall_death_y.is_finite(), "fall_death_y must be finite");
        let (start_x, end_x) = self.object_x;
        ensure!(
            start_x.is_finite() && end_x.is_finite() && 0. <= start_x && start_x < end_x && end_x <= self.level_width,
            "object_x must be an increasing range inside the level"
        );
        ensure!(
            self.ground.tile_size.is_finite() && self.ground.tile_size > 0.,
            "ground tile_size must be positive"
        );
        ensure!(self.platforms.count > 0, "platform count must be positive");
        ensure!(self.coins.count > 0, "coin count must be positive");
        ensure!(self.enemies.count > 0, "enemy count must be positive");
        for (name, count) in [
            ("platforms", self.platforms.count),
            ("coins", self.coins.count),
            ("enemies", self.enemies.count),
        ] {
            level::sections(count, start_x..end_x)
                .with_context(|| format!("cannot spread {name} across object_x"))?;
        }
        let (y_min, y_max) = self.coins.y_range;
        ensure!(y_min <= y_max, "coin y_range is inverted");
        let (d_min, d_max) = self.enemies.move_distance;
        ensure!(
            d_min.is_finite() && d_max.is_finite() && 0. < d_min && d_min <= d_max,
            "enemy move_distance must be a positive range"
        );
        ensure!(
            self.player.speed >= 0. && self.player.jump_impulse >= 0.,
            "player speed and jump impulse must be non-negative"
        );
        ensure!(self.enemies.speed > 0., "enemy speed must be positive");
        for (name, size) in [
            ("player", self.player.size),
            ("platform", self.platforms.size),
            ("coin", self.coins.size),
            ("enemy", self.enemies.size),
            ("goal", self.goal.size),
        ] {
            ensure!(
                size.is_finite() && size.x > 0. && size.y > 0.,
                "{name} size must be positive"
            );
        }
        ensure!(
            self.transitions.stinger_delay_s >= 0. && self.transitions.switch_delay_s >= 0.,
            "transition delays must be non-negative"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_defaults() -> Result<()> {
        assert_eq!(GameConfig::bundled()?, GameConfig::default());
        Ok(())
    }

    #[test]
    fn missing_keys_use_defaults() -> Result<()> {
        let config = GameConfig::from_json5("{ initial_lives: 5, coins: { count: 3 } }")?;
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.coins.count, 3);
        assert_eq!(config.coins.y_range, (250., 300.));
        assert_eq!(config.time_limit_s, 20);
        Ok(())
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(GameConfig::from_json5("{ initial_lives: 0 }").is_err());
        assert!(GameConfig::from_json5("{ object_x: [1800, 300] }").is_err());
        assert!(GameConfig::from_json5("{ enemies: { count: 0 } }").is_err());
        assert!(GameConfig::from_json5("{ coins: { y_range: [300, 250] } }").is_err());
        assert!(GameConfig::from_json5("{ ground: { tile_size: 0 } }").is_err());
        assert!(GameConfig::from_json5("not json").is_err());
    }

    #[test]
    fn rejects_object_range_beyond_f32_precision() {
        let far = "{ level_width: 200000000.0, object_x: [100000000.0, 100000032.0] }";
        assert!(GameConfig::from_json5(far).is_err());
        let near = "{ level_width: 2000.0, object_x: [1000.0, 1032.0], platforms: { count: 1 }, coins: { count: 1 }, enemies: { count: 1 } }";
        assert!(GameConfig::from_json5(near).is_ok());
    }
}
