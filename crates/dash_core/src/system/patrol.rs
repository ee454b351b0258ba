use serde::Deserialize;
use serde::Serialize;

use keind::prelude::*;

use crate::prelude::*;

/// Moves an entity back and forth around `start_x`. The entity never
/// leaves `[start_x - move_distance, start_x + move_distance]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolSystem {
    pub start_x: f32,
    pub move_distance: f32,
    /// Units per second.
    pub speed: f32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
}

impl PatrolSystem {
    pub fn new(start_x: f32, move_distance: f32, speed: f32) -> Self {
        Self {
            start_x,
            move_distance,
            speed,
            direction: 1.,
        }
    }

    /// Position and direction one step after `x`. Reaching a bound snaps to
    /// it exactly and turns around.
    pub fn advance(&self, x: f32) -> (f32, f32) {
        let next_x = x + self.direction * self.speed * STEP_LEN_S;
        if (next_x - self.start_x).abs() >= self.move_distance {
            (self.start_x + self.direction * self.move_distance, -self.direction)
        } else {
            (next_x, self.direction)
        }
    }
}

impl EEntitySystem<DashGameLogic> for PatrolSystem {
    fn step(
        &self,
        _engine: &GameEngine<DashGameLogic>,
        entity: &EngineEntity,
        next_entity: &mut EngineEntity,
    ) -> Option<Self> {
        let (x, direction) = self.advance(entity.position().x);
        let state = next_entity.state_mut();
        state.position.x = x;
        state.velocity.x = direction * self.speed;
        Some(Self {
            direction,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillates_between_bounds() {
        let patrol = PatrolSystem::new(500., 75., 100.);
        let mut x = 500.;
        let mut system = patrol.clone();
        let mut flips = vec![];
        // 10 seconds covers several round trips
        for _ in 0..600 {
            let (next_x, direction) = system.advance(x);
            assert!((425.0..=575.0).contains(&next_x), "x = {next_x}");
            if direction != system.direction {
                flips.push(next_x);
            }
            x = next_x;
            system.direction = direction;
        }
        assert!(flips.len() >= 3);
        for (i, at) in flips.iter().enumerate() {
            let bound = if i % 2 == 0 { 575. } else { 425. };
            assert_eq!(*at, bound);
        }
    }

    #[test]
    fn patrol_moves_entity_in_engine() {
        let mut engine = GameEngine::<DashGameLogic>::new(Vec2::new(1000., 600.), 1800.);
        let id = engine.generate_id();
        engine.insert_entity(
            EnemyEntity::new_patrolling(id, Vec2::new(500., 450.), Vec2::splat(32.), 100., 75.)
                .into(),
        );
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..600 {
            engine.step();
            let enemy = engine.entity_by_id::<EnemyEntity>(&id).unwrap();
            min_x = min_x.min(enemy.position().x);
            max_x = max_x.max(enemy.position().x);
            // kinematic, gravity does not apply
            assert_eq!(enemy.position().y, 450.);
        }
        assert_eq!(min_x, 425.);
        assert_eq!(max_x, 575.);
        let patrol = engine.entity_by_id::<EnemyEntity>(&id).unwrap().patrol().unwrap();
        assert_eq!(patrol.start_x, 500.);
    }
}
