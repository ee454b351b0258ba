use keind::prelude::*;

use crate::prelude::*;

entity_struct!(
    DashGameLogic,
    pub struct PlayerEntity {
        /// Horizontal speed while a direction key is held, units per second.
        pub speed: f32,
        /// Upward velocity applied by a jump.
        pub jump_impulse: f32,
        pub alive: bool,
    }
);

impl PlayerEntity {
    pub fn new_at(
        id: u128,
        position: Vec2,
        size: Vec2,
        speed: f32,
        jump_impulse: f32,
        fall_death_y: f32,
    ) -> Self {
        Self {
            state: BaseEntityState::new(id, position, size, Body::Dynamic),
            systems: vec![RefPointer::new(FallDeathSystem::new(fall_death_y).into())],
            speed,
            jump_impulse,
            alive: true,
        }
    }

    /// Mark the player dead. Returns true only for the call that made the
    /// transition, every later call is a no-op.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }
}

impl SEEntity<DashGameLogic> for PlayerEntity {
    fn step(&self, engine: &GameEngine<DashGameLogic>, next_self: &mut Self) {
        if !self.alive {
            next_self.state.velocity.x = 0.;
            return;
        }
        let input = engine.input_for_entity(&self.id());
        let direction = input.move_right as i32 - input.move_left as i32;
        next_self.state.velocity.x = direction as f32 * self.speed;

        if input.jump && engine.is_grounded(&self.id()) {
            next_self.state.velocity.y = -self.jump_impulse;
            engine.register_game_event(GameEvent::Jumped);
        }
    }
}
