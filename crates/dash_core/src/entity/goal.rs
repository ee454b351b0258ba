use keind::prelude::*;

use crate::prelude::*;

entity_struct!(
    DashGameLogic,
    /// A trigger region. Not solid, the player passes into it.
    pub struct GoalEntity {}
);

impl GoalEntity {
    pub fn new_at(id: u128, position: Vec2, size: Vec2) -> Self {
        GoalEntity::new(BaseEntityState::new(id, position, size, Body::Kinematic), vec![])
    }
}

impl SEEntity<DashGameLogic> for GoalEntity {
    fn prestep(&self, _engine: &GameEngine<DashGameLogic>) -> bool {
        false
    }
}

impl PlayerContact for GoalEntity {
    fn contact_with(&self, _player: &PlayerEntity) -> Option<Contact> {
        Some(Contact::Goal)
    }
}
