use keind::prelude::*;

use crate::prelude::*;

entity_struct!(
    DashGameLogic,
    pub struct CoinEntity {}
);

impl CoinEntity {
    pub fn new_at(id: u128, position: Vec2, size: Vec2) -> Self {
        CoinEntity::new(BaseEntityState::new(id, position, size, Body::Kinematic), vec![])
    }
}

impl SEEntity<DashGameLogic> for CoinEntity {
    fn prestep(&self, _engine: &GameEngine<DashGameLogic>) -> bool {
        false
    }
}

impl PlayerContact for CoinEntity {
    fn contact_with(&self, _player: &PlayerEntity) -> Option<Contact> {
        Some(Contact::Collect)
    }
}
