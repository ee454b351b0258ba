use keind::prelude::*;

use crate::prelude::*;

entity_struct!(
    DashGameLogic,
    pub struct PlatformEntity {}
);

impl PlatformEntity {
    pub fn new_at(id: u128, position: Vec2, size: Vec2) -> Self {
        PlatformEntity::new(BaseEntityState::new(id, position, size, Body::Static), vec![])
    }
}

impl SEEntity<DashGameLogic> for PlatformEntity {
    fn prestep(&self, _engine: &GameEngine<DashGameLogic>) -> bool {
        false
    }
}

entity_struct!(
    DashGameLogic,
    /// One tile of the floor running along the bottom of the level.
    pub struct GroundEntity {}
);

impl GroundEntity {
    pub fn new_tile(id: u128, position: Vec2, tile_size: f32) -> Self {
        GroundEntity::new(
            BaseEntityState::new(id, position, Vec2::splat(tile_size), Body::Static),
            vec![],
        )
    }
}

impl SEEntity<DashGameLogic> for GroundEntity {
    fn prestep(&self, _engine: &GameEngine<DashGameLogic>) -> bool {
        false
    }
}
