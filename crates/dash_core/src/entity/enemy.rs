use keind::prelude::*;

use crate::prelude::*;

entity_struct!(
    DashGameLogic,
    /// Walks back and forth through its attached `PatrolSystem`. Not
    /// affected by gravity.
    pub struct EnemyEntity {}
);

impl EnemyEntity {
    pub fn new_patrolling(id: u128, position: Vec2, size: Vec2, speed: f32, move_distance: f32) -> Self {
        EnemyEntity::new(
            BaseEntityState::new(id, position, size, Body::Kinematic),
            vec![RefPointer::new(PatrolSystem::new(position.x, move_distance, speed).into())],
        )
    }

    pub fn patrol(&self) -> Option<&PatrolSystem> {
        self.systems_by_type::<PatrolSystem>().into_iter().next()
    }
}

impl SEEntity<DashGameLogic> for EnemyEntity {
    fn prestep(&self, _engine: &GameEngine<DashGameLogic>) -> bool {
        false
    }
}

impl PlayerContact for EnemyEntity {
    /// Side contacts kill, contacts from above or below do not.
    fn contact_with(&self, player: &PlayerEntity) -> Option<Contact> {
        let delta = player.center() - self.center();
        if delta.x.abs() > delta.y.abs() {
            Some(Contact::Lethal)
        } else {
            Some(Contact::Harmless)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy() -> EnemyEntity {
        EnemyEntity::new_patrolling(1, Vec2::new(500., 450.), Vec2::splat(32.), 100., 75.)
    }

    fn player_at(position: Vec2) -> PlayerEntity {
        PlayerEntity::new_at(2, position, Vec2::splat(48.), 300., 1000., 1000.)
    }

    #[test]
    fn side_contact_is_lethal() {
        let enemy = enemy();
        assert_eq!(
            enemy.contact_with(&player_at(Vec2::new(460., 442.))),
            Some(Contact::Lethal)
        );
        assert_eq!(
            enemy.contact_with(&player_at(Vec2::new(524., 442.))),
            Some(Contact::Lethal)
        );
    }

    #[test]
    fn contact_from_above_is_harmless() {
        let enemy = enemy();
        assert_eq!(
            enemy.contact_with(&player_at(Vec2::new(494., 406.))),
            Some(Contact::Harmless)
        );
    }

    #[test]
    fn enemy_carries_a_patrol() {
        let patrol = enemy().patrol().cloned().unwrap();
        assert_eq!(patrol.start_x, 500.);
        assert_eq!(patrol.move_distance, 75.);
        assert_eq!(patrol.direction, 1.);
    }
}
