use serde::Deserialize;
use serde::Serialize;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    Touched(u128, u128),
}

#[derive(Debug, Clone, Default)]
pub struct TestInput {
    pub push: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TestGameLogic;

impl GameLogic for TestGameLogic {
    type Entity = EngineEntity;
    type System = EngineEntitySystem;
    type Event = TestEvent;
    type Input = TestInput;

    fn handle_overlap(engine: &GameEngine<Self>, a: &Self::Entity, b: &Self::Entity) {
        engine.register_game_event(TestEvent::Touched(a.id(), b.id()));
    }
}

entity_struct!(
    TestGameLogic,
    pub struct CrateEntity {}
);

impl SEEntity<TestGameLogic> for CrateEntity {
    fn step(&self, engine: &GameEngine<TestGameLogic>, next_self: &mut Self) {
        next_self.state.velocity.x = engine.input_for_entity(&self.id()).push;
    }
}

entity_struct!(
    TestGameLogic,
    pub struct FloorEntity {}
);

impl SEEntity<TestGameLogic> for FloorEntity {
    fn prestep(&self, _engine: &GameEngine<TestGameLogic>) -> bool {
        false
    }
}

entity_struct!(
    TestGameLogic,
    pub struct PickupEntity {
        pub value: u32,
    }
);

impl SEEntity<TestGameLogic> for PickupEntity {
    fn prestep(&self, _engine: &GameEngine<TestGameLogic>) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisappearSystem {
    pub at_step: u64,
}

impl EEntitySystem<TestGameLogic> for DisappearSystem {
    fn prestep(&self, engine: &GameEngine<TestGameLogic>, entity: &EngineEntity) -> bool {
        if engine.step_index() == self.at_step {
            engine.remove_entity(entity.id());
        }
        false
    }
}

#[derive(EntitySystem, Debug, Clone, Serialize, Deserialize)]
pub enum EngineEntitySystem {
    Disappear(DisappearSystem),
}

#[derive(EngineEntity, Debug, Clone, Serialize, Deserialize)]
pub enum EngineEntity {
    Crate(CrateEntity),
    Floor(FloorEntity),
    Pickup(PickupEntity),
}

fn floor(engine: &mut GameEngine<TestGameLogic>) -> u128 {
    let id = engine.generate_id();
    engine.insert_entity(
        FloorEntity::new(
            BaseEntityState::new(id, Vec2::new(0., 200.), Vec2::new(800., 32.), Body::Static),
            vec![],
        )
        .into(),
    )
}

fn crate_at(engine: &mut GameEngine<TestGameLogic>, position: Vec2) -> u128 {
    let id = engine.generate_id();
    engine.insert_entity(
        CrateEntity::new(
            BaseEntityState::new(id, position, Vec2::new(20., 20.), Body::Dynamic),
            vec![],
        )
        .into(),
    )
}

fn pickup_at(engine: &mut GameEngine<TestGameLogic>, position: Vec2) -> u128 {
    let id = engine.generate_id();
    engine.insert_entity(
        PickupEntity::new(
            BaseEntityState::new(id, position, Vec2::new(10., 10.), Body::Kinematic),
            vec![],
        )
        .into(),
    )
}

fn test_engine() -> GameEngine<TestGameLogic> {
    GameEngine::new(Vec2::new(800., 600.), 1800.)
}

#[test]
fn dynamic_body_lands_on_static_body() {
    let mut engine = test_engine();
    floor(&mut engine);
    let crate_id = crate_at(&mut engine, Vec2::new(100., 0.));
    assert!(!engine.is_grounded(&crate_id));
    engine.step_to(120);
    let crate_entity = engine.entity_by_id::<CrateEntity>(&crate_id).unwrap();
    assert_eq!(crate_entity.position().y, 180.);
    assert!(engine.is_grounded(&crate_id));
}

#[test]
fn input_drives_entity_step() {
    let mut engine = test_engine();
    floor(&mut engine);
    let crate_id = crate_at(&mut engine, Vec2::new(100., 180.));
    engine.set_input(crate_id, TestInput { push: 120. });
    engine.step_to(60);
    let x = engine.entity_by_id::<CrateEntity>(&crate_id).unwrap().position().x;
    assert!((x - 220.).abs() < 0.01, "x = {x}");
}

#[test]
fn overlaps_are_reported_for_subscribed_pairs_only() {
    let mut engine = test_engine();
    floor(&mut engine);
    let crate_id = crate_at(&mut engine, Vec2::new(100., 180.));
    let pickup_id = pickup_at(&mut engine, Vec2::new(105., 185.));
    assert!(engine.step().is_empty());

    engine.subscribe_overlap::<CrateEntity, PickupEntity>();
    let events = engine.step();
    assert_eq!(events.len(), 1);
    assert_eq!(*events[0], TestEvent::Touched(crate_id, pickup_id));

    // the crate also rests on the floor, that pair is never reported
    engine.subscribe_overlap::<CrateEntity, PickupEntity>();
    assert_eq!(engine.step().len(), 1);
}

#[test]
fn immediate_removal_is_visible_right_away() {
    let mut engine = test_engine();
    let crate_id = crate_at(&mut engine, Vec2::new(100., 100.));
    let pickup_id = pickup_at(&mut engine, Vec2::new(105., 105.));
    engine.subscribe_overlap::<CrateEntity, PickupEntity>();
    assert!(engine.remove_entity_immediate(&pickup_id).is_some());
    assert!(engine.remove_entity_immediate(&pickup_id).is_none());
    assert!(engine.entity_by_id_untyped(&pickup_id).is_none());
    assert!(engine.step().is_empty());
    assert!(engine.entity_by_id_untyped(&crate_id).is_some());
}

#[test]
fn deferred_events_apply_at_end_of_step() {
    let mut engine = test_engine();
    let pickup_id = pickup_at(&mut engine, Vec2::new(10., 10.));
    let spawned = PickupEntity::new(
        BaseEntityState::new(99, Vec2::new(50., 50.), Vec2::new(10., 10.), Body::Kinematic),
        vec![],
    );
    engine.spawn_entity(RefPointer::new(spawned.into()));
    engine.remove_entity(pickup_id);
    assert_eq!(engine.entity_count(), 1);
    assert!(engine.entity_by_id::<PickupEntity>(&99).is_none());
    engine.step();
    assert!(engine.entity_by_id::<PickupEntity>(&99).is_some());
    assert!(engine.entity_by_id::<PickupEntity>(&pickup_id).is_none());
}

#[test]
fn system_removes_its_entity() {
    let mut engine = test_engine();
    let id = engine.generate_id();
    engine.insert_entity(
        PickupEntity::new(
            BaseEntityState::new(id, Vec2::ZERO, Vec2::new(10., 10.), Body::Kinematic),
            vec![RefPointer::new(DisappearSystem { at_step: 3 }.into())],
        )
        .into(),
    );
    engine.step_to(3);
    assert!(engine.entity_by_id::<PickupEntity>(&id).is_some());
    assert!(engine.entity_by_id::<PickupEntity>(&id).unwrap().has_system::<DisappearSystem>());
    engine.step();
    assert!(engine.entity_by_id::<PickupEntity>(&id).is_none());
}

#[test]
fn modify_entity_checks_type() {
    let mut engine = test_engine();
    let crate_id = crate_at(&mut engine, Vec2::ZERO);
    let pickup_id = pickup_at(&mut engine, Vec2::ZERO);
    assert_eq!(
        engine.modify_entity_immediate::<PickupEntity, _>(&crate_id, |p| p.value = 5),
        None
    );
    assert_eq!(
        engine.modify_entity_immediate::<PickupEntity, _>(&pickup_id, |p| {
            p.value = 5;
            p.value
        }),
        Some(5)
    );
    assert_eq!(engine.entity_by_id::<PickupEntity>(&pickup_id).unwrap().value, 5);
}

#[test]
fn identical_engines_hash_the_same() -> anyhow::Result<()> {
    let build = || {
        let mut engine = test_engine();
        floor(&mut engine);
        crate_at(&mut engine, Vec2::new(30., 0.));
        engine
    };
    let mut a = build();
    let mut b = build();
    a.step_to(30);
    b.step_to(30);
    assert_eq!(a.state_hash()?, b.state_hash()?);
    b.step();
    assert_ne!(a.state_hash()?, b.state_hash()?);
    Ok(())
}
