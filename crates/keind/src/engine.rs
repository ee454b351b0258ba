/// A game engine instance for a single level.
/// Handles the "physics" of every entity in the level.
///
/// step: the smallest unit of time in the engine, `STEP_LEN_S` seconds
///
/// Anatomy of a step:
///   - modification: entities and their systems produce their next version
///     and may schedule entities for creation/removal
///   - physics: dynamic bodies are integrated against static bodies
///   - engine events: entity addition/removal is applied
///   - overlaps: subscribed type pairs that intersect are handed to the
///     game logic, which may register game events
///   - game events: returned to the caller
///
use std::any::TypeId;
use std::collections::BTreeMap;
use std::collections::HashMap;

use anyhow::Result;
use bevy_math::Rect;
use bevy_math::Vec2;

use crate::physics;
use crate::prelude::*;

pub struct GameEngine<G: GameLogic> {
    /// A counter for unique entity ids.
    id_counter: u128,

    /// The size of the space being simulated. Dynamic bodies are kept
    /// within the width; the height is informational, bodies may fall
    /// below it.
    size: Vec2,

    /// Downward acceleration applied to dynamic bodies, units per second².
    gravity: f32,

    /// The step index of the engine. Steps abstract the concept of time
    /// to make determinism easier to achieve.
    step_index: u64,

    /// Entities stored by id. Each entity is behind an Rc allowing for
    /// cheap copies of unchanged entities.
    entities: BTreeMap<u128, RefPointer<G::Entity>>,

    /// The default input for all entities. Used for cheap `&G::Input` returns.
    default_input: G::Input,
    /// Map of current input to each entity id.
    inputs: HashMap<u128, G::Input>,

    /// Type pairs whose overlaps are reported to the game logic.
    overlap_subscriptions: Vec<(TypeId, TypeId)>,

    /// Used to allow entities to register EngineEvents without
    /// an `&mut GameEngine<G>` reference.
    engine_events: (flume::Sender<EngineEvent<G>>, flume::Receiver<EngineEvent<G>>),
    /// Used to register `G::Event` objects without an `&mut GameEngine<G>`
    /// reference.
    game_events: (flume::Sender<G::Event>, flume::Receiver<G::Event>),
}

impl<G: GameLogic> Default for GameEngine<G> {
    fn default() -> Self {
        Self {
            id_counter: 0,
            size: Vec2::new(1000., 1000.), // initialize a 1000x1000 2d space for entities
            gravity: 0.,
            step_index: 0,
            entities: BTreeMap::default(),
            default_input: G::Input::default(),
            inputs: HashMap::new(),
            overlap_subscriptions: Vec::new(),
            engine_events: flume::unbounded(),
            game_events: flume::unbounded(),
        }
    }
}

impl<G: GameLogic> GameEngine<G> {
    pub fn new(size: Vec2, gravity: f32) -> Self {
        Self {
            size,
            gravity,
            ..Default::default()
        }
    }

    pub fn size(&self) -> &Vec2 {
        &self.size
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn generate_id(&mut self) -> u128 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Report overlaps between entities of type `A` and entities of type `B`
    /// to `GameLogic::handle_overlap`, every step.
    pub fn subscribe_overlap<A: 'static, B: 'static>(&mut self) {
        let pair = (TypeId::of::<A>(), TypeId::of::<B>());
        if !self.overlap_subscriptions.contains(&pair) {
            self.overlap_subscriptions.push(pair);
        }
    }

    /// Insert an entity right away. Used while building a level, before
    /// the first step.
    pub fn insert_entity(&mut self, entity: G::Entity) -> u128 {
        let id = entity.id();
        if id == 0 {
            tracing::warn!("inserting entity with id 0");
        }
        if let Some(e) = self.entities.insert(id, RefPointer::new(entity)) {
            tracing::warn!("inserting entity that already existed! {:?}", e);
        }
        id
    }

    /// Schedule an entity for creation at the end of the current step.
    pub fn spawn_entity(&self, entity: RefPointer<G::Entity>) {
        self.register_event(EngineEvent::SpawnEntity { entity });
    }

    /// Schedule an entity for removal at the end of the current step.
    pub fn remove_entity(&self, entity_id: u128) {
        self.register_event(EngineEvent::RemoveEntity { entity_id });
    }

    /// Remove an entity right away, returning it if it was present. Anything
    /// that looks the entity up afterwards, in the same step or later, will
    /// not find it.
    pub fn remove_entity_immediate(&mut self, entity_id: &u128) -> Option<RefPointer<G::Entity>> {
        self.entities.remove(entity_id)
    }

    /// Mutate an entity of type `T` in place. Returns `None` if the entity
    /// does not exist or is not a `T`.
    pub fn modify_entity_immediate<T: 'static, R>(
        &mut self,
        entity_id: &u128,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let entity_ptr = self.entities.get_mut(entity_id)?;
        if entity_ptr.extract_ref::<T>().is_none() {
            return None;
        }
        let entity = RefPointer::make_mut(entity_ptr);
        entity.extract_mut::<T>().map(f)
    }

    pub fn register_event(&self, event: EngineEvent<G>) {
        self.engine_events
            .0
            .send(event)
            .expect("engine event receiver is owned by the engine");
    }

    pub fn register_game_event(&self, event: G::Event) {
        self.game_events
            .0
            .send(event)
            .expect("game event receiver is owned by the engine");
    }

    pub fn entity_by_id_untyped(&self, id: &u128) -> Option<&RefPointer<G::Entity>> {
        self.entities.get(id)
    }

    pub fn entity_by_id<T: 'static>(&self, id: &u128) -> Option<&T> {
        self.entity_by_id_untyped(id)
            .and_then(|entity| entity.extract_ref::<T>())
    }

    pub fn entities_by_type<T: 'static>(&self) -> Vec<&T> {
        self.entities
            .values()
            .filter_map(|entity| entity.extract_ref::<T>())
            .collect::<Vec<_>>()
    }

    pub fn entities(&self) -> impl Iterator<Item = &RefPointer<G::Entity>> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn set_input(&mut self, entity_id: u128, input: G::Input) {
        self.inputs.insert(entity_id, input);
    }

    pub fn input_for_entity(&self, id: &u128) -> &G::Input {
        self.inputs.get(id).unwrap_or(&self.default_input)
    }

    /// Rects of every static body currently in the engine.
    pub fn static_rects(&self) -> Vec<Rect> {
        physics::static_rects::<G>(self.entities.values())
    }

    /// Is the entity resting on a static body and not moving upward?
    pub fn is_grounded(&self, entity_id: &u128) -> bool {
        self.entity_by_id_untyped(entity_id)
            .map(|entity| physics::grounded(entity.state(), &self.static_rects()))
            .unwrap_or(false)
    }

    /// A step is considered complete at the _end_ of this function
    pub fn step(&mut self) -> Vec<RefPointer<G::Event>> {
        // Execute the modification phase of the step
        // When an entity is stepped we get a mutable next version
        // as a clone of the current version, then apply all
        // systems. Once this is complete it is put in a RefPointer
        // and stored.
        let solids = self.static_rects();
        let mut next_entities = BTreeMap::default();
        for (id, entity) in &self.entities {
            let mut next_self_maybe = None;
            if entity.prestep(self) {
                let mut next_self = (**entity).clone();
                entity.step(self, &mut next_self);
                next_self_maybe = Some(next_self);
            }
            entity.step_systems(self, &mut next_self_maybe);
            if entity.body() == Body::Dynamic {
                let next_self = next_self_maybe.get_or_insert_with(|| (**entity).clone());
                physics::integrate(next_self.state_mut(), self.gravity, self.size.x, &solids);
            }
            // insert the next_self, if it exists
            // otherwise copy the existing RefPointer
            let next_self_ptr = if let Some(next_self) = next_self_maybe {
                RefPointer::new(next_self)
            } else {
                entity.clone()
            };
            next_entities.insert(*id, next_self_ptr);
        }

        self.entities = next_entities;

        // our entities are stepped, now we have discrete
        // engine events to apply to self.entities
        for event in self.engine_events.1.drain() {
            match event {
                EngineEvent::SpawnEntity { entity } => {
                    if entity.id() == 0 {
                        tracing::warn!("refusing to spawn entity with id 0");
                        continue;
                    }
                    if let Some(e) = self.entities.insert(entity.id(), entity) {
                        tracing::warn!("spawning entity that already existed! {:?}", e);
                    }
                }
                EngineEvent::RemoveEntity { entity_id } => {
                    if self.entities.remove(&entity_id).is_none() {
                        tracing::warn!("attempting to remove non-existent entity {entity_id}");
                    }
                }
            }
        }

        self.dispatch_overlaps();

        // record step change
        self.step_index += 1;

        self.game_events
            .1
            .drain()
            .map(RefPointer::new)
            .collect::<Vec<_>>()
    }

    fn dispatch_overlaps(&self) {
        for (type_a, type_b) in &self.overlap_subscriptions {
            let of_type = |type_id: &TypeId| {
                self.entities
                    .values()
                    .filter(|entity| KPoly::type_id(&***entity) == *type_id)
                    .collect::<Vec<_>>()
            };
            let entities_a = of_type(type_a);
            let entities_b = of_type(type_b);
            for a in &entities_a {
                for b in &entities_b {
                    if a.id() == b.id() {
                        continue;
                    }
                    if physics::intersects(&a.rect(), &b.rect()) {
                        G::handle_overlap(self, a, b);
                    }
                }
            }
        }
    }

    pub fn step_to(&mut self, to_step: u64) -> Vec<RefPointer<G::Event>> {
        assert!(to_step > self.step_index);
        let mut all_events = Vec::new();
        for _ in 0..(to_step - self.step_index) {
            let mut events = self.step();
            all_events.append(&mut events);
        }
        all_events
    }

    /// A fingerprint of every entity in the engine. Two engines that were
    /// built and stepped the same way hash the same.
    pub fn state_hash(&self) -> Result<blake3::Hash> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.step_index.to_le_bytes());
        for entity in self.entities.values() {
            let serialized = bincode::serialize(&**entity)?;
            hasher.update(&serialized);
        }
        Ok(hasher.finalize())
    }
}
