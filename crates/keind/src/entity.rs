use std::any::Any;
use std::fmt::Debug;

use bevy_math::Rect;
use bevy_math::Vec2;
use serde::Deserialize;
use serde::Serialize;

use crate::prelude::*;

/// How the engine's physics treats an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    /// Moved only by its own step logic and systems. Still takes part in
    /// overlap checks.
    #[default]
    Kinematic,
    /// Immovable. Dynamic bodies are pushed out of it and may stand on it.
    Static,
    /// Accelerated by gravity, moved by its velocity and pushed out of
    /// static bodies every step.
    Dynamic,
}

/// Positions are the top left corner of the entity. The y axis grows
/// downward.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BaseEntityState {
    #[serde(default)]
    pub id: u128,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default)]
    pub body: Body,
}

impl BaseEntityState {
    pub fn new(id: u128, position: Vec2, size: Vec2, body: Body) -> Self {
        Self {
            id,
            position,
            size,
            velocity: Vec2::ZERO,
            body,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }
}

/// A _steppable_ entity that exists in the engine.
pub trait SEEntity<G: GameLogic + 'static>: EEntity<G> {
    /// Return a boolean indicating whether the entity needs to mutate.
    /// Returning false means `step` will not be called on the
    /// entity (though it may be called on attached systems).
    fn prestep(&self, _engine: &GameEngine<G>) -> bool {
        true
    }

    /// Mutate the next version of the entity.
    fn step(&self, _engine: &GameEngine<G>, _next_self: &mut Self) {}
}

/// An entity that exists inside the engine.
pub trait EEntity<G: GameLogic + 'static>: Debug + Any + Clone {
    fn systems(&self) -> &Vec<RefPointer<G::System>>;
    fn systems_mut(&mut self) -> &mut Vec<RefPointer<G::System>>;

    fn state(&self) -> &BaseEntityState;
    fn state_mut(&mut self) -> &mut BaseEntityState;

    fn systems_by_type<T: EEntitySystem<G> + 'static>(&self) -> Vec<&T> {
        self.systems()
            .iter()
            .filter_map(|system| system.extract_ref::<T>())
            .collect()
    }

    fn has_system<T: EEntitySystem<G> + 'static>(&self) -> bool {
        !self.systems_by_type::<T>().is_empty()
    }

    fn id(&self) -> u128 {
        self.state().id
    }

    fn position(&self) -> Vec2 {
        self.state().position
    }

    fn size(&self) -> Vec2 {
        self.state().size
    }

    fn velocity(&self) -> Vec2 {
        self.state().velocity
    }

    fn body(&self) -> Body {
        self.state().body
    }

    fn center(&self) -> Vec2 {
        self.position() + self.size() / 2.0
    }

    fn rect(&self) -> Rect {
        self.state().rect()
    }

    fn step_systems(&self, engine: &GameEngine<G>, next_self_maybe: &mut Option<G::Entity>);
}

/// Run the systems attached to `entity` for one step.
///
/// Systems see the entity as it was at the start of the step. A system that
/// asks to step forces a next version of the entity to exist, and the
/// systems that survive the step are written into that version. When no
/// next version exists the attached systems are left untouched.
pub fn step_attached_systems<G, E>(
    entity: &E,
    engine: &GameEngine<G>,
    next_self_maybe: &mut Option<G::Entity>,
) where
    G: GameLogic,
    E: EEntity<G>,
    G::Entity: From<E>,
{
    if entity.systems().is_empty() {
        return;
    }
    let Some(current) = engine.entity_by_id_untyped(&entity.id()) else {
        tracing::warn!(id = %entity.id(), "stepping systems of an entity that is not in the engine");
        return;
    };
    let mut survivors = Vec::with_capacity(entity.systems().len());
    for system in entity.systems() {
        if !system.prestep(engine, current) {
            survivors.push(system.clone());
            continue;
        }
        let next_self = next_self_maybe.get_or_insert_with(|| entity.clone().into());
        if let Some(next_system) = system.step(engine, current, next_self) {
            survivors.push(RefPointer::new(next_system));
        }
    }
    if let Some(next_self) = next_self_maybe {
        *next_self.systems_mut() = survivors;
    }
}

/// Declare an entity struct carrying a `BaseEntityState` and its attached
/// systems, and implement `EEntity` for it. `SEEntity` is left to the caller.
#[macro_export]
macro_rules! entity_struct {
    (
        $game_logic:ident,
        $(#[$struct_attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident: $field_type:ty
            ),*
            $(,)?
        }
    ) => {

        $(#[$struct_attr])*
        #[derive(Default, Debug, Clone, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            #[serde(default)]
            pub state: $crate::prelude::BaseEntityState,
            #[serde(default)]
            pub systems: Vec<$crate::RefPointer<<$game_logic as $crate::prelude::GameLogic>::System>>,
            $(
                $(#[$field_attr])*
                $field_vis $field_name: $field_type,
            )*
        }


        impl $name {
            pub fn new(state: $crate::prelude::BaseEntityState, systems: Vec<$crate::RefPointer<<$game_logic as $crate::prelude::GameLogic>::System>>) -> Self {
                Self {
                    state,
                    systems,
                    ..Default::default()
                }
            }
        }

        impl $crate::prelude::EEntity<$game_logic> for $name {
            fn systems(&self) -> &Vec<$crate::RefPointer<<$game_logic as $crate::prelude::GameLogic>::System>> {
                &self.systems
            }

            fn systems_mut(&mut self) -> &mut Vec<$crate::RefPointer<<$game_logic as $crate::prelude::GameLogic>::System>> {
                &mut self.systems
            }

            fn state(&self) -> &$crate::prelude::BaseEntityState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut $crate::prelude::BaseEntityState {
                &mut self.state
            }

            fn step_systems(&self, engine: &$crate::prelude::GameEngine<$game_logic>, next_self_maybe: &mut Option<<$game_logic as $crate::prelude::GameLogic>::Entity>) {
                $crate::prelude::step_attached_systems(self, engine, next_self_maybe)
            }
        }
    };
}
