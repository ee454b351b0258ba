pub use bevy_math::Rect;
pub use bevy_math::Vec2;

pub use keind_macros::*;

pub use crate::GameLogic;
pub use crate::KPoly;
pub use crate::RefPointer;
pub use crate::STEP_LEN_S;
pub use crate::STEPS_PER_SECOND;
pub use crate::seconds_to_steps;

pub use crate::engine::GameEngine;

pub use crate::entity::BaseEntityState;
pub use crate::entity::Body;
pub use crate::entity::EEntity;
pub use crate::entity::SEEntity;
pub use crate::entity::step_attached_systems;

pub use crate::event::EngineEvent;

pub use crate::scheduler::CancelToken;
pub use crate::scheduler::Scheduler;
pub use crate::scheduler::SequenceStep;
pub use crate::scheduler::TaskHandle;

pub use crate::system::EEntitySystem;

pub use crate::entity_struct;
