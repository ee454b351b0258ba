pub use crate::DashGameLogic;
pub use crate::EngineEntity;
pub use crate::EngineEntitySystem;
pub use crate::EntityInput;
pub use crate::GameEvent;

pub use crate::audio::AmbientTrack;
pub use crate::audio::AudioPlayer;
pub use crate::audio::LoggedAudio;
pub use crate::audio::Sound;
pub use crate::audio::SoundHandle;

pub use crate::config::GameConfig;

pub use crate::hud::HudSnapshot;

pub use crate::input::InputSource;
pub use crate::input::Key;
pub use crate::input::ScriptedInput;

pub use crate::scene::SceneAction;
pub use crate::scene::SceneId;
pub use crate::scene::SceneManager;
pub use crate::scene::main_scene::MainScene;

pub use crate::session::GameSession;

// Entities
pub use crate::entity::Contact;
pub use crate::entity::PlayerContact;
pub use crate::entity::coin::CoinEntity;
pub use crate::entity::enemy::EnemyEntity;
pub use crate::entity::goal::GoalEntity;
pub use crate::entity::platform::GroundEntity;
pub use crate::entity::platform::PlatformEntity;
pub use crate::entity::player::PlayerEntity;

// Systems
pub use crate::system::fall_death::FallDeathSystem;
pub use crate::system::patrol::PatrolSystem;
