use anyhow::Result;
use keind::prelude::*;
use rand::Rng;

use crate::level;
use crate::prelude::*;

/// The playable scene. Owns the engine holding the level, and the scheduler
/// running the countdown and the win/lose sequences. Dropping the scene
/// drops every entity in it.
pub struct MainScene {
    engine: GameEngine<DashGameLogic>,
    scheduler: Scheduler<SceneAction>,
    countdown: TaskHandle,
    transition: Option<TaskHandle>,
    player_id: u128,
}

impl MainScene {
    /// Build a fresh level and start the countdown.
    pub fn enter<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        let mut engine = GameEngine::new(
            Vec2::new(config.level_width, config.level_height),
            config.gravity,
        );
        let player_id = level::build_level(config, &mut engine, rng)?;
        let mut scheduler = Scheduler::new();
        let countdown = scheduler.run_every(
            engine.step_index(),
            STEPS_PER_SECOND,
            SceneAction::CountdownTick,
        );
        Ok(Self {
            engine,
            scheduler,
            countdown,
            transition: None,
            player_id,
        })
    }

    pub fn engine(&self) -> &GameEngine<DashGameLogic> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine<DashGameLogic> {
        &mut self.engine
    }

    pub fn player_id(&self) -> u128 {
        self.player_id
    }

    pub fn player(&self) -> Option<&PlayerEntity> {
        self.engine.entity_by_id::<PlayerEntity>(&self.player_id)
    }

    pub fn player_alive(&self) -> bool {
        self.player().map(|player| player.alive).unwrap_or(false)
    }

    /// Mark the player dead. True only for the call that made the
    /// transition.
    pub fn kill_player(&mut self) -> bool {
        let player_id = self.player_id;
        self.engine
            .modify_entity_immediate::<PlayerEntity, _>(&player_id, |player| player.kill())
            .unwrap_or(false)
    }

    /// Remove a coin from the level right away so a second overlap in the
    /// same step cannot find it. True if the coin was still there.
    pub fn take_coin(&mut self, coin_id: &u128) -> bool {
        if self.engine.entity_by_id::<CoinEntity>(coin_id).is_none() {
            return false;
        }
        self.engine.remove_entity_immediate(coin_id).is_some()
    }

    /// Advance the level by one step with the frame's input.
    pub fn step(&mut self, input: &dyn InputSource) -> Vec<RefPointer<GameEvent>> {
        self.engine
            .set_input(self.player_id, EntityInput::from_source(input));
        self.engine.step()
    }

    /// Start a win or lose sequence, replacing any sequence already running.
    pub fn run_transition(&mut self, steps: Vec<SequenceStep<SceneAction>>) {
        if let Some(previous) = self.transition.take() {
            self.scheduler.cancel(&previous);
        }
        let handle = self.scheduler.run_sequence(self.engine.step_index(), steps);
        self.transition = Some(handle);
    }

    pub fn transition_pending(&self) -> bool {
        self.transition
            .as_ref()
            .map(|handle| self.scheduler.is_pending(handle))
            .unwrap_or(false)
    }

    pub fn countdown_running(&self) -> bool {
        self.scheduler.is_pending(&self.countdown)
    }

    /// Scheduled actions due at the current step.
    pub fn due_actions(&mut self) -> Vec<SceneAction> {
        self.scheduler.drain_due(self.engine.step_index())
    }

    /// Cancel the countdown and any pending sequence. Nothing scheduled by
    /// this scene runs afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.transition = None;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn scene() -> MainScene {
        MainScene::enter(&GameConfig::default(), &mut ChaCha8Rng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn countdown_ticks_every_second() {
        let mut scene = scene();
        let input = ScriptedInput::default();
        let mut ticks = 0;
        for _ in 0..180 {
            scene.step(&input);
            ticks += scene
                .due_actions()
                .iter()
                .filter(|action| **action == SceneAction::CountdownTick)
                .count();
        }
        assert_eq!(ticks, 3);
    }

    #[test]
    fn teardown_cancels_everything() {
        let mut scene = scene();
        scene.run_transition(vec![
            SequenceStep::new(6, SceneAction::PlaySound(Sound::Clear)),
            SequenceStep::new(30, SceneAction::SwitchScene(SceneId::Clear)),
        ]);
        assert!(scene.transition_pending());
        assert!(scene.countdown_running());
        scene.teardown();
        assert!(!scene.transition_pending());
        assert!(!scene.countdown_running());
        let input = ScriptedInput::default();
        for _ in 0..120 {
            scene.step(&input);
            assert!(scene.due_actions().is_empty());
        }
    }

    #[test]
    fn kill_and_take_are_one_shot() {
        let mut scene = scene();
        assert!(scene.player_alive());
        assert!(scene.kill_player());
        assert!(!scene.kill_player());
        assert!(!scene.player_alive());

        let coin_id = scene.engine().entities_by_type::<CoinEntity>()[0].id();
        assert!(scene.take_coin(&coin_id));
        assert!(!scene.take_coin(&coin_id));
        // only coins can be taken
        let player_id = scene.player_id();
        assert!(!scene.take_coin(&player_id));
        assert!(scene.player().is_some());
    }
}
