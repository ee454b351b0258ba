/// Scene state machine.
///
/// `Idle` until `start`, then one of `Main`, `GameOver` or `Clear`. The
/// main scene owns the level; leaving it tears the level down along with
/// every task it scheduled. The session (lives, coins, timer) lives here and
/// outlives the scenes.
use anyhow::Result;
use keind::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde::Serialize;
use strum::Display;

use crate::prelude::*;

pub mod main_scene;
pub mod resolver;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum SceneId {
    #[default]
    Idle,
    Main,
    GameOver,
    Clear,
}

/// Work deferred through the main scene's scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneAction {
    CountdownTick,
    StopAmbient,
    PlaySound(Sound),
    SwitchScene(SceneId),
    /// Final step of a timeout that costs a life. The stinger has already
    /// played.
    LoseLife,
}

/// Borrowed view of the state outliving the main scene.
pub struct SceneContext<'a> {
    pub config: &'a GameConfig,
    pub session: &'a mut GameSession,
    pub audio: &'a mut dyn AudioPlayer,
    pub ambient: &'a mut AmbientTrack,
}

/// `StopAmbient`, then the stinger after a short pause, then `last`.
pub(crate) fn transition_steps(
    config: &GameConfig,
    stinger: Sound,
    last: SceneAction,
) -> Vec<SequenceStep<SceneAction>> {
    let delays = &config.transitions;
    vec![
        SequenceStep::new(0, SceneAction::StopAmbient),
        SequenceStep::new(
            seconds_to_steps(delays.stinger_delay_s),
            SceneAction::PlaySound(stinger),
        ),
        SequenceStep::new(seconds_to_steps(delays.switch_delay_s), last),
    ]
}

/// The player died. With lives left the level restarts right away.
/// Otherwise the game is over, straight away when the lose stinger already
/// played, or after the lose sequence.
pub(crate) fn lose_life(
    main: &mut MainScene,
    ctx: &mut SceneContext,
    stinger_played: bool,
) -> Option<SceneId> {
    let lives = ctx.session.lose_life();
    ctx.ambient.stop(ctx.audio);
    tracing::info!(lives, "life lost");
    if lives > 0 {
        return Some(SceneId::Main);
    }
    if stinger_played {
        return Some(SceneId::GameOver);
    }
    main.run_transition(transition_steps(
        ctx.config,
        Sound::GameOver,
        SceneAction::SwitchScene(SceneId::GameOver),
    ));
    None
}

fn apply_action(main: &mut MainScene, ctx: &mut SceneContext, action: SceneAction) -> Option<SceneId> {
    match action {
        SceneAction::CountdownTick => {
            if !main.player_alive() {
                return None;
            }
            if ctx.session.tick() && main.kill_player() {
                tracing::info!("time up");
                let last = if ctx.config.timeout_costs_life {
                    SceneAction::LoseLife
                } else {
                    SceneAction::SwitchScene(SceneId::GameOver)
                };
                main.run_transition(transition_steps(ctx.config, Sound::GameOver, last));
            }
            None
        }
        SceneAction::StopAmbient => {
            ctx.ambient.stop(ctx.audio);
            None
        }
        SceneAction::PlaySound(sound) => {
            ctx.audio.play(sound, false);
            None
        }
        SceneAction::SwitchScene(target) => Some(target),
        SceneAction::LoseLife => lose_life(main, ctx, true),
    }
}

pub struct SceneManager<A: AudioPlayer> {
    config: GameConfig,
    session: GameSession,
    audio: A,
    ambient: AmbientTrack,
    /// Seeded once, every level is drawn from it in turn.
    rng: ChaCha8Rng,
    scene: SceneId,
    main: Option<MainScene>,
    frame: u64,
}

impl<A: AudioPlayer> SceneManager<A> {
    pub fn new(config: GameConfig, audio: A, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            session: GameSession::new(config.initial_lives, config.time_limit_s),
            config,
            audio,
            ambient: AmbientTrack::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            scene: SceneId::Idle,
            main: None,
            frame: 0,
        })
    }

    pub fn start(&mut self) -> Result<()> {
        if self.scene != SceneId::Idle {
            tracing::warn!(scene = %self.scene, "start called twice");
            return Ok(());
        }
        self.switch_to(SceneId::Main)
    }

    /// Advance one fixed step.
    pub fn update(&mut self, input: &dyn InputSource) -> Result<()> {
        self.frame += 1;
        match self.scene {
            SceneId::Idle => Ok(()),
            SceneId::Main => match self.update_main(input) {
                Some(target) => self.switch_to(target),
                None => Ok(()),
            },
            SceneId::GameOver | SceneId::Clear => {
                if input.was_pressed(Key::Confirm) {
                    self.session.reset();
                    self.switch_to(SceneId::Main)?;
                }
                Ok(())
            }
        }
    }

    fn update_main(&mut self, input: &dyn InputSource) -> Option<SceneId> {
        let Some(main) = self.main.as_mut() else {
            tracing::warn!("main scene active without a level");
            return None;
        };
        let mut ctx = SceneContext {
            config: &self.config,
            session: &mut self.session,
            audio: &mut self.audio,
            ambient: &mut self.ambient,
        };
        let events = main.step(input);
        if let Some(target) = resolver::resolve(main, &mut ctx, &events) {
            return Some(target);
        }
        // actions may schedule zero delay steps, run those in this frame too
        loop {
            let due = main.due_actions();
            if due.is_empty() {
                return None;
            }
            for action in due {
                if let Some(target) = apply_action(main, &mut ctx, action) {
                    return Some(target);
                }
            }
        }
    }

    fn switch_to(&mut self, target: SceneId) -> Result<()> {
        tracing::info!(
            from = %self.scene,
            to = %target,
            lives = self.session.lives(),
            coins = self.session.coins_collected(),
            frame = self.frame,
            "scene change"
        );
        if let Some(mut main) = self.main.take() {
            main.teardown();
        }
        self.scene = target;
        match target {
            SceneId::Main => {
                self.ambient.start(&mut self.audio, Sound::Bgm);
                self.session.begin_run();
                self.main = Some(MainScene::enter(&self.config, &mut self.rng)?);
            }
            SceneId::GameOver | SceneId::Clear => self.ambient.stop(&mut self.audio),
            SceneId::Idle => {}
        }
        Ok(())
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Number of `update` calls so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn main_scene(&self) -> Option<&MainScene> {
        self.main.as_ref()
    }

    pub fn main_scene_mut(&mut self) -> Option<&mut MainScene> {
        self.main.as_mut()
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            scene: self.scene,
            lives: self.session.lives(),
            coins: self.session.coins_collected(),
            time_left: self.session.time_left(),
        }
    }
}
