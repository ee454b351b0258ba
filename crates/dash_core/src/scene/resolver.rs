/// Applies the game events of one step to the session and the scene.
///
/// Every outcome is gated on the player being alive: once a death, a win or
/// a timeout has been handled, later events in the same step (or later
/// steps) do nothing.
use keind::prelude::*;

use crate::prelude::*;
use crate::scene::SceneContext;
use crate::scene::lose_life;
use crate::scene::transition_steps;

/// Resolve `events` in order. Returns the scene to switch to, if any; the
/// remaining events of the step are dropped in that case.
pub fn resolve(
    main: &mut MainScene,
    ctx: &mut SceneContext,
    events: &[RefPointer<GameEvent>],
) -> Option<SceneId> {
    for event in events {
        let change = match &**event {
            GameEvent::Jumped => {
                ctx.audio.play(Sound::Jump, false);
                None
            }
            GameEvent::CoinTouched { coin_id } => {
                collect_coin(main, ctx, coin_id);
                None
            }
            GameEvent::EnemyContact { lethal: false, .. } => None,
            GameEvent::EnemyContact {
                enemy_id,
                lethal: true,
            } => {
                if main.kill_player() {
                    tracing::info!(enemy_id, "player hit an enemy");
                    lose_life(main, ctx, false)
                } else {
                    None
                }
            }
            GameEvent::PlayerFell => {
                if main.kill_player() {
                    tracing::info!("player fell out of the level");
                    lose_life(main, ctx, false)
                } else {
                    None
                }
            }
            GameEvent::GoalReached => {
                if main.kill_player() {
                    tracing::info!(coins = ctx.session.coins_collected(), "goal reached");
                    ctx.ambient.stop(ctx.audio);
                    main.run_transition(transition_steps(
                        ctx.config,
                        Sound::Clear,
                        SceneAction::SwitchScene(SceneId::Clear),
                    ));
                }
                None
            }
        };
        if change.is_some() {
            return change;
        }
    }
    None
}

fn collect_coin(main: &mut MainScene, ctx: &mut SceneContext, coin_id: &u128) {
    if !main.player_alive() {
        return;
    }
    if main.take_coin(coin_id) {
        let coins = ctx.session.collect_coin();
        tracing::debug!(coin_id, coins, "coin collected");
    }
}
