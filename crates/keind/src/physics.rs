/// Rigid body physics for dynamic entities.
///
/// Bodies are axis aligned rectangles. Dynamic bodies are accelerated by the
/// engine's gravity, moved by their velocity, and pushed back out of any
/// static body along the axis they were moving on.
use bevy_math::Rect;

use crate::prelude::*;

/// Overlaps thinner than this are treated as touching, not intersecting.
/// Keeps a body resting on a surface from being pushed sideways by float
/// rounding.
pub const CONTACT_EPSILON: f32 = 0.01;
/// How far below a body we look for a surface to stand on.
pub const GROUND_PROBE: f32 = 1.0;

/// Do two rects intersect by more than `CONTACT_EPSILON` on both axes?
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    let overlap = a.intersect(*b);
    overlap.width() > CONTACT_EPSILON && overlap.height() > CONTACT_EPSILON
}

/// Is there a static surface directly beneath `body`?
pub fn rests_on(body: &Rect, solids: &[Rect]) -> bool {
    solids.iter().any(|solid| {
        let horizontal = body.max.x.min(solid.max.x) - body.min.x.max(solid.min.x);
        horizontal > CONTACT_EPSILON && (solid.min.y - body.max.y).abs() <= GROUND_PROBE
    })
}

/// Integrate a single step for a dynamic body.
pub fn integrate(state: &mut BaseEntityState, gravity: f32, world_width: f32, solids: &[Rect]) {
    state.velocity.y += gravity * STEP_LEN_S;

    // horizontal movement, clamped to the world
    let dx = state.velocity.x * STEP_LEN_S;
    if dx != 0.0 {
        state.position.x += dx;
        for solid in solids {
            if !intersects(&state.rect(), solid) {
                continue;
            }
            if dx > 0.0 {
                state.position.x = solid.min.x - state.size.x;
            } else {
                state.position.x = solid.max.x;
            }
        }
    }
    let max_x = (world_width - state.size.x).max(0.0);
    state.position.x = state.position.x.clamp(0.0, max_x);

    // vertical movement, the world is open below so bodies may fall out
    let dy = state.velocity.y * STEP_LEN_S;
    if dy != 0.0 {
        state.position.y += dy;
        for solid in solids {
            if !intersects(&state.rect(), solid) {
                continue;
            }
            if dy > 0.0 {
                // landed
                state.position.y = solid.min.y - state.size.y;
            } else {
                // bonked
                state.position.y = solid.max.y;
            }
            state.velocity.y = 0.0;
        }
    }
}

/// Is a body grounded: resting on a static body and not moving upward.
pub fn grounded(state: &BaseEntityState, solids: &[Rect]) -> bool {
    state.velocity.y >= 0.0 && rests_on(&state.rect(), solids)
}

pub fn static_rects<'a, G: GameLogic>(
    entities: impl Iterator<Item = &'a RefPointer<G::Entity>>,
) -> Vec<Rect> {
    entities
        .filter(|entity| entity.body() == Body::Static)
        .map(|entity| entity.rect())
        .collect()
}

#[cfg(test)]
mod tests {
    use bevy_math::Vec2;

    use super::*;

    fn body_at(position: Vec2) -> BaseEntityState {
        BaseEntityState::new(1, position, Vec2::new(20., 20.), Body::Dynamic)
    }

    fn floor() -> Vec<Rect> {
        vec![Rect::new(0., 100., 500., 132.)]
    }

    #[test]
    fn falls_and_lands_on_floor() {
        let mut state = body_at(Vec2::new(50., 0.));
        for _ in 0..120 {
            integrate(&mut state, 1800., 500., &floor());
        }
        assert_eq!(state.position.y, 80.);
        assert_eq!(state.velocity.y, 0.);
        assert!(grounded(&state, &floor()));
    }

    #[test]
    fn not_grounded_while_rising() {
        let mut state = body_at(Vec2::new(50., 80.));
        state.velocity.y = -500.;
        assert!(!grounded(&state, &floor()));
        state.velocity.y = 0.;
        assert!(grounded(&state, &floor()));
    }

    #[test]
    fn walking_on_floor_is_not_pushed_sideways() {
        let mut state = body_at(Vec2::new(50., 80.));
        state.velocity.x = 300.;
        for _ in 0..10 {
            integrate(&mut state, 1800., 500., &floor());
        }
        assert!((state.position.x - 100.).abs() < 1e-3);
        assert_eq!(state.position.y, 80.);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let solids = vec![Rect::new(0., 100., 500., 132.), Rect::new(100., 0., 132., 100.)];
        let mut state = body_at(Vec2::new(50., 80.));
        state.velocity.x = 300.;
        for _ in 0..30 {
            integrate(&mut state, 1800., 500., &solids);
        }
        assert_eq!(state.position.x, 80.);
    }

    #[test]
    fn clamped_to_world_width() {
        let mut state = body_at(Vec2::new(470., 80.));
        state.velocity.x = 300.;
        for _ in 0..30 {
            integrate(&mut state, 1800., 500., &floor());
        }
        assert_eq!(state.position.x, 480.);
    }

    #[test]
    fn falls_out_of_open_world() {
        let mut state = body_at(Vec2::new(50., 0.));
        for _ in 0..120 {
            integrate(&mut state, 1800., 500., &[]);
        }
        assert!(state.position.y > 1000.);
    }
}
