/// Level construction. The layout is fixed (ground, goal, player start)
/// apart from platforms, coins and enemies, which are spread across the
/// level by drawing one position from each of `count` equal sections.
use std::ops::Range;

use anyhow::Result;
use anyhow::bail;
use keind::prelude::*;
use rand::Rng;

use crate::prelude::*;

/// How the y coordinate of generated positions is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YPlacement {
    Fixed(f32),
    /// Uniform in `[min, max]`, drawn independently for every position.
    Between(f32, f32),
}

/// Redraws allowed before falling back to a section's midpoint.
const MAX_DRAWS: usize = 16;

/// Split `x_range` into `count` equal, contiguous sections. Fails unless
/// every section is at least one unit wide and its midpoint is a float
/// strictly between its bounds, which rules out ranges too far from the
/// origin for f32 to resolve.
pub fn sections(count: usize, x_range: Range<f32>) -> Result<Vec<Range<f32>>> {
    if count == 0 {
        bail!("cannot place zero objects");
    }
    if !x_range.start.is_finite() || !x_range.end.is_finite() {
        bail!("x range must be finite, got {x_range:?}");
    }
    if x_range.start >= x_range.end {
        bail!("x range is empty, got {x_range:?}");
    }
    let section_width = (x_range.end - x_range.start) / count as f32;
    if section_width < 1. {
        bail!("{count} sections do not fit in {x_range:?}");
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let start = x_range.start + i as f32 * section_width;
        let end = x_range.start + (i + 1) as f32 * section_width;
        let mid = midpoint(start, end);
        if !(start < mid && mid < end) {
            bail!("section {start}..{end} of {x_range:?} has no interior at f32 precision");
        }
        out.push(start..end);
    }
    Ok(out)
}

fn midpoint(start: f32, end: f32) -> f32 {
    start + (end - start) / 2.
}

/// Draw one position from each of `count` equal sections of `x_range`, in
/// section order. Every x is strictly greater than its section's start and
/// less than its end.
pub fn sectioned_positions<R: Rng>(
    count: usize,
    x_range: Range<f32>,
    y: YPlacement,
    rng: &mut R,
) -> Result<Vec<Vec2>> {
    let sections = sections(count, x_range)?;
    if let YPlacement::Between(min, max) = y {
        if !min.is_finite() || !max.is_finite() || min > max {
            bail!("y range is empty, got {min}..={max}");
        }
    }

    let mut out = Vec::with_capacity(count);
    for section in sections {
        // random_range includes the start and may round onto the end
        let x = (0..MAX_DRAWS)
            .map(|_| rng.random_range(section.clone()))
            .find(|x| section.start < *x && *x < section.end)
            .unwrap_or_else(|| midpoint(section.start, section.end));
        let y = match y {
            YPlacement::Fixed(y) => y,
            YPlacement::Between(min, max) => rng.random_range(min..=max),
        };
        out.push(Vec2::new(x, y));
    }
    Ok(out)
}

/// Populate an empty engine with a fresh level and subscribe to the
/// overlaps the game reacts to. Returns the id of the player.
///
/// Random draws happen in a fixed order (platforms, coins, enemies) so a
/// seeded rng always produces the same level.
pub fn build_level<R: Rng>(
    config: &GameConfig,
    engine: &mut GameEngine<DashGameLogic>,
    rng: &mut R,
) -> Result<u128> {
    let object_x = config.object_x.0..config.object_x.1;

    // ground runs the full width of the level
    let tile = config.ground.tile_size;
    let tile_count = (config.level_width / tile).ceil() as usize;
    for i in 0..tile_count {
        let id = engine.generate_id();
        engine.insert_entity(
            GroundEntity::new_tile(id, Vec2::new(i as f32 * tile, config.ground.y), tile).into(),
        );
    }

    let id = engine.generate_id();
    engine.insert_entity(GoalEntity::new_at(id, config.goal.position, config.goal.size).into());

    let platforms = &config.platforms;
    for position in sectioned_positions(
        platforms.count,
        object_x.clone(),
        YPlacement::Fixed(platforms.y),
        rng,
    )? {
        let id = engine.generate_id();
        engine.insert_entity(PlatformEntity::new_at(id, position, platforms.size).into());
    }

    let coins = &config.coins;
    for position in sectioned_positions(
        coins.count,
        object_x.clone(),
        YPlacement::Between(coins.y_range.0, coins.y_range.1),
        rng,
    )? {
        let id = engine.generate_id();
        engine.insert_entity(CoinEntity::new_at(id, position, coins.size).into());
    }

    let enemies = &config.enemies;
    let (distance_min, distance_max) = enemies.move_distance;
    if !(distance_min <= distance_max) {
        bail!("enemy move distance range is empty");
    }
    for position in sectioned_positions(enemies.count, object_x, YPlacement::Fixed(enemies.y), rng)? {
        let move_distance = rng.random_range(distance_min..=distance_max);
        let id = engine.generate_id();
        engine.insert_entity(
            EnemyEntity::new_patrolling(id, position, enemies.size, enemies.speed, move_distance)
                .into(),
        );
    }

    let player = &config.player;
    let player_id = engine.generate_id();
    engine.insert_entity(
        PlayerEntity::new_at(
            player_id,
            player.start,
            player.size,
            player.speed,
            player.jump_impulse,
            config.fall_death_y,
        )
        .into(),
    );

    engine.subscribe_overlap::<PlayerEntity, CoinEntity>();
    engine.subscribe_overlap::<PlayerEntity, EnemyEntity>();
    engine.subscribe_overlap::<PlayerEntity, GoalEntity>();

    tracing::debug!(
        entities = engine.entity_count(),
        ground_tiles = tile_count,
        "level built"
    );
    Ok(player_id)
}
