use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use dash_core::prelude::*;
use web_time::Duration;
use web_time::Instant;

/// Run Coin Dash without a window. An autopilot plays and the final HUD is
/// printed when the run ends.
#[derive(Parser, Debug)]
#[command(name = "headless")]
struct Cli {
    /// Seed for level generation.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Maximum number of frames to simulate, 60 per second.
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    /// Path to a json5 config. Uses the bundled level when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Strategy::Hop)]
    strategy: Strategy,
    /// How many times to restart from the game over or clear screen.
    #[arg(long, default_value_t = 0)]
    restarts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Stand still until the clock runs out.
    Idle,
    /// Hold right.
    Run,
    /// Hold right and jump at a fixed rhythm.
    Hop,
}

/// Frames between jumps for `Strategy::Hop`.
const HOP_INTERVAL: u64 = 45;

struct Autopilot {
    strategy: Strategy,
    restarts_left: u32,
    frame: u64,
    scene: SceneId,
}

impl Autopilot {
    fn new(strategy: Strategy, restarts: u32) -> Self {
        Self {
            strategy,
            restarts_left: restarts,
            frame: 0,
            scene: SceneId::Idle,
        }
    }

    fn observe(&mut self, frame: u64, scene: SceneId) {
        self.frame = frame;
        self.scene = scene;
    }

    fn on_end_screen(&self) -> bool {
        matches!(self.scene, SceneId::GameOver | SceneId::Clear)
    }

    /// Nothing left to do once an end screen is reached with no restarts.
    fn done(&self) -> bool {
        self.on_end_screen() && self.restarts_left == 0
    }
}

impl InputSource for Autopilot {
    fn is_held(&self, key: Key) -> bool {
        key == Key::Right && self.strategy != Strategy::Idle
    }

    fn was_pressed(&self, key: Key) -> bool {
        match key {
            Key::Jump => self.strategy == Strategy::Hop && self.frame % HOP_INTERVAL == 0,
            Key::Confirm => self.on_end_screen() && self.restarts_left > 0,
            Key::Left | Key::Right => false,
        }
    }
}

/// Where a headless run ended up.
struct RunSummary {
    manager: SceneManager<LoggedAudio>,
    elapsed: Duration,
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::bundled()?,
    };

    let mut manager = SceneManager::new(config, LoggedAudio::default(), cli.seed)?;
    let mut autopilot = Autopilot::new(cli.strategy, cli.restarts);
    let started = Instant::now();
    manager.start()?;
    for frame in 0..cli.frames {
        autopilot.observe(frame, manager.scene());
        if autopilot.done() {
            break;
        }
        manager.update(&autopilot)?;
        if autopilot.on_end_screen() && manager.scene() == SceneId::Main {
            autopilot.restarts_left -= 1;
        }
    }
    let elapsed = started.elapsed();
    tracing::info!(
        scene = %manager.scene(),
        frames = manager.frame(),
        elapsed_ms = elapsed.as_millis() as u64,
        sounds = manager.audio().call_count(),
        "run finished"
    );
    Ok(RunSummary { manager, elapsed })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let RunSummary { manager, elapsed } = run(&cli)?;

    println!("{}", manager.hud());
    println!("  Seed:      {}", cli.seed);
    println!("  Frames:    {}", manager.frame());
    println!(
        "  Simulated: {:.1}s in {:.3}s",
        manager.frame() as f32 / 60.,
        elapsed.as_secs_f32()
    );
    println!("  Sounds:    {}", manager.audio().call_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autopilot_confirms_only_with_restarts_left() {
        let mut autopilot = Autopilot::new(Strategy::Run, 1);
        autopilot.observe(10, SceneId::Main);
        assert!(autopilot.is_held(Key::Right));
        assert!(!autopilot.was_pressed(Key::Confirm));
        autopilot.observe(11, SceneId::GameOver);
        assert!(autopilot.was_pressed(Key::Confirm));
        assert!(!autopilot.done());
        autopilot.restarts_left = 0;
        assert!(autopilot.done());
    }

    #[test]
    fn hop_jumps_on_rhythm() {
        let mut autopilot = Autopilot::new(Strategy::Hop, 0);
        autopilot.observe(HOP_INTERVAL, SceneId::Main);
        assert!(autopilot.was_pressed(Key::Jump));
        autopilot.observe(HOP_INTERVAL + 1, SceneId::Main);
        assert!(!autopilot.was_pressed(Key::Jump));
    }

    #[test]
    fn idle_run_times_out() -> Result<()> {
        let config = GameConfig {
            time_limit_s: 1,
            initial_lives: 1,
            ..GameConfig::bundled()?
        };
        let mut manager = SceneManager::new(config, LoggedAudio::default(), 5)?;
        let mut autopilot = Autopilot::new(Strategy::Idle, 0);
        manager.start()?;
        for frame in 0..200 {
            autopilot.observe(frame, manager.scene());
            manager.update(&autopilot)?;
        }
        assert_eq!(manager.scene(), SceneId::GameOver);
        assert_eq!(manager.session().lives(), 0);
        Ok(())
    }

    #[test]
    fn run_stops_at_the_frame_limit() -> Result<()> {
        let cli = Cli::parse_from(["headless", "--frames", "120", "--strategy", "run", "--seed", "3"]);
        let RunSummary { manager, .. } = run(&cli)?;
        assert_eq!(manager.scene(), SceneId::Main);
        assert_eq!(manager.frame(), 120);
        assert!(manager.audio().play_count(Sound::Bgm) >= 1);
        Ok(())
    }
}
