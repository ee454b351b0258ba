use serde::Deserialize;
use serde::Serialize;

/// Lives, coins and the countdown. Outlives every scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    initial_lives: u32,
    time_limit_s: u32,
    lives: u32,
    coins_collected: u32,
    time_left: u32,
}

impl GameSession {
    pub fn new(initial_lives: u32, time_limit_s: u32) -> Self {
        Self {
            initial_lives,
            time_limit_s,
            lives: initial_lives,
            coins_collected: 0,
            time_left: time_limit_s,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Called on every entry into the main scene. Lives carry over.
    pub fn begin_run(&mut self) {
        self.coins_collected = 0;
        self.time_left = self.time_limit_s;
    }

    /// Called when the player restarts from the game over or clear screen.
    pub fn reset(&mut self) {
        self.lives = self.initial_lives;
        self.begin_run();
    }

    pub fn collect_coin(&mut self) -> u32 {
        self.coins_collected += 1;
        self.coins_collected
    }

    /// Count down one second. Returns true on the tick that reached zero.
    pub fn tick(&mut self) -> bool {
        if self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        self.time_left == 0
    }

    /// Remove a life, never going below zero. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}
