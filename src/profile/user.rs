//! User Profiles
//!
//! Persistent per-user record: avatar, progression level, experience and
//! game statistics. Progression rewards are random and drawn from the
//! caller's source.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::core::rng::RandomSource;

/// Experience needed per progression level (times the current level).
pub const EXP_PER_LEVEL: u32 = 1000;

/// Avatar shown for new users.
pub const DEFAULT_AVATAR: &str = "White Avatar";

/// Selectable avatars.
pub const AVATARS: [&str; 4] = ["White Avatar", "Black Avatar", "Blue Avatar", "Red Avatar"];

/// A player profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Unique name (store key)
    pub username: String,
    /// Avatar name, one of `AVATARS`
    pub avatar: String,
    /// Progression level, starts at 1
    pub level: u32,
    /// Experience towards the next level
    pub exp_points: u32,
    /// Finished games
    pub games_played: u32,
    /// Games won
    pub games_won: u32,
    /// Games lost
    pub games_lost: u32,
    /// Best winning total score
    pub highscore: u32,
    /// Last time a game finished
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self::new("player", DEFAULT_AVATAR)
    }
}

impl User {
    /// Fresh profile at level 1.
    pub fn new(username: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar: avatar.into(),
            level: 1,
            exp_points: 0,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            highscore: 0,
            last_played: None,
        }
    }

    /// Experience needed to leave the current level.
    pub fn exp_to_next_level(&self) -> u32 {
        self.level.saturating_mul(EXP_PER_LEVEL)
    }

    /// Reward for clearing game level `cleared_level` (one-based).
    ///
    /// 100..=300 base plus 1..=(cleared_level + 1) * 100.
    pub fn add_exp_points(&mut self, cleared_level: u32, rng: &mut dyn RandomSource) -> u32 {
        let level_cap = cleared_level.saturating_add(1).saturating_mul(100).min(i32::MAX as u32);
        let level_exp = rng.next_int_range(1, level_cap as i32) as u32;
        let gained = rng.next_int_range(100, 300) as u32 + level_exp;
        self.exp_points = self.exp_points.saturating_add(gained);
        self.check_level_increased();
        gained
    }

    /// Record a loss.
    pub fn add_games_lost(&mut self) {
        self.games_played += 1;
        self.games_lost += 1;
        self.last_played = Some(Utc::now());
    }

    /// Record a win, worth 1000..=1500 experience.
    pub fn add_games_won(&mut self, rng: &mut dyn RandomSource) {
        self.games_played += 1;
        self.games_won += 1;
        self.exp_points = self.exp_points.saturating_add(rng.next_int_range(1000, 1500) as u32);
        self.check_level_increased();
        self.last_played = Some(Utc::now());
    }

    /// Keep the higher of the current and new score.
    pub fn set_highscore(&mut self, score: u32) {
        self.highscore = self.highscore.max(score);
    }

    /// At most one level per award; surplus experience carries over.
    fn check_level_increased(&mut self) {
        let needed = self.exp_to_next_level();
        if self.exp_points >= needed {
            self.exp_points -= needed;
            self.level += 1;
        }
    }
}
