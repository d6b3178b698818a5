//! Play Sessions
//!
//! Binds a game to the logged-in user. The session feeds game events into
//! the user's progression and saves the profile when something changed.
//! Store failures are logged and never interrupt play.

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::core::rng::DeterministicRng;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::state::GameSession;
use crate::profile::store::UserStore;
use crate::profile::user::{User, DEFAULT_AVATAR};

/// Salt separating the profile reward stream from the simulation stream.
const PROFILE_RNG_SALT: u64 = 0x5052_4F46_494C_4531;

/// A user playing a game.
pub struct PlaySession {
    id: Uuid,
    user: User,
    store: Box<dyn UserStore>,
    reward_rng: DeterministicRng,
}

impl PlaySession {
    /// Load `username` from `store`, or start a fresh profile.
    pub fn login(store: Box<dyn UserStore>, username: &str, seed: u64) -> Self {
        let user = match store.load_user(username) {
            Ok(Some(user)) => {
                info!("Welcome back {} (level {})", user.username, user.level);
                user
            }
            Ok(None) => {
                info!("New user {}", username);
                User::new(username, DEFAULT_AVATAR)
            }
            Err(e) => {
                warn!("Failed to load user {}: {}; using a fresh profile", username, e);
                User::new(username, DEFAULT_AVATAR)
            }
        };

        Self {
            id: Uuid::new_v4(),
            user,
            store,
            reward_rng: DeterministicRng::new(seed ^ PROFILE_RNG_SALT),
        }
    }

    /// Session id (for logs).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The logged-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Change the avatar and save.
    pub fn set_avatar(&mut self, avatar: &str) {
        self.user.avatar = avatar.to_string();
        self.save();
    }

    /// Start a new game for this user.
    pub fn new_game(&self, config: GameConfig, seed: u64) -> GameSession {
        info!("Session {}: {} starts a game (seed {})", self.id, self.user.username, seed);
        GameSession::new(config, seed)
    }

    /// Apply progression for a batch of game events.
    ///
    /// Cleared levels award experience; the end of the game updates the
    /// win/loss record and the highscore.
    pub fn apply_events(&mut self, events: &[GameEvent]) {
        let mut changed = false;

        for event in events {
            match &event.data {
                GameEventData::LevelCleared { level, .. } => {
                    let gained = self.user.add_exp_points(level + 1, &mut self.reward_rng);
                    info!("{} gained {} exp (level {})", self.user.username, gained, self.user.level);
                    changed = true;
                }
                GameEventData::GameOver { total_score } => {
                    self.user.add_games_lost();
                    info!("{} lost with {} points", self.user.username, total_score);
                    changed = true;
                }
                GameEventData::Victory { total_score } => {
                    self.user.add_games_won(&mut self.reward_rng);
                    self.user.set_highscore(*total_score);
                    info!("{} won with {} points", self.user.username, total_score);
                    changed = true;
                }
                _ => {}
            }
        }

        if changed {
            self.save();
        }
    }

    fn save(&mut self) {
        if let Err(e) = self.store.save_user(&self.user) {
            warn!("Failed to save user {}: {}", self.user.username, e);
        }
    }

    /// End the session, returning the store.
    pub fn logout(mut self) -> Box<dyn UserStore> {
        self.save();
        info!("Session {} closed", self.id);
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::store::MemoryStore;

    fn event(data: GameEventData) -> GameEvent {
        GameEvent::new(0, data)
    }

    #[test]
    fn test_login_creates_fresh_user() {
        let session = PlaySession::login(Box::new(MemoryStore::new()), "ada", 1);
        assert_eq!(session.user().username, "ada");
        assert_eq!(session.user().level, 1);
    }

    #[test]
    fn test_victory_records_win_and_highscore() {
        let mut session = PlaySession::login(Box::new(MemoryStore::new()), "ada", 1);
        session.apply_events(&[
            event(GameEventData::LevelCleared { level: 2, level_score: 100 }),
            event(GameEventData::Victory { total_score: 4_200 }),
        ]);
        assert_eq!(session.user().games_won, 1);
        assert_eq!(session.user().games_played, 1);
        assert_eq!(session.user().highscore, 4_200);

        // Saved, so a new login sees it
        let store = session.logout();
        let again = PlaySession::login(store, "ada", 2);
        assert_eq!(again.user().highscore, 4_200);
        assert_eq!(again.user().games_won, 1);
    }

    #[test]
    fn test_game_over_records_loss_only() {
        let mut session = PlaySession::login(Box::new(MemoryStore::new()), "bob", 1);
        session.apply_events(&[event(GameEventData::GameOver { total_score: 900 })]);
        assert_eq!(session.user().games_lost, 1);
        assert_eq!(session.user().highscore, 0);
        assert_eq!(session.user().exp_points, 0);
    }

    #[test]
    fn test_level_clear_awards_exp() {
        let mut session = PlaySession::login(Box::new(MemoryStore::new()), "cy", 1);
        session.apply_events(&[event(GameEventData::LevelCleared { level: 0, level_score: 0 })]);
        let user = session.user();
        assert!(user.exp_points >= 101 && user.exp_points <= 500);
        assert_eq!(user.games_played, 0);
    }
}
