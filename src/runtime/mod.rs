//! Runtime Module
//!
//! Everything around the deterministic core that touches time, tasks or
//! persistence (non-deterministic).
//!
//! - `game_loop`: Real-time tick driver on a tokio task
//! - `session`: Logged-in user bound to a game

pub mod game_loop;
pub mod session;

pub use game_loop::{GameLoop, GameLoopHandle, LoopError};
pub use session::PlaySession;
