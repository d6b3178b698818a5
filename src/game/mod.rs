//! Game Logic Module
//!
//! All game simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `grid`: Terrain tiles and out-of-bounds rules
//! - `map`: Level generation
//! - `bomb`, `explosion`, `enemy`, `powerup`, `player`: Entities
//! - `floor`: One level's entities and their collision queries
//! - `input`: Command buffering
//! - `state`: Session state and phases
//! - `tick`: Fixed-timestep simulation
//! - `events`: Game events for presentation and replay
//! - `snapshot`: Read-only frame views

pub mod bomb;
pub mod enemy;
pub mod events;
pub mod explosion;
pub mod floor;
pub mod grid;
pub mod input;
pub mod map;
pub mod player;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use floor::Floor;
pub use input::{Command, InputBuffer, TickInput};
pub use snapshot::FrameSnapshot;
pub use state::{GamePhase, GameSession};
pub use tick::{replay_session, tick, TickResult};
