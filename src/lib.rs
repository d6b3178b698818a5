//! # Blast Grid
//!
//! Deterministic simulation core for a tile-based bomb arcade game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        BLAST GRID                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── direction.rs- Four headings                             │
//! │  ├── rect.rs     - Cells and pixel rectangles                │
//! │  ├── rng.rs      - Injectable Xorshift128+ random source     │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  config.rs       - Game constants (JSON, validated)          │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── grid.rs     - Terrain                                   │
//! │  ├── map.rs      - Level generation                          │
//! │  ├── floor.rs    - Entities and collision queries            │
//! │  ├── explosion.rs- Blast propagation                         │
//! │  ├── player.rs   - Player stats and movement                 │
//! │  ├── state.rs    - Session state and phases                  │
//! │  ├── tick.rs     - Fixed-timestep simulation                 │
//! │  └── snapshot.rs - Read-only frame views                     │
//! │                                                              │
//! │  profile/        - User records and persistence              │
//! │                                                              │
//! │  runtime/        - Real time (non-deterministic)             │
//! │  ├── game_loop.rs- Tokio tick driver                         │
//! │  └── session.rs  - User bound to a game                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Integer pixel coordinates, no floating point
//! - Chances are per-mille integers
//! - Collections iterate in insertion order
//! - No system time dependencies
//! - All randomness from an injected `RandomSource`
//!
//! Given identical inputs and seed, the simulation produces
//! **identical results** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod profile;
pub mod runtime;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use core::rng::{DeterministicRng, RandomSource};
pub use game::input::{Command, InputBuffer, TickInput};
pub use game::state::{GamePhase, GameSession};
pub use game::tick::{replay_session, tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation rate (ticks per second)
pub const TICK_RATE: u32 = 60;
