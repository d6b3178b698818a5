//! Core deterministic primitives.
//!
//! This module contains the foundational types that make the
//! simulation deterministic and reproducible.

pub mod direction;
pub mod hash;
pub mod rect;
pub mod rng;

pub use direction::Direction;
pub use hash::{StateHash, StateHasher};
pub use rect::{Cell, Rect};
pub use rng::{DeterministicRng, RandomSource, ScriptedRng};
