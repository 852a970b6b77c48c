//! Species behaviors plugged into the world engine.
//!
//! This module contains:
//! - The `Behavior` capability trait and its registry
//! - Rabbit (grazing prey) and Fox (predator) policies

pub mod behavior;
pub mod fox;
pub mod rabbit;

pub use behavior::{Behavior, BehaviorRegistry, Interaction, Surroundings};
pub use fox::Fox;
pub use rabbit::Rabbit;
