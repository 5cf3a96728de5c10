// Re-export core modules for use by the binary or other consumers
pub mod core;
pub mod data;
pub mod simulation;
pub mod systems;

// Expose the main Game wrapper and types needed for interaction
pub use crate::core::serialization::SaveState;
pub use crate::core::world::{DayReport, EventCard, Game};
