pub mod events;
pub mod roster;
