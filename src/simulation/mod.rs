pub mod advisors;
pub mod buildings;
pub mod campaign;
pub mod events;
pub mod military;
pub mod resources;
pub mod rng;
