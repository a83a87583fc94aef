pub mod collision;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ghost_ai;
pub mod ghost_mode;
pub mod maps;
pub mod pathfinding;
pub mod rng;
pub mod types;
pub mod world;
