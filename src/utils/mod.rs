pub mod geometry;
pub mod pathfinding;
