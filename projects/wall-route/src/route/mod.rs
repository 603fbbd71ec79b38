// Route resolution: hold lookup, coach payload normalization, point placement
// and hold selection.

pub mod coach;
pub mod geometry;
pub mod hold_index;
pub mod loader;
pub mod point;
pub mod resolver;
pub mod selection;
pub mod types;
