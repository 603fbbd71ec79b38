// Route overlay drawing

pub mod markers;
pub mod renderer;
pub mod surface;
pub mod svg;
