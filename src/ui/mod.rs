pub mod field;
pub mod render;
