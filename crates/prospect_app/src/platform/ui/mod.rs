pub mod markup;
pub mod render;
