pub mod raycast;
pub mod render;
