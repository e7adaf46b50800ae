pub mod filesystem;
pub mod glob;
