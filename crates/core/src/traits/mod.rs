pub mod registry;
pub mod strategy;

pub use registry::*;
pub use strategy::*;
