pub mod common;
pub mod prediction;

pub use common::*;
pub use prediction::*;
