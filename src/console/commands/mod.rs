mod callable;
pub mod readme;
pub mod sync;

pub use callable::*;
