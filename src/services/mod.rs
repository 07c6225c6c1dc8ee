pub mod readme;
mod reconciler;

pub use reconciler::*;
