mod document;
mod product;
mod project;

pub use document::*;
pub use product::*;
pub use project::*;
