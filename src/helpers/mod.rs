mod dsn;
mod github;
mod json;

pub use dsn::*;
pub use github::*;
pub use json::*;
