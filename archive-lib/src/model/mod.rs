//! Typed models

mod access;
mod bulk;
mod document;
mod ids;

pub use access::*;
pub use bulk::*;
pub use document::*;
pub use ids::*;
