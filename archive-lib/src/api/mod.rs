//! REST API operations

mod bulk;
mod list;

pub use bulk::*;
pub use list::*;
