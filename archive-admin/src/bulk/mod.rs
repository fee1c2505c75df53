//! Bulk actions over selected rows
//!
//! A [`BulkActionController`] takes the ids selected in a table, asks for
//! confirmation, sends one batched request through
//! [`BulkApi`](archive_lib::api::BulkApi), and then reports the outcome
//! through its [`BulkHooks`].

mod action;
mod controller;
mod error;
mod toolbar;

pub use action::*;
pub use controller::*;
pub use error::*;
pub use toolbar::*;
