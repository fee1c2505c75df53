//! Archive admin
//!
//! The admin side of the archive: list pages built on `archive-table`,
//! bulk actions over their selections, notifications, and the persisted
//! settings, paths and logging of the admin process.

pub mod bulk;
pub mod config;
pub mod logging;
pub mod notify;
pub mod page;
pub mod paths;
pub mod settings;

pub use config::AdminConfig;
pub use page::ListPage;
pub use page::PageError;
