//! Authentication

mod token;

pub use token::AccessToken;
pub use token::SessionTokenProvider;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
