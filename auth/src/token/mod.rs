pub mod claims;
pub mod errors;
pub mod service;

pub use claims::Claims;
pub use claims::Header;
pub use errors::TokenError;
pub use service::TokenService;
pub use service::TokenSubject;
pub use service::TOKEN_LIFETIME_SECS;
