//! Authentication module for the strategy registry and the strategy trait

pub mod authenticator;
pub mod traits;

pub use authenticator::Authenticator;
pub use traits::Strategy;
