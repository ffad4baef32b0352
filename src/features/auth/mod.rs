//! Bearer-token verification. Tokens are issued by the login service;
//! this crate only checks them and exposes the caller as `AuthenticatedUser`.

mod validator;

pub mod guards;
pub mod model;

pub use validator::JwtValidator;

#[cfg(test)]
pub(crate) use validator::tests as token_fixtures;
