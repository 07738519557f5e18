//! Caller identity.
//!
//! The identity provider issues HS256 bearer tokens; this module only
//! verifies them and exposes the subject as a [`CallerIdentity`].

pub mod middleware;
pub mod service;

pub use middleware::{Caller, identity_middleware};
pub use service::{CallerIdentity, Claims, IdentityVerifier};
