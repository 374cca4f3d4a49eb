//! Request-bound models: configuration, the signed-in operator and the
//! session-held scope.

pub mod auth;
pub mod config;
pub mod scope;
