//! Ambient tenant scope kept in the cookie session.
//!
//! Handlers read a fresh snapshot on every request and hand it down by
//! reference; only the scope routes and logout write it.

use actix_session::{Session, SessionInsertError};

use crate::query::ScopeFilter;

const SCOPE_KEY: &str = "scope";

/// Currently selected scope. An unreadable cookie value counts as no scope.
pub fn read_scope(session: &Session) -> Option<ScopeFilter> {
    session
        .get::<ScopeFilter>(SCOPE_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable scope in session: {err}");
            None
        })
}

pub fn store_scope(session: &Session, scope: &ScopeFilter) -> Result<(), SessionInsertError> {
    session.insert(SCOPE_KEY, scope)
}

pub fn clear_scope(session: &Session) {
    session.remove(SCOPE_KEY);
}
