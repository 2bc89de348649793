//! Explicit session object
//!
//! Holds the bearer token for the lifetime of a login. Cloning shares the
//! same underlying state, so every component built from one `Session` sees
//! `init` and `clear` immediately.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Data of an open session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    /// Display name of the signed-in operator
    pub operator: Option<String>,
    pub opened_at: DateTime<Utc>,
}

/// Shared session handle
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already opened with `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.init(token, None);
        session
    }

    /// Open (or replace) the session
    pub fn init(&self, token: impl Into<String>, operator: Option<String>) {
        let data = SessionData {
            token: token.into(),
            operator,
            opened_at: Utc::now(),
        };
        tracing::info!(operator = ?data.operator, "Session opened");
        *self.inner.write() = Some(data);
    }

    /// Drop the token (logout)
    pub fn clear(&self) {
        if self.inner.write().take().is_some() {
            tracing::info!("Session cleared");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|d| d.token.clone())
    }

    pub fn operator(&self) -> Option<String> {
        self.inner.read().as_ref().and_then(|d| d.operator.clone())
    }

    pub fn data(&self) -> Option<SessionData> {
        self.inner.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.read().is_some()
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_shared_across_clones() {
        let session = Session::new();
        let view = session.clone();
        assert!(!view.is_active());

        session.init("tok", Some("Asha".into()));
        assert_eq!(view.token().as_deref(), Some("tok"));
        assert_eq!(view.bearer().as_deref(), Some("Bearer tok"));
        assert_eq!(view.operator().as_deref(), Some("Asha"));

        view.clear();
        assert!(!session.is_active());
        assert!(session.bearer().is_none());
    }
}
