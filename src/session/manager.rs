use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::store::{Session, SessionStore};
use crate::{
    auth::repo_types::UserId,
    db::{StoreError, StoreResult},
};

const TOKEN_BYTES: usize = 32;

/// Opaque credential handed to the client at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let mut buf = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut buf);
        Self(Base64UrlUnpadded::encode_string(&buf))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Issues, resolves and invalidates sessions. Lifetime is fixed from login;
/// resolving a session does not extend it.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, user_id: UserId) -> StoreResult<SessionToken> {
        self.create_at(user_id, OffsetDateTime::now_utc()).await
    }

    pub(crate) async fn create_at(
        &self,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> StoreResult<SessionToken> {
        let purged = self.store.delete_expired(now).await?;
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }

        let expires_at = now
            .checked_add(self.ttl)
            .ok_or(StoreError::ExpiryOutOfRange)?;
        let token = SessionToken::generate();
        let session = Session {
            token: token.as_str().to_string(),
            user_id,
            created_at: now,
            expires_at,
        };
        self.store.insert(&session).await?;
        debug!(user_id, expires_at = %session.expires_at, "session created");
        Ok(token)
    }

    /// The bound user, or `None` for an unknown, invalidated or expired token.
    pub async fn resolve(&self, token: &SessionToken) -> StoreResult<Option<UserId>> {
        self.resolve_at(token, OffsetDateTime::now_utc()).await
    }

    pub(crate) async fn resolve_at(
        &self,
        token: &SessionToken,
        now: OffsetDateTime,
    ) -> StoreResult<Option<UserId>> {
        let Some(session) = self.store.find(token.as_str()).await? else {
            return Ok(None);
        };
        if session.is_expired_at(now) {
            debug!(user_id = session.user_id, "session expired");
            self.store.delete(token.as_str()).await?;
            return Ok(None);
        }
        Ok(Some(session.user_id))
    }

    pub async fn invalidate(&self, token: &SessionToken) -> StoreResult<()> {
        self.store.delete(token.as_str()).await
    }
}
