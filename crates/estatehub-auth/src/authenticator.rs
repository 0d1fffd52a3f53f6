//! Bearer token to identity.

use std::sync::Arc;

use tracing::debug;

use estatehub_core::error::AppError;
use estatehub_core::result::AppResult;
use estatehub_database::UserStore;
use estatehub_entity::user::UserSummary;

use crate::identity::IdentityCache;
use crate::jwt::JwtDecoder;

/// Resolves the caller behind an `Authorization` header.
///
/// The token is validated first, then the subject is looked up in the
/// identity cache and, on a miss, in the user store.
#[derive(Debug, Clone)]
pub struct Authenticator {
    decoder: JwtDecoder,
    identities: IdentityCache,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(decoder: JwtDecoder, identities: IdentityCache, users: Arc<dyn UserStore>) -> Self {
        Self {
            decoder,
            identities,
            users,
        }
    }

    /// The identity cache, shared with services that must evict entries.
    pub fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    /// Authenticate a raw `Authorization` header value.
    pub async fn authenticate_header(&self, header: Option<&str>) -> AppResult<UserSummary> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Not authorized, no token"))?;
        self.authenticate(token).await
    }

    /// Authenticate a bare token.
    pub async fn authenticate(&self, token: &str) -> AppResult<UserSummary> {
        let claims = self.decoder.decode(token)?;
        let user_id = claims.user_id();

        if let Some(identity) = self.identities.get(user_id).await {
            return Ok(identity);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Not authorized, user not found"))?;

        let identity = user.summary();
        self.identities.put(&identity).await;
        debug!(user_id = %user_id, "Identity resolved from store");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatehub_cache::memory::MemoryCacheProvider;
    use estatehub_core::config::AuthConfig;
    use estatehub_core::config::cache::MemoryCacheConfig;
    use estatehub_database::memory::MemoryUserStore;
    use estatehub_entity::user::{CreateUser, User, UserRole};

    use crate::jwt::JwtEncoder;

    struct Fixture {
        auth: Authenticator,
        users: Arc<MemoryUserStore>,
        encoder: JwtEncoder,
    }

    fn fixture() -> Fixture {
        let config = AuthConfig::default();
        let users = Arc::new(MemoryUserStore::new());
        let cache = Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig { max_capacity: 100 },
            300,
        ));
        let auth = Authenticator::new(
            JwtDecoder::new(&config),
            IdentityCache::new(cache, &config),
            users.clone(),
        );
        Fixture {
            auth,
            users,
            encoder: JwtEncoder::new(&config),
        }
    }

    fn user() -> User {
        User::new(CreateUser {
            email: "ana@example.com".into(),
            name: "Ana".into(),
            password_hash: "hash".into(),
            role: UserRole::Owner,
        })
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header() {
        let f = fixture();
        let err = f.auth.authenticate_header(None).await.unwrap_err();
        assert_eq!(err.message, "Not authorized, no token");
        let err = f.auth.authenticate_header(Some("Basic abc")).await.unwrap_err();
        assert_eq!(err.message, "Not authorized, no token");
        let err = f
            .auth
            .authenticate_header(Some("Bearer garbage"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Not authorized, token failed");
    }

    #[tokio::test]
    async fn test_resolves_and_caches_identity() {
        let f = fixture();
        let ana = f.users.insert(&user()).await.unwrap();
        let token = f.encoder.issue(ana.id, ana.role).unwrap().token;

        let identity = f.auth.authenticate(&token).await.unwrap();
        assert_eq!(identity.email, "ana@example.com");

        // Served from the cache even once the store no longer has the user.
        f.users.delete(ana.id).await.unwrap();
        assert!(f.auth.authenticate(&token).await.is_ok());

        f.auth.identities().evict(ana.id).await;
        let err = f.auth.authenticate(&token).await.unwrap_err();
        assert_eq!(err.message, "Not authorized, user not found");
    }
}
