//! User account operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use estatehub_auth::{IdentityCache, JwtEncoder, PasswordHasher, PasswordValidator};
use estatehub_core::{AppError, AppResult, ErrorKind};
use estatehub_database::UserStore;
use estatehub_entity::user::{CreateUser, UpdateUser, User, UserRole, UserSummary};

use super::validation::{normalize_email, normalize_name};
use crate::context::RequestContext;

/// Data for self-registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested account type; only owner and realtor are accepted.
    pub role: UserRole,
}

/// Fields a profile update may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only honoured for admins.
    pub role: Option<UserRole>,
}

/// A user identity together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub user: UserSummary,
    pub token: String,
}

/// Handles registration, login and user administration.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    identities: IdentityCache,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        identities: IdentityCache,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
            identities,
        }
    }

    /// Register a new owner or realtor and sign them in.
    pub async fn register(&self, req: RegisterUser) -> AppResult<AuthSession> {
        let name = normalize_name(&req.name)?;
        let email = normalize_email(&req.email)?;
        self.validator.validate(&req.password)?;
        if !req.role.is_self_assignable() {
            return Err(AppError::validation("Type must be either 'owner' or 'realtor'"));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::validation("User already exists"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = User::new(CreateUser {
            email,
            name,
            password_hash,
            role: req.role,
        });
        let user = self.users.insert(&user).await.map_err(|e| match e.kind {
            ErrorKind::Conflict => AppError::validation("User already exists"),
            _ => e,
        })?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        self.session_for(&user)
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let invalid = || AppError::validation("Invalid credentials");

        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        info!(user_id = %user.id, "User logged in");
        self.session_for(&user)
    }

    /// The caller's own record.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.find(ctx.user_id).await
    }

    /// Every user. Admin only.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        ctx.require_admin()?;
        self.users.find_all().await
    }

    /// One user, visible to that user or an admin.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<User> {
        ctx.require_owner_or_admin(id, "Not authorized to view this user")?;
        self.find(id).await
    }

    /// Update a user. Only admins may change roles.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> AppResult<User> {
        ctx.require_owner_or_admin(id, "Not authorized to update this user")?;
        let mut user = self.find(id).await?;

        let mut update = UpdateUser::default();
        if let Some(name) = req.name {
            update.name = Some(normalize_name(&name)?);
        }
        if let Some(email) = req.email {
            let email = normalize_email(&email)?;
            let taken = self.users.find_by_email(&email).await?;
            if taken.is_some_and(|existing| existing.id != id) {
                return Err(AppError::validation("User already exists"));
            }
            update.email = Some(email);
        }
        if let Some(password) = req.password {
            self.validator.validate(&password)?;
            update.password_hash = Some(self.hasher.hash_password(&password)?);
        }
        if let Some(role) = req.role {
            ctx.require_admin()?;
            update.role = Some(role);
        }

        update.apply(&mut user);
        let user = self.users.update(&user).await?;
        self.identities.evict(id).await;

        info!(user_id = %id, actor = %ctx.user_id, "User updated");
        Ok(user)
    }

    /// Delete a user. Admin only.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        self.identities.evict(id).await;

        info!(user_id = %id, actor = %ctx.user_id, "User deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn session_for(&self, user: &User) -> AppResult<AuthSession> {
        let issued = self.encoder.issue(user.id, user.role)?;
        Ok(AuthSession {
            user: user.summary(),
            token: issued.token,
        })
    }
}
