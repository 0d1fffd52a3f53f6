use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::user::User;

use super::newest_first;
use crate::store::UserStore;

/// Users keyed by id, with an email index enforcing uniqueness.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email_key(email)).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = self.users.iter().map(|u| u.clone()).collect();
        Ok(newest_first(rows, |u: &User| u.created_at))
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        match self.emails.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(AppError::conflict("User already exists")),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user.clone())
            }
        }
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let previous = self
            .users
            .get(&user.id)
            .map(|u| email_key(&u.email))
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

        let next = email_key(&user.email);
        if next != previous {
            match self.emails.entry(next) {
                Entry::Occupied(_) => return Err(AppError::conflict("User already exists")),
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.emails.remove(&previous);
        }
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&email_key(&user.email));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatehub_entity::user::{CreateUser, UserRole};

    fn user(email: &str) -> User {
        User::new(CreateUser {
            email: email.into(),
            name: "Test".into(),
            password_hash: "hash".into(),
            role: UserRole::Owner,
        })
    }

    #[tokio::test]
    async fn test_email_is_unique_ignoring_case() {
        let store = MemoryUserStore::new();
        store.insert(&user("ana@example.com")).await.unwrap();
        let err = store.insert(&user("ANA@example.com")).await.unwrap_err();
        assert_eq!(err.message, "User already exists");
        assert!(store.find_by_email("Ana@Example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_moves_email_index() {
        let store = MemoryUserStore::new();
        let mut ana = store.insert(&user("ana@example.com")).await.unwrap();
        ana.email = "ana@new.example".into();
        store.update(&ana).await.unwrap();
        assert!(store.find_by_email("ana@example.com").await.unwrap().is_none());
        assert!(store.find_by_email("ana@new.example").await.unwrap().is_some());

        assert!(store.delete(ana.id).await.unwrap());
        assert!(!store.delete(ana.id).await.unwrap());
        assert!(store.find_by_email("ana@new.example").await.unwrap().is_none());
    }
}
