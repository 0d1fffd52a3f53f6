use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::listing::{Listing, ListingQuery};

use super::newest_first;
use crate::store::ListingStore;

/// Listings keyed by id; searches scan every row.
#[derive(Debug, Default)]
pub struct MemoryListingStore {
    listings: DashMap<Uuid, Listing>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        Ok(self.listings.get(&id).map(|l| l.clone()))
    }

    async fn find(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        let matching = self
            .listings
            .iter()
            .filter(|l| query.matches(l))
            .map(|l| l.clone())
            .collect();
        let skip = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(newest_first(matching, |l: &Listing| l.created_at)
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self.listings.iter().filter(|l| l.user_id == user_id).count() as u64)
    }

    async fn insert(&self, listing: &Listing) -> AppResult<Listing> {
        self.listings.insert(listing.id, listing.clone());
        Ok(listing.clone())
    }

    async fn update(&self, listing: &Listing) -> AppResult<Listing> {
        match self.listings.get_mut(&listing.id) {
            Some(mut current) => {
                *current = listing.clone();
                Ok(listing.clone())
            }
            None => Err(AppError::not_found("Listing not found")),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.listings.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use estatehub_core::types::PageRequest;
    use estatehub_entity::listing::NewListing;

    fn listing(user_id: Uuid, title: &str, age_minutes: i64) -> Listing {
        Listing::new(
            user_id,
            NewListing {
                title: title.into(),
                ..Default::default()
            },
            Utc::now() - Duration::minutes(age_minutes),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_sorts_newest_first_and_pages() {
        let store = MemoryListingStore::new();
        let owner = Uuid::new_v4();
        for (title, age) in [("old", 30), ("new", 1), ("mid", 10)] {
            store.insert(&listing(owner, title, age)).await.unwrap();
        }

        let first = store
            .find(&ListingQuery {
                page: PageRequest::new(1, 2),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = first.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid"]);

        let second = store
            .find(&ListingQuery {
                page: PageRequest::new(2, 2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title, "old");
    }

    #[tokio::test]
    async fn test_count_by_user() {
        let store = MemoryListingStore::new();
        let owner = Uuid::new_v4();
        store.insert(&listing(owner, "a", 1)).await.unwrap();
        store.insert(&listing(Uuid::new_v4(), "b", 1)).await.unwrap();
        assert_eq!(store.count_by_user(owner).await.unwrap(), 1);
    }
}
