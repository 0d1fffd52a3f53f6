//! Listing create, read, update and delete.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_database::ListingStore;
use estatehub_entity::Patch;
use estatehub_entity::listing::{Listing, ListingPatch, ListingQuery, NewListing};
use estatehub_notify::{FanoutQueue, NewListingEvent};
use estatehub_storage::StagedUpload;
use estatehub_storage::staging::discard_all;

use crate::context::RequestContext;
use crate::media::ImageIngestor;
use crate::subscription::QuotaGate;

/// Orchestrates the gated create path and the plain read paths.
#[derive(Debug, Clone)]
pub struct ListingService {
    listings: Arc<dyn ListingStore>,
    gate: QuotaGate,
    ingestor: ImageIngestor,
    fanout: FanoutQueue,
}

impl ListingService {
    pub fn new(
        listings: Arc<dyn ListingStore>,
        gate: QuotaGate,
        ingestor: ImageIngestor,
        fanout: FanoutQueue,
    ) -> Self {
        Self {
            listings,
            gate,
            ingestor,
            fanout,
        }
    }

    /// Create a listing owned by the caller.
    ///
    /// Quota is checked before any image is uploaded; a rejected request
    /// leaves nothing behind. Every user is then notified in the
    /// background.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut input: NewListing,
        staged: Vec<StagedUpload>,
    ) -> AppResult<Listing> {
        if input.title.trim().is_empty() {
            discard_all(&staged).await;
            return Err(AppError::validation("Title is required"));
        }

        let permit = match self.gate.admit(ctx.user_id).await {
            Ok(permit) => permit,
            Err(e) => {
                discard_all(&staged).await;
                return Err(e);
            }
        };

        let body_images = std::mem::take(&mut input.images);
        input.images = self.ingestor.ingest(&staged, body_images).await?;

        let listing = Listing::new(ctx.user_id, input, Utc::now())?;
        let listing = self.listings.insert(&listing).await?;
        drop(permit);

        info!(
            listing_id = %listing.id,
            user_id = %ctx.user_id,
            images = listing.images.len(),
            "Listing created"
        );

        self.fanout.enqueue(NewListingEvent::from(&listing));
        Ok(listing)
    }

    /// One listing by id.
    pub async fn get(&self, id: Uuid) -> AppResult<Listing> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Listing not found"))
    }

    /// One page of listings matching `query`, newest first.
    pub async fn list(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        self.listings.find(query).await
    }

    /// Apply a partial update. Owner or admin only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut patch: ListingPatch,
        staged: Vec<StagedUpload>,
    ) -> AppResult<Listing> {
        let mut listing = match self.owned(ctx, id, "Not authorized to update this listing").await {
            Ok(listing) => listing,
            Err(e) => {
                discard_all(&staged).await;
                return Err(e);
            }
        };

        let body_images = std::mem::replace(&mut patch.images, Patch::Unchanged);
        patch.images = self.ingestor.ingest_patch(&staged, body_images).await?;

        patch.apply(&mut listing, Utc::now())?;
        let listing = self.listings.update(&listing).await?;

        info!(listing_id = %id, actor = %ctx.user_id, "Listing updated");
        Ok(listing)
    }

    /// Delete a listing. Owner or admin only; an unknown id is not an error.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let Some(listing) = self.listings.find_by_id(id).await? else {
            return Ok(());
        };
        ctx.require_owner_or_admin(listing.user_id, "Not authorized to delete this listing")?;

        self.listings.delete(id).await?;
        info!(listing_id = %id, actor = %ctx.user_id, "Listing deleted");
        Ok(())
    }

    async fn owned(&self, ctx: &RequestContext, id: Uuid, message: &str) -> AppResult<Listing> {
        let listing = self.get(id).await?;
        ctx.require_owner_or_admin(listing.user_id, message)?;
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use tokio::sync::mpsc;

    use estatehub_core::ErrorKind;
    use estatehub_database::memory::{
        MemoryListingStore, MemorySubscriptionStore, MemoryUserStore,
    };
    use estatehub_entity::listing::ListingType;
    use estatehub_entity::user::{UserRole, UserSummary};
    use estatehub_storage::UploadStaging;

    use crate::media::ingest::tests::FakeHost;
    use crate::subscription::SubscriptionLedger;

    struct Fixture {
        service: ListingService,
        host: Arc<FakeHost>,
        events: mpsc::Receiver<NewListingEvent>,
    }

    fn fixture() -> Fixture {
        let listings = Arc::new(MemoryListingStore::new());
        let ledger = SubscriptionLedger::new(
            Arc::new(MemorySubscriptionStore::new()),
            Arc::new(MemoryUserStore::new()),
        );
        let host = Arc::new(FakeHost::default());
        let (tx, events) = mpsc::channel(8);
        let service = ListingService::new(
            listings.clone(),
            QuotaGate::new(ledger, listings),
            ImageIngestor::new(host.clone(), 100),
            FanoutQueue::new(tx, true),
        );
        Fixture {
            service,
            host,
            events,
        }
    }

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::new(UserSummary {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role,
        })
    }

    fn input(title: &str) -> NewListing {
        NewListing {
            title: title.into(),
            city: Some("Miami".into()),
            listing_type: Some(ListingType::Sale),
            price: Some(300_000.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_announces_listing() {
        let mut f = fixture();
        let owner = ctx(UserRole::Owner);
        let listing = f.service.create(&owner, input("Villa"), vec![]).await.unwrap();

        let event = f.events.try_recv().unwrap();
        assert_eq!(event.listing_id, listing.id);
        assert_eq!(event.listing_type.as_deref(), Some("Sale"));
    }

    #[tokio::test]
    async fn test_quota_rejection_uploads_nothing() {
        let f = fixture();
        let owner = ctx(UserRole::Owner);
        f.service.create(&owner, input("First"), vec![]).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let staging = UploadStaging::new(dir.path()).await.unwrap();
        let staged = vec![staging.stage("a.jpg", None, Bytes::from_static(b"x")).await.unwrap()];
        let path = staged[0].path.clone();

        let err = f.service.create(&owner, input("Second"), staged).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::QuotaExceeded);
        assert_eq!(f.host.uploads.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(!path.exists());

        let mine = f
            .service
            .list(&ListingQuery {
                user_id: Some(owner.user_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_update_images_absent_vs_empty() {
        let f = fixture();
        let owner = ctx(UserRole::Owner);
        let mut new = input("Loft");
        new.images = vec!["https://cdn.example/1.jpg".into()];
        let listing = f.service.create(&owner, new, vec![]).await.unwrap();

        let patch = ListingPatch {
            price: Patch::Set(1.0),
            ..Default::default()
        };
        let updated = f.service.update(&owner, listing.id, patch, vec![]).await.unwrap();
        assert_eq!(updated.images.len(), 1);

        let patch = ListingPatch {
            images: Patch::Set(vec![]),
            ..Default::default()
        };
        let updated = f.service.update(&owner, listing.id, patch, vec![]).await.unwrap();
        assert!(updated.images.is_empty());
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_may_modify() {
        let f = fixture();
        let owner = ctx(UserRole::Owner);
        let listing = f.service.create(&owner, input("Loft"), vec![]).await.unwrap();

        let stranger = ctx(UserRole::Realtor);
        let err = f
            .service
            .update(&stranger, listing.id, ListingPatch::default(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        let err = f.service.delete(&stranger, listing.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        f.service.delete(&ctx(UserRole::Admin), listing.id).await.unwrap();
        assert_eq!(
            f.service.get(listing.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        f.service.delete(&owner, listing.id).await.unwrap();
    }
}
