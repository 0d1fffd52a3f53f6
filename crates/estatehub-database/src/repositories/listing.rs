//! Listing repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use estatehub_core::error::{AppError, ErrorKind};
use estatehub_core::result::AppResult;
use estatehub_entity::listing::{CountFilter, Listing, ListingQuery};

use crate::store::ListingStore;

/// Repository for listings and the listing search filter.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: PgPool,
}

impl ListingRepository {
    /// Create a new listing repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the search statement for `query`.
///
/// Text enums are compared through `::text` so an unknown value simply
/// matches nothing instead of failing the cast.
fn search_statement(query: &ListingQuery) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM listings WHERE TRUE");

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = &query.status {
        builder.push(" AND status::text = ").push_bind(status);
    }
    for (column, value) in [
        ("listing_type::text", &query.listing_type),
        ("seller_type", &query.seller_type),
        ("property_type", &query.property_type),
        ("city", &query.city),
    ] {
        if let Some(value) = value {
            builder
                .push(format!(" AND LOWER({column}) = LOWER("))
                .push_bind(value)
                .push(")");
        }
    }
    if let Some(min) = query.price.min {
        builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.price.max {
        builder.push(" AND price <= ").push_bind(max);
    }
    push_count(&mut builder, "bedrooms", &query.bedrooms);
    push_count(&mut builder, "bathrooms", &query.bathrooms);
    if !query.features.is_empty() {
        builder.push(" AND features @> ").push_bind(&query.features);
    }

    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(sql_bound(query.page.limit()));
    builder.push(" OFFSET ");
    builder.push_bind(sql_bound(query.page.offset()));
    builder
}

/// Postgres LIMIT/OFFSET are signed; anything larger means "no bound".
fn sql_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn push_count(builder: &mut QueryBuilder<'_, Postgres>, column: &str, filter: &CountFilter) {
    let (min, max) = filter.bounds();
    if let Some(min) = min {
        builder
            .push(format!(" AND {column} >= "))
            .push_bind(min);
    }
    if let Some(max) = max {
        builder
            .push(format!(" AND {column} <= "))
            .push_bind(max);
    }
}

#[async_trait]
impl ListingStore for ListingRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find listing", e))
    }

    async fn find(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        search_statement(query)
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search listings", e))
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count user listings", e)
            })?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, l: &Listing) -> AppResult<Listing> {
        sqlx::query_as::<_, Listing>(
            "INSERT INTO listings \
                 (id, user_id, title, description, property_type, listing_type, seller_type, \
                  price, bedrooms, bathrooms, area, parking_spaces, year_built, location, city, \
                  features, images, contact_name, contact_email, contact_phone, agency_name, \
                  license_number, status, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21, $22, $23, $24, $25, $26) \
             RETURNING *",
        )
        .bind(l.id)
        .bind(l.user_id)
        .bind(&l.title)
        .bind(&l.description)
        .bind(&l.property_type)
        .bind(l.listing_type)
        .bind(&l.seller_type)
        .bind(l.price)
        .bind(l.bedrooms)
        .bind(l.bathrooms)
        .bind(l.area)
        .bind(l.parking_spaces)
        .bind(l.year_built)
        .bind(&l.location)
        .bind(&l.city)
        .bind(&l.features)
        .bind(&l.images)
        .bind(&l.contact_name)
        .bind(&l.contact_email)
        .bind(&l.contact_phone)
        .bind(&l.agency_name)
        .bind(&l.license_number)
        .bind(l.status)
        .bind(l.expires_at)
        .bind(l.created_at)
        .bind(l.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create listing", e))
    }

    async fn update(&self, l: &Listing) -> AppResult<Listing> {
        sqlx::query_as::<_, Listing>(
            "UPDATE listings SET title = $2, description = $3, property_type = $4, \
                 listing_type = $5, seller_type = $6, price = $7, bedrooms = $8, \
                 bathrooms = $9, area = $10, parking_spaces = $11, year_built = $12, \
                 location = $13, city = $14, features = $15, images = $16, \
                 contact_name = $17, contact_email = $18, contact_phone = $19, \
                 agency_name = $20, license_number = $21, status = $22, expires_at = $23, \
                 updated_at = $24 \
             WHERE id = $1 RETURNING *",
        )
        .bind(l.id)
        .bind(&l.title)
        .bind(&l.description)
        .bind(&l.property_type)
        .bind(l.listing_type)
        .bind(&l.seller_type)
        .bind(l.price)
        .bind(l.bedrooms)
        .bind(l.bathrooms)
        .bind(l.area)
        .bind(l.parking_spaces)
        .bind(l.year_built)
        .bind(&l.location)
        .bind(&l.city)
        .bind(&l.features)
        .bind(&l.images)
        .bind(&l.contact_name)
        .bind(&l.contact_email)
        .bind(&l.contact_phone)
        .bind(&l.agency_name)
        .bind(&l.license_number)
        .bind(l.status)
        .bind(l.expires_at)
        .bind(l.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update listing", e))?
        .ok_or_else(|| AppError::not_found("Listing not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete listing", e))
    }
}
