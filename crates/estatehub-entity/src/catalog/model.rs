//! Subscription plan catalog entries.
//!
//! These are presentation records edited by administrators. The ledger
//! never reads them; it prices from [`crate::subscription::PlanTier`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Which kind of user a plan is marketed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_audience", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanAudience {
    Owner,
    Realtor,
    Both,
}

impl fmt::Display for PlanAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Realtor => write!(f, "realtor"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub yearly_price: f64,
    pub max_listings: i32,
    pub max_photos: i32,
    pub validity_days: i32,
    pub user_type: PlanAudience,
    pub highlighted: bool,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubscriptionPlan {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub monthly_price: f64,
    pub yearly_price: f64,
    #[serde(default = "default_max_listings")]
    pub max_listings: i32,
    #[serde(default = "default_max_photos")]
    pub max_photos: i32,
    #[serde(default = "default_validity_days")]
    pub validity_days: i32,
    pub user_type: PlanAudience,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_max_listings() -> i32 {
    1
}

fn default_max_photos() -> i32 {
    5
}

fn default_validity_days() -> i32 {
    30
}

/// Data for updating a catalog entry; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSubscriptionPlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_price: Option<f64>,
    pub yearly_price: Option<f64>,
    pub max_listings: Option<i32>,
    pub max_photos: Option<i32>,
    pub validity_days: Option<i32>,
    pub user_type: Option<PlanAudience>,
    pub highlighted: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl SubscriptionPlan {
    /// Materialise a new entry.
    pub fn new(input: CreateSubscriptionPlan) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            monthly_price: input.monthly_price,
            yearly_price: input.yearly_price,
            max_listings: input.max_listings,
            max_photos: input.max_photos,
            validity_days: input.validity_days,
            user_type: input.user_type,
            highlighted: input.highlighted,
            features: input.features,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update in place.
    pub fn apply(&mut self, update: UpdateSubscriptionPlan) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.description {
            self.description = Some(v);
        }
        if let Some(v) = update.monthly_price {
            self.monthly_price = v;
        }
        if let Some(v) = update.yearly_price {
            self.yearly_price = v;
        }
        if let Some(v) = update.max_listings {
            self.max_listings = v;
        }
        if let Some(v) = update.max_photos {
            self.max_photos = v;
        }
        if let Some(v) = update.validity_days {
            self.validity_days = v;
        }
        if let Some(v) = update.user_type {
            self.user_type = v;
        }
        if let Some(v) = update.highlighted {
            self.highlighted = v;
        }
        if let Some(v) = update.features {
            self.features = v;
        }
        self.updated_at = Utc::now();
    }
}
