//! Listing entity model and its write-side shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};

use super::kind::{ListingStatus, ListingType};
use crate::patch::Patch;

/// A property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Listing {
    /// Listing identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Headline; never empty.
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// House, apartment, land...
    pub property_type: Option<String>,
    /// Sale or rent.
    pub listing_type: Option<ListingType>,
    /// Who is selling (owner, realtor, agency...).
    pub seller_type: Option<String>,
    /// Asking price.
    pub price: Option<f64>,
    /// Number of bedrooms.
    pub bedrooms: Option<i32>,
    /// Number of bathrooms.
    pub bathrooms: Option<i32>,
    /// Floor area.
    pub area: Option<f64>,
    /// Number of parking spaces.
    pub parking_spaces: Option<i32>,
    /// Construction year.
    pub year_built: Option<i32>,
    /// Street address or neighbourhood.
    pub location: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Ordered feature tags.
    pub features: Vec<String>,
    /// Ordered hosted image URLs.
    pub images: Vec<String>,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Agency name for realtor listings.
    pub agency_name: Option<String>,
    /// Realtor license number.
    pub license_number: Option<String>,
    /// Visibility.
    pub status: ListingStatus,
    /// When the listing stops being relevant.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a listing. Images are already hosted URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub seller_type: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub parking_spaces: Option<i32>,
    pub year_built: Option<i32>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub agency_name: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<ListingStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Build a listing owned by `user_id`. Fails when the title is blank.
    pub fn new(user_id: Uuid, input: NewListing, now: DateTime<Utc>) -> AppResult<Self> {
        let title = required_title(input.title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description: input.description,
            property_type: input.property_type,
            listing_type: input.listing_type,
            seller_type: input.seller_type,
            price: input.price,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            area: input.area,
            parking_spaces: input.parking_spaces,
            year_built: input.year_built,
            location: input.location,
            city: input.city,
            features: input.features,
            images: input.images,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            agency_name: input.agency_name,
            license_number: input.license_number,
            status: input.status.unwrap_or_default(),
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required_title(title: String) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    Ok(trimmed.to_string())
}

/// A partial update. Every field distinguishes "absent" from "cleared".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub property_type: Patch<String>,
    pub listing_type: Patch<ListingType>,
    pub seller_type: Patch<String>,
    pub price: Patch<f64>,
    pub bedrooms: Patch<i32>,
    pub bathrooms: Patch<i32>,
    pub area: Patch<f64>,
    pub parking_spaces: Patch<i32>,
    pub year_built: Patch<i32>,
    pub location: Patch<String>,
    pub city: Patch<String>,
    pub features: Patch<Vec<String>>,
    pub images: Patch<Vec<String>>,
    pub contact_name: Patch<String>,
    pub contact_email: Patch<String>,
    pub contact_phone: Patch<String>,
    pub agency_name: Patch<String>,
    pub license_number: Patch<String>,
    pub status: Patch<ListingStatus>,
    pub expires_at: Patch<DateTime<Utc>>,
}

impl ListingPatch {
    /// Apply onto `listing`.
    ///
    /// The title may be replaced but not removed, and the status cannot be
    /// cleared. Nothing is written when validation fails.
    pub fn apply(self, listing: &mut Listing, now: DateTime<Utc>) -> AppResult<()> {
        let title = match self.title {
            Patch::Unchanged => None,
            Patch::Clear => return Err(AppError::validation("Title is required")),
            Patch::Set(t) => Some(required_title(t)?),
        };
        let status = match self.status {
            Patch::Unchanged => None,
            Patch::Clear => return Err(AppError::validation("Status cannot be cleared")),
            Patch::Set(s) => Some(s),
        };

        if let Some(title) = title {
            listing.title = title;
        }
        if let Some(status) = status {
            listing.status = status;
        }
        self.description.apply_to(&mut listing.description);
        self.property_type.apply_to(&mut listing.property_type);
        self.listing_type.apply_to(&mut listing.listing_type);
        self.seller_type.apply_to(&mut listing.seller_type);
        self.price.apply_to(&mut listing.price);
        self.bedrooms.apply_to(&mut listing.bedrooms);
        self.bathrooms.apply_to(&mut listing.bathrooms);
        self.area.apply_to(&mut listing.area);
        self.parking_spaces.apply_to(&mut listing.parking_spaces);
        self.year_built.apply_to(&mut listing.year_built);
        self.location.apply_to(&mut listing.location);
        self.city.apply_to(&mut listing.city);
        self.features.apply_or_default(&mut listing.features);
        self.images.apply_or_default(&mut listing.images);
        self.contact_name.apply_to(&mut listing.contact_name);
        self.contact_email.apply_to(&mut listing.contact_email);
        self.contact_phone.apply_to(&mut listing.contact_phone);
        self.agency_name.apply_to(&mut listing.agency_name);
        self.license_number.apply_to(&mut listing.license_number);
        self.expires_at.apply_to(&mut listing.expires_at);
        listing.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Listing {
        Listing::new(
            Uuid::new_v4(),
            NewListing {
                title: "  Sunny loft ".into(),
                city: Some("Miami".into()),
                images: vec!["https://i.example/1.jpg".into()],
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_trims_title_and_defaults_status() {
        let listing = sample();
        assert_eq!(listing.title, "Sunny loft");
        assert_eq!(listing.status, ListingStatus::Active);
    }

    #[test]
    fn test_new_rejects_blank_title() {
        let err = Listing::new(Uuid::new_v4(), NewListing::default(), Utc::now()).unwrap_err();
        assert_eq!(err.message, "Title is required");
    }

    #[test]
    fn test_patch_keeps_images_when_absent() {
        let mut listing = sample();
        let patch = ListingPatch {
            price: Patch::Set(250_000.0),
            ..Default::default()
        };
        patch.apply(&mut listing, Utc::now()).unwrap();
        assert_eq!(listing.images.len(), 1);
        assert_eq!(listing.price, Some(250_000.0));
    }

    #[test]
    fn test_patch_empty_images_clears() {
        let mut listing = sample();
        let patch = ListingPatch {
            images: Patch::Set(vec![]),
            city: Patch::Clear,
            ..Default::default()
        };
        patch.apply(&mut listing, Utc::now()).unwrap();
        assert!(listing.images.is_empty());
        assert_eq!(listing.city, None);
    }

    #[test]
    fn test_patch_rejects_title_removal_without_side_effects() {
        let mut listing = sample();
        let before = listing.clone();
        let patch = ListingPatch {
            title: Patch::Set("   ".into()),
            city: Patch::Set("Austin".into()),
            ..Default::default()
        };
        assert!(patch.apply(&mut listing, Utc::now()).is_err());
        assert_eq!(listing, before);
    }
}
