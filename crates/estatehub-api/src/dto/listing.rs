//! Listing bodies to domain inputs.

use estatehub_core::AppResult;
use estatehub_entity::listing::{ListingPatch, NewListing};

use super::coerce::{self, Fields, into_option};

/// Fields of a create request. Images are still raw body entries.
pub fn new_listing(fields: &Fields) -> AppResult<NewListing> {
    let patch = listing_patch(fields)?;
    Ok(NewListing {
        title: into_option(patch.title).unwrap_or_default(),
        description: into_option(patch.description),
        property_type: into_option(patch.property_type),
        listing_type: into_option(patch.listing_type),
        seller_type: into_option(patch.seller_type),
        price: into_option(patch.price),
        bedrooms: into_option(patch.bedrooms),
        bathrooms: into_option(patch.bathrooms),
        area: into_option(patch.area),
        parking_spaces: into_option(patch.parking_spaces),
        year_built: into_option(patch.year_built),
        location: into_option(patch.location),
        city: into_option(patch.city),
        features: into_option(patch.features).unwrap_or_default(),
        images: into_option(patch.images).unwrap_or_default(),
        contact_name: into_option(patch.contact_name),
        contact_email: into_option(patch.contact_email),
        contact_phone: into_option(patch.contact_phone),
        agency_name: into_option(patch.agency_name),
        license_number: into_option(patch.license_number),
        status: into_option(patch.status),
        expires_at: into_option(patch.expires_at),
    })
}

/// Fields of an update request.
pub fn listing_patch(fields: &Fields) -> AppResult<ListingPatch> {
    Ok(ListingPatch {
        title: coerce::text(fields, "title")?,
        description: coerce::text(fields, "description")?,
        property_type: coerce::text(fields, "property_type")?,
        listing_type: coerce::parsed(fields, "listing_type")?,
        seller_type: coerce::text(fields, "seller_type")?,
        price: coerce::decimal(fields, "price")?,
        bedrooms: coerce::integer(fields, "bedrooms")?,
        bathrooms: coerce::integer(fields, "bathrooms")?,
        area: coerce::decimal(fields, "area")?,
        parking_spaces: coerce::integer(fields, "parking_spaces")?,
        year_built: coerce::integer(fields, "year_built")?,
        location: coerce::text(fields, "location")?,
        city: coerce::text(fields, "city")?,
        features: coerce::features(fields, "features")?,
        images: coerce::images(fields, "images")?,
        contact_name: coerce::text(fields, "contact_name")?,
        contact_email: coerce::text(fields, "contact_email")?,
        contact_phone: coerce::text(fields, "contact_phone")?,
        agency_name: coerce::text(fields, "agency_name")?,
        license_number: coerce::text(fields, "license_number")?,
        status: coerce::parsed(fields, "status")?,
        expires_at: coerce::timestamp(fields, "expires_at")?,
    })
}
