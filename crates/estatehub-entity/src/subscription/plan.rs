//! Plan tiers, billing cycles, and the fixed pricing table.
//!
//! Every price and expiration computation in the ledger goes through
//! [`PlanTier::price`] and [`BillingCycle::expiration_from`] so quotes stay
//! identical across the create and change-plan paths.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use estatehub_core::AppError;

/// A named subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Default tier provisioned automatically.
    Free,
    /// Entry paid tier.
    Basic,
    /// Mid paid tier.
    Premium,
    /// Unlimited listings.
    Professional,
}

/// How many listings a plan allows a user to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingCap {
    /// At most this many listings.
    Limited(u64),
    /// No cap.
    Unlimited,
}

impl ListingCap {
    /// Whether `count` existing listings leave room for one more.
    pub fn allows_another(&self, count: u64) -> bool {
        match self {
            Self::Limited(cap) => count < *cap,
            Self::Unlimited => true,
        }
    }

    /// Wire representation: the cap, or `-1` when unlimited.
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Limited(cap) => *cap as i64,
            Self::Unlimited => -1,
        }
    }
}

impl PlanTier {
    /// All tiers in ascending order.
    pub const ALL: [PlanTier; 4] = [Self::Free, Self::Basic, Self::Premium, Self::Professional];

    /// Price for one billing period.
    pub fn price(&self, cycle: BillingCycle) -> i32 {
        match (self, cycle) {
            (Self::Free, _) => 0,
            (Self::Basic, BillingCycle::Monthly) => 19,
            (Self::Basic, BillingCycle::Yearly) => 199,
            (Self::Premium, BillingCycle::Monthly) => 49,
            (Self::Premium, BillingCycle::Yearly) => 499,
            (Self::Professional, BillingCycle::Monthly) => 99,
            (Self::Professional, BillingCycle::Yearly) => 999,
        }
    }

    /// Listing cap for the tier.
    pub fn listing_cap(&self) -> ListingCap {
        match self {
            Self::Free => ListingCap::Limited(1),
            Self::Basic => ListingCap::Limited(5),
            Self::Premium => ListingCap::Limited(20),
            Self::Professional => ListingCap::Unlimited,
        }
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Professional => "professional",
        }
    }

    /// The pricing table row for this tier.
    pub fn quote(&self) -> PlanQuote {
        PlanQuote {
            plan: *self,
            monthly: self.price(BillingCycle::Monthly),
            yearly: self.price(BillingCycle::Yearly),
            listing_cap: self.listing_cap().as_i64(),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "professional" => Ok(Self::Professional),
            _ => Err(AppError::validation(format!(
                "Invalid plan: '{s}'. Expected one of: free, basic, premium, professional"
            ))),
        }
    }
}

/// Recurrence unit determining price and expiration arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_cycle", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Renews every calendar month.
    Monthly,
    /// Renews every calendar year.
    Yearly,
}

impl BillingCycle {
    /// Expiration for a period starting at `start`.
    ///
    /// Uses calendar months, so Jan 31 + 1 month lands on the last day of
    /// February.
    pub fn expiration_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Self::Monthly => Months::new(1),
            Self::Yearly => Months::new(12),
        };
        start
            .checked_add_months(months)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Return the cycle as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(AppError::validation(format!(
                "Invalid billing cycle: '{s}'. Expected one of: monthly, yearly"
            ))),
        }
    }
}

/// One row of the published pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanQuote {
    /// Tier.
    pub plan: PlanTier,
    /// Monthly price.
    pub monthly: i32,
    /// Yearly price.
    pub yearly: i32,
    /// Listing cap, `-1` meaning unlimited.
    pub listing_cap: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pricing_table() {
        assert_eq!(PlanTier::Free.price(BillingCycle::Yearly), 0);
        assert_eq!(PlanTier::Basic.price(BillingCycle::Monthly), 19);
        assert_eq!(PlanTier::Premium.price(BillingCycle::Yearly), 499);
        assert_eq!(PlanTier::Professional.price(BillingCycle::Monthly), 99);
    }

    #[test]
    fn test_listing_caps() {
        assert_eq!(PlanTier::Free.listing_cap(), ListingCap::Limited(1));
        assert_eq!(PlanTier::Premium.listing_cap().as_i64(), 20);
        assert_eq!(PlanTier::Professional.listing_cap().as_i64(), -1);
        assert!(!ListingCap::Limited(1).allows_another(1));
        assert!(ListingCap::Limited(5).allows_another(4));
        assert!(ListingCap::Unlimited.allows_another(10_000));
    }

    #[test]
    fn test_calendar_expiration() {
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        assert_eq!(
            BillingCycle::Monthly.expiration_from(start),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            BillingCycle::Yearly.expiration_from(start),
            Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Premium".parse::<PlanTier>().unwrap(), PlanTier::Premium);
        assert_eq!("YEARLY".parse::<BillingCycle>().unwrap(), BillingCycle::Yearly);
        assert!("gold".parse::<PlanTier>().is_err());
        assert!("weekly".parse::<BillingCycle>().is_err());
    }
}
