//! JSON request bodies for the user and subscription endpoints.

use serde::Deserialize;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::subscription::{BillingCycle, PlanTier};
use estatehub_entity::user::UserRole;
use estatehub_service::user::{RegisterUser, UpdateUserRequest};

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `POST /users/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "type", alias = "role")]
    pub account_type: Option<String>,
}

impl RegisterRequest {
    pub fn into_input(self) -> AppResult<RegisterUser> {
        let (Some(name), Some(email), Some(password), Some(account_type)) = (
            filled(self.name),
            filled(self.email),
            self.password.filter(|v| !v.is_empty()),
            filled(self.account_type),
        ) else {
            return Err(AppError::validation(
                "All fields are required (name, email, password, type)",
            ));
        };

        let role = account_type
            .trim()
            .parse::<UserRole>()
            .ok()
            .filter(UserRole::is_self_assignable)
            .ok_or_else(|| AppError::validation("Type must be either 'owner' or 'realtor'"))?;

        Ok(RegisterUser {
            name,
            email,
            password,
            role,
        })
    }
}

/// `POST /users/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// `(email, password)`, both required.
    pub fn credentials(self) -> AppResult<(String, String)> {
        match (filled(self.email), self.password.filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::validation("Email and password are required")),
        }
    }
}

/// `PUT /users/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "type")]
    pub role: Option<String>,
}

impl UpdateUserBody {
    pub fn into_input(self) -> AppResult<UpdateUserRequest> {
        let role = match self.role.filter(|r| !r.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<UserRole>()?),
            None => None,
        };
        Ok(UpdateUserRequest {
            name: self.name,
            email: self.email,
            password: self.password.filter(|p| !p.is_empty()),
            role,
        })
    }
}

/// `POST`/`PUT /subscription`. Both fields default: free plan, monthly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionRequest {
    pub plan: Option<String>,
    #[serde(rename = "billingCycle", alias = "billing_cycle")]
    pub billing_cycle: Option<String>,
}

impl SubscriptionRequest {
    pub fn selection(&self) -> AppResult<(PlanTier, BillingCycle)> {
        let plan = match self.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse::<PlanTier>()?,
            None => PlanTier::Free,
        };
        let cycle = match self
            .billing_cycle
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            Some(raw) => raw.parse::<BillingCycle>()?,
            None => BillingCycle::Monthly,
        };
        Ok((plan, cycle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatehub_core::ErrorKind;

    #[test]
    fn test_register_requires_every_field() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":"Ana","email":"ana@x.io","password":"secret1"}"#)
                .unwrap();
        let err = req.into_input().unwrap_err();
        assert_eq!(err.message, "All fields are required (name, email, password, type)");
    }

    #[test]
    fn test_register_rejects_admin_type() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"Ana","email":"ana@x.io","password":"secret1","type":"admin"}"#,
        )
        .unwrap();
        let err = req.into_input().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Type must be either 'owner' or 'realtor'");
    }

    #[test]
    fn test_register_maps_type_to_role() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"Ana","email":"ana@x.io","password":"secret1","type":"Realtor"}"#,
        )
        .unwrap();
        assert_eq!(req.into_input().unwrap().role, UserRole::Realtor);
    }

    #[test]
    fn test_login_requires_both() {
        let req = LoginRequest {
            email: Some("ana@x.io".into()),
            password: None,
        };
        assert_eq!(
            req.credentials().unwrap_err().message,
            "Email and password are required"
        );
    }

    #[test]
    fn test_subscription_defaults() {
        let req: SubscriptionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.selection().unwrap(), (PlanTier::Free, BillingCycle::Monthly));

        let req: SubscriptionRequest =
            serde_json::from_str(r#"{"plan":"premium","billingCycle":"yearly"}"#).unwrap();
        assert_eq!(
            req.selection().unwrap(),
            (PlanTier::Premium, BillingCycle::Yearly)
        );

        let req: SubscriptionRequest = serde_json::from_str(r#"{"plan":"gold"}"#).unwrap();
        assert!(req.selection().is_err());
    }
}
