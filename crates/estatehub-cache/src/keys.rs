//! Cache key builders.
//!
//! Keys are unprefixed; the Redis provider adds `cache.redis.key_prefix`.

use uuid::Uuid;

/// Identity resolved from a token subject.
pub fn identity(user_id: Uuid) -> String {
    format!("identity:{user_id}")
}

/// Pattern matching every cached identity.
pub fn identity_pattern() -> &'static str {
    "identity:*"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key() {
        assert_eq!(
            identity(Uuid::nil()),
            "identity:00000000-0000-0000-0000-000000000000"
        );
        assert!(identity(Uuid::nil()).starts_with(identity_pattern().trim_end_matches('*')));
    }
}
