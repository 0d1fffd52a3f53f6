//! Input checks for account fields.

use estatehub_core::{AppError, AppResult};

/// Minimum length of a display name after trimming.
pub const NAME_MIN_LENGTH: usize = 2;

/// Trim and check a display name.
pub fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.chars().count() < NAME_MIN_LENGTH {
        return Err(AppError::validation(format!(
            "Name must be at least {NAME_MIN_LENGTH} characters long"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim, lowercase and check an email address.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let normalized = email.trim().to_lowercase();
    if !looks_like_email(&normalized) {
        return Err(AppError::validation("Please provide a valid email address"));
    }
    Ok(normalized)
}

/// Some non-blank text, an `@`, more non-blank text, a dot and a final
/// non-blank run.
fn looks_like_email(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    chars.iter().enumerate().any(|(at, &c)| {
        if c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        let domain = &chars[at + 1..];
        domain
            .iter()
            .take_while(|c| !c.is_whitespace())
            .enumerate()
            .any(|(i, &c)| {
                c == '.'
                    && i > 0
                    && domain.get(i + 1).is_some_and(|next| !next.is_whitespace())
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert_eq!(normalize_email(" Ana@Example.com ").unwrap(), "ana@example.com");
        assert!(normalize_email("ana@example").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ana@.com").is_err());
        assert!(normalize_email("ana@example.").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(normalize_name("  Bo ").unwrap(), "Bo");
        assert!(normalize_name(" B ").is_err());
    }
}
