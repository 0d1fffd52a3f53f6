//! Tri-state field updates.

use serde::{Deserialize, Deserializer};

/// The change requested for one field of a partial update.
///
/// Deserializes from JSON as follows when the field carries
/// `#[serde(default)]`: a missing key is [`Patch::Unchanged`], `null` is
/// [`Patch::Clear`], and any other value is [`Patch::Set`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    /// Leave the stored value as it is.
    #[default]
    Unchanged,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> Patch<T> {
    /// Whether this patch leaves the field alone.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Build a patch from an optional value where `None` means "unchanged".
    pub fn from_set(value: Option<T>) -> Self {
        value.map_or(Self::Unchanged, Self::Set)
    }

    /// Transform the carried value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Unchanged => Patch::Unchanged,
            Self::Clear => Patch::Clear,
            Self::Set(v) => Patch::Set(f(v)),
        }
    }

    /// Apply to an optional field.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Self::Unchanged => {}
            Self::Clear => *target = None,
            Self::Set(v) => *target = Some(v),
        }
    }
}

impl<T: Default> Patch<T> {
    /// Apply to a field whose cleared state is its default (lists, flags).
    pub fn apply_or_default(self, target: &mut T) {
        match self {
            Self::Unchanged => {}
            Self::Clear => *target = T::default(),
            Self::Set(v) => *target = v,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Self::Set(v),
            None => Self::Clear,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        images: Patch<Vec<String>>,
        #[serde(default)]
        city: Patch<String>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let body: Body = serde_json::from_str(r#"{"city": null}"#).unwrap();
        assert_eq!(body.images, Patch::Unchanged);
        assert_eq!(body.city, Patch::Clear);

        let body: Body = serde_json::from_str(r#"{"images": [], "city": "Miami"}"#).unwrap();
        assert_eq!(body.images, Patch::Set(vec![]));
        assert_eq!(body.city, Patch::Set("Miami".to_string()));
    }

    #[test]
    fn test_apply() {
        let mut city = Some("Austin".to_string());
        Patch::Unchanged.apply_to(&mut city);
        assert_eq!(city.as_deref(), Some("Austin"));
        Patch::Clear.apply_to(&mut city);
        assert_eq!(city, None);

        let mut images = vec!["https://i.example/a.png".to_string()];
        Patch::Clear.apply_or_default(&mut images);
        assert!(images.is_empty());
    }
}
