//! Field-level input validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize an optional field that may be omitted but never `null`.
pub(crate) fn non_null<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("This field may not be null."))
}

/// Longest accepted post title or category name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_CHARS: usize = 150;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// How a payload is applied to a resource.
///
/// `Create` and `Replace` (PUT) demand every required field, `Patch`
/// demands none. Fields left out on an update keep their stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Replace,
    Patch,
}

impl WriteMode {
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Patch)
    }
}

/// Messages keyed by the offending field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Record `field` as missing when the mode demands it.
    pub fn require<T>(&mut self, field: &str, value: &Option<T>, mode: WriteMode) {
        if value.is_none() && mode.requires_all() {
            self.add(field, REQUIRED);
        }
    }

    /// Record a blank or too long text value.
    pub fn check_text(&mut self, field: &str, value: &str, allow_blank: bool, max_chars: Option<usize>) {
        if !allow_blank && value.trim().is_empty() {
            self.add(field, BLANK);
        }
        if let Some(max) = max_chars {
            if value.chars().count() > max {
                self.add(
                    field,
                    format!("Ensure this field has no more than {max} characters."),
                );
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Message for a primary key that points at nothing.
pub fn missing_reference(id: i64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_depends_on_mode() {
        let mut errors = ValidationErrors::new();
        errors.require::<String>("body", &None, WriteMode::Patch);
        assert!(errors.is_empty());

        errors.require::<String>("body", &None, WriteMode::Replace);
        assert_eq!(errors.get("body"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_check_text_counts_characters() {
        let mut errors = ValidationErrors::new();
        errors.check_text("name", &"é".repeat(MAX_NAME_CHARS), false, Some(MAX_NAME_CHARS));
        assert!(errors.is_empty());

        errors.check_text("name", &"a".repeat(MAX_NAME_CHARS + 1), false, Some(MAX_NAME_CHARS));
        assert_eq!(errors.get("name").map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_whitespace_is_blank() {
        let mut errors = ValidationErrors::new();
        errors.check_text("body", "  \n ", false, None);
        assert_eq!(errors.get("body"), Some(&[BLANK.to_string()][..]));
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("body", BLANK);
        errors.add("post", REQUIRED);
        assert_eq!(
            errors.to_string(),
            "body: This field may not be blank.; post: This field is required."
        );
    }
}
