//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same rules.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, Money, ResultEngine};

pub(crate) const CATALOG_NAME_MAX: usize = 100;
pub(crate) const EXPENSE_KIND_MAX: usize = 50;
pub(crate) const USER_NAME_MIN: usize = 2;
pub(crate) const USER_NAME_MAX: usize = 50;
pub(crate) const PASSWORD_MIN: usize = 6;

/// Trim a required display name and check its length in characters.
pub(crate) fn normalize_name(value: &str, label: &str, min: usize, max: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if len < min {
        return Err(EngineError::InvalidName(format!(
            "{label} name must have at least {min} characters"
        )));
    }
    if len > max {
        return Err(EngineError::InvalidName(format!(
            "{label} name must have at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Uniqueness key for a display name: NFKC, lowercase, inner whitespace collapsed.
pub(crate) fn name_key(display: &str) -> String {
    display
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn require_positive_price(price: Money) -> ResultEngine<()> {
    if !price.is_positive() {
        return Err(EngineError::InvalidAmount("price must be > 0".to_string()));
    }
    Ok(())
}

pub(crate) fn require_positive_quantity(quantity: i32) -> ResultEngine<()> {
    if quantity <= 0 {
        return Err(EngineError::InvalidCount("quantity must be > 0".to_string()));
    }
    Ok(())
}

/// Minimum-length rule shared by every path that sets a password.
pub fn require_password(password: &str) -> ResultEngine<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(EngineError::InvalidInput(format!(
            "password must have at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(
            normalize_name("  Bread ", "consumable", 1, CATALOG_NAME_MAX).unwrap(),
            "Bread"
        );
        assert!(normalize_name("   ", "consumable", 1, CATALOG_NAME_MAX).is_err());
        assert!(normalize_name(&"x".repeat(101), "consumable", 1, CATALOG_NAME_MAX).is_err());
        assert!(normalize_name("a", "user", USER_NAME_MIN, USER_NAME_MAX).is_err());
    }

    #[test]
    fn name_key_folds_case_and_spacing() {
        assert_eq!(name_key("Harissa  Jar"), "harissa jar");
        assert_eq!(name_key("HARISSA JAR"), name_key("harissa jar"));
        assert_eq!(name_key("ｂｒｅａｄ"), "bread");
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
