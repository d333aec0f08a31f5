//! Name and field validation
//!
//! Every create and rename runs both name checks: the character whitelist
//! and the duplicate check. When several problems apply they are reported
//! in display order: invalid characters, then duplicate, then empty.
//!
//! The duplicate check compares names exactly (case-sensitive), while the
//! list search in the controller ignores case.

use regex::Regex;
use std::sync::LazyLock;
use super::error::ValidationError;
use super::repository::{ItemRepository, RecordId};
use crate::item::Item;

/// Letters, digits, spaces, dashes and single quotes (compiled once on first use)
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9 \-']*$").expect("NAME_PATTERN is a valid regex literal")
});

fn has_only_allowed_chars(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// True iff `name` uses only allowed characters and is not blank
pub fn is_valid_name(name: &str) -> bool {
    has_only_allowed_chars(name) && !is_blank(name)
}

/// True iff a record other than `excluding` already uses `name`
pub fn is_duplicate<R: Item>(
    name: &str,
    repo: &ItemRepository<R>,
    excluding: Option<RecordId>,
) -> bool {
    repo.all()
        .any(|(id, record)| Some(id) != excluding && record.name() == name)
}

/// Every problem with `name`, highest display priority first
pub fn name_errors<R: Item>(
    name: &str,
    repo: &ItemRepository<R>,
    excluding: Option<RecordId>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !has_only_allowed_chars(name) {
        errors.push(ValidationError::InvalidCharacter(name.to_string()));
    }
    if is_duplicate(name, repo, excluding) {
        errors.push(ValidationError::DuplicateName(name.to_string()));
    }
    if is_blank(name) {
        errors.push(ValidationError::EmptyName);
    }

    errors
}

/// Fails with the highest-priority problem with `name`, if any
pub fn check_name<R: Item>(
    name: &str,
    repo: &ItemRepository<R>,
    excluding: Option<RecordId>,
) -> Result<(), ValidationError> {
    match name_errors(name, repo, excluding).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Fails on the first float field that is negative or not finite
pub fn check_fields<R: Item>(record: &R) -> Result<(), ValidationError> {
    for (field, value) in record.numeric_fields() {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::NegativeValue { field, value });
        }
    }
    Ok(())
}

/// Name and field checks together, as run before committing a record
pub fn check_record<R: Item>(
    record: &R,
    repo: &ItemRepository<R>,
    excluding: Option<RecordId>,
) -> Result<(), ValidationError> {
    check_name(record.name(), repo, excluding)?;
    check_fields(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::WeaponRecord;

    fn repo_with_sword() -> (ItemRepository<WeaponRecord>, RecordId) {
        let mut repo = ItemRepository::new();
        let id = repo.add(WeaponRecord::named("Sword")).unwrap();
        (repo, id)
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("Sword"));
        assert!(is_valid_name("Dragon's Bane"));
        assert!(is_valid_name("Short-Bow 2"));
    }

    #[test]
    fn test_invalid_characters() {
        for name in ["Sword!", "Axe_1", "Bow.", "Épée", "Mace\t", "Club,Big", "Staff\"", "Wand\n"] {
            assert!(!is_valid_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_blank_names_are_invalid() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name(" "));
        assert!(!is_valid_name("    "));
    }

    #[test]
    fn test_duplicate_excluding_self() {
        let (repo, sword_id) = repo_with_sword();

        assert!(is_duplicate("Sword", &repo, None));
        assert!(!is_duplicate("Sword", &repo, Some(sword_id)));
        assert!(!is_duplicate("sword", &repo, None));
    }

    #[test]
    fn test_name_errors_in_priority_order() {
        let mut repo = ItemRepository::new();
        repo.add(WeaponRecord::named("Sword!")).ok();
        // Repository add does not check characters, so this is stored
        assert!(repo.find("Sword!").is_some());

        assert_eq!(
            name_errors("Sword!", &repo, None),
            vec![
                ValidationError::InvalidCharacter("Sword!".to_string()),
                ValidationError::DuplicateName("Sword!".to_string()),
            ]
        );
        assert_eq!(
            check_name("Sword!", &repo, None),
            Err(ValidationError::InvalidCharacter("Sword!".to_string()))
        );
        assert_eq!(check_name("  ", &repo, None), Err(ValidationError::EmptyName));
        assert_eq!(check_name("Axe", &repo, None), Ok(()));
    }

    #[test]
    fn test_check_fields_rejects_negative_and_nan() {
        let mut bow = WeaponRecord::named("Bow");
        assert_eq!(check_fields(&bow), Ok(()));

        bow.attack_speed = -1.0;
        assert_eq!(
            check_fields(&bow),
            Err(ValidationError::NegativeValue { field: "Attack Speed", value: -1.0 })
        );

        bow.attack_speed = 1.0;
        bow.base.base_value = f32::NAN;
        assert!(matches!(
            check_fields(&bow),
            Err(ValidationError::NegativeValue { field: "Base Value", .. })
        ));
    }
}
