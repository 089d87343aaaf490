//! Field constraints and the cross-field rule for points of interest.
//!
//! All checks run in one pass and every failure is reported, so a body that
//! breaks both a length limit and the name/description rule comes back with
//! both violations in a single 400.

use serde::Serialize;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// One failed constraint, keyed by the offending field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates the mutable fields of a point of interest, as they appear in
/// both the creation and the update view.
pub fn validate_point_of_interest(
    name: Option<&str>,
    description: Option<&str>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Cross-field rule first, matching the order violations are reported in.
    if let (Some(name), Some(description)) = (name, description) {
        if name == description {
            violations.push(Violation::new(
                "description",
                "The provided description should be different from the name.",
            ));
        }
    }

    match name {
        None => violations.push(Violation::new("name", "The name field is required.")),
        Some(name) if name.is_empty() => {
            violations.push(Violation::new("name", "The name field is required."));
        }
        Some(name) if name.chars().count() > MAX_NAME_LENGTH => {
            violations.push(Violation::new(
                "name",
                format!("The name may not exceed {MAX_NAME_LENGTH} characters."),
            ));
        }
        Some(_) => {}
    }

    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            violations.push(Violation::new(
                "description",
                format!("The description may not exceed {MAX_DESCRIPTION_LENGTH} characters."),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fields_pass() {
        let violations =
            validate_point_of_interest(Some("Central Park"), Some("A very large park."));
        assert!(violations.is_empty());
    }

    #[test]
    fn test_missing_name_is_required() {
        let violations = validate_point_of_interest(None, Some("A description."));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn test_empty_name_is_required() {
        let violations = validate_point_of_interest(Some(""), None);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn test_name_equal_to_description_is_rejected() {
        let violations =
            validate_point_of_interest(Some("Central Park"), Some("Central Park"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "description");
    }

    #[test]
    fn test_length_and_cross_field_violations_accumulate() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let violations = validate_point_of_interest(Some(long.as_str()), Some(long.as_str()));
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["description", "name"]);
    }

    #[test]
    fn test_description_over_limit_is_rejected() {
        let long = "y".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let violations = validate_point_of_interest(Some("Central Park"), Some(long.as_str()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "description");
    }

    #[test]
    fn test_missing_description_is_allowed() {
        let violations = validate_point_of_interest(Some("Central Park"), None);
        assert!(violations.is_empty());
    }
}
