//! Field-level validation shared by every draft type.
//!
//! Validation is local: it runs before any gateway call and its result is
//! shown next to the offending fields, never through the notifier.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field-level error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Records `message` for `field` when `value` is blank.
pub fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

/// Records an email format error for `field` unless `value` is blank
/// (blankness is the `require` check's business).
pub fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if !value.trim().is_empty() && !is_valid_email(value) {
        errors.insert(field, "Please enter a valid email");
    }
}

const LOCAL_FORBIDDEN: &[char] = &['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', '@'];

/// Checks `local@domain.tld` shape: a dot-separated local part without
/// whitespace or specials, and a domain of at least two labels ending in an
/// alphabetic TLD of two or more letters.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| !c.is_whitespace() && !LOCAL_FORBIDDEN.contains(&c))
        });
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    let labels_ok = rest.iter().all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Turns an empty form value into `None`.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("j@x.com"));
        assert!(is_valid_email("jane.roe+crm@mail.example.co"));
        assert!(is_valid_email("ops@sub-domain.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john doe@x.com"));
        assert!(!is_valid_email("john..doe@x.com"));
        assert!(!is_valid_email("john@x.c"));
        assert!(!is_valid_email("john@x..com"));
        assert!(!is_valid_email("john@x.c0m"));
    }

    #[test]
    fn require_flags_blank_values_only() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "   ", "Please enter a name");
        require(&mut errors, "company", "Acme", "Please enter a company");
        assert_eq!(errors.get("name"), Some("Please enter a name"));
        assert!(!errors.contains("company"));
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "email", "", "Please enter email");
        check_email(&mut errors, "email", "");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Please enter email"));
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "required");
        errors.insert("email", "invalid");
        assert_eq!(errors.to_string(), "email: invalid; name: required");
    }

    #[test]
    fn optional_trims_and_drops_blanks() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" 555-1234 "), Some("555-1234".to_string()));
    }
}
