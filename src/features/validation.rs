//! Field rules for the contact forms.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Strings;

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s\-']{2,50}$").expect("valid name pattern"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s+()\-]{10,20}$").expect("valid phone pattern"));
static MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.{10,}$").expect("valid message pattern"));

/// What a form control looked like when it was validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// `name` attribute, falling back to `id`.
    pub key: String,
    pub value: String,
    pub required: bool,
    pub is_checkbox: bool,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Required,
    FirstName,
    LastName,
    Email,
    Phone,
    MessageTooShort,
    PrivacyConsent,
}

impl Violation {
    pub fn message(self, strings: &Strings) -> &str {
        match self {
            Violation::Required => &strings.required,
            Violation::FirstName => &strings.first_name_invalid,
            Violation::LastName => &strings.last_name_invalid,
            Violation::Email => &strings.email_invalid,
            Violation::Phone => &strings.phone_invalid,
            Violation::MessageTooShort => &strings.message_too_short,
            Violation::PrivacyConsent => &strings.privacy_required,
        }
    }
}

fn pattern_violation(key: &str, value: &str) -> Option<Violation> {
    let (pattern, violation) = match key {
        "firstName" => (&*NAME, Violation::FirstName),
        "lastName" => (&*NAME, Violation::LastName),
        "email" => (&*EMAIL, Violation::Email),
        "phone" => (&*PHONE, Violation::Phone),
        "message" => (&*MESSAGE, Violation::MessageTooShort),
        _ => return None,
    };
    (!pattern.is_match(value)).then_some(violation)
}

/// Checks one field. An unchecked required checkbox outranks any pattern failure.
pub fn check(field: &FieldSnapshot) -> Option<Violation> {
    let value = field.value.trim();

    if field.required && value.is_empty() {
        return Some(Violation::Required);
    }

    let mut violation = if value.is_empty() {
        None
    } else {
        pattern_violation(&field.key, value)
    };

    if field.is_checkbox && field.required && !field.checked {
        violation = Some(Violation::PrivacyConsent);
    }

    violation
}

/// Per-field state. Only fields already shown as invalid are re-checked while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

impl FieldState {
    pub fn after(result: Option<Violation>) -> Self {
        match result {
            Some(_) => FieldState::Invalid,
            None => FieldState::Valid,
        }
    }

    pub fn revalidates_on_input(self) -> bool {
        self == FieldState::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(key: &str, value: &str) -> FieldSnapshot {
        FieldSnapshot {
            key: key.to_string(),
            value: value.to_string(),
            ..FieldSnapshot::default()
        }
    }

    #[test]
    fn name_length_bounds() {
        assert_eq!(check(&field("firstName", "A")), Some(Violation::FirstName));
        assert_eq!(check(&field("lastName", &"a".repeat(51))), Some(Violation::LastName));
        assert_eq!(check(&field("firstName", "Jo")), None);
        assert_eq!(check(&field("lastName", &"b".repeat(50))), None);
    }

    #[test]
    fn names_allow_unicode_letters_hyphens_apostrophes() {
        assert_eq!(check(&field("lastName", "Müller-Lüdenscheidt")), None);
        assert_eq!(check(&field("lastName", "O'Brien")), None);
        assert_eq!(check(&field("firstName", "Anna Lena")), None);
        assert_eq!(check(&field("firstName", "R2D2")), Some(Violation::FirstName));
    }

    #[test]
    fn email_shape() {
        assert_eq!(check(&field("email", "a@b.c")), None);
        assert_eq!(check(&field("email", "abc")), Some(Violation::Email));
        assert_eq!(check(&field("email", "a b@c.de")), Some(Violation::Email));
        assert_eq!(check(&field("email", "a@bde")), Some(Violation::Email));
    }

    #[test]
    fn phone_digits_and_punctuation() {
        assert_eq!(check(&field("phone", "+49 (30) 123-4567")), None);
        assert_eq!(check(&field("phone", "12345")), Some(Violation::Phone));
        assert_eq!(check(&field("phone", "0301234567x")), Some(Violation::Phone));
    }

    #[test]
    fn message_needs_ten_characters() {
        assert_eq!(check(&field("message", "0123456789")), None);
        assert_eq!(check(&field("message", "012345678")), Some(Violation::MessageTooShort));
        assert_eq!(check(&field("message", "  012345678  ")), Some(Violation::MessageTooShort));
        assert_eq!(check(&field("message", "Hallo\nWelt!")), None);
    }

    #[test]
    fn required_empty_wins() {
        let mut f = field("email", "   ");
        f.required = true;
        assert_eq!(check(&f), Some(Violation::Required));
    }

    #[test]
    fn optional_empty_passes() {
        assert_eq!(check(&field("phone", "")), None);
    }

    #[test]
    fn required_checkbox_must_be_checked() {
        let mut consent = FieldSnapshot {
            key: "privacy".to_string(),
            value: "on".to_string(),
            required: true,
            is_checkbox: true,
            checked: false,
        };
        assert_eq!(check(&consent), Some(Violation::PrivacyConsent));
        consent.checked = true;
        assert_eq!(check(&consent), None);
    }

    #[test]
    fn messages_resolve_from_strings() {
        let strings = Strings::default();
        assert_eq!(
            Violation::Email.message(&strings),
            "Bitte geben Sie eine gültige E-Mail-Adresse ein."
        );
        assert_eq!(Violation::Required.message(&strings), "Dieses Feld ist erforderlich.");
    }

    #[test]
    fn only_invalid_fields_recheck_while_typing() {
        assert!(!FieldState::Untouched.revalidates_on_input());
        assert!(!FieldState::Valid.revalidates_on_input());
        assert!(FieldState::Invalid.revalidates_on_input());
        assert_eq!(FieldState::after(Some(Violation::Phone)), FieldState::Invalid);
        assert_eq!(FieldState::after(None), FieldState::Valid);
    }

    proptest! {
        #[test]
        fn any_letter_name_within_bounds_passes(
            name in "[a-zA-ZäöüÄÖÜß][a-zA-ZäöüÄÖÜß '-]{0,48}[a-zA-ZäöüÄÖÜß]"
        ) {
            prop_assert_eq!(check(&field("firstName", &name)), None);
        }

        #[test]
        fn overlong_names_fail(name in "[a-zA-Z]{51,80}") {
            prop_assert_eq!(check(&field("lastName", &name)), Some(Violation::LastName));
        }
    }
}
