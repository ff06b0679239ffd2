//! Field validation helpers shared by the wizards and single-page forms

use std::collections::BTreeMap;

/// Field name -> human-readable message. Empty map means the check passed.
pub type FieldErrors = BTreeMap<String, String>;

/// Minimal well-formedness check for an email address: one `@` with a
/// dotted domain after it. The backend does the authoritative check.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Password strength score, one point per satisfied class:
/// length >= 8, an uppercase letter, a digit, a special character.
pub fn password_strength(password: &str) -> u8 {
    let mut score = 0;
    if password.chars().count() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        score += 1;
    }
    score
}

/// Label for a 0-4 strength score
pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 | 1 => "weak",
        2 => "fair",
        3 => "good",
        _ => "strong",
    }
}

/// Record an error for `field` if `value` is empty after trimming
pub fn require(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
    }
}

/// Record an error for `field` if `value` is shorter than `min` characters
pub fn require_min_len(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    let len = value.chars().count();
    if len < min {
        let missing = min - len;
        let noun = if missing == 1 { "character" } else { "characters" };
        errors.insert(
            field.to_string(),
            format!("Need {missing} more {noun} (minimum {min})"),
        );
    }
}

/// Parse a positive monetary amount like `12.50`; `None` on anything else
pub fn parse_amount_cents(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() || frac.len() > 2 {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = if frac.is_empty() {
        0
    } else if frac.len() == 1 {
        frac.parse::<i64>().ok()? * 10
    } else {
        frac.parse().ok()?
    };
    let cents = whole.checked_mul(100)?.checked_add(frac)?;
    if cents > 0 {
        Some(cents)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("nodomain@"));
        assert!(!is_valid_email("@nolocal.com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_password_strength_classes() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 0);
        assert_eq!(password_strength("abcdefgh"), 1);
        assert_eq!(password_strength("Abcdefgh"), 2);
        assert_eq!(password_strength("Abcdefg1"), 3);
        assert_eq!(password_strength("Abcdef1!"), 4);
    }

    #[test]
    fn test_password_strength_is_monotonic_per_class() {
        // Adding a character that satisfies a previously-unmet class
        // never lowers the score.
        let cases = [
            ("abcdefgh", 'A'),
            ("abcdefgh", '1'),
            ("abcdefgh", '!'),
            ("Abcdefg", '1'),
            ("short", '!'),
        ];
        for (base, extra) in cases {
            let before = password_strength(base);
            let mut extended = base.to_string();
            extended.push(extra);
            assert!(
                password_strength(&extended) >= before,
                "appending {extra:?} to {base:?} lowered the score"
            );
        }
    }

    #[test]
    fn test_strength_labels() {
        assert_eq!(strength_label(0), "weak");
        assert_eq!(strength_label(1), "weak");
        assert_eq!(strength_label(2), "fair");
        assert_eq!(strength_label(3), "good");
        assert_eq!(strength_label(4), "strong");
    }

    #[test]
    fn test_require_min_len_counts_missing_characters() {
        let mut errors = FieldErrors::new();
        require_min_len(&mut errors, "teacher_bio", &"x".repeat(49), 50);
        assert_eq!(
            errors.get("teacher_bio").unwrap(),
            "Need 1 more character (minimum 50)"
        );

        let mut errors = FieldErrors::new();
        require_min_len(&mut errors, "teacher_bio", &"x".repeat(50), 50);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        require_min_len(&mut errors, "teacher_bio", "abc", 50);
        assert_eq!(
            errors.get("teacher_bio").unwrap(),
            "Need 47 more characters (minimum 50)"
        );
    }

    #[test]
    fn test_require_flags_blank_values() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "display_name", "  ", "Display name");
        require(&mut errors, "email", "a@b.com", "Email");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("display_name").unwrap(),
            "Display name is required"
        );
    }

    #[test]
    fn test_parse_amount_cents() {
        assert_eq!(parse_amount_cents("12.50"), Some(1250));
        assert_eq!(parse_amount_cents("12.5"), Some(1250));
        assert_eq!(parse_amount_cents("12"), Some(1200));
        assert_eq!(parse_amount_cents(" 7 "), Some(700));
        assert_eq!(parse_amount_cents("0"), None);
        assert_eq!(parse_amount_cents("0.00"), None);
        assert_eq!(parse_amount_cents("-3"), None);
        assert_eq!(parse_amount_cents("1.234"), None);
        assert_eq!(parse_amount_cents("abc"), None);
        assert_eq!(parse_amount_cents(""), None);
    }
}
