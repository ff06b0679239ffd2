//! Sign-up wizard: Account -> Profile -> Preferences

use super::validate::{self, FieldErrors};
use super::{Wizard, SIGNUP_DRAFT_KEY};
use crate::state::{FormField, Registration};

pub const STEPS: [&str; 3] = ["Account", "Profile", "Preferences"];

/// Minimum acceptable password strength score (out of 4)
const MIN_PASSWORD_SCORE: u8 = 2;

pub const LANGUAGES: [&str; 6] = [
    "Spanish", "French", "German", "Japanese", "Mandarin", "Italian",
];
pub const LEVELS: [&str; 4] = ["Beginner", "Elementary", "Intermediate", "Advanced"];

fn defaults() -> Vec<FormField> {
    vec![
        FormField::text("email", "Email", 0, false),
        FormField::secret("password", "Password", 0),
        FormField::secret("confirm_password", "Confirm password", 0),
        FormField::text("display_name", "Display name", 1, false),
        FormField::choice("role", "I want to join as", 1, &["student", "tutor"]),
        FormField::choice("target_language", "Language to learn", 2, &LANGUAGES),
        FormField::choice("level", "Current level", 2, &LEVELS),
        FormField::flag("newsletter", "Subscribe to lesson tips", 2),
    ]
}

fn text_of<'a>(fields: &'a [FormField], name: &str) -> &'a str {
    fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.as_text())
        .unwrap_or("")
}

fn validate_step(step: usize, fields: &[FormField]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        0 => {
            let email = text_of(fields, "email");
            if !validate::is_valid_email(email) {
                errors.insert(
                    "email".to_string(),
                    "Enter a valid email address".to_string(),
                );
            }
            let password = text_of(fields, "password");
            let score = validate::password_strength(password);
            if score < MIN_PASSWORD_SCORE {
                errors.insert(
                    "password".to_string(),
                    format!(
                        "Password too weak ({}); use 8+ characters with uppercase, digits or symbols",
                        validate::strength_label(score)
                    ),
                );
            }
            if text_of(fields, "confirm_password") != password {
                errors.insert(
                    "confirm_password".to_string(),
                    "Passwords do not match".to_string(),
                );
            }
        }
        1 => {
            validate::require(
                &mut errors,
                "display_name",
                text_of(fields, "display_name"),
                "Display name",
            );
            validate::require(&mut errors, "role", text_of(fields, "role"), "Role");
        }
        2 => {
            validate::require(
                &mut errors,
                "target_language",
                text_of(fields, "target_language"),
                "Language",
            );
        }
        _ => {}
    }
    errors
}

fn validate_submit(fields: &[FormField]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for step in 0..STEPS.len() {
        errors.extend(validate_step(step, fields));
    }
    errors
}

/// Fresh sign-up wizard bound to its versioned storage key
pub fn wizard() -> Wizard {
    Wizard::new(
        SIGNUP_DRAFT_KEY,
        &STEPS,
        defaults,
        validate_step,
        validate_submit,
    )
}

/// Registration payload from a completed wizard
pub fn registration(wizard: &Wizard) -> Registration {
    let fields = wizard.fields();
    Registration {
        email: text_of(fields, "email").to_string(),
        password: text_of(fields, "password").to_string(),
        display_name: text_of(fields, "display_name").to_string(),
        role: text_of(fields, "role").to_string(),
        target_language: text_of(fields, "target_language").to_string(),
        level: text_of(fields, "level").to_string(),
        newsletter: fields
            .iter()
            .find(|f| f.name == "newsletter")
            .is_some_and(FormField::as_flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::DraftStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, DraftStore) {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::with_dir(dir.path().to_path_buf());
        (dir, store)
    }

    fn type_into(w: &mut Wizard, store: &DraftStore, text: &str) {
        for c in text.chars() {
            w.input_char(c, store);
        }
    }

    fn complete_account_step(w: &mut Wizard, store: &DraftStore, email: &str) {
        type_into(w, store, email);
        w.next_field();
        type_into(w, store, "Str0ng!pass");
        w.next_field();
        type_into(w, store, "Str0ng!pass");
    }

    #[test]
    fn test_weak_password_blocks_account_step() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);

        type_into(&mut w, &store, "a@b.com");
        w.next_field();
        type_into(&mut w, &store, "abc");
        w.next_field();
        type_into(&mut w, &store, "abc");

        assert!(!w.advance(&store));
        assert!(w.error_for("password").unwrap().contains("weak"));
        assert_eq!(w.step_index(), 0);
    }

    #[test]
    fn test_mismatched_confirmation_blocks() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);

        type_into(&mut w, &store, "a@b.com");
        w.next_field();
        type_into(&mut w, &store, "Str0ng!pass");
        w.next_field();
        type_into(&mut w, &store, "different");

        assert!(!w.advance(&store));
        assert_eq!(
            w.error_for("confirm_password").unwrap(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_remount_restores_step_and_email() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        complete_account_step(&mut w, &store, "a@b.com");
        assert!(w.advance(&store));
        assert_eq!(w.step_index(), 1);

        let mut remounted = wizard();
        remounted.hydrate(&store);
        assert_eq!(remounted.step_index(), 1);
        assert_eq!(remounted.field("email").unwrap().as_text(), "a@b.com");
        // Passwords round-trip too; they are part of the snapshot
        assert_eq!(
            remounted.field("password").unwrap().as_text(),
            "Str0ng!pass"
        );
    }

    #[test]
    fn test_full_flow_submits_and_clears_draft() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        complete_account_step(&mut w, &store, "a@b.com");
        assert!(w.advance(&store));

        type_into(&mut w, &store, "Ada");
        w.next_field();
        w.cycle_active(&store); // role -> student
        assert!(w.advance(&store));

        w.cycle_active(&store); // target_language -> Spanish
        assert!(w.submit(&store));
        assert!(w.is_submitted());
        assert!(store.load(SIGNUP_DRAFT_KEY).is_none());

        let reg = registration(&w);
        assert_eq!(reg.email, "a@b.com");
        assert_eq!(reg.role, "student");
        assert_eq!(reg.target_language, "Spanish");
        assert!(!reg.newsletter);
    }

    #[test]
    fn test_submit_revalidates_earlier_steps() {
        use crate::wizard::Draft;
        use serde_json::json;
        use std::collections::BTreeMap;

        // A hand-edited draft that claims to be on the final step but
        // never filled the account step in.
        let (_dir, store) = test_store();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("display_name".to_string(), json!("Ada"));
        snapshot.insert("role".to_string(), json!("student"));
        snapshot.insert("target_language".to_string(), json!("Spanish"));
        store.save(SIGNUP_DRAFT_KEY, &Draft::new(2, false, snapshot));

        let mut w = wizard();
        w.hydrate(&store);
        assert_eq!(w.step_index(), 2);
        assert!(!w.submit(&store));
        assert!(w.error_for("email").is_some());
        assert!(w.error_for("password").is_some());
        assert!(!w.is_submitted());
    }
}
