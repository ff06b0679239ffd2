//! Tutor-application wizard: Identity -> Expertise -> Review

use super::validate::{self, FieldErrors};
use super::{Wizard, TUTOR_APPLICATION_DRAFT_KEY};
use crate::state::{FormField, TutorApplication};

pub const STEPS: [&str; 3] = ["Identity", "Expertise", "Review"];

/// Minimum bio length enforced at step validation and final submit
pub const MIN_BIO_CHARS: usize = 50;
/// At most this many teaching interests can be selected
pub const MAX_INTERESTS: usize = 5;

pub const INTEREST_OPTIONS: [&str; 8] = [
    "Conversation",
    "Grammar",
    "Business language",
    "Exam preparation",
    "Pronunciation",
    "Kids & teens",
    "Literature",
    "Travel basics",
];

fn defaults() -> Vec<FormField> {
    vec![
        FormField::text("full_name", "Full legal name", 0, false),
        FormField::text("country", "Country of residence", 0, false),
        FormField::choice(
            "native_language",
            "Native language",
            0,
            &super::signup::LANGUAGES,
        ),
        FormField::text("teacher_bio", "About you (min 50 characters)", 1, true),
        FormField::multi_choice(
            "teaching_interests",
            "Teaching interests (up to 5)",
            1,
            &INTEREST_OPTIONS,
            Some(MAX_INTERESTS),
        ),
        FormField::text("hourly_rate", "Hourly rate (EUR)", 1, false),
        FormField::attachment("certificate", "Teaching certificate (optional)", 1),
        FormField::flag("agree_terms", "I accept the tutor terms", 2),
    ]
}

fn text_of<'a>(fields: &'a [FormField], name: &str) -> &'a str {
    fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.as_text())
        .unwrap_or("")
}

fn field<'a>(fields: &'a [FormField], name: &str) -> Option<&'a FormField> {
    fields.iter().find(|f| f.name == name)
}

fn validate_step(step: usize, fields: &[FormField]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        0 => {
            validate::require(
                &mut errors,
                "full_name",
                text_of(fields, "full_name"),
                "Full name",
            );
            validate::require(&mut errors, "country", text_of(fields, "country"), "Country");
            validate::require(
                &mut errors,
                "native_language",
                text_of(fields, "native_language"),
                "Native language",
            );
        }
        1 => {
            validate::require_min_len(
                &mut errors,
                "teacher_bio",
                text_of(fields, "teacher_bio"),
                MIN_BIO_CHARS,
            );
            if field(fields, "teaching_interests")
                .map(|f| f.selections().is_empty())
                .unwrap_or(true)
            {
                errors.insert(
                    "teaching_interests".to_string(),
                    "Pick at least one teaching interest".to_string(),
                );
            }
            if validate::parse_amount_cents(text_of(fields, "hourly_rate")).is_none() {
                errors.insert(
                    "hourly_rate".to_string(),
                    "Enter a positive amount, e.g. 18.50".to_string(),
                );
            }
        }
        2 => {
            if !field(fields, "agree_terms").is_some_and(FormField::as_flag) {
                errors.insert(
                    "agree_terms".to_string(),
                    "You must accept the tutor terms".to_string(),
                );
            }
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

/// Fresh tutor-application wizard bound to its versioned storage key
pub fn wizard() -> Wizard {
    Wizard::new(
        TUTOR_APPLICATION_DRAFT_KEY,
        &STEPS,
        defaults,
        validate_step,
        validate_submit,
    )
}

/// Application payload from a completed wizard
pub fn application(wizard: &Wizard) -> TutorApplication {
    let fields = wizard.fields();
    TutorApplication {
        full_name: text_of(fields, "full_name").to_string(),
        country: text_of(fields, "country").to_string(),
        native_language: text_of(fields, "native_language").to_string(),
        bio: text_of(fields, "teacher_bio").to_string(),
        teaching_interests: field(fields, "teaching_interests")
            .map(|f| f.selections().to_vec())
            .unwrap_or_default(),
        hourly_rate_cents: validate::parse_amount_cents(text_of(fields, "hourly_rate"))
            .unwrap_or_default(),
        certificate_file_name: field(fields, "certificate").and_then(|f| match &f.value {
            crate::state::FieldValue::Attachment(Some(h)) => Some(h.file_name.clone()),
            _ => None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AttachmentHandle;
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

    fn complete_identity_step(w: &mut Wizard, store: &DraftStore) {
        type_into(w, store, "Ada Lovelace");
        w.next_field();
        type_into(w, store, "United Kingdom");
        w.next_field();
        w.cycle_active(store);
        assert!(w.advance(store));
    }

    #[test]
    fn test_bio_one_character_short_blocks() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        complete_identity_step(&mut w, &store);

        type_into(&mut w, &store, &"b".repeat(MIN_BIO_CHARS - 1));
        w.next_field();
        w.toggle_option("Grammar", &store);
        w.next_field();
        type_into(&mut w, &store, "18.50");

        assert!(!w.advance(&store));
        assert_eq!(
            w.error_for("teacher_bio").unwrap(),
            "Need 1 more character (minimum 50)"
        );
        assert_eq!(w.step_index(), 1);

        // One more character and the step passes
        w.prev_field();
        w.prev_field();
        assert_eq!(w.active_field().unwrap().name, "teacher_bio");
        w.input_char('b', &store);
        assert!(w.advance(&store));
        assert_eq!(w.step_index(), 2);
    }

    #[test]
    fn test_sixth_interest_is_refused_and_disabled() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        complete_identity_step(&mut w, &store);
        w.next_field(); // bio -> interests
        assert_eq!(w.active_field().unwrap().name, "teaching_interests");

        for option in INTEREST_OPTIONS.iter().take(5) {
            assert!(w.toggle_option(option, &store));
        }
        assert!(!w.toggle_option(INTEREST_OPTIONS[5], &store));

        let interests = w.field("teaching_interests").unwrap();
        assert_eq!(interests.selections().len(), 5);
        assert!(interests.option_disabled(INTEREST_OPTIONS[5]));
        assert!(!interests.option_disabled(INTEREST_OPTIONS[0]));
    }

    #[test]
    fn test_certificate_survives_in_memory_but_not_on_disk() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        w.attach(
            "certificate",
            AttachmentHandle {
                file_name: "celta.pdf".to_string(),
                bytes: vec![0u8; 128],
            },
            &store,
        );

        assert_eq!(
            w.field("certificate").unwrap().display_value(),
            "celta.pdf"
        );
        let on_disk = store.load(TUTOR_APPLICATION_DRAFT_KEY).unwrap();
        assert!(!on_disk.form_snapshot.contains_key("certificate"));

        // After a remount the attachment must be re-acquired
        let mut remounted = wizard();
        remounted.hydrate(&store);
        assert_eq!(
            remounted.field("certificate").unwrap().display_value(),
            "(no file attached)"
        );
    }

    #[test]
    fn test_full_application_flow() {
        let (_dir, store) = test_store();
        let mut w = wizard();
        w.hydrate(&store);
        complete_identity_step(&mut w, &store);

        type_into(&mut w, &store, &"Patient conversational tutor. ".repeat(2));
        w.next_field();
        w.toggle_option("Conversation", &store);
        w.toggle_option("Exam preparation", &store);
        w.next_field();
        type_into(&mut w, &store, "22");
        assert!(w.advance(&store));

        // Terms not accepted yet
        assert!(!w.submit(&store));
        assert!(w.error_for("agree_terms").is_some());
        w.cycle_active(&store);
        assert!(w.submit(&store));
        assert!(store.load(TUTOR_APPLICATION_DRAFT_KEY).is_none());

        let app = application(&w);
        assert_eq!(app.full_name, "Ada Lovelace");
        assert_eq!(app.hourly_rate_cents, 2200);
        assert_eq!(
            app.teaching_interests,
            vec!["Conversation".to_string(), "Exam preparation".to_string()]
        );
        assert!(app.certificate_file_name.is_none());
    }
}
