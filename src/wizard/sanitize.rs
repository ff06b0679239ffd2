//! Stripping of non-serializable values before persistence

use crate::state::FormField;
use serde_json::Value;
use std::collections::BTreeMap;

/// Build the persistable snapshot of a field set.
///
/// Attachment fields carry in-memory file handles and are dropped here;
/// everything else serializes to a JSON primitive or array. Applied
/// before every save, never before in-memory use, so the live form keeps
/// its attachments while the draft on disk never sees them.
pub fn sanitized_snapshot(fields: &[FormField]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .filter_map(|f| f.snapshot_value().map(|v| (f.name.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AttachmentHandle;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_attachments_are_stripped() {
        let mut certificate = FormField::attachment("certificate", "Certificate", 1);
        certificate.set_attachment(AttachmentHandle {
            file_name: "cert.pdf".to_string(),
            bytes: vec![0xff; 64],
        });
        let mut bio = FormField::text("teacher_bio", "Bio", 1, true);
        bio.set_text("I teach.".to_string());

        let snapshot = sanitized_snapshot(&[certificate, bio]);

        assert!(!snapshot.contains_key("certificate"));
        assert_eq!(snapshot.get("teacher_bio"), Some(&json!("I teach.")));
    }

    #[test]
    fn test_all_serializable_variants_survive() {
        let mut interests =
            FormField::multi_choice("interests", "Interests", 0, &["grammar", "exams"], None);
        interests.toggle_option("exams");
        let mut terms = FormField::flag("terms", "Terms", 0);
        terms.toggle_flag();
        let mut password = FormField::secret("password", "Password", 0);
        password.set_text("s3cret".to_string());

        let snapshot = sanitized_snapshot(&[interests, terms, password]);

        assert_eq!(snapshot.get("interests"), Some(&json!(["exams"])));
        assert_eq!(snapshot.get("terms"), Some(&json!(true)));
        assert_eq!(snapshot.get("password"), Some(&json!("s3cret")));
    }
}
