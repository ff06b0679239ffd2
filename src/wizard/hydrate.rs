//! One-shot draft hydration into live wizard state

use crate::state::FormField;
use serde_json::Value;
use std::collections::BTreeMap;

/// Wizard lifecycle with respect to its persisted draft.
///
/// A wizard starts `Uninitialized`, hydrates exactly once, and is `Ready`
/// from then on. Making this an explicit state (rather than a boolean
/// checked as a side channel) keeps persistence from running against
/// not-yet-hydrated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hydration {
    #[default]
    Uninitialized,
    Ready,
}

impl Hydration {
    pub fn is_ready(self) -> bool {
        matches!(self, Hydration::Ready)
    }
}

/// Shallow-merge a stored snapshot into default fields.
///
/// Loaded values override defaults for matching keys only; unknown keys
/// are dropped and shape-mismatched values are rejected per field, so a
/// hand-edited or corrupted draft degrades to defaults instead of being
/// absorbed blindly. Returns how many fields accepted a value.
pub fn apply_snapshot(fields: &mut [FormField], snapshot: &BTreeMap<String, Value>) -> usize {
    let mut applied = 0;
    for field in fields.iter_mut() {
        if let Some(value) = snapshot.get(&field.name) {
            if field.absorb_snapshot(value) {
                applied += 1;
            } else {
                tracing::debug!("rejected stored value for field {}", field.name);
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields() -> Vec<FormField> {
        vec![
            FormField::text("email", "Email", 0, false),
            FormField::flag("newsletter", "Newsletter", 2),
        ]
    }

    #[test]
    fn test_matching_keys_override_defaults() {
        let mut fields = fields();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("email".to_string(), json!("a@b.com"));
        snapshot.insert("newsletter".to_string(), json!(true));

        assert_eq!(apply_snapshot(&mut fields, &snapshot), 2);
        assert_eq!(fields[0].as_text(), "a@b.com");
        assert!(fields[1].as_flag());
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut fields = fields();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("no_such_field".to_string(), json!("x"));

        assert_eq!(apply_snapshot(&mut fields, &snapshot), 0);
        assert_eq!(fields[0].as_text(), "");
    }

    #[test]
    fn test_mismatched_shapes_leave_defaults() {
        let mut fields = fields();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("email".to_string(), json!(17));
        snapshot.insert("newsletter".to_string(), json!("yes"));

        assert_eq!(apply_snapshot(&mut fields, &snapshot), 0);
        assert_eq!(fields[0].as_text(), "");
        assert!(!fields[1].as_flag());
    }
}
