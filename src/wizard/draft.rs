//! Persisted draft snapshots for in-progress wizards

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Storage key for the sign-up wizard draft
pub const SIGNUP_DRAFT_KEY: &str = "signup_progress_v1";
/// Storage key for the tutor-application wizard draft
pub const TUTOR_APPLICATION_DRAFT_KEY: &str = "tutor_application_progress_v1";
/// Storage key for the tutor availability grid draft
pub const AVAILABILITY_DRAFT_KEY: &str = "tutor_availability_v2";

/// A named snapshot of partially-completed form state.
///
/// The on-disk shape is `{ "step": int, "submitted": bool,
/// "formSnapshot": { field: value } }`. There is no migration logic
/// beyond the `_v1`/`_v2` suffix in the storage key; a schema change
/// means a new key and old drafts are abandoned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Raw stored step index. Kept signed and unclamped here; hydration
    /// clamps it into the wizard's valid range.
    #[serde(default)]
    pub step: i64,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub form_snapshot: BTreeMap<String, Value>,
}

impl Draft {
    pub fn new(step: usize, submitted: bool, form_snapshot: BTreeMap<String, Value>) -> Self {
        Self {
            step: step as i64,
            submitted,
            form_snapshot,
        }
    }
}
