//! Form field value objects

use serde_json::Value;

/// An in-memory file attachment (e.g. a teaching certificate).
///
/// Attachments are never persisted into drafts; the sanitizer strips them
/// before every save and the user re-attaches after a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentHandle {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Text that renders masked (passwords)
    Secret(String),
    /// Exactly one of `options` (or empty string when unset)
    Choice {
        selected: String,
        options: Vec<String>,
    },
    /// Up to `max` of `options`
    MultiChoice {
        selected: Vec<String>,
        options: Vec<String>,
        max: Option<usize>,
    },
    Flag(bool),
    Attachment(Option<AttachmentHandle>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub is_multiline: bool,
    /// Wizard step this field belongs to (0 for single-page forms)
    pub step: usize,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str, step: usize, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            is_multiline,
            step,
        }
    }

    /// Create a new masked text field
    pub fn secret(name: &str, label: &str, step: usize) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Secret(String::new()),
            is_multiline: false,
            step,
        }
    }

    /// Create a new single-choice field
    pub fn choice(name: &str, label: &str, step: usize, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Choice {
                selected: String::new(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
            },
            is_multiline: false,
            step,
        }
    }

    /// Create a new multi-choice field with an optional selection cap
    pub fn multi_choice(
        name: &str,
        label: &str,
        step: usize,
        options: &[&str],
        max: Option<usize>,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::MultiChoice {
                selected: Vec::new(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
                max,
            },
            is_multiline: false,
            step,
        }
    }

    /// Create a new boolean flag field
    pub fn flag(name: &str, label: &str, step: usize) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Flag(false),
            is_multiline: false,
            step,
        }
    }

    /// Create a new attachment field (memory-only, never persisted)
    pub fn attachment(name: &str, label: &str, step: usize) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Attachment(None),
            is_multiline: false,
            step,
        }
    }

    /// Get the text value (empty string for non-textual fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => s,
            FieldValue::Choice { selected, .. } => selected,
            _ => "",
        }
    }

    /// Get the flag value (false for non-flag fields)
    pub fn as_flag(&self) -> bool {
        matches!(self.value, FieldValue::Flag(true))
    }

    /// Get the selected multi-choice values (empty for other fields)
    pub fn selections(&self) -> &[String] {
        match &self.value {
            FieldValue::MultiChoice { selected, .. } => selected,
            _ => &[],
        }
    }

    /// Set the text value
    pub fn set_text(&mut self, value: String) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => *s = value,
            FieldValue::Choice { selected, .. } => *selected = value,
            _ => {}
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => s.push(c),
            FieldValue::Flag(b) => {
                if c == ' ' {
                    *b = !*b;
                }
            }
            _ => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => {
                s.pop();
            }
            _ => {}
        }
    }

    /// Cycle a single-choice field to its next option
    pub fn cycle_choice(&mut self) {
        if let FieldValue::Choice { selected, options } = &mut self.value {
            if options.is_empty() {
                return;
            }
            let next = match options.iter().position(|o| o == selected) {
                Some(i) => (i + 1) % options.len(),
                None => 0,
            };
            *selected = options[next].clone();
        }
    }

    /// Toggle an option on a multi-choice field.
    ///
    /// Returns false when the toggle was refused because the selection is
    /// already at its cap; the selection is left unchanged in that case.
    pub fn toggle_option(&mut self, option: &str) -> bool {
        if let FieldValue::MultiChoice {
            selected,
            options,
            max,
        } = &mut self.value
        {
            if !options.iter().any(|o| o == option) {
                return false;
            }
            if let Some(pos) = selected.iter().position(|o| o == option) {
                selected.remove(pos);
                return true;
            }
            if max.is_some_and(|m| selected.len() >= m) {
                return false;
            }
            selected.push(option.to_string());
            return true;
        }
        false
    }

    /// Whether a multi-choice option should render as disabled
    /// (unselected while the selection is at its cap).
    pub fn option_disabled(&self, option: &str) -> bool {
        match &self.value {
            FieldValue::MultiChoice { selected, max, .. } => {
                max.is_some_and(|m| selected.len() >= m) && !selected.iter().any(|o| o == option)
            }
            _ => false,
        }
    }

    /// Toggle a flag field
    pub fn toggle_flag(&mut self) {
        if let FieldValue::Flag(b) = &mut self.value {
            *b = !*b;
        }
    }

    /// Attach a file to an attachment field
    pub fn set_attachment(&mut self, handle: AttachmentHandle) {
        if let FieldValue::Attachment(slot) = &mut self.value {
            *slot = Some(handle);
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => s.clear(),
            FieldValue::Choice { selected, .. } => selected.clear(),
            FieldValue::MultiChoice { selected, .. } => selected.clear(),
            FieldValue::Flag(b) => *b = false,
            FieldValue::Attachment(slot) => *slot = None,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Secret(s) => "•".repeat(s.chars().count()),
            FieldValue::Choice { selected, .. } => {
                if selected.is_empty() {
                    "(none)".to_string()
                } else {
                    selected.clone()
                }
            }
            FieldValue::MultiChoice { selected, .. } => selected.join(", "),
            FieldValue::Flag(b) => if *b { "[x]" } else { "[ ]" }.to_string(),
            FieldValue::Attachment(slot) => match slot {
                Some(h) => h.file_name.clone(),
                None => "(no file attached)".to_string(),
            },
        }
    }

    /// Serializable snapshot of the value, or `None` for attachment
    /// fields which are memory-only.
    pub fn snapshot_value(&self) -> Option<Value> {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => Some(Value::String(s.clone())),
            FieldValue::Choice { selected, .. } => Some(Value::String(selected.clone())),
            FieldValue::MultiChoice { selected, .. } => Some(Value::Array(
                selected.iter().map(|s| Value::String(s.clone())).collect(),
            )),
            FieldValue::Flag(b) => Some(Value::Bool(*b)),
            FieldValue::Attachment(_) => None,
        }
    }

    /// Apply a stored snapshot value onto this field.
    ///
    /// The value must match the field's expected shape; anything else is
    /// rejected so a corrupted draft cannot smuggle bad state in. Returns
    /// whether the value was accepted.
    pub fn absorb_snapshot(&mut self, value: &Value) -> bool {
        match (&mut self.value, value) {
            (FieldValue::Text(s), Value::String(v)) | (FieldValue::Secret(s), Value::String(v)) => {
                *s = v.clone();
                true
            }
            (FieldValue::Choice { selected, options }, Value::String(v)) => {
                if v.is_empty() || options.iter().any(|o| o == v) {
                    *selected = v.clone();
                    true
                } else {
                    false
                }
            }
            (
                FieldValue::MultiChoice {
                    selected,
                    options,
                    max,
                },
                Value::Array(items),
            ) => {
                let mut accepted: Vec<String> = items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .filter(|s| options.iter().any(|o| o == s))
                    .map(str::to_string)
                    .collect();
                accepted.dedup();
                if let Some(m) = max {
                    accepted.truncate(*m);
                }
                *selected = accepted;
                true
            }
            (FieldValue::Flag(b), Value::Bool(v)) => {
                *b = *v;
                true
            }
            // Attachments are never hydrated; everything else is a shape
            // mismatch from a corrupted or stale draft.
            _ => false,
        }
    }
}
