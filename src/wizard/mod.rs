//! Multi-step form wizards with local draft persistence.
//!
//! A [`Wizard`] owns an ordered field set partitioned into steps, a
//! [`StepController`] gating forward movement on validation, and a
//! persisted [`Draft`] in a [`DraftStore`]. Hydration runs once per
//! instance and merges a prior draft back in; every edit after that
//! re-persists a sanitized snapshot, and a successful final submit
//! clears the draft.

mod draft;
mod hydrate;
mod sanitize;
pub mod signup;
mod step;
mod store;
pub mod tutor_application;
pub mod validate;

pub use draft::{Draft, AVAILABILITY_DRAFT_KEY, SIGNUP_DRAFT_KEY, TUTOR_APPLICATION_DRAFT_KEY};
pub use hydrate::Hydration;
pub use step::StepController;
pub use store::DraftStore;
pub use validate::FieldErrors;

use crate::state::{AttachmentHandle, FormField};

/// Per-step validator: step index + full field set -> failing fields
pub type StepValidator = fn(usize, &[FormField]) -> FieldErrors;
/// Final-submit validator re-checking every step
pub type SubmitValidator = fn(&[FormField]) -> FieldErrors;

/// A multi-step form with draft persistence and guarded navigation.
pub struct Wizard {
    storage_key: &'static str,
    fields: Vec<FormField>,
    defaults: fn() -> Vec<FormField>,
    controller: StepController,
    lifecycle: Hydration,
    /// Swallows the persist triggered by hydration itself, so the
    /// just-read snapshot is not immediately re-serialized.
    skip_next_persist: bool,
    errors: FieldErrors,
    active_field_index: usize,
    validate_step: StepValidator,
    validate_submit: SubmitValidator,
}

impl Wizard {
    pub fn new(
        storage_key: &'static str,
        steps: &[&str],
        defaults: fn() -> Vec<FormField>,
        validate_step: StepValidator,
        validate_submit: SubmitValidator,
    ) -> Self {
        Self {
            storage_key,
            fields: defaults(),
            defaults,
            controller: StepController::new(steps),
            lifecycle: Hydration::default(),
            skip_next_persist: false,
            errors: FieldErrors::new(),
            active_field_index: 0,
            validate_step,
            validate_submit,
        }
    }

    pub fn step_index(&self) -> usize {
        self.controller.index()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.controller.names().collect()
    }

    pub fn is_first_step(&self) -> bool {
        self.controller.is_first()
    }

    pub fn is_last_step(&self) -> bool {
        self.controller.is_last()
    }

    pub fn is_submitted(&self) -> bool {
        self.controller.is_submitted()
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Indices of the fields shown on the current step, in order
    pub fn current_step_fields(&self) -> Vec<usize> {
        let step = self.controller.index();
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.step == step)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields.get(self.active_field_index)
    }

    /// Move focus to the next field of the current step (wraps around)
    pub fn next_field(&mut self) {
        let indices = self.current_step_fields();
        if indices.is_empty() {
            return;
        }
        let pos = indices
            .iter()
            .position(|&i| i == self.active_field_index)
            .unwrap_or(0);
        self.active_field_index = indices[(pos + 1) % indices.len()];
    }

    /// Move focus to the previous field of the current step (wraps around)
    pub fn prev_field(&mut self) {
        let indices = self.current_step_fields();
        if indices.is_empty() {
            return;
        }
        let pos = indices
            .iter()
            .position(|&i| i == self.active_field_index)
            .unwrap_or(0);
        let prev = if pos == 0 { indices.len() - 1 } else { pos - 1 };
        self.active_field_index = indices[prev];
    }

    fn focus_first_field_of_step(&mut self) {
        self.active_field_index = self.current_step_fields().first().copied().unwrap_or(0);
    }

    /// Load the persisted draft into this wizard, exactly once.
    ///
    /// Merges the stored snapshot over defaults (schema-checked per
    /// field), clamps the stored step index into range, and swallows the
    /// persist that hydration itself triggers. A missing or malformed
    /// draft leaves the wizard at defaults.
    pub fn hydrate(&mut self, store: &DraftStore) {
        if self.lifecycle.is_ready() {
            tracing::debug!("wizard {} already hydrated", self.storage_key);
            return;
        }
        if let Some(draft) = store.load(self.storage_key) {
            hydrate::apply_snapshot(&mut self.fields, &draft.form_snapshot);
            self.controller.set_index(draft.step);
        }
        self.lifecycle = Hydration::Ready;
        self.focus_first_field_of_step();
        // The persistence pass that follows hydration is always
        // suppressed: the just-read snapshot is not rewritten, and a
        // first visit with no draft writes nothing until a real edit.
        self.skip_next_persist = true;
        self.persist(store);
    }

    /// Persist the current state as a sanitized draft, best-effort.
    fn persist(&mut self, store: &DraftStore) {
        if !self.lifecycle.is_ready() {
            return;
        }
        if self.skip_next_persist {
            self.skip_next_persist = false;
            return;
        }
        let draft = Draft::new(
            self.controller.index(),
            false,
            sanitize::sanitized_snapshot(&self.fields),
        );
        store.save(self.storage_key, &draft);
    }

    /// An edit to `field_index` happened: drop that field's stale error
    /// and re-persist.
    fn after_edit(&mut self, field_index: usize, store: &DraftStore) {
        if let Some(field) = self.fields.get(field_index) {
            let name = field.name.clone();
            self.errors.remove(&name);
        }
        self.persist(store);
    }

    /// Type a character into the active field
    pub fn input_char(&mut self, c: char, store: &DraftStore) {
        let idx = self.active_field_index;
        if let Some(field) = self.fields.get_mut(idx) {
            field.push_char(c);
            self.after_edit(idx, store);
        }
    }

    /// Delete the last character of the active field
    pub fn backspace(&mut self, store: &DraftStore) {
        let idx = self.active_field_index;
        if let Some(field) = self.fields.get_mut(idx) {
            field.pop_char();
            self.after_edit(idx, store);
        }
    }

    /// Cycle the active single-choice field, or toggle the active flag
    pub fn cycle_active(&mut self, store: &DraftStore) {
        let idx = self.active_field_index;
        if let Some(field) = self.fields.get_mut(idx) {
            field.cycle_choice();
            field.toggle_flag();
            self.after_edit(idx, store);
        }
    }

    /// Toggle an option of the active multi-choice field.
    ///
    /// Returns false when the selection cap refused the toggle; the
    /// selection is unchanged and nothing is persisted in that case.
    pub fn toggle_option(&mut self, option: &str, store: &DraftStore) -> bool {
        let idx = self.active_field_index;
        if let Some(field) = self.fields.get_mut(idx) {
            if field.toggle_option(option) {
                self.after_edit(idx, store);
                return true;
            }
        }
        false
    }

    /// Attach a file to a named attachment field. Held in memory only;
    /// the sanitizer keeps it out of the persisted draft.
    pub fn attach(&mut self, name: &str, handle: AttachmentHandle, store: &DraftStore) {
        if let Some(idx) = self.fields.iter().position(|f| f.name == name) {
            if let Some(field) = self.fields.get_mut(idx) {
                field.set_attachment(handle);
            }
            self.after_edit(idx, store);
        }
    }

    /// Guarded forward transition. Validates the current step; on
    /// failure the errors are surfaced and the cursor stays put.
    pub fn advance(&mut self, store: &DraftStore) -> bool {
        let errors = (self.validate_step)(self.controller.index(), &self.fields);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        if self.controller.is_last() {
            return false;
        }
        self.errors.clear();
        self.controller.advance();
        self.focus_first_field_of_step();
        self.persist(store);
        true
    }

    /// Unguarded backward transition
    pub fn retreat(&mut self, store: &DraftStore) {
        if self.controller.is_first() {
            return;
        }
        self.errors.clear();
        self.controller.retreat();
        self.focus_first_field_of_step();
        self.persist(store);
    }

    /// Run the full-form validation without touching lifecycle state.
    /// Used before remote submission so a backend rejection leaves the
    /// draft intact and retryable.
    pub fn validate_for_submit(&mut self) -> bool {
        if !self.controller.is_last() {
            return false;
        }
        let errors = (self.validate_submit)(&self.fields);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        true
    }

    /// Terminal submit, only meaningful on the final step. Re-validates
    /// every step as a defense against drafts edited behind our back;
    /// on success the persisted draft is cleared.
    pub fn submit(&mut self, store: &DraftStore) -> bool {
        if !self.controller.is_last() {
            return false;
        }
        let errors = (self.validate_submit)(&self.fields);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        self.controller.mark_submitted();
        store.clear(self.storage_key);
        true
    }

    /// Back to step 0 with default fields; the persisted draft is cleared.
    pub fn reset(&mut self, store: &DraftStore) {
        self.fields = (self.defaults)();
        self.controller.reset();
        self.errors.clear();
        self.skip_next_persist = false;
        self.active_field_index = 0;
        self.focus_first_field_of_step();
        store.clear(self.storage_key);
    }
}
