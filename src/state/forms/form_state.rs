//! Form state management and form structs

use super::field::FormField;
use crate::state::Lesson;
use crate::wizard::validate::{self, FieldErrors};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Enum representing all possible single-page form states
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Login(LoginForm),
    LessonCreate(LessonCreateForm),
    Reschedule(RescheduleForm),
    Withdraw(WithdrawForm),
}

impl FormState {
    pub fn next_field(&mut self) {
        match self {
            FormState::None => {}
            FormState::Login(f) => f.next_field(),
            FormState::LessonCreate(f) => f.next_field(),
            FormState::Reschedule(f) => f.next_field(),
            FormState::Withdraw(f) => f.next_field(),
        }
    }

    pub fn prev_field(&mut self) {
        match self {
            FormState::None => {}
            FormState::Login(f) => f.prev_field(),
            FormState::LessonCreate(f) => f.prev_field(),
            FormState::Reschedule(f) => f.prev_field(),
            FormState::Withdraw(f) => f.prev_field(),
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self {
            FormState::None => None,
            FormState::Login(f) => Some(f.get_active_field_mut()),
            FormState::LessonCreate(f) => Some(f.get_active_field_mut()),
            FormState::Reschedule(f) => Some(f.get_active_field_mut()),
            FormState::Withdraw(f) => Some(f.get_active_field_mut()),
        }
    }
}

/// Parse a `YYYY-MM-DD HH:MM` local-naive timestamp as UTC
pub fn parse_start_time(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

// Login form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("email", "Email", 0, false),
            password: FormField::secret("password", "Password", 0),
            active_field_index: 0,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !validate::is_valid_email(self.email.as_text()) {
            errors.insert("email".to_string(), "Enter a valid email address".to_string());
        }
        validate::require(&mut errors, "password", self.password.as_text(), "Password");
        errors
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }
}

// Lesson create form
#[derive(Debug, Clone)]
pub struct LessonCreateForm {
    pub language: FormField,
    pub starts_at: FormField,
    pub duration: FormField,
    pub notes: FormField,
    pub active_field_index: usize,
}

impl LessonCreateForm {
    pub fn new() -> Self {
        Self {
            language: FormField::choice(
                "language",
                "Language",
                0,
                &crate::wizard::signup::LANGUAGES,
            ),
            starts_at: FormField::text("starts_at", "Start (YYYY-MM-DD HH:MM)", 0, false),
            duration: FormField::text("duration", "Duration (minutes)", 0, false),
            notes: FormField::text("notes", "Notes (optional)", 0, true),
            active_field_index: 0,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validate::require(&mut errors, "language", self.language.as_text(), "Language");
        if parse_start_time(self.starts_at.as_text()).is_none() {
            errors.insert(
                "starts_at".to_string(),
                "Use the format 2026-03-10 14:00".to_string(),
            );
        }
        match self.duration.as_text().trim().parse::<u32>() {
            Ok(minutes) if (15..=180).contains(&minutes) => {}
            _ => {
                errors.insert(
                    "duration".to_string(),
                    "Duration must be 15-180 minutes".to_string(),
                );
            }
        }
        errors
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration.as_text().trim().parse().unwrap_or(60)
    }
}

impl Default for LessonCreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LessonCreateForm {
    fn field_count(&self) -> usize {
        4
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(3);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.language,
            1 => &mut self.starts_at,
            2 => &mut self.duration,
            _ => &mut self.notes,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.language),
            1 => Some(&self.starts_at),
            2 => Some(&self.duration),
            3 => Some(&self.notes),
            _ => None,
        }
    }
}

// Reschedule request form
#[derive(Debug, Clone)]
pub struct RescheduleForm {
    pub lesson_id: String,
    pub proposed_start: FormField,
    pub reason: FormField,
    pub active_field_index: usize,
}

impl RescheduleForm {
    pub fn for_lesson(lesson: &Lesson) -> Self {
        let mut proposed =
            FormField::text("proposed_start", "New start (YYYY-MM-DD HH:MM)", 0, false);
        proposed.set_text(lesson.starts_at.format("%Y-%m-%d %H:%M").to_string());
        Self {
            lesson_id: lesson.id.clone(),
            proposed_start: proposed,
            reason: FormField::text("reason", "Reason", 0, true),
            active_field_index: 0,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if parse_start_time(self.proposed_start.as_text()).is_none() {
            errors.insert(
                "proposed_start".to_string(),
                "Use the format 2026-03-10 14:00".to_string(),
            );
        }
        validate::require(&mut errors, "reason", self.reason.as_text(), "Reason");
        errors
    }
}

impl Form for RescheduleForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.proposed_start,
            _ => &mut self.reason,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.proposed_start),
            1 => Some(&self.reason),
            _ => None,
        }
    }
}

// Wallet withdrawal form
#[derive(Debug, Clone)]
pub struct WithdrawForm {
    pub amount: FormField,
    pub destination: FormField,
    pub active_field_index: usize,
}

impl WithdrawForm {
    pub fn new() -> Self {
        Self {
            amount: FormField::text("amount", "Amount (EUR)", 0, false),
            destination: FormField::text("destination", "IBAN", 0, false),
            active_field_index: 0,
        }
    }

    /// Validate against the current wallet balance
    pub fn validate(&self, balance_cents: i64) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match validate::parse_amount_cents(self.amount.as_text()) {
            None => {
                errors.insert(
                    "amount".to_string(),
                    "Enter a positive amount, e.g. 25.00".to_string(),
                );
            }
            Some(cents) if cents > balance_cents => {
                errors.insert(
                    "amount".to_string(),
                    "Amount exceeds your balance".to_string(),
                );
            }
            Some(_) => {}
        }
        validate::require(
            &mut errors,
            "destination",
            self.destination.as_text(),
            "IBAN",
        );
        errors
    }

    pub fn amount_cents(&self) -> Option<i64> {
        validate::parse_amount_cents(self.amount.as_text())
    }
}

impl Default for WithdrawForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for WithdrawForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.amount,
            _ => &mut self.destination,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.amount),
            1 => Some(&self.destination),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LessonStatus;
    use chrono::TimeZone;

    fn test_lesson() -> Lesson {
        Lesson {
            id: "lesson-1".to_string(),
            language: "French".to_string(),
            tutor_name: "Mar".to_string(),
            student_name: "Ada".to_string(),
            starts_at: Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap(),
            duration_minutes: 60,
            status: LessonStatus::Scheduled,
            meeting_link: None,
            notes: None,
        }
    }

    mod form_state_enum {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_none() {
            let state = FormState::default();
            assert!(matches!(state, FormState::None));
        }

        #[test]
        fn test_next_field_on_none_is_noop() {
            let mut state = FormState::None;
            state.next_field();
        }

        #[test]
        fn test_get_active_field_mut_none_returns_none() {
            let mut state = FormState::None;
            assert!(state.get_active_field_mut().is_none());
        }

        #[test]
        fn test_next_field_cycles_through_form() {
            let mut state = FormState::Login(LoginForm::new());
            if let FormState::Login(ref f) = state {
                assert_eq!(f.active_field_index, 0);
            }
            state.next_field();
            if let FormState::Login(ref f) = state {
                assert_eq!(f.active_field_index, 1);
            }
            state.next_field();
            if let FormState::Login(ref f) = state {
                assert_eq!(f.active_field_index, 0);
            }
        }
    }

    mod login_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_validation() {
            let mut form = LoginForm::new();
            let errors = form.validate();
            assert!(errors.contains_key("email"));
            assert!(errors.contains_key("password"));

            form.email.set_text("a@b.com".to_string());
            form.password.set_text("secret".to_string());
            assert!(form.validate().is_empty());
        }

        #[test]
        fn test_prev_field_wraps() {
            let mut form = LoginForm::new();
            form.prev_field();
            assert_eq!(form.active_field_index, 1);
        }
    }

    mod lesson_create_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_input_passes() {
            let mut form = LessonCreateForm::new();
            form.language.cycle_choice();
            form.starts_at.set_text("2026-03-10 14:00".to_string());
            form.duration.set_text("60".to_string());
            assert!(form.validate().is_empty());
            assert_eq!(form.duration_minutes(), 60);
        }

        #[test]
        fn test_bad_timestamp_and_duration_flagged() {
            let mut form = LessonCreateForm::new();
            form.language.cycle_choice();
            form.starts_at.set_text("tomorrow-ish".to_string());
            form.duration.set_text("600".to_string());
            let errors = form.validate();
            assert!(errors.contains_key("starts_at"));
            assert!(errors.contains_key("duration"));
        }

        #[test]
        fn test_get_field_returns_correct_fields() {
            let form = LessonCreateForm::new();
            assert_eq!(form.get_field(0).unwrap().name, "language");
            assert_eq!(form.get_field(1).unwrap().name, "starts_at");
            assert_eq!(form.get_field(2).unwrap().name, "duration");
            assert_eq!(form.get_field(3).unwrap().name, "notes");
            assert!(form.get_field(4).is_none());
        }
    }

    mod reschedule_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_prefills_current_start() {
            let form = RescheduleForm::for_lesson(&test_lesson());
            assert_eq!(form.proposed_start.as_text(), "2026-03-10 14:00");
            assert_eq!(form.lesson_id, "lesson-1");
        }

        #[test]
        fn test_requires_reason() {
            let form = RescheduleForm::for_lesson(&test_lesson());
            let errors = form.validate();
            assert!(errors.contains_key("reason"));
            assert!(!errors.contains_key("proposed_start"));
        }
    }

    mod withdraw_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_amount_over_balance_is_rejected() {
            let mut form = WithdrawForm::new();
            form.amount.set_text("50.00".to_string());
            form.destination.set_text("DE89370400440532013000".to_string());
            let errors = form.validate(2500);
            assert_eq!(errors.get("amount").unwrap(), "Amount exceeds your balance");
            assert!(form.validate(5000).is_empty());
        }

        #[test]
        fn test_non_numeric_amount_is_rejected() {
            let mut form = WithdrawForm::new();
            form.amount.set_text("lots".to_string());
            form.destination.set_text("DE89".to_string());
            assert!(form.validate(10_000).contains_key("amount"));
            assert!(form.amount_cents().is_none());
        }
    }

    #[test]
    fn test_parse_start_time() {
        assert!(parse_start_time("2026-03-10 14:00").is_some());
        assert!(parse_start_time(" 2026-03-10 14:00 ").is_some());
        assert!(parse_start_time("2026-03-10").is_none());
        assert!(parse_start_time("14:00 2026-03-10").is_none());
    }
}
