//! Application state and core logic

use crate::api::{ApiClient, HttpApiClient};
use crate::config::AppConfig;
use crate::state::{
    AppState, FieldValue, FormState, LessonCreateForm, LessonRequest, LoginForm, RescheduleForm,
    UserRole, View, WithdrawForm,
};
use crate::toast::ToastBus;
use crate::wizard::validate::FieldErrors;
use crate::wizard::{signup, tutor_application, DraftStore, Wizard};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Backend client
    pub api: Box<dyn ApiClient>,
    /// Keyed draft persistence
    pub drafts: DraftStore,
    /// Notification queue
    pub toasts: ToastBus,
    /// Sign-up wizard
    pub signup: Wizard,
    /// Tutor-application wizard
    pub tutor_application: Wizard,
    /// Active single-page form
    pub form: FormState,
    /// Errors of the active single-page form
    pub form_errors: FieldErrors,
    /// User configuration
    pub config: AppConfig,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().unwrap_or_default();
        let api = Box::new(HttpApiClient::new(config.api_base_url.clone()));
        let mut app = Self::with_client(api, DraftStore::new(), config);
        app.state.backend_connected = app.api.check_connection().await;
        Ok(app)
    }

    /// Create an App with explicit collaborators (used by tests)
    pub fn with_client(api: Box<dyn ApiClient>, drafts: DraftStore, config: AppConfig) -> Self {
        let mut state = AppState::default();
        state.show_past_lessons = config.show_past_lessons.unwrap_or(false);
        if let Some(field) = config.lesson_sort_field.as_deref() {
            state.lesson_sort_field = match field {
                "language" => crate::state::LessonSortField::Language,
                "status" => crate::state::LessonSortField::Status,
                _ => crate::state::LessonSortField::StartsAt,
            };
        }
        if config.lesson_sort_direction.as_deref() == Some("desc") {
            state.lesson_sort_direction = crate::state::SortDirection::Desc;
        }

        Self {
            state,
            api,
            drafts,
            toasts: ToastBus::new(),
            signup: signup::wizard(),
            tutor_application: tutor_application::wizard(),
            form: FormState::Login(LoginForm::new()),
            form_errors: FieldErrors::new(),
            config,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Timer-driven updates: toast expiry. Countdown labels are
    /// recomputed at draw time from the clock.
    pub fn tick(&mut self) {
        self.toasts.tick();
    }

    fn goto(&mut self, view: View) {
        self.form_errors.clear();
        match view {
            View::Login => self.form = FormState::Login(LoginForm::new()),
            View::LessonCreate => self.form = FormState::LessonCreate(LessonCreateForm::new()),
            View::Wallet => self.form = FormState::Withdraw(WithdrawForm::new()),
            _ => self.form = FormState::None,
        }
        self.state.push_view(view);
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // A visible toast is dismissed by Esc before anything else
        if !self.toasts.is_empty() && key.code == KeyCode::Esc {
            self.toasts.dismiss();
            return Ok(());
        }

        // Pending confirmation (lesson cancel) is modal
        if self.state.confirm_action.is_some() {
            self.handle_confirm_key(key).await?;
            return Ok(());
        }

        match self.state.current_view {
            View::Login => self.handle_login_key(key).await?,
            View::Signup => self.handle_signup_key(key).await?,
            View::Dashboard => self.handle_dashboard_key(key).await?,
            View::Lessons => self.handle_lessons_key(key).await?,
            View::LessonDetail => self.handle_lesson_detail_key(key).await?,
            View::LessonCreate => self.handle_lesson_create_key(key).await?,
            View::Reschedule => self.handle_reschedule_key(key).await?,
            View::TutorApplication => self.handle_tutor_application_key(key).await?,
            View::Availability => self.handle_availability_key(key).await?,
            View::Wallet => self.handle_wallet_key(key).await?,
        }
        Ok(())
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let action = self.state.confirm_action.take();
                if let Some(lesson_id) = action {
                    self.cancel_lesson(&lesson_id).await;
                }
            }
            _ => {
                self.state.confirm_action = None;
            }
        }
        Ok(())
    }

    // ---- Login ----------------------------------------------------------

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_signup();
            }
            KeyCode::Enter => self.submit_login().await,
            KeyCode::Backspace => self.form_backspace(),
            KeyCode::Char(c) => self.form_input_char(c),
            _ => {}
        }
        Ok(())
    }

    fn form_input_char(&mut self, c: char) {
        if let Some(field) = self.form.get_active_field_mut() {
            field.push_char(c);
            let name = field.name.clone();
            self.form_errors.remove(&name);
        }
    }

    fn form_backspace(&mut self) {
        if let Some(field) = self.form.get_active_field_mut() {
            field.pop_char();
            let name = field.name.clone();
            self.form_errors.remove(&name);
        }
    }

    fn form_cycle(&mut self) {
        if let Some(field) = self.form.get_active_field_mut() {
            field.cycle_choice();
            let name = field.name.clone();
            self.form_errors.remove(&name);
        }
    }

    async fn submit_login(&mut self) {
        let FormState::Login(form) = &self.form else {
            return;
        };
        let errors = form.validate();
        if !errors.is_empty() {
            self.form_errors = errors;
            return;
        }
        let email = form.email.as_text().to_string();
        let password = form.password.as_text().to_string();
        match self.api.login(&email, &password).await {
            Ok(session) => {
                self.toasts
                    .success(format!("Welcome back, {}", session.profile.display_name));
                self.state.session = Some(session);
                self.goto(View::Dashboard);
                self.refresh_lessons().await;
            }
            Err(e) => self.toasts.error(format!("Login failed: {e}")),
        }
    }

    fn start_signup(&mut self) {
        // Hydration is one-shot; re-entering the view resumes the draft
        self.signup.hydrate(&self.drafts);
        if self.signup.is_submitted() {
            self.signup.reset(&self.drafts);
        }
        self.goto(View::Signup);
    }

    // ---- Sign-up wizard -------------------------------------------------

    async fn handle_signup_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.signup.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.signup.prev_field(),
            KeyCode::Left | KeyCode::Right => self.signup.cycle_active(&self.drafts),
            KeyCode::Enter => {
                if self.signup.is_last_step() {
                    self.submit_signup().await;
                } else {
                    self.signup.advance(&self.drafts);
                }
            }
            KeyCode::Esc => {
                if self.signup.is_first_step() {
                    self.state.pop_view();
                } else {
                    self.signup.retreat(&self.drafts);
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.signup.reset(&self.drafts);
                self.toasts.info("Sign-up progress discarded");
            }
            KeyCode::Backspace => self.signup.backspace(&self.drafts),
            KeyCode::Char(c) => self.signup.input_char(c, &self.drafts),
            _ => {}
        }
        Ok(())
    }

    async fn submit_signup(&mut self) {
        if !self.signup.validate_for_submit() {
            return;
        }
        let registration = signup::registration(&self.signup);
        match self.api.register(&registration).await {
            Ok(session) => {
                // Only now reach the terminal state and clear the draft
                self.signup.submit(&self.drafts);
                self.toasts.success("Account created");
                self.state.session = Some(session);
                self.goto(View::Dashboard);
                self.refresh_lessons().await;
            }
            // Draft stays on disk; the submission is retryable
            Err(e) => self.toasts.error(format!("Registration failed: {e}")),
        }
    }

    // ---- Dashboard ------------------------------------------------------

    async fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('l') => {
                self.goto(View::Lessons);
                self.refresh_lessons().await;
            }
            KeyCode::Char('b') => self.goto(View::LessonCreate),
            KeyCode::Char('a') if self.state.role() == Some(UserRole::Tutor) => {
                self.state.availability.hydrate(&self.drafts);
                self.goto(View::Availability);
            }
            KeyCode::Char('w') if self.state.role() == Some(UserRole::Tutor) => {
                self.goto(View::Wallet);
                self.refresh_wallet().await;
            }
            KeyCode::Char('t') if self.state.role() == Some(UserRole::Student) => {
                self.tutor_application.hydrate(&self.drafts);
                if self.tutor_application.is_submitted() {
                    self.tutor_application.reset(&self.drafts);
                }
                self.goto(View::TutorApplication);
            }
            KeyCode::Char('f') => self.refresh_language_availability().await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    // ---- Lessons --------------------------------------------------------

    async fn handle_lessons_key(&mut self, key: KeyEvent) -> Result<()> {
        let visible = self.state.sorted_lessons(Utc::now()).len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(visible),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Char('s') => {
                self.state.cycle_lesson_sort_field();
                self.save_lesson_preferences();
            }
            KeyCode::Char('d') => {
                self.state.toggle_lesson_sort_direction();
                self.save_lesson_preferences();
            }
            KeyCode::Char('p') => {
                self.state.show_past_lessons = !self.state.show_past_lessons;
                self.state.reset_selection();
                self.save_lesson_preferences();
            }
            KeyCode::Char('r') => self.refresh_lessons().await,
            KeyCode::Char('b') => self.goto(View::LessonCreate),
            KeyCode::Enter => {
                let selected = self
                    .state
                    .sorted_lessons(Utc::now())
                    .get(self.state.selected_index)
                    .map(|l| l.id.clone());
                if let Some(id) = selected {
                    self.state.selected_lesson_id = Some(id);
                    self.goto(View::LessonDetail);
                }
            }
            KeyCode::Esc => self.state.pop_view(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_lesson_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') => self.start_selected_lesson().await,
            KeyCode::Char('e') => self.end_selected_lesson().await,
            KeyCode::Char('c') => {
                if let Some(lesson) = self.state.selected_lesson() {
                    self.state.confirm_action = Some(lesson.id.clone());
                }
            }
            KeyCode::Char('m') => self.copy_meeting_link(),
            KeyCode::Char('r') => {
                if let Some(lesson) = self.state.selected_lesson() {
                    self.form = FormState::Reschedule(RescheduleForm::for_lesson(lesson));
                    self.form_errors.clear();
                    self.state.push_view(View::Reschedule);
                }
            }
            KeyCode::Esc => self.state.pop_view(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_lesson_create_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left | KeyCode::Right => self.form_cycle(),
            KeyCode::Enter => self.submit_lesson_create().await,
            KeyCode::Esc => self.state.pop_view(),
            KeyCode::Backspace => self.form_backspace(),
            KeyCode::Char(c) => self.form_input_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn handle_reschedule_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => self.submit_reschedule().await,
            KeyCode::Esc => self.state.pop_view(),
            KeyCode::Backspace => self.form_backspace(),
            KeyCode::Char(c) => self.form_input_char(c),
            _ => {}
        }
        Ok(())
    }

    /// Remember the lesson-list view settings across restarts
    fn save_lesson_preferences(&mut self) {
        self.config.lesson_sort_field = Some(
            match self.state.lesson_sort_field {
                crate::state::LessonSortField::StartsAt => "starts_at",
                crate::state::LessonSortField::Language => "language",
                crate::state::LessonSortField::Status => "status",
            }
            .to_string(),
        );
        self.config.lesson_sort_direction = Some(
            match self.state.lesson_sort_direction {
                crate::state::SortDirection::Asc => "asc",
                crate::state::SortDirection::Desc => "desc",
            }
            .to_string(),
        );
        self.config.show_past_lessons = Some(self.state.show_past_lessons);
        if let Err(e) = self.config.save() {
            tracing::warn!("failed to save config: {e}");
        }
    }

    async fn refresh_lessons(&mut self) {
        match self.api.list_lessons().await {
            Ok(lessons) => {
                self.state.lessons = lessons;
                self.state.reset_selection();
            }
            Err(e) => self.toasts.error(format!("Failed to load lessons: {e}")),
        }
    }

    async fn submit_lesson_create(&mut self) {
        let FormState::LessonCreate(form) = &self.form else {
            return;
        };
        let errors = form.validate();
        if !errors.is_empty() {
            self.form_errors = errors;
            return;
        }
        let Some(starts_at) = crate::state::parse_start_time(form.starts_at.as_text()) else {
            return;
        };
        let request = LessonRequest {
            language: form.language.as_text().to_string(),
            starts_at,
            duration_minutes: form.duration_minutes(),
            notes: match form.notes.as_text() {
                "" => None,
                notes => Some(notes.to_string()),
            },
        };
        match self.api.create_lesson(&request).await {
            Ok(lesson) => {
                self.toasts
                    .success(format!("{} lesson booked", lesson.language));
                self.state.lessons.push(lesson);
                self.state.pop_view();
            }
            Err(e) => self.toasts.error(format!("Booking failed: {e}")),
        }
    }

    async fn submit_reschedule(&mut self) {
        let FormState::Reschedule(form) = &self.form else {
            return;
        };
        let errors = form.validate();
        if !errors.is_empty() {
            self.form_errors = errors;
            return;
        }
        let lesson_id = form.lesson_id.clone();
        let Some(proposed) = crate::state::parse_start_time(form.proposed_start.as_text()) else {
            return;
        };
        let reason = form.reason.as_text().to_string();
        match self
            .api
            .request_reschedule(&lesson_id, proposed, &reason)
            .await
        {
            Ok(()) => {
                self.toasts.success("Reschedule requested");
                self.state.pop_view();
                self.refresh_lessons().await;
            }
            Err(e) => self.toasts.error(format!("Reschedule failed: {e}")),
        }
    }

    async fn cancel_lesson(&mut self, lesson_id: &str) {
        match self.api.cancel_lesson(lesson_id).await {
            Ok(()) => {
                self.toasts.info("Lesson cancelled");
                self.state.pop_view();
                self.refresh_lessons().await;
            }
            Err(e) => self.toasts.error(format!("Failed to cancel lesson: {e}")),
        }
    }

    async fn start_selected_lesson(&mut self) {
        let Some(lesson) = self.state.selected_lesson() else {
            self.toasts.error("No lesson selected");
            return;
        };
        if !lesson.is_startable(Utc::now()) {
            self.toasts
                .info("Lesson can be started 10 minutes before its scheduled time");
            return;
        }
        let id = lesson.id.clone();
        match self.api.start_lesson(&id).await {
            Ok(updated) => {
                self.toasts.success("Lesson started");
                self.replace_lesson(updated);
            }
            Err(e) => self.toasts.error(format!("Failed to start lesson: {e}")),
        }
    }

    async fn end_selected_lesson(&mut self) {
        let Some(lesson) = self.state.selected_lesson() else {
            self.toasts.error("No lesson selected");
            return;
        };
        let id = lesson.id.clone();
        match self.api.end_lesson(&id).await {
            Ok(updated) => {
                self.toasts.success("Lesson ended");
                self.replace_lesson(updated);
            }
            Err(e) => self.toasts.error(format!("Failed to end lesson: {e}")),
        }
    }

    fn replace_lesson(&mut self, updated: crate::state::Lesson) {
        if let Some(slot) = self.state.lessons.iter_mut().find(|l| l.id == updated.id) {
            *slot = updated;
        } else {
            self.state.lessons.push(updated);
        }
    }

    fn copy_meeting_link(&mut self) {
        let Some(link) = self
            .state
            .selected_lesson()
            .and_then(|l| l.meeting_link.clone())
        else {
            self.toasts.info("No meeting link for this lesson");
            return;
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(link)) {
            Ok(()) => self.toasts.success("Meeting link copied"),
            Err(e) => self.toasts.error(format!("Clipboard unavailable: {e}")),
        }
    }

    /// Fetch marketplace availability for the learner's target language.
    /// Guarded by a generation counter: if a newer fetch started while
    /// this one was in flight, the stale response is dropped.
    async fn refresh_language_availability(&mut self) {
        let languages = signup::LANGUAGES;
        let language = languages[self.state.browse_language_index % languages.len()].to_string();
        self.state.browse_language_index += 1;
        let generation = self.state.next_fetch_generation();
        match self.api.fetch_language_availability(&language).await {
            Ok(availability) => {
                if !self.state.is_current_generation(generation) {
                    tracing::debug!("dropping stale availability response");
                    return;
                }
                self.state.language_availability = vec![availability];
            }
            Err(e) => self.toasts.error(format!("Availability lookup failed: {e}")),
        }
    }

    // ---- Tutor application ----------------------------------------------

    async fn handle_tutor_application_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.tutor_application.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.tutor_application.prev_field(),
            KeyCode::Left | KeyCode::Right => self.tutor_application.cycle_active(&self.drafts),
            KeyCode::Char(c @ '1'..='9')
                if self.active_application_field_is_multi_choice() =>
            {
                let index = (c as usize) - ('1' as usize);
                if let Some(option) = self.application_option_at(index) {
                    self.tutor_application.toggle_option(&option, &self.drafts);
                }
            }
            KeyCode::Enter => {
                if self.tutor_application.is_last_step() {
                    self.submit_tutor_application().await;
                } else {
                    self.tutor_application.advance(&self.drafts);
                }
            }
            KeyCode::Esc => {
                if self.tutor_application.is_first_step() {
                    self.state.pop_view();
                } else {
                    self.tutor_application.retreat(&self.drafts);
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.tutor_application.reset(&self.drafts);
                self.toasts.info("Application draft discarded");
            }
            KeyCode::Backspace => self.tutor_application.backspace(&self.drafts),
            KeyCode::Char(c) => self.tutor_application.input_char(c, &self.drafts),
            _ => {}
        }
        Ok(())
    }

    fn active_application_field_is_multi_choice(&self) -> bool {
        self.tutor_application
            .active_field()
            .is_some_and(|f| matches!(f.value, FieldValue::MultiChoice { .. }))
    }

    fn application_option_at(&self, index: usize) -> Option<String> {
        match &self.tutor_application.active_field()?.value {
            FieldValue::MultiChoice { options, .. } => options.get(index).cloned(),
            _ => None,
        }
    }

    async fn submit_tutor_application(&mut self) {
        if !self.tutor_application.validate_for_submit() {
            return;
        }
        let application = tutor_application::application(&self.tutor_application);
        match self.api.submit_tutor_application(&application).await {
            Ok(()) => {
                self.tutor_application.submit(&self.drafts);
                self.toasts.success("Application submitted, we'll be in touch");
                self.state.pop_view();
            }
            // Draft stays on disk; the submission is retryable
            Err(e) => self.toasts.error(format!("Submission failed: {e}")),
        }
    }

    // ---- Availability grid ----------------------------------------------

    async fn handle_availability_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Left => self.state.availability.move_cursor(-1, 0),
            KeyCode::Right => self.state.availability.move_cursor(1, 0),
            KeyCode::Up => self.state.availability.move_cursor(0, -1),
            KeyCode::Down => self.state.availability.move_cursor(0, 1),
            KeyCode::Char(' ') => self.state.availability.toggle_cursor(&self.drafts),
            KeyCode::Char('n') => self.state.availability.next_week(),
            KeyCode::Char('p') => self.state.availability.prev_week(),
            KeyCode::Enter => self.submit_availability().await,
            KeyCode::Esc => self.state.pop_view(),
            _ => {}
        }
        Ok(())
    }

    async fn submit_availability(&mut self) {
        let slots = self.state.availability.selected_slots();
        match self.api.submit_availability(&slots).await {
            Ok(()) => {
                self.toasts
                    .success(format!("{} slots published", slots.len()));
                self.state.availability.clear_draft(&self.drafts);
            }
            Err(e) => self.toasts.error(format!("Failed to publish slots: {e}")),
        }
    }

    // ---- Wallet ---------------------------------------------------------

    async fn handle_wallet_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => self.submit_withdrawal().await,
            KeyCode::Char('r') => self.refresh_wallet().await,
            KeyCode::Esc => self.state.pop_view(),
            KeyCode::Backspace => self.form_backspace(),
            KeyCode::Char(c) => self.form_input_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn refresh_wallet(&mut self) {
        match self.api.fetch_wallet().await {
            Ok(wallet) => self.state.wallet = Some(wallet),
            Err(e) => self.toasts.error(format!("Failed to load wallet: {e}")),
        }
    }

    async fn submit_withdrawal(&mut self) {
        let balance = self
            .state
            .wallet
            .as_ref()
            .map(|w| w.balance_cents)
            .unwrap_or(0);
        let FormState::Withdraw(form) = &self.form else {
            return;
        };
        let errors = form.validate(balance);
        if !errors.is_empty() {
            self.form_errors = errors;
            return;
        }
        let Some(amount) = form.amount_cents() else {
            return;
        };
        let destination = form.destination.as_text().to_string();
        match self.api.request_withdrawal(amount, &destination).await {
            Ok(()) => {
                self.toasts.success("Withdrawal requested");
                self.form = FormState::Withdraw(WithdrawForm::new());
                self.refresh_wallet().await;
            }
            Err(e) => self.toasts.error(format!("Withdrawal failed: {e}")),
        }
    }
}
