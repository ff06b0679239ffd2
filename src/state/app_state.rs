//! Application state definitions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::availability::AvailabilityGrid;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Signup,
    Dashboard,
    Lessons,
    LessonDetail,
    LessonCreate,
    Reschedule,
    TutorApplication,
    Availability,
    Wallet,
}

/// Marketplace role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Tutor,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Tutor => "Tutor",
        }
    }
}

/// Signed-in user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
}

/// Authenticated session returned by login/registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub profile: Profile,
}

/// Registration payload sent to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
    pub target_language: String,
    pub level: String,
    pub newsletter: bool,
}

/// Tutor-application payload sent to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorApplication {
    pub full_name: String,
    pub country: String,
    pub native_language: String,
    pub bio: String,
    pub teaching_interests: Vec<String>,
    pub hourly_rate_cents: i64,
    pub certificate_file_name: Option<String>,
}

/// Lesson lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    RescheduleRequested,
}

impl LessonStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::RescheduleRequested => "reschedule requested",
        }
    }
}

/// A booked lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub language: String,
    pub tutor_name: String,
    pub student_name: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: LessonStatus,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
}

impl Lesson {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// A lesson can be started from 10 minutes before its scheduled
    /// start until its scheduled end.
    pub fn is_startable(&self, now: DateTime<Utc>) -> bool {
        self.status == LessonStatus::Scheduled
            && now >= self.starts_at - Duration::minutes(10)
            && now < self.ends_at()
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            LessonStatus::Scheduled | LessonStatus::RescheduleRequested | LessonStatus::InProgress
        ) && self.ends_at() > now
    }

}

/// Lesson create/update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    pub language: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

/// One bookable hour in a tutor's calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub date: chrono::NaiveDate,
    pub hour: u32,
}

/// Per-language marketplace availability summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageAvailability {
    pub language: String,
    pub tutor_count: u32,
    pub open_slots: u32,
    pub next_open_slot: Option<DateTime<Utc>>,
}

/// Wallet transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    LessonPayout,
    Withdrawal,
    Refund,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LessonPayout => "lesson payout",
            Self::Withdrawal => "withdrawal",
            Self::Refund => "refund",
        }
    }
}

/// A single wallet movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Tutor wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub balance_cents: i64,
    pub currency: String,
    pub transactions: Vec<Transaction>,
}

/// Format cents as a display amount, e.g. `12.50 EUR`
pub fn format_cents(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02} {currency}", abs / 100, abs % 100)
}

/// Sort field for lessons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LessonSortField {
    #[default]
    StartsAt,
    Language,
    Status,
}

impl LessonSortField {
    pub fn next(&self) -> Self {
        match self {
            Self::StartsAt => Self::Language,
            Self::Language => Self::Status,
            Self::Status => Self::StartsAt,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StartsAt => "Start",
            Self::Language => "Language",
            Self::Status => "Status",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Session
    pub session: Option<Session>,

    // Data
    pub lessons: Vec<Lesson>,
    pub language_availability: Vec<LanguageAvailability>,
    pub wallet: Option<Wallet>,

    // Selection
    pub selected_index: usize,
    pub selected_lesson_id: Option<String>,

    // Sorting / filters
    pub lesson_sort_field: LessonSortField,
    pub lesson_sort_direction: SortDirection,
    pub show_past_lessons: bool,

    // Availability grid (tutor)
    pub availability: AvailabilityGrid,

    // UI state
    pub scroll_offset: usize,
    /// Index into the language list cycled by the dashboard
    /// availability lookup
    pub browse_language_index: usize,
    pub backend_connected: bool,
    pub confirm_action: Option<String>,

    /// Generation counter for supersedable fetches; a response tagged
    /// with an older generation than the current one is dropped.
    pub fetch_generation: u64,
}

impl AppState {
    pub fn role(&self) -> Option<UserRole> {
        self.session.as_ref().map(|s| s.profile.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Navigate to a view, remembering where we came from
    pub fn push_view(&mut self, view: View) {
        let previous = std::mem::replace(&mut self.current_view, view);
        self.view_history.push(previous);
        self.reset_selection();
    }

    /// Return to the previous view (dashboard if history is empty)
    pub fn pop_view(&mut self) {
        self.current_view = self.view_history.pop().unwrap_or(View::Dashboard);
        self.reset_selection();
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Cycle lesson sort field
    pub fn cycle_lesson_sort_field(&mut self) {
        self.lesson_sort_field = self.lesson_sort_field.next();
        self.reset_selection();
    }

    /// Toggle lesson sort direction
    pub fn toggle_lesson_sort_direction(&mut self) {
        self.lesson_sort_direction = self.lesson_sort_direction.toggle();
        self.reset_selection();
    }

    /// Bump the fetch generation, invalidating in-flight responses
    pub fn next_fetch_generation(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.fetch_generation
    }

    /// Whether a response tagged with `generation` is still current
    pub fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.fetch_generation
    }

    /// Get sorted, filtered lessons
    pub fn sorted_lessons(&self, now: DateTime<Utc>) -> Vec<&Lesson> {
        let mut lessons: Vec<_> = self
            .lessons
            .iter()
            .filter(|l| self.show_past_lessons || l.is_upcoming(now))
            .collect();

        lessons.sort_by(|a, b| {
            let cmp = match self.lesson_sort_field {
                LessonSortField::StartsAt => a.starts_at.cmp(&b.starts_at),
                LessonSortField::Language => a.language.cmp(&b.language),
                LessonSortField::Status => a.status.label().cmp(b.status.label()),
            };

            match self.lesson_sort_direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });

        lessons
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        let id = self.selected_lesson_id.as_deref()?;
        self.lessons.iter().find(|l| l.id == id)
    }

    /// The next upcoming lesson, if any
    pub fn next_lesson(&self, now: DateTime<Utc>) -> Option<&Lesson> {
        self.lessons
            .iter()
            .filter(|l| l.is_upcoming(now))
            .min_by_key(|l| l.starts_at)
    }

    /// Countdown label for the dashboard, e.g. `1h 05m`
    pub fn next_lesson_countdown(&self, now: DateTime<Utc>) -> Option<String> {
        let lesson = self.next_lesson(now)?;
        let remaining = lesson.starts_at - now;
        if remaining <= Duration::zero() {
            return Some("now".to_string());
        }
        let minutes = remaining.num_minutes();
        Some(if minutes >= 60 {
            format!("{}h {:02}m", minutes / 60, minutes % 60)
        } else {
            format!("{}m", minutes.max(1))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn lesson(id: &str, offset_minutes: i64, status: LessonStatus) -> Lesson {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        Lesson {
            id: id.to_string(),
            language: "Spanish".to_string(),
            tutor_name: "Mar".to_string(),
            student_name: "Ada".to_string(),
            starts_at: now + Duration::minutes(offset_minutes),
            duration_minutes: 60,
            status,
            meeting_link: None,
            notes: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_lesson_startable_window() {
        let l = lesson("a", 5, LessonStatus::Scheduled);
        assert!(l.is_startable(now()));
        let early = lesson("b", 30, LessonStatus::Scheduled);
        assert!(!early.is_startable(now()));
        let over = lesson("c", -90, LessonStatus::Scheduled);
        assert!(!over.is_startable(now()));
        let cancelled = lesson("d", 5, LessonStatus::Cancelled);
        assert!(!cancelled.is_startable(now()));
    }

    #[test]
    fn test_sorted_lessons_hides_past_by_default() {
        let mut state = AppState::default();
        state.lessons = vec![
            lesson("past", -120, LessonStatus::Completed),
            lesson("soon", 30, LessonStatus::Scheduled),
        ];
        let visible = state.sorted_lessons(now());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "soon");

        state.show_past_lessons = true;
        assert_eq!(state.sorted_lessons(now()).len(), 2);
    }

    #[test]
    fn test_sort_direction_reverses() {
        let mut state = AppState::default();
        state.show_past_lessons = true;
        state.lessons = vec![
            lesson("later", 120, LessonStatus::Scheduled),
            lesson("sooner", 30, LessonStatus::Scheduled),
        ];
        let asc = state.sorted_lessons(now());
        assert_eq!(asc[0].id, "sooner");
        state.toggle_lesson_sort_direction();
        let desc = state.sorted_lessons(now());
        assert_eq!(desc[0].id, "later");
    }

    #[test]
    fn test_next_lesson_and_countdown() {
        let mut state = AppState::default();
        state.lessons = vec![
            lesson("far", 200, LessonStatus::Scheduled),
            lesson("near", 65, LessonStatus::Scheduled),
            lesson("gone", -300, LessonStatus::Completed),
        ];
        assert_eq!(state.next_lesson(now()).unwrap().id, "near");
        assert_eq!(state.next_lesson_countdown(now()).unwrap(), "1h 05m");
    }

    #[test]
    fn test_view_history_push_pop() {
        let mut state = AppState::default();
        state.current_view = View::Dashboard;
        state.push_view(View::Lessons);
        state.push_view(View::LessonDetail);
        assert_eq!(state.current_view, View::LessonDetail);
        state.pop_view();
        assert_eq!(state.current_view, View::Lessons);
        state.pop_view();
        assert_eq!(state.current_view, View::Dashboard);
        state.pop_view();
        assert_eq!(state.current_view, View::Dashboard);
    }

    #[test]
    fn test_fetch_generation_guard() {
        let mut state = AppState::default();
        let first = state.next_fetch_generation();
        let second = state.next_fetch_generation();
        assert!(!state.is_current_generation(first));
        assert!(state.is_current_generation(second));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1250, "EUR"), "12.50 EUR");
        assert_eq!(format_cents(5, "EUR"), "0.05 EUR");
        assert_eq!(format_cents(-330, "EUR"), "-3.30 EUR");
    }
}
