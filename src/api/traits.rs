//! Trait abstraction for the backend client to enable mocking in tests

use super::ApiError;
use crate::state::{
    AvailabilitySlot, LanguageAvailability, Lesson, LessonRequest, Profile, Registration, Session,
    TutorApplication, Wallet,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for backend operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Check if the backend is reachable
    async fn check_connection(&self) -> bool;

    /// Sign in with email and password
    async fn login(&mut self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// Create a new account
    async fn register(&mut self, registration: &Registration) -> Result<Session, ApiError>;

    /// Fetch the signed-in user's profile
    async fn fetch_profile(&mut self) -> Result<Profile, ApiError>;

    /// List the signed-in user's lessons
    async fn list_lessons(&mut self) -> Result<Vec<Lesson>, ApiError>;

    /// Book a new lesson
    async fn create_lesson(&mut self, request: &LessonRequest) -> Result<Lesson, ApiError>;

    /// Update an existing lesson
    async fn update_lesson(
        &mut self,
        lesson_id: &str,
        request: &LessonRequest,
    ) -> Result<Lesson, ApiError>;

    /// Cancel a lesson
    async fn cancel_lesson(&mut self, lesson_id: &str) -> Result<(), ApiError>;

    /// Mark a lesson as started
    async fn start_lesson(&mut self, lesson_id: &str) -> Result<Lesson, ApiError>;

    /// Mark a lesson as ended
    async fn end_lesson(&mut self, lesson_id: &str) -> Result<Lesson, ApiError>;

    /// Ask the other party to move a lesson
    async fn request_reschedule(
        &mut self,
        lesson_id: &str,
        proposed_start: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), ApiError>;

    /// Fetch a tutor's open availability slots
    async fn fetch_availability(&mut self, tutor_id: &str)
        -> Result<Vec<AvailabilitySlot>, ApiError>;

    /// Publish the signed-in tutor's availability slots
    async fn submit_availability(&mut self, slots: &[AvailabilitySlot]) -> Result<(), ApiError>;

    /// Fetch marketplace availability for a language
    async fn fetch_language_availability(
        &mut self,
        language: &str,
    ) -> Result<LanguageAvailability, ApiError>;

    /// Submit a tutor application
    async fn submit_tutor_application(
        &mut self,
        application: &TutorApplication,
    ) -> Result<(), ApiError>;

    /// Fetch the signed-in tutor's wallet
    async fn fetch_wallet(&mut self) -> Result<Wallet, ApiError>;

    /// Request a withdrawal from the wallet
    async fn request_withdrawal(
        &mut self,
        amount_cents: i64,
        destination: &str,
    ) -> Result<(), ApiError>;
}
