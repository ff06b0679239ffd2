//! REST client for the Lingua marketplace backend

use super::{ApiClient, ApiError, ErrorBody};
use crate::state::{
    AvailabilitySlot, LanguageAvailability, Lesson, LessonRequest, Profile, Registration, Session,
    TutorApplication, Wallet,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

/// Default backend address
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Client for the marketplace REST backend
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    /// Bearer token from login/registration
    token: Option<String>,
}

impl HttpApiClient {
    /// Create a client. The base URL comes from configuration, with the
    /// `LINGUA_API_URL` environment variable taking precedence.
    pub fn new(configured_url: Option<String>) -> Self {
        let base_url = std::env::var("LINGUA_API_URL")
            .ok()
            .or(configured_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ApiError> {
        match &self.token {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(ApiError::Unauthenticated),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authed(self.http.get(self.url(path)))?;
        Self::decode(request.send().await?).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authed(self.http.post(self.url(path)))?;
        Self::decode(request.json(body).send().await?).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authed(self.http.put(self.url(path)))?;
        Self::decode(request.json(body).send().await?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.authed(self.http.delete(self.url(path)))?;
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn check_connection(&self) -> bool {
        self.http
            .get(self.url("/health"))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let session: Session = Self::decode(response).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    async fn register(&mut self, registration: &Registration) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(registration)
            .send()
            .await?;
        let session: Session = Self::decode(response).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    async fn fetch_profile(&mut self) -> Result<Profile, ApiError> {
        self.get("/me").await
    }

    async fn list_lessons(&mut self) -> Result<Vec<Lesson>, ApiError> {
        self.get("/lessons").await
    }

    async fn create_lesson(&mut self, request: &LessonRequest) -> Result<Lesson, ApiError> {
        self.post("/lessons", request).await
    }

    async fn update_lesson(
        &mut self,
        lesson_id: &str,
        request: &LessonRequest,
    ) -> Result<Lesson, ApiError> {
        self.put(&format!("/lessons/{lesson_id}"), request).await
    }

    async fn cancel_lesson(&mut self, lesson_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/lessons/{lesson_id}")).await
    }

    async fn start_lesson(&mut self, lesson_id: &str) -> Result<Lesson, ApiError> {
        self.post(&format!("/lessons/{lesson_id}/start"), &json!({}))
            .await
    }

    async fn end_lesson(&mut self, lesson_id: &str) -> Result<Lesson, ApiError> {
        self.post(&format!("/lessons/{lesson_id}/end"), &json!({}))
            .await
    }

    async fn request_reschedule(
        &mut self,
        lesson_id: &str,
        proposed_start: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(
                &format!("/lessons/{lesson_id}/reschedule"),
                &json!({ "proposed_start": proposed_start, "reason": reason }),
            )
            .await?;
        Ok(())
    }

    async fn fetch_availability(
        &mut self,
        tutor_id: &str,
    ) -> Result<Vec<AvailabilitySlot>, ApiError> {
        self.get(&format!("/tutors/{tutor_id}/availability")).await
    }

    async fn submit_availability(&mut self, slots: &[AvailabilitySlot]) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put("/me/availability", &json!({ "slots": slots }))
            .await?;
        Ok(())
    }

    async fn fetch_language_availability(
        &mut self,
        language: &str,
    ) -> Result<LanguageAvailability, ApiError> {
        self.get(&format!("/availability/languages/{language}"))
            .await
    }

    async fn submit_tutor_application(
        &mut self,
        application: &TutorApplication,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/tutor-applications", application).await?;
        Ok(())
    }

    async fn fetch_wallet(&mut self) -> Result<Wallet, ApiError> {
        self.get("/me/wallet").await
    }

    async fn request_withdrawal(
        &mut self,
        amount_cents: i64,
        destination: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(
                "/me/wallet/withdrawals",
                &json!({ "amount_cents": amount_cents, "destination": destination }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_url_is_used() {
        let client = HttpApiClient::new(Some("http://example.test/api".to_string()));
        assert_eq!(client.url("/lessons"), "http://example.test/api/lessons");
    }

    #[test]
    fn test_default_url_fallback() {
        let client = HttpApiClient::new(None);
        assert!(client.url("/health").starts_with("http://"));
    }

    #[test]
    fn test_unauthenticated_requests_are_refused() {
        let client = HttpApiClient::new(Some("http://example.test".to_string()));
        let result = client.authed(client.http.get(client.url("/me")));
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
    }
}
