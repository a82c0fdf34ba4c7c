//! Typed HTTP client for the society API.
//!
//! Mirrors what the web front end consumes: public section loaders in
//! [`sections`] and the credential-holding [`AdminConsole`].

pub mod admin;
pub mod sections;

pub use admin::{AdminConsole, AdminCredential, Collection};
pub use sections::{AnnouncementCard, SectionState};

use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    api::{
        handlers::{
            admin::{LoginRequest, LoginResponse},
            site::SiteContent,
        },
        middleware::auth::ADMIN_PASSWORD_HEADER,
        ErrorBody,
    },
    domain::{
        Announcement, ContactMessage, CreateAnnouncementRequest, CreateContactMessageRequest,
        CreateEventRequest, CreateRegistrationRequest, CreateTeamMemberRequest, Event,
        Registration, TeamMember, UpdateAnnouncementRequest, UpdateEventRequest,
        UpdateTeamMemberRequest,
    },
    service::stats_service::DashboardStats,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Admin password is required")]
    MissingCredential,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::MissingCredential => None,
        }
    }

    /// Text suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Public reads

    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        self.get("/api/events", None).await
    }

    pub async fn list_team_members(&self) -> ClientResult<Vec<TeamMember>> {
        self.get("/api/team-members", None).await
    }

    pub async fn list_announcements(&self) -> ClientResult<Vec<Announcement>> {
        self.get("/api/announcements", None).await
    }

    pub async fn site_content(&self) -> ClientResult<SiteContent> {
        self.get("/api/site", None).await
    }

    // Public submissions

    pub async fn submit_contact(
        &self,
        request: &CreateContactMessageRequest,
    ) -> ClientResult<ContactMessage> {
        self.send(self.http.post(self.url("/api/contact")).json(request), None).await
    }

    pub async fn submit_registration(
        &self,
        request: &CreateRegistrationRequest,
    ) -> ClientResult<Registration> {
        self.send(self.http.post(self.url("/api/registrations")).json(request), None).await
    }

    // Sessions

    pub async fn login(&self, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest { password: password.to_string() };
        self.send(self.http.post(self.url("/api/admin/session")).json(&body), None).await
    }

    pub async fn logout(&self, token: &str) -> ClientResult<()> {
        let request = self.http.delete(self.url("/api/admin/session")).bearer_auth(token);
        self.execute(request, None).await.map(|_| ())
    }

    // Admin operations

    pub async fn create_event(
        &self,
        credential: &AdminCredential,
        request: &CreateEventRequest,
    ) -> ClientResult<Event> {
        self.post_json("/api/events", credential, request).await
    }

    pub async fn update_event(
        &self,
        credential: &AdminCredential,
        id: Uuid,
        request: &UpdateEventRequest,
    ) -> ClientResult<Event> {
        self.put_json(&format!("/api/events/{}", id), credential, request).await
    }

    pub async fn delete_event(&self, credential: &AdminCredential, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("/api/events/{}", id), credential).await
    }

    pub async fn create_team_member(
        &self,
        credential: &AdminCredential,
        request: &CreateTeamMemberRequest,
    ) -> ClientResult<TeamMember> {
        self.post_json("/api/team-members", credential, request).await
    }

    pub async fn update_team_member(
        &self,
        credential: &AdminCredential,
        id: Uuid,
        request: &UpdateTeamMemberRequest,
    ) -> ClientResult<TeamMember> {
        self.put_json(&format!("/api/team-members/{}", id), credential, request).await
    }

    pub async fn delete_team_member(
        &self,
        credential: &AdminCredential,
        id: Uuid,
    ) -> ClientResult<()> {
        self.delete(&format!("/api/team-members/{}", id), credential).await
    }

    pub async fn create_announcement(
        &self,
        credential: &AdminCredential,
        request: &CreateAnnouncementRequest,
    ) -> ClientResult<Announcement> {
        self.post_json("/api/announcements", credential, request).await
    }

    pub async fn update_announcement(
        &self,
        credential: &AdminCredential,
        id: Uuid,
        request: &UpdateAnnouncementRequest,
    ) -> ClientResult<Announcement> {
        self.put_json(&format!("/api/announcements/{}", id), credential, request).await
    }

    pub async fn delete_announcement(
        &self,
        credential: &AdminCredential,
        id: Uuid,
    ) -> ClientResult<()> {
        self.delete(&format!("/api/announcements/{}", id), credential).await
    }

    pub async fn list_contact_messages(
        &self,
        credential: &AdminCredential,
    ) -> ClientResult<Vec<ContactMessage>> {
        self.get("/api/contact", Some(credential)).await
    }

    pub async fn delete_contact_message(
        &self,
        credential: &AdminCredential,
        id: Uuid,
    ) -> ClientResult<()> {
        self.delete(&format!("/api/contact/{}", id), credential).await
    }

    pub async fn list_registrations(
        &self,
        credential: &AdminCredential,
    ) -> ClientResult<Vec<Registration>> {
        self.get("/api/registrations", Some(credential)).await
    }

    pub async fn delete_registration(
        &self,
        credential: &AdminCredential,
        id: Uuid,
    ) -> ClientResult<()> {
        self.delete(&format!("/api/registrations/{}", id), credential).await
    }

    pub async fn dashboard_stats(&self, credential: &AdminCredential) -> ClientResult<DashboardStats> {
        self.get("/api/admin/stats", Some(credential)).await
    }

    // Plumbing

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: Option<&AdminCredential>,
    ) -> ClientResult<T> {
        self.send(self.http.get(self.url(path)), credential).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &AdminCredential,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.http.post(self.url(path)).json(body), Some(credential)).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &AdminCredential,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.http.put(self.url(path)).json(body), Some(credential)).await
    }

    async fn delete(&self, path: &str, credential: &AdminCredential) -> ClientResult<()> {
        self.execute(self.http.delete(self.url(path)), Some(credential))
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: Option<&AdminCredential>,
    ) -> ClientResult<T> {
        let response = self.execute(request, credential).await?;
        Ok(response.json().await?)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        credential: Option<&AdminCredential>,
    ) -> ClientResult<Response> {
        let request = match credential {
            Some(credential) => credential.authorize(request),
            None => request,
        };

        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status,
            message: error_message(&text),
        })
    }
}

/// Pulls the message out of an `{"error": ...}` body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => "API request failed".to_string(),
    }
}

impl AdminCredential {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AdminCredential::Password(password) => request.header(ADMIN_PASSWORD_HEADER, password),
            AdminCredential::Session(token) => request.bearer_auth(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_field() {
        assert_eq!(error_message(r#"{"error":"Unauthorized"}"#), "Unauthorized");
        assert_eq!(error_message("upstream exploded"), "upstream exploded");
        assert_eq!(error_message(""), "API request failed");
    }

    #[test]
    fn test_base_url_trailing_slash_dropped() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/events"), "http://localhost:3000/api/events");
    }
}
