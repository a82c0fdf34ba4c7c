use std::collections::HashSet;

use uuid::Uuid;

use super::{ApiClient, ClientError, ClientResult};
use crate::domain::{
    Announcement, ContactMessage, CreateAnnouncementRequest, CreateEventRequest,
    CreateTeamMemberRequest, Event, Registration, TeamMember, UpdateAnnouncementRequest,
    UpdateEventRequest, UpdateTeamMemberRequest,
};

/// Proof of admin rights sent with privileged requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredential {
    /// Sent as `x-admin-password`.
    Password(String),
    /// Bearer token from `POST /api/admin/session`.
    Session(String),
}

/// The lists held by [`AdminConsole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Events,
    TeamMembers,
    Announcements,
    ContactMessages,
    Registrations,
}

/// State behind the admin screen.
///
/// Public collections are refreshed after each successful mutation, and only
/// the collection that changed. Contact messages and registrations load on
/// demand.
///
/// A mutation the server accepted is reported as a success even when the
/// refresh after it fails. The old list is kept and the collection is
/// marked stale until a later load succeeds.
pub struct AdminConsole {
    client: ApiClient,
    credential: Option<AdminCredential>,
    stale: HashSet<Collection>,
    pub events: Vec<Event>,
    pub team_members: Vec<TeamMember>,
    pub announcements: Vec<Announcement>,
    pub contact_messages: Vec<ContactMessage>,
    pub registrations: Vec<Registration>,
}

impl AdminConsole {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            credential: None,
            stale: HashSet::new(),
            events: Vec::new(),
            team_members: Vec::new(),
            announcements: Vec::new(),
            contact_messages: Vec::new(),
            registrations: Vec::new(),
        }
    }

    /// Stores the typed password. A blank entry clears the credential.
    pub fn set_password(&mut self, password: impl Into<String>) {
        let password = password.into();
        self.credential = if password.is_empty() {
            None
        } else {
            Some(AdminCredential::Password(password))
        };
    }

    /// Trades the password for a session token and keeps the token instead.
    pub async fn sign_in(&mut self, password: &str) -> ClientResult<()> {
        let session = self.client.login(password).await?;
        tracing::debug!("Admin session valid until {}", session.expires_at);
        self.credential = Some(AdminCredential::Session(session.token));
        Ok(())
    }

    pub async fn sign_out(&mut self) -> ClientResult<()> {
        if let Some(AdminCredential::Session(token)) = self.credential.take() {
            self.client.logout(&token).await?;
        }
        Ok(())
    }

    pub fn credential(&self) -> Option<&AdminCredential> {
        self.credential.as_ref()
    }

    /// Whether `collection` may be out of date after a failed refresh.
    pub fn is_stale(&self, collection: Collection) -> bool {
        self.stale.contains(&collection)
    }

    fn require_credential(&self) -> ClientResult<&AdminCredential> {
        self.credential.as_ref().ok_or(ClientError::MissingCredential)
    }

    /// Loads the three public collections shown in the editors.
    pub async fn load_public(&mut self) -> ClientResult<()> {
        self.events = self.client.list_events().await?;
        self.stale.remove(&Collection::Events);
        self.team_members = self.client.list_team_members().await?;
        self.stale.remove(&Collection::TeamMembers);
        self.announcements = self.client.list_announcements().await?;
        self.stale.remove(&Collection::Announcements);
        Ok(())
    }

    pub async fn create_event(&mut self, request: &CreateEventRequest) -> ClientResult<Event> {
        let credential = self.require_credential()?;
        let event = self.client.create_event(credential, request).await?;
        self.refresh_events().await;
        Ok(event)
    }

    pub async fn update_event(&mut self, id: Uuid, request: &UpdateEventRequest) -> ClientResult<Event> {
        let credential = self.require_credential()?;
        let event = self.client.update_event(credential, id, request).await?;
        self.refresh_events().await;
        Ok(event)
    }

    pub async fn delete_event(&mut self, id: Uuid) -> ClientResult<()> {
        let credential = self.require_credential()?;
        self.client.delete_event(credential, id).await?;
        self.refresh_events().await;
        Ok(())
    }

    pub async fn create_team_member(
        &mut self,
        request: &CreateTeamMemberRequest,
    ) -> ClientResult<TeamMember> {
        let credential = self.require_credential()?;
        let member = self.client.create_team_member(credential, request).await?;
        self.refresh_team().await;
        Ok(member)
    }

    pub async fn update_team_member(
        &mut self,
        id: Uuid,
        request: &UpdateTeamMemberRequest,
    ) -> ClientResult<TeamMember> {
        let credential = self.require_credential()?;
        let member = self.client.update_team_member(credential, id, request).await?;
        self.refresh_team().await;
        Ok(member)
    }

    pub async fn delete_team_member(&mut self, id: Uuid) -> ClientResult<()> {
        let credential = self.require_credential()?;
        self.client.delete_team_member(credential, id).await?;
        self.refresh_team().await;
        Ok(())
    }

    pub async fn create_announcement(
        &mut self,
        request: &CreateAnnouncementRequest,
    ) -> ClientResult<Announcement> {
        let credential = self.require_credential()?;
        let announcement = self.client.create_announcement(credential, request).await?;
        self.refresh_announcements().await;
        Ok(announcement)
    }

    pub async fn update_announcement(
        &mut self,
        id: Uuid,
        request: &UpdateAnnouncementRequest,
    ) -> ClientResult<Announcement> {
        let credential = self.require_credential()?;
        let announcement = self.client.update_announcement(credential, id, request).await?;
        self.refresh_announcements().await;
        Ok(announcement)
    }

    pub async fn delete_announcement(&mut self, id: Uuid) -> ClientResult<()> {
        let credential = self.require_credential()?;
        self.client.delete_announcement(credential, id).await?;
        self.refresh_announcements().await;
        Ok(())
    }

    /// Fetches contact messages. Refuses without a network call when no
    /// credential has been entered.
    pub async fn fetch_contact_messages(&mut self) -> ClientResult<&[ContactMessage]> {
        let credential = self.require_credential()?;
        self.contact_messages = self.client.list_contact_messages(credential).await?;
        self.stale.remove(&Collection::ContactMessages);
        Ok(&self.contact_messages)
    }

    pub async fn delete_contact_message(&mut self, id: Uuid) -> ClientResult<()> {
        let credential = self.require_credential()?.clone();
        self.client.delete_contact_message(&credential, id).await?;
        let outcome = self.client.list_contact_messages(&credential).await;
        if let Some(messages) = self.settle(Collection::ContactMessages, outcome) {
            self.contact_messages = messages;
        }
        Ok(())
    }

    /// Fetches registrations. Same rules as [`Self::fetch_contact_messages`].
    pub async fn fetch_registrations(&mut self) -> ClientResult<&[Registration]> {
        let credential = self.require_credential()?;
        self.registrations = self.client.list_registrations(credential).await?;
        self.stale.remove(&Collection::Registrations);
        Ok(&self.registrations)
    }

    pub async fn delete_registration(&mut self, id: Uuid) -> ClientResult<()> {
        let credential = self.require_credential()?.clone();
        self.client.delete_registration(&credential, id).await?;
        let outcome = self.client.list_registrations(&credential).await;
        if let Some(registrations) = self.settle(Collection::Registrations, outcome) {
            self.registrations = registrations;
        }
        Ok(())
    }

    async fn refresh_events(&mut self) {
        let outcome = self.client.list_events().await;
        if let Some(events) = self.settle(Collection::Events, outcome) {
            self.events = events;
        }
    }

    async fn refresh_team(&mut self) {
        let outcome = self.client.list_team_members().await;
        if let Some(members) = self.settle(Collection::TeamMembers, outcome) {
            self.team_members = members;
        }
    }

    async fn refresh_announcements(&mut self) {
        let outcome = self.client.list_announcements().await;
        if let Some(announcements) = self.settle(Collection::Announcements, outcome) {
            self.announcements = announcements;
        }
    }

    /// Records how a post-mutation refresh went and hands back the new list
    /// when there is one.
    fn settle<T>(&mut self, collection: Collection, outcome: ClientResult<Vec<T>>) -> Option<Vec<T>> {
        match outcome {
            Ok(items) => {
                self.stale.remove(&collection);
                Some(items)
            }
            Err(err) => {
                tracing::warn!("Change saved but {:?} could not be reloaded: {}", collection, err);
                self.stale.insert(collection);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 9 (discard) is never listening; reaching the network would fail
    // with Transport rather than MissingCredential.
    fn offline_console() -> AdminConsole {
        AdminConsole::new(ApiClient::new("http://127.0.0.1:9"))
    }

    #[tokio::test]
    async fn test_on_demand_fetch_requires_credential() {
        let mut console = offline_console();

        let err = console.fetch_contact_messages().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));

        let err = console.fetch_registrations().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));
    }

    #[test]
    fn test_blank_password_clears_credential() {
        let mut console = offline_console();
        console.set_password("secret");
        assert_eq!(
            console.credential(),
            Some(&AdminCredential::Password("secret".into()))
        );

        console.set_password("");
        assert!(console.credential().is_none());
    }
}
