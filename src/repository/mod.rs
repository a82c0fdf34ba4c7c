use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod event_repository;
pub mod team_member_repository;
pub mod announcement_repository;
pub mod contact_repository;
pub mod registration_repository;

pub use event_repository::SqliteEventRepository;
pub use team_member_repository::SqliteTeamMemberRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use contact_repository::SqliteContactMessageRepository;
pub use registration_repository::SqliteRegistrationRepository;

// Lists return rows in insertion order. `update` and `delete` fail with
// `AppError::NotFound` when no row has the given id.

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: Event) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list(&self) -> Result<Vec<Event>>;
    async fn update(&self, id: Uuid, event: Event) -> Result<Event>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TeamMemberRepository: Send + Sync {
    async fn create(&self, member: TeamMember) -> Result<TeamMember>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMember>>;
    async fn list(&self) -> Result<Vec<TeamMember>>;
    async fn update(&self, id: Uuid, member: TeamMember) -> Result<TeamMember>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Contact messages are never updated.
#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn create(&self, message: ContactMessage) -> Result<ContactMessage>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>>;
    async fn list(&self) -> Result<Vec<ContactMessage>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Registrations are never updated.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: Registration) -> Result<Registration>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>>;
    async fn list(&self) -> Result<Vec<Registration>>;
    async fn count_for_event(&self, event_title: &str) -> Result<i64>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| crate::error::AppError::Database(e.to_string()))
}
