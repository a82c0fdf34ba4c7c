pub mod stats_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::AuthService;
use crate::config::AuthConfig;
use crate::repository::*;
use stats_service::StatsService;

pub struct ServiceContext {
    pub event_repo: Arc<dyn EventRepository>,
    pub team_member_repo: Arc<dyn TeamMemberRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub contact_repo: Arc<dyn ContactMessageRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub auth_service: Arc<AuthService>,
    pub stats_service: Arc<StatsService>,
}

impl ServiceContext {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        team_member_repo: Arc<dyn TeamMemberRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        contact_repo: Arc<dyn ContactMessageRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let stats_service = Arc::new(StatsService::new(
            event_repo.clone(),
            team_member_repo.clone(),
            announcement_repo.clone(),
            contact_repo.clone(),
            registration_repo.clone(),
        ));

        Self {
            event_repo,
            team_member_repo,
            announcement_repo,
            contact_repo,
            registration_repo,
            auth_service,
            stats_service,
        }
    }

    /// Wires the SQLite repositories over a single pool.
    pub fn sqlite(db_pool: SqlitePool, auth: &AuthConfig) -> Self {
        Self::new(
            Arc::new(SqliteEventRepository::new(db_pool.clone())),
            Arc::new(SqliteTeamMemberRepository::new(db_pool.clone())),
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone())),
            Arc::new(SqliteContactMessageRepository::new(db_pool.clone())),
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone())),
            Arc::new(AuthService::new(db_pool, auth)),
        )
    }
}
