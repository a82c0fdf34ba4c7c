use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::partition_events,
    error::Result,
    repository::{
        AnnouncementRepository, ContactMessageRepository, EventRepository,
        RegistrationRepository, TeamMemberRepository,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub upcoming_events: usize,
    pub past_events: usize,
    pub team_members: usize,
    pub announcements: usize,
    pub contact_messages: usize,
    pub registrations: usize,
    /// Registration counts for upcoming events, in event order.
    pub registrations_by_event: Vec<EventRegistrationCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationCount {
    pub event_title: String,
    pub count: i64,
}

/// Record counts shown at the top of the admin dashboard.
pub struct StatsService {
    event_repo: Arc<dyn EventRepository>,
    team_member_repo: Arc<dyn TeamMemberRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    contact_repo: Arc<dyn ContactMessageRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
}

impl StatsService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        team_member_repo: Arc<dyn TeamMemberRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        contact_repo: Arc<dyn ContactMessageRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            event_repo,
            team_member_repo,
            announcement_repo,
            contact_repo,
            registration_repo,
        }
    }

    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardStats> {
        let partition = partition_events(self.event_repo.list().await?, today);

        let mut registrations_by_event = Vec::with_capacity(partition.upcoming.len());
        for event in &partition.upcoming {
            registrations_by_event.push(EventRegistrationCount {
                event_title: event.title.clone(),
                count: self.registration_repo.count_for_event(&event.title).await?,
            });
        }

        Ok(DashboardStats {
            upcoming_events: partition.upcoming.len(),
            past_events: partition.past.len(),
            team_members: self.team_member_repo.list().await?.len(),
            announcements: self.announcement_repo.list().await?.len(),
            contact_messages: self.contact_repo.list().await?.len(),
            registrations: self.registration_repo.list().await?.len(),
            registrations_by_event,
        })
    }
}
