use chrono::NaiveDate;

use super::{ApiClient, ClientResult};
use crate::domain::{partition_events, Announcement, AnnouncementIcon, EventPartition, TeamRoster};

/// What a public page section shows while its data is in flight and after.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loading,
    Empty,
    Populated(T),
    Failed(String),
}

impl<T> SectionState<T> {
    /// Resolves a finished fetch. Errors become `Failed` and are not retried.
    pub fn resolve(result: ClientResult<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(value) if is_empty(&value) => SectionState::Empty,
            Ok(value) => SectionState::Populated(value),
            Err(err) => SectionState::Failed(err.user_message()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            SectionState::Populated(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        SectionState::Loading
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementCard {
    pub announcement: Announcement,
    pub icon: AnnouncementIcon,
}

impl From<Announcement> for AnnouncementCard {
    fn from(announcement: Announcement) -> Self {
        let icon = announcement.icon();
        Self { announcement, icon }
    }
}

pub async fn load_events(client: &ApiClient, today: NaiveDate) -> SectionState<EventPartition> {
    let result = client
        .list_events()
        .await
        .map(|events| partition_events(events, today));

    SectionState::resolve(result, |p| p.upcoming.is_empty() && p.past.is_empty())
}

pub async fn load_team(client: &ApiClient) -> SectionState<TeamRoster> {
    let result = client.list_team_members().await.map(TeamRoster::arrange);

    SectionState::resolve(result, |roster| {
        roster.president.is_none() && roster.members.is_empty()
    })
}

pub async fn load_announcements(client: &ApiClient) -> SectionState<Vec<AnnouncementCard>> {
    let result = client
        .list_announcements()
        .await
        .map(|items| items.into_iter().map(AnnouncementCard::from).collect());

    SectionState::resolve(result, Vec::is_empty)
}
