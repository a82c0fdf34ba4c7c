use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::trim_in_place;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Free-form label such as "Notice" or "Opportunity".
    #[serde(rename = "type")]
    pub announcement_type: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn icon(&self) -> AnnouncementIcon {
        AnnouncementIcon::for_type(&self.announcement_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementIcon {
    Megaphone,
    Calendar,
    Bell,
}

impl AnnouncementIcon {
    /// Unknown labels get the bell.
    pub fn for_type(label: &str) -> Self {
        match label {
            "Opportunity" | "Result" => AnnouncementIcon::Megaphone,
            "Event" => AnnouncementIcon::Calendar,
            _ => AnnouncementIcon::Bell,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, message = "type is required"))]
    pub announcement_type: String,
    pub date: NaiveDate,
}

impl CreateAnnouncementRequest {
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.content);
        trim_in_place(&mut self.announcement_type);
    }

    pub fn into_announcement(self) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            title: self.title,
            content: self.content,
            announcement_type: self.announcement_type,
            date: self.date,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Announcement> for CreateAnnouncementRequest {
    fn from(announcement: &Announcement) -> Self {
        Self {
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            announcement_type: announcement.announcement_type.clone(),
            date: announcement.date,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub announcement_type: Option<String>,
    pub date: Option<NaiveDate>,
}

impl UpdateAnnouncementRequest {
    pub fn apply(self, mut announcement: Announcement) -> Announcement {
        if let Some(title) = self.title {
            announcement.title = title;
        }
        if let Some(content) = self.content {
            announcement.content = content;
        }
        if let Some(announcement_type) = self.announcement_type {
            announcement.announcement_type = announcement_type;
        }
        if let Some(date) = self.date {
            announcement.date = date;
        }

        trim_in_place(&mut announcement.title);
        trim_in_place(&mut announcement.content);
        trim_in_place(&mut announcement.announcement_type);
        announcement
    }
}
