use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{trim_in_place, trim_optional, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub location: String,
    pub image: Option<String>,
    pub registration_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an event is still ahead of us. Derived on read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTiming {
    Upcoming,
    Past,
}

impl Event {
    /// Events dated today count as upcoming.
    pub fn timing(&self, today: NaiveDate) -> EventTiming {
        if self.date >= today {
            EventTiming::Upcoming
        } else {
            EventTiming::Past
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPartition {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

/// Splits events into upcoming and past relative to `today`, keeping the
/// incoming order inside each group.
pub fn partition_events(events: Vec<Event>, today: NaiveDate) -> EventPartition {
    let (upcoming, past) = events
        .into_iter()
        .partition(|event| event.timing(today) == EventTiming::Upcoming);

    EventPartition { upcoming, past }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub registration_link: Option<String>,
}

impl CreateEventRequest {
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.description);
        trim_in_place(&mut self.location);
        trim_optional(&mut self.image);
        trim_optional(&mut self.registration_link);
    }

    pub fn into_event(self) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            image: self.image,
            registration_link: self.registration_link,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Event> for CreateEventRequest {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            image: event.image.clone(),
            registration_link: event.registration_link.clone(),
        }
    }
}

/// Partial update: omitted fields keep their value, `null` clears an
/// optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    #[schema(value_type = Option<String>)]
    pub image: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    #[schema(value_type = Option<String>)]
    pub registration_link: Patch<String>,
}

impl UpdateEventRequest {
    /// Applies the changes onto `event`. The result still has to pass
    /// validation before it is stored.
    pub fn apply(self, mut event: Event) -> Event {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        self.image.apply_to(&mut event.image);
        self.registration_link.apply_to(&mut event.registration_link);

        trim_in_place(&mut event.title);
        trim_in_place(&mut event.description);
        trim_in_place(&mut event.location);
        trim_optional(&mut event.image);
        trim_optional(&mut event.registration_link);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_on(date: &str) -> Event {
        CreateEventRequest {
            title: format!("Event on {}", date),
            description: "desc".to_string(),
            date: date.parse().unwrap(),
            location: "Main Hall".to_string(),
            image: None,
            registration_link: None,
        }
        .into_event()
    }

    #[test]
    fn classifies_past_and_upcoming_relative_to_today() {
        let today: NaiveDate = "2025-01-01".parse().unwrap();
        let events = vec![event_on("2020-01-01"), event_on("2099-01-01")];

        let partition = partition_events(events, today);

        assert_eq!(partition.past.len(), 1);
        assert_eq!(partition.past[0].date.to_string(), "2020-01-01");
        assert_eq!(partition.upcoming.len(), 1);
        assert_eq!(partition.upcoming[0].date.to_string(), "2099-01-01");
    }

    #[test]
    fn event_today_is_upcoming() {
        let today: NaiveDate = "2025-03-10".parse().unwrap();
        assert_eq!(event_on("2025-03-10").timing(today), EventTiming::Upcoming);
        assert_eq!(event_on("2025-03-09").timing(today), EventTiming::Past);
    }

    #[test]
    fn partition_keeps_stored_order() {
        let today: NaiveDate = "2025-01-01".parse().unwrap();
        let events = vec![
            event_on("2099-05-01"),
            event_on("2019-01-01"),
            event_on("2098-01-01"),
        ];

        let partition = partition_events(events, today);
        let upcoming: Vec<String> = partition.upcoming.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(upcoming, vec!["2099-05-01", "2098-01-01"]);
    }

    #[test]
    fn create_request_rejects_blank_title() {
        let mut request = CreateEventRequest {
            title: "   ".to_string(),
            description: "desc".to_string(),
            date: "2025-01-01".parse().unwrap(),
            location: "Hall".to_string(),
            image: Some("  ".to_string()),
            registration_link: None,
        };
        request.normalize();

        assert_eq!(request.image, None);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn update_clears_optional_fields_on_null() {
        let mut event = event_on("2025-01-01");
        event.image = Some("poster.png".to_string());

        let update: UpdateEventRequest =
            serde_json::from_str(r#"{"image": null, "title": " Renamed "}"#).unwrap();
        let event = update.apply(event);

        assert_eq!(event.image, None);
        assert_eq!(event.title, "Renamed");
        assert_eq!(event.location, "Main Hall");
    }

    #[test]
    fn update_without_optional_fields_keeps_them() {
        let mut event = event_on("2025-01-01");
        event.registration_link = Some("https://forms.example/rsvp".to_string());

        let update: UpdateEventRequest = serde_json::from_str(r#"{"location": "Lab 2"}"#).unwrap();
        let event = update.apply(event);

        assert_eq!(event.registration_link.as_deref(), Some("https://forms.example/rsvp"));
        assert_eq!(event.location, "Lab 2");
    }
}
