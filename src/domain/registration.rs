use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::trim_in_place;

/// A visitor's interest in an event. `event_title` is copied from the event
/// at submission time and is not kept in sync with later renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub phone: String,
    pub event_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "roll_number is required"))]
    pub roll_number: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "phone is required"),
        custom(function = "validate_phone")
    )]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "event_title is required"))]
    pub event_title: String,
}

impl CreateRegistrationRequest {
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.roll_number);
        trim_in_place(&mut self.department);
        trim_in_place(&mut self.phone);
        trim_in_place(&mut self.event_title);
    }

    pub fn into_registration(self) -> Registration {
        let now = Utc::now();
        Registration {
            id: Uuid::new_v4(),
            name: self.name,
            roll_number: self.roll_number,
            department: self.department,
            phone: self.phone,
            event_title: self.event_title,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional leading `+`, then digits, whitespace, hyphens and parentheses.
/// Empty input is left to the `length` rule.
pub fn is_plausible_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    !digits.is_empty()
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')'))
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || is_plausible_phone(phone) {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.message = Some(Cow::from("phone must contain only digits, spaces, hyphens and parentheses"));
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phone: &str) -> CreateRegistrationRequest {
        let mut request = CreateRegistrationRequest {
            name: "Zara".to_string(),
            roll_number: "0021-BSCS-22".to_string(),
            department: "Computer Science".to_string(),
            phone: phone.to_string(),
            event_title: "Winter Hackathon".to_string(),
        };
        request.normalize();
        request
    }

    #[test]
    fn accepts_international_phone() {
        assert!(request("+92 300 1234567").validate().is_ok());
        assert!(request("(042) 111-222").validate().is_ok());
    }

    #[test]
    fn rejects_words_as_phone() {
        let errors = request("not a phone").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn plus_only_allowed_at_start() {
        assert!(!is_plausible_phone("92+300"));
        assert!(!is_plausible_phone("+"));
        assert!(is_plausible_phone("+1 (555) 010-9999"));
    }

    #[test]
    fn missing_phone_reports_single_error() {
        let errors = request("   ").validate().unwrap_err();
        assert_eq!(errors.field_errors()["phone"].len(), 1);
    }

    #[test]
    fn serializes_snake_case() {
        let registration = request("0300 1234567").into_registration();
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["roll_number"], "0021-BSCS-22");
        assert_eq!(json["event_title"], "Winter Hackathon");
        assert!(json.get("created_at").is_some());
    }
}
