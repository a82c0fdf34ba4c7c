use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::trim_in_place;

/// A message left through the public contact form. Never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContactMessageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl CreateContactMessageRequest {
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.email);
        trim_in_place(&mut self.message);
    }

    pub fn into_message(self) -> ContactMessage {
        let now = Utc::now();
        ContactMessage {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            message: self.message,
            created_at: now,
            updated_at: now,
        }
    }
}
