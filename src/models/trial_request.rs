//! Trial-signup requests submitted from the landing page modal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::validation::{FieldError, Validator, non_blank};

#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrialRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub twitter_handle: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /api/trial-requests`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTrialRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub twitter_handle: Option<String>,
    pub message: Option<String>,
}

impl NewTrialRequest {
    pub fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: non_blank(self.company),
            twitter_handle: non_blank(self.twitter_handle),
            message: non_blank(self.message),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("name", &self.name)
            .email("email", &self.email)
            .finish()
    }

    pub fn into_request(self, now: DateTime<Utc>) -> TrialRequest {
        TrialRequest {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            company: self.company,
            twitter_handle: self.twitter_handle,
            message: self.message,
            created_at: now,
        }
    }
}
