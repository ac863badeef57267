//! User account record owned by the user service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole, UserStatus};

/// A user account.
///
/// The client holds a read-mostly cached copy alongside an opaque bearer
/// token; both live until logout or token expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether the account may use the back office.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{UserRole, UserStatus};

    use super::*;

    #[test]
    fn deserializes_service_dto() {
        let json = r#"{
            "id": 12,
            "username": "jdoe",
            "email": "jdoe@example.com",
            "firstName": "Jane",
            "lastName": "Doe",
            "role": "ADMIN",
            "status": "ACTIVE",
            "phoneNumber": "+15550100"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn role_and_status_default_when_absent() {
        let json = r#"{
            "id": 1,
            "username": "u",
            "email": "u@example.com",
            "firstName": "U",
            "lastName": ""
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.full_name(), "U");
    }
}
