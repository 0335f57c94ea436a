//! # Notification Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::notifications;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Notification representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationResponse {
    pub id:                Uuid,
    pub user_id:           Uuid,
    pub title:             String,
    pub message:           String,
    #[serde(rename = "type")]
    pub kind:              String,
    pub service_record_id: Option<Uuid>,
    pub is_read:           bool,
    pub metadata:          serde_json::Value,
    pub created_at:        DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(notification: notifications::Model) -> Self {
        Self {
            id:                notification.id,
            user_id:           notification.user_id,
            title:             notification.title,
            message:           notification.message,
            kind:              notification.r#type.to_string(),
            service_record_id: notification.service_record_id,
            is_read:           notification.is_read,
            metadata:          notification.metadata,
            created_at:        notification.created_at,
        }
    }
}

/// Query parameters for the caller's notification list
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Filter by read state
    pub is_read:  Option<bool>,
    /// Filter by type wire value (INFO, WARNING, URGENT)
    #[serde(rename = "type")]
    pub kind:     Option<String>,
}

impl NotificationListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the notification list; always carries the unread count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count:  u64,
    pub pagination:    PaginationInfo,
}

/// Unread-count response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// Rows-affected response for bulk operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}

/// Custom notification send (admin/service-head); targets either a
/// role list or explicit user ids, exactly one of the two
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct SendNotificationRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title:             String,
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message:           String,
    /// Type wire value; default INFO
    #[serde(rename = "type")]
    pub kind:              Option<String>,
    pub service_record_id: Option<Uuid>,
    /// Target role wire values
    pub roles:             Option<Vec<String>>,
    /// Target user ids
    pub user_ids:          Option<Vec<Uuid>>,
}

/// Query for the admin purge endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeQuery {
    /// Delete notifications older than this many days (default: 90)
    pub older_than_days: Option<i64>,
    /// Also delete unread rows (default: false, read-only purge)
    pub include_unread:  Option<bool>,
}

impl PurgeQuery {
    pub fn older_than_days(&self) -> i64 { self.older_than_days.unwrap_or(90).max(1) }

    pub fn include_unread(&self) -> bool { self.include_unread.unwrap_or(false) }
}

/// Count of notifications of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind:  String,
    pub count: u64,
}

/// Admin notification statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationStatisticsResponse {
    pub total:   u64,
    pub unread:  u64,
    pub by_type: Vec<TypeCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_query_defaults() {
        let query = PurgeQuery {
            older_than_days: None,
            include_unread:  None,
        };
        assert_eq!(query.older_than_days(), 90);
        assert!(!query.include_unread());
    }
}
