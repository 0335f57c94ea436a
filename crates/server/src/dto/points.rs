//! # Point Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::points;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Point representation returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointResponse {
    pub id:                Uuid,
    pub service_record_id: Uuid,
    pub title:             String,
    pub description:       Option<String>,
    pub status:            String,
    pub priority:          String,
    pub assigned_to_id:    Option<Uuid>,
    pub created_by_id:     Uuid,
    pub due_date:          Option<DateTime<Utc>>,
    pub completed_at:      Option<DateTime<Utc>>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}

impl From<points::Model> for PointResponse {
    fn from(point: points::Model) -> Self {
        Self {
            id:                point.id,
            service_record_id: point.service_record_id,
            title:             point.title,
            description:       point.description,
            status:            point.status.to_string(),
            priority:          point.priority.to_string(),
            assigned_to_id:    point.assigned_to_id,
            created_by_id:     point.created_by_id,
            due_date:          point.due_date,
            completed_at:      point.completed_at,
            created_at:        point.created_at,
            updated_at:        point.updated_at,
        }
    }
}

/// Request to create a point
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CreatePointRequest {
    pub service_record_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title:             String,
    #[validate(length(max = 4096, message = "Description must not exceed 4096 characters"))]
    pub description:       Option<String>,
    /// Priority wire value (HIGH, MEDIUM, LOW); default MEDIUM
    pub priority:          Option<String>,
    pub assigned_to_id:    Option<Uuid>,
    pub due_date:          Option<DateTime<Utc>>,
}

/// Request to update a point (partial)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct UpdatePointRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title:          Option<String>,
    #[validate(length(max = 4096, message = "Description must not exceed 4096 characters"))]
    pub description:    Option<String>,
    /// Status wire value; COMPLETED stamps `completed_at`
    pub status:         Option<String>,
    /// Priority wire value
    pub priority:       Option<String>,
    /// New assignee; triggers an ASSIGNED or REASSIGNED notification
    pub assigned_to_id: Option<Uuid>,
    pub due_date:       Option<DateTime<Utc>>,
}

/// Query parameters for the point list
#[derive(Debug, Clone, Deserialize)]
pub struct PointListQuery {
    /// Page number (1-based, default: 1)
    pub page:              Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:          Option<u64>,
    pub service_record_id: Option<Uuid>,
    pub assigned_to:       Option<Uuid>,
    pub created_by:        Option<Uuid>,
    /// Filter by status wire value
    pub status:            Option<String>,
    /// Filter by priority wire value
    pub priority:          Option<String>,
}

impl PointListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the point list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointListResponse {
    pub points:     Vec<PointResponse>,
    pub pagination: PaginationInfo,
}

/// Query for the caller's assigned points
#[derive(Debug, Clone, Deserialize)]
pub struct MyPointsQuery {
    /// `open` (not COMPLETED/CLOSED), `completed`, or absent for all
    pub filter:   Option<String>,
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}

impl MyPointsQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Count of points in one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count:  u64,
}

/// Points for one service record, with per-status counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsByRecordResponse {
    pub points:        Vec<PointResponse>,
    pub status_counts: Vec<StatusCount>,
}

/// Point statistics for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointStatisticsResponse {
    pub total:              u64,
    /// Points currently assigned to the caller
    pub my_assigned:        u64,
    /// Open HIGH-priority points
    pub open_high_priority: u64,
    /// Open points past their due date
    pub overdue:            u64,
    pub by_status:          Vec<StatusCount>,
}

/// Query for the manual escalation check
#[derive(Debug, Clone, Deserialize)]
pub struct EscalationQuery {
    /// Age threshold in hours (default: 72)
    pub age_threshold_hours: Option<i64>,
}

impl EscalationQuery {
    pub fn age_threshold_hours(&self) -> i64 { self.age_threshold_hours.unwrap_or(72).max(1) }
}

/// Result of an escalation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscalationResponse {
    /// True when stale open points were found (and service heads notified)
    pub escalation_required: bool,
    pub points:              Vec<PointResponse>,
    /// Number of notification rows persisted
    pub notified:            u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_query_default() {
        let query = EscalationQuery {
            age_threshold_hours: None,
        };
        assert_eq!(query.age_threshold_hours(), 72);

        let query = EscalationQuery {
            age_threshold_hours: Some(0),
        };
        assert_eq!(query.age_threshold_hours(), 1);
    }
}
