//! Points Entity
//!
//! A trackable follow-up action item tied to a service record, with priority
//! and assignment. Status transitions are advisory (any valid value may be
//! set); `completed_at` is stamped when the status becomes COMPLETED.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                Uuid,
    pub service_record_id: Uuid,
    pub title:             String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description:       Option<String>,
    pub status:            PointStatus,
    pub priority:          PointPriority,
    pub assigned_to_id:    Option<Uuid>,
    pub created_by_id:     Uuid,
    pub due_date:          Option<DateTimeUtc>,
    pub completed_at:      Option<DateTimeUtc>,
    pub created_at:        DateTimeUtc,
    pub updated_at:        DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_records::Entity",
        from = "Column::ServiceRecordId",
        to = "super::service_records::Column::Id"
    )]
    ServiceRecord,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedToId",
        to = "super::users::Column::Id"
    )]
    AssignedTo,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id"
    )]
    CreatedBy,
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRecord.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Point workflow status. The nominal progression is
/// CREATED → ASSIGNED → REASSIGNED → IN_PROGRESS → COMPLETED → CLOSED,
/// but any value is settable by an authorized actor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PointStatus {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "REASSIGNED")]
    Reassigned,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl PointStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(PointStatus::Created),
            "ASSIGNED" => Some(PointStatus::Assigned),
            "REASSIGNED" => Some(PointStatus::Reassigned),
            "IN_PROGRESS" => Some(PointStatus::InProgress),
            "COMPLETED" => Some(PointStatus::Completed),
            "CLOSED" => Some(PointStatus::Closed),
            _ => None,
        }
    }

    /// Statuses that count as "open" for escalation and reminders.
    #[must_use]
    pub fn open_statuses() -> Vec<Self> {
        vec![
            PointStatus::Created,
            PointStatus::Assigned,
            PointStatus::Reassigned,
            PointStatus::InProgress,
        ]
    }

    /// Terminal statuses (neither escalated nor reminded).
    #[must_use]
    pub fn closed_statuses() -> Vec<Self> { vec![PointStatus::Completed, PointStatus::Closed] }

    pub const VALID_VALUES: &'static [&'static str] = &[
        "CREATED",
        "ASSIGNED",
        "REASSIGNED",
        "IN_PROGRESS",
        "COMPLETED",
        "CLOSED",
    ];
}

impl std::fmt::Display for PointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointStatus::Created => write!(f, "CREATED"),
            PointStatus::Assigned => write!(f, "ASSIGNED"),
            PointStatus::Reassigned => write!(f, "REASSIGNED"),
            PointStatus::InProgress => write!(f, "IN_PROGRESS"),
            PointStatus::Completed => write!(f, "COMPLETED"),
            PointStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Point priority.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PointPriority {
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
}

impl PointPriority {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "HIGH" => Some(PointPriority::High),
            "MEDIUM" => Some(PointPriority::Medium),
            "LOW" => Some(PointPriority::Low),
            _ => None,
        }
    }

    pub const VALID_VALUES: &'static [&'static str] = &["HIGH", "MEDIUM", "LOW"];
}

impl std::fmt::Display for PointPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointPriority::High => write!(f, "HIGH"),
            PointPriority::Medium => write!(f, "MEDIUM"),
            PointPriority::Low => write!(f, "LOW"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for value in PointStatus::VALID_VALUES {
            let status = PointStatus::from_string(value).unwrap();
            assert_eq!(status.to_string(), *value);
        }
    }

    #[test]
    fn test_open_and_closed_partition() {
        let open = PointStatus::open_statuses();
        let closed = PointStatus::closed_statuses();
        assert_eq!(open.len() + closed.len(), PointStatus::VALID_VALUES.len());
        for status in &closed {
            assert!(!open.contains(status));
        }
    }

    #[test]
    fn test_priority_rejects_unknown() {
        assert!(PointPriority::from_string("CRITICAL").is_none());
        assert!(PointPriority::from_string("high").is_none());
    }
}
