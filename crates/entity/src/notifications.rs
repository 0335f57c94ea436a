//! Notifications Entity
//!
//! In-app notification rows, one per recipient. The optional service-record
//! link is informational only; it does not imply ownership.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                Uuid,
    pub user_id:           Uuid,
    pub title:             String,
    #[sea_orm(column_type = "Text")]
    pub message:           String,
    #[sea_orm(column_name = "kind")]
    pub r#type:            NotificationType,
    pub service_record_id: Option<Uuid>,
    pub is_read:           bool,
    /// Dispatch metadata (sent_at, target roles); opaque structured data.
    pub metadata:          Json,
    pub created_at:        DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::service_records::Entity",
        from = "Column::ServiceRecordId",
        to = "super::service_records::Column::Id"
    )]
    ServiceRecord,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRecord.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Notification severity.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum NotificationType {
    #[sea_orm(string_value = "INFO")]
    Info,
    #[sea_orm(string_value = "WARNING")]
    Warning,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

impl NotificationType {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(NotificationType::Info),
            "WARNING" => Some(NotificationType::Warning),
            "URGENT" => Some(NotificationType::Urgent),
            _ => None,
        }
    }

    pub const VALID_VALUES: &'static [&'static str] = &["INFO", "WARNING", "URGENT"];
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Info => write!(f, "INFO"),
            NotificationType::Warning => write!(f, "WARNING"),
            NotificationType::Urgent => write!(f, "URGENT"),
        }
    }
}
