//! Service Records Entity
//!
//! The record of a machine's installation and ongoing servicing at a
//! customer site. `warranty_expires_at` is derived at creation time from the
//! purchase date plus the machine's warranty in calendar months.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                 Uuid,
    pub customer_id:        Uuid,
    pub machine_id:         Uuid,
    pub created_by_id:      Uuid,
    pub purchase_date:      DateTimeUtc,
    pub warranty_expires_at: DateTimeUtc,
    /// Outstanding payment, never negative.
    pub pending_amount:     f64,
    pub status:             ServiceStatus,
    /// Free-form KPI map; intentionally unvalidated passthrough data.
    pub kpis:               Json,
    pub created_at:         DateTimeUtc,
    pub updated_at:         DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::machines::Entity",
        from = "Column::MachineId",
        to = "super::machines::Column::Id"
    )]
    Machine,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
    #[sea_orm(has_many = "super::points::Entity")]
    Points,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<super::machines::Entity> for Entity {
    fn to() -> RelationDef { Relation::Machine.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::CreatedBy.def() }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reports.def() }
}

impl Related<super::points::Entity> for Entity {
    fn to() -> RelationDef { Relation::Points.def() }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef { Relation::Notifications.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Service record lifecycle status.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ServiceStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl ServiceStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ServiceStatus::Active),
            "COMPLETED" => Some(ServiceStatus::Completed),
            "CANCELLED" => Some(ServiceStatus::Cancelled),
            _ => None,
        }
    }

    pub const VALID_VALUES: &'static [&'static str] = &["ACTIVE", "COMPLETED", "CANCELLED"];
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Active => write!(f, "ACTIVE"),
            ServiceStatus::Completed => write!(f, "COMPLETED"),
            ServiceStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
