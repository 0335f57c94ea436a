//! Users Entity
//!
//! Represents staff accounts with a fixed role vocabulary. Users are never
//! hard-deleted; deactivation flips `is_active`, which gates authentication.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    /// Human-readable code, unique, system-generated (`USR-xxxxxxxx`).
    #[sea_orm(unique)]
    pub uid:           String,
    pub name:          String,
    #[sea_orm(unique)]
    pub email:         String,
    pub phone:         String,
    pub role:          Role,
    pub is_active:     bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub password_hash: Option<String>,
    /// Opaque device-registration identifier for push delivery.
    pub push_token:    Option<String>,
    pub created_at:    DateTimeUtc,
    pub updated_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_records::Entity")]
    CreatedServiceRecords,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef { Relation::CreatedServiceRecords.def() }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef { Relation::Notifications.def() }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reports.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Derive the human-readable user code from the row id.
#[must_use]
pub fn make_uid(id: Uuid) -> String { format!("USR-{}", &id.simple().to_string()[.. 8]) }

/// Staff role enumeration. Fixed set; role gates every mutating endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "SERVICE_HEAD")]
    ServiceHead,
    #[sea_orm(string_value = "ENGINEER")]
    Engineer,
    #[sea_orm(string_value = "SALES")]
    Sales,
    #[sea_orm(string_value = "COMMERCIAL")]
    Commercial,
}

impl Role {
    /// Parse the wire form (`ADMIN`, `SERVICE_HEAD`, ...).
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "SERVICE_HEAD" => Some(Role::ServiceHead),
            "ENGINEER" => Some(Role::Engineer),
            "SALES" => Some(Role::Sales),
            "COMMERCIAL" => Some(Role::Commercial),
            _ => None,
        }
    }

    /// All valid wire values, for error messages.
    pub const VALID_VALUES: &'static [&'static str] =
        &["ADMIN", "SERVICE_HEAD", "ENGINEER", "SALES", "COMMERCIAL"];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::ServiceHead => write!(f, "SERVICE_HEAD"),
            Role::Engineer => write!(f, "ENGINEER"),
            Role::Sales => write!(f, "SALES"),
            Role::Commercial => write!(f, "COMMERCIAL"),
        }
    }
}
