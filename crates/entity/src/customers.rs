//! Customers Entity
//!
//! A customer site that machines are installed at. Deleting a customer
//! cascades through its service records (points and reports first).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    /// Human-readable code, unique, system-generated (`CUST-xxxxxxxx`).
    #[sea_orm(unique)]
    pub uid:        String,
    pub name:       String,
    pub phone:      String,
    pub email:      Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address:    Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_records::Entity")]
    ServiceRecords,
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRecords.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Derive the human-readable customer code from the row id.
#[must_use]
pub fn make_uid(id: Uuid) -> String { format!("CUST-{}", &id.simple().to_string()[.. 8]) }
