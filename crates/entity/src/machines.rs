//! Machines Entity
//!
//! Catalogue of serviceable equipment. `serial_number` is unique per brand;
//! deletion is blocked while service records reference the machine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                      Uuid,
    pub name:                    String,
    pub category:                String,
    pub brand:                   String,
    /// Warranty duration in calendar months, 0..=120.
    pub warranty_time_in_months: i32,
    pub serial_number:           Option<String>,
    pub created_at:              DateTimeUtc,
    pub updated_at:              DateTimeUtc,
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

/// Inclusive bounds for `warranty_time_in_months`.
pub const WARRANTY_MONTHS_MIN: i32 = 0;
pub const WARRANTY_MONTHS_MAX: i32 = 120;
