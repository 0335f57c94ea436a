//! Reports Entity
//!
//! A field-service report submitted against a service record by an engineer.
//! Asset URLs point at externally stored files; upload handling lives
//! outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                Uuid,
    pub service_record_id: Uuid,
    pub engineer_id:       Uuid,
    /// Free-form report payload; intentionally unvalidated passthrough data.
    pub report_data:       Json,
    /// Free-form scan payload; intentionally unvalidated passthrough data.
    pub scan_data:         Json,
    pub manual_url:        Option<String>,
    pub e_drawings_url:    Option<String>,
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
        from = "Column::EngineerId",
        to = "super::users::Column::Id"
    )]
    Engineer,
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRecord.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Engineer.def() }
}

impl ActiveModelBehavior for ActiveModel {}
