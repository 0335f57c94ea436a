//! Spares Quotations Entity
//!
//! Standalone quotations for spare parts. Customer and machine details are
//! denormalized on purpose; the entity holds no foreign keys.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spares_quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:               Uuid,
    pub customer_name:    String,
    pub machine_info:     String,
    /// Spare-part line items; opaque structured data.
    pub part_details:     Json,
    pub quotation_amount: Option<f64>,
    pub status:           QuotationStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes:            Option<String>,
    pub created_at:       DateTimeUtc,
    pub updated_at:       DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Quotation approval status.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum QuotationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl QuotationStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(QuotationStatus::Pending),
            "APPROVED" => Some(QuotationStatus::Approved),
            "REJECTED" => Some(QuotationStatus::Rejected),
            "COMPLETED" => Some(QuotationStatus::Completed),
            _ => None,
        }
    }

    pub const VALID_VALUES: &'static [&'static str] =
        &["PENDING", "APPROVED", "REJECTED", "COMPLETED"];
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotationStatus::Pending => write!(f, "PENDING"),
            QuotationStatus::Approved => write!(f, "APPROVED"),
            QuotationStatus::Rejected => write!(f, "REJECTED"),
            QuotationStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}
