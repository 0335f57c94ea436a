//! # Spares Quotation Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::spares_quotations;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Quotation representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationResponse {
    pub id:               Uuid,
    pub customer_name:    String,
    pub machine_info:     String,
    pub part_details:     serde_json::Value,
    pub quotation_amount: Option<f64>,
    pub status:           String,
    pub notes:            Option<String>,
    pub created_at:       DateTime<Utc>,
    pub updated_at:       DateTime<Utc>,
}

impl From<spares_quotations::Model> for QuotationResponse {
    fn from(quotation: spares_quotations::Model) -> Self {
        Self {
            id:               quotation.id,
            customer_name:    quotation.customer_name,
            machine_info:     quotation.machine_info,
            part_details:     quotation.part_details,
            quotation_amount: quotation.quotation_amount,
            status:           quotation.status.to_string(),
            notes:            quotation.notes,
            created_at:       quotation.created_at,
            updated_at:       quotation.updated_at,
        }
    }
}

/// Request to create a quotation. `part_details` must be structured data
/// (a JSON object or array), checked in the handler.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
    pub customer_name:    String,
    #[validate(length(min = 1, max = 255, message = "Machine info must be between 1 and 255 characters"))]
    pub machine_info:     String,
    pub part_details:     serde_json::Value,
    #[validate(range(min = 0.0, message = "Quotation amount must not be negative"))]
    pub quotation_amount: Option<f64>,
    #[validate(length(max = 4096, message = "Notes must not exceed 4096 characters"))]
    pub notes:            Option<String>,
}

/// Request to update a quotation (partial)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct UpdateQuotationRequest {
    #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
    pub customer_name:    Option<String>,
    #[validate(length(min = 1, max = 255, message = "Machine info must be between 1 and 255 characters"))]
    pub machine_info:     Option<String>,
    pub part_details:     Option<serde_json::Value>,
    #[validate(range(min = 0.0, message = "Quotation amount must not be negative"))]
    pub quotation_amount: Option<f64>,
    /// Status wire value (PENDING, APPROVED, REJECTED, COMPLETED)
    pub status:           Option<String>,
    #[validate(length(max = 4096, message = "Notes must not exceed 4096 characters"))]
    pub notes:            Option<String>,
}

/// Body for the approve/reject review endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct ReviewQuotationRequest {
    /// Final amount, stamped on review
    #[validate(range(min = 0.0, message = "Quotation amount must not be negative"))]
    pub quotation_amount: Option<f64>,
    #[validate(length(max = 4096, message = "Notes must not exceed 4096 characters"))]
    pub notes:            Option<String>,
}

/// Query parameters for the quotation list
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Filter by status wire value
    pub status:   Option<String>,
    /// Search term for customer name/machine info
    pub search:   Option<String>,
}

impl QuotationListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the quotation list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationListResponse {
    pub quotations: Vec<QuotationResponse>,
    pub pagination: PaginationInfo,
}

/// Quotation statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationStatisticsResponse {
    pub total:                 u64,
    pub pending:               u64,
    pub approved:              u64,
    pub rejected:              u64,
    pub completed:             u64,
    /// Sum of amounts over approved quotations
    pub total_approved_amount: f64,
}
