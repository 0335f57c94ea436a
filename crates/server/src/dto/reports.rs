//! # Report Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::reports;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Report representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub id:                Uuid,
    pub service_record_id: Uuid,
    pub engineer_id:       Uuid,
    pub report_data:       serde_json::Value,
    pub scan_data:         serde_json::Value,
    pub manual_url:        Option<String>,
    pub e_drawings_url:    Option<String>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}

impl From<reports::Model> for ReportResponse {
    fn from(report: reports::Model) -> Self {
        Self {
            id:                report.id,
            service_record_id: report.service_record_id,
            engineer_id:       report.engineer_id,
            report_data:       report.report_data,
            scan_data:         report.scan_data,
            manual_url:        report.manual_url,
            e_drawings_url:    report.e_drawings_url,
            created_at:        report.created_at,
            updated_at:        report.updated_at,
        }
    }
}

/// Request to create a report. `report_data` and `scan_data` are stored
/// as-is; URLs reference externally stored files.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub service_record_id: Uuid,
    pub report_data:       serde_json::Value,
    pub scan_data:         Option<serde_json::Value>,
    #[validate(url(message = "Invalid manual URL"))]
    pub manual_url:        Option<String>,
    #[validate(url(message = "Invalid e-drawings URL"))]
    pub e_drawings_url:    Option<String>,
}

/// Request to update a report (partial)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct UpdateReportRequest {
    pub report_data:    Option<serde_json::Value>,
    pub scan_data:      Option<serde_json::Value>,
    #[validate(url(message = "Invalid manual URL"))]
    pub manual_url:     Option<String>,
    #[validate(url(message = "Invalid e-drawings URL"))]
    pub e_drawings_url: Option<String>,
}

/// Query parameters for the report list
#[derive(Debug, Clone, Deserialize)]
pub struct ReportListQuery {
    /// Page number (1-based, default: 1)
    pub page:              Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:          Option<u64>,
    pub service_record_id: Option<Uuid>,
    pub engineer_id:       Option<Uuid>,
}

impl ReportListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the report list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportListResponse {
    pub reports:    Vec<ReportResponse>,
    pub pagination: PaginationInfo,
}
