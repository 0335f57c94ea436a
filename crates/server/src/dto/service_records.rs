//! # Service Record Data Transfer Objects
//!
//! Responses carry the derived warranty fields (`warranty_status`,
//! `warranty_days_remaining`, `has_pending_amount`), computed at read time.

use chrono::{DateTime, Utc};
use entity::service_records;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{notifications::NotificationResponse, points::PointResponse, reports::ReportResponse, PaginationInfo};
use crate::warranty;

/// Service record representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecordResponse {
    pub id:                      Uuid,
    pub customer_id:             Uuid,
    pub machine_id:              Uuid,
    pub created_by_id:           Uuid,
    pub purchase_date:           DateTime<Utc>,
    pub warranty_expires_at:     DateTime<Utc>,
    pub pending_amount:          f64,
    pub status:                  String,
    pub kpis:                    serde_json::Value,
    /// ACTIVE while the warranty has not expired
    pub warranty_status:         String,
    /// Whole days until expiry, rounded up, never negative
    pub warranty_days_remaining: i64,
    pub has_pending_amount:      bool,
    pub created_at:              DateTime<Utc>,
    pub updated_at:              DateTime<Utc>,
}

impl From<service_records::Model> for ServiceRecordResponse {
    fn from(record: service_records::Model) -> Self {
        let now = Utc::now();
        Self {
            id:                      record.id,
            customer_id:             record.customer_id,
            machine_id:              record.machine_id,
            created_by_id:           record.created_by_id,
            purchase_date:           record.purchase_date,
            warranty_expires_at:     record.warranty_expires_at,
            pending_amount:          record.pending_amount,
            status:                  record.status.to_string(),
            kpis:                    record.kpis,
            warranty_status:         warranty::warranty_status(record.warranty_expires_at, now).to_string(),
            warranty_days_remaining: warranty::days_remaining(record.warranty_expires_at, now),
            has_pending_amount:      record.pending_amount > 0.0,
            created_at:              record.created_at,
            updated_at:              record.updated_at,
        }
    }
}

/// Request to create a service record
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CreateServiceRecordRequest {
    pub customer_id:    Uuid,
    pub machine_id:     Uuid,
    /// Installation/purchase date; warranty expiry is derived from it
    pub purchase_date:  DateTime<Utc>,
    /// Outstanding payment; omitted means 0
    #[validate(range(min = 0.0, message = "Pending amount must not be negative"))]
    pub pending_amount: Option<f64>,
    /// Free-form KPI map, stored as-is
    pub kpis:           Option<serde_json::Value>,
}

/// Request to update a service record (partial)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct UpdateServiceRecordRequest {
    #[validate(range(min = 0.0, message = "Pending amount must not be negative"))]
    pub pending_amount: Option<f64>,
    pub kpis:           Option<serde_json::Value>,
    /// Status wire value (ACTIVE, COMPLETED, CANCELLED)
    pub status:         Option<String>,
}

/// Query parameters for the service record list
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRecordListQuery {
    /// Page number (1-based, default: 1)
    pub page:        Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:    Option<u64>,
    pub customer_id: Option<Uuid>,
    pub machine_id:  Option<Uuid>,
    /// Filter by status wire value
    pub status:      Option<String>,
}

impl ServiceRecordListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the service record list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecordListResponse {
    pub service_records: Vec<ServiceRecordResponse>,
    pub pagination:      PaginationInfo,
}

/// Detailed service record with its dependents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecordDetailResponse {
    pub record:               ServiceRecordResponse,
    pub reports:              Vec<ReportResponse>,
    pub points:               Vec<PointResponse>,
    /// Most recent notifications referencing this record (newest first)
    pub recent_notifications: Vec<NotificationResponse>,
    pub open_points:          u64,
}

/// Query for the warranty-expiring listing
#[derive(Debug, Clone, Deserialize)]
pub struct WarrantyExpiringQuery {
    /// Look-ahead window in days (default: 30)
    pub days: Option<i64>,
}

impl WarrantyExpiringQuery {
    pub fn days(&self) -> i64 { self.days.unwrap_or(30).max(0) }
}

/// Pending-amounts summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingSummaryResponse {
    /// Sum of pending amounts over all matching records
    pub total_pending: f64,
    pub count:         u64,
    pub records:       Vec<ServiceRecordResponse>,
}

/// Service statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatisticsResponse {
    pub total:                u64,
    pub active:               u64,
    pub completed:            u64,
    pub cancelled:            u64,
    /// Records whose warranty expires within the next 30 days
    pub expiring_soon:        u64,
    pub total_pending_amount: f64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use entity::service_records::ServiceStatus;

    use super::*;

    #[test]
    fn test_derived_fields_on_response() {
        let now = Utc::now();
        let record = service_records::Model {
            id:                  Uuid::new_v4(),
            customer_id:         Uuid::new_v4(),
            machine_id:          Uuid::new_v4(),
            created_by_id:       Uuid::new_v4(),
            purchase_date:       Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            warranty_expires_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            pending_amount:      150.0,
            status:              ServiceStatus::Active,
            kpis:                serde_json::json!({}),
            created_at:          now,
            updated_at:          now,
        };
        let response = ServiceRecordResponse::from(record);
        assert_eq!(response.warranty_status, "EXPIRED");
        assert_eq!(response.warranty_days_remaining, 0);
        assert!(response.has_pending_amount);
    }
}
