//! # Customer Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::customers;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{service_records::ServiceRecordResponse, PaginationInfo};

/// Customer representation returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerResponse {
    pub id:         Uuid,
    /// Human-readable customer code (`CUST-xxxxxxxx`)
    pub uid:        String,
    pub name:       String,
    pub phone:      String,
    pub email:      Option<String>,
    pub address:    Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<customers::Model> for CustomerResponse {
    fn from(customer: customers::Model) -> Self {
        Self {
            id:         customer.id,
            uid:        customer.uid,
            name:       customer.name,
            phone:      customer.phone,
            email:      customer.email,
            address:    customer.address,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Customer detail with its installed machines' service records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDetailResponse {
    pub customer:        CustomerResponse,
    /// Service records at this site, with derived warranty fields
    pub service_records: Vec<ServiceRecordResponse>,
}

/// Request to create a customer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:    String,
    #[validate(length(min = 1, max = 32, message = "Phone must be between 1 and 32 characters"))]
    pub phone:   String,
    #[validate(email(message = "Invalid email format"))]
    pub email:   Option<String>,
    #[validate(length(max = 1024, message = "Address must not exceed 1024 characters"))]
    pub address: Option<String>,
}

/// Request to update a customer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:    Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone must be between 1 and 32 characters"))]
    pub phone:   Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email:   Option<String>,
    #[validate(length(max = 1024, message = "Address must not exceed 1024 characters"))]
    pub address: Option<String>,
}

/// Query parameters for the customer list
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term for name/uid/phone/email
    pub search:   Option<String>,
}

impl CustomerListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the customer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerListResponse {
    pub customers:  Vec<CustomerResponse>,
    pub pagination: PaginationInfo,
}

/// Query for the quick search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct QuickSearchQuery {
    /// Search fragment; matches name, uid, phone, email, and machine serials
    pub q: String,
}

/// Quick search result, capped at 10 customers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickSearchResponse {
    pub customers: Vec<CustomerResponse>,
}

/// Counts reported after a customer cascade delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeDeleteResponse {
    pub deleted_points:          u64,
    pub deleted_reports:         u64,
    pub deleted_notifications:   u64,
    pub deleted_service_records: u64,
}
