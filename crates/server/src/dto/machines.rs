//! # Machine Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::machines;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Machine representation returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineResponse {
    pub id:                      Uuid,
    pub name:                    String,
    pub category:                String,
    pub brand:                   String,
    pub warranty_time_in_months: i32,
    pub serial_number:           Option<String>,
    pub created_at:              DateTime<Utc>,
    pub updated_at:              DateTime<Utc>,
}

impl From<machines::Model> for MachineResponse {
    fn from(machine: machines::Model) -> Self {
        Self {
            id:                      machine.id,
            name:                    machine.name,
            category:                machine.category,
            brand:                   machine.brand,
            warranty_time_in_months: machine.warranty_time_in_months,
            serial_number:           machine.serial_number,
            created_at:              machine.created_at,
            updated_at:              machine.updated_at,
        }
    }
}

/// Request to create a machine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateMachineRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:                    String,
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category:                String,
    #[validate(length(min = 1, max = 100, message = "Brand must be between 1 and 100 characters"))]
    pub brand:                   String,
    /// Warranty duration in calendar months (0-120)
    #[validate(range(min = 0, max = 120, message = "Warranty must be between 0 and 120 months"))]
    pub warranty_time_in_months: i32,
    /// Serial number, unique per brand when present
    #[validate(length(min = 1, max = 100, message = "Serial number must be between 1 and 100 characters"))]
    pub serial_number:           Option<String>,
}

/// Request to update a machine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateMachineRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:                    Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category:                Option<String>,
    #[validate(length(min = 1, max = 100, message = "Brand must be between 1 and 100 characters"))]
    pub brand:                   Option<String>,
    #[validate(range(min = 0, max = 120, message = "Warranty must be between 0 and 120 months"))]
    pub warranty_time_in_months: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Serial number must be between 1 and 100 characters"))]
    pub serial_number:           Option<String>,
}

/// Query parameters for the machine list
#[derive(Debug, Clone, Deserialize)]
pub struct MachineListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Filter by exact category
    pub category: Option<String>,
    /// Filter by exact brand
    pub brand:    Option<String>,
    /// Search term for name/serial number
    pub search:   Option<String>,
}

impl MachineListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the machine list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineListResponse {
    pub machines:   Vec<MachineResponse>,
    pub pagination: PaginationInfo,
}

/// Machine count for one category or brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// The category or brand value
    pub value: String,
    pub count: u64,
}
