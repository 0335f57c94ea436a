//! # Authorization Service
//!
//! Role-based authorization and credential handling:
//! - Consolidated role policy table (`Action` -> allowed roles)
//! - Password hashing and verification (bcrypt)

pub mod password;
pub mod policy;

// Re-export commonly used types
pub use entity::users::Role;
pub use password::{hash_password, validate_password_strength, verify_password};
pub use policy::{
    Action,
    CustomerAction,
    MachineAction,
    NotificationAction,
    PointAction,
    QuotationAction,
    RecordAction,
    ReportAction,
    UserAction,
};
