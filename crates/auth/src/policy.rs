//! # Role Policy
//!
//! Consolidated authorization table: every gated operation is an [`Action`],
//! and each action maps to the set of roles allowed to perform it. Handlers
//! call [`require`] (hard gate) or [`allows`] (combined with an ownership
//! check, e.g. "privileged role OR record creator").
//!
//! Read endpoints without an entry here are open to any authenticated user.

use entity::users::Role;
use error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// A gated operation, grouped by resource.
///
/// Follows a `resource:action` naming convention when rendered:
/// `points:create`, `machines:delete`, `notifications:send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Users(UserAction),
    Customers(CustomerAction),
    Machines(MachineAction),
    ServiceRecords(RecordAction),
    Reports(ReportAction),
    Points(PointAction),
    Notifications(NotificationAction),
    Quotations(QuotationAction),
}

/// Actions on user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserAction {
    Create,
    List,
    Delete,
}

/// Actions on customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerAction {
    Create,
    Update,
    Delete,
}

/// Actions on machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineAction {
    Create,
    Update,
    Delete,
}

/// Actions on service records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordAction {
    Create,
    Update,
    Delete,
}

/// Actions on reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportAction {
    Create,
    Update,
    Delete,
}

/// Actions on points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointAction {
    Create,
    Update,
    Delete,
    Escalate,
}

/// Actions on notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationAction {
    Send,
    Purge,
    Stats,
}

/// Actions on spares quotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuotationAction {
    Create,
    Update,
    Review,
    Delete,
    Stats,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const MANAGERS: &[Role] = &[Role::Admin, Role::ServiceHead];
const FIELD_STAFF: &[Role] = &[Role::Admin, Role::ServiceHead, Role::Engineer];
const SALES_DESK: &[Role] = &[Role::Admin, Role::ServiceHead, Role::Sales];

impl Action {
    /// Roles allowed to perform this action.
    #[must_use]
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Action::Users(UserAction::Create) => ADMIN_ONLY,
            Action::Users(UserAction::List) => MANAGERS,
            Action::Users(UserAction::Delete) => ADMIN_ONLY,

            Action::Customers(CustomerAction::Create) => SALES_DESK,
            Action::Customers(CustomerAction::Update) => SALES_DESK,
            Action::Customers(CustomerAction::Delete) => MANAGERS,

            Action::Machines(MachineAction::Create) => MANAGERS,
            Action::Machines(MachineAction::Update) => MANAGERS,
            Action::Machines(MachineAction::Delete) => MANAGERS,

            Action::ServiceRecords(RecordAction::Create) => FIELD_STAFF,
            Action::ServiceRecords(RecordAction::Update) => FIELD_STAFF,
            Action::ServiceRecords(RecordAction::Delete) => MANAGERS,

            Action::Reports(ReportAction::Create) => FIELD_STAFF,
            Action::Reports(ReportAction::Update) => MANAGERS,
            Action::Reports(ReportAction::Delete) => MANAGERS,

            Action::Points(PointAction::Create) => FIELD_STAFF,
            Action::Points(PointAction::Update) => MANAGERS,
            Action::Points(PointAction::Delete) => MANAGERS,
            Action::Points(PointAction::Escalate) => MANAGERS,

            Action::Notifications(NotificationAction::Send) => MANAGERS,
            Action::Notifications(NotificationAction::Purge) => ADMIN_ONLY,
            Action::Notifications(NotificationAction::Stats) => ADMIN_ONLY,

            Action::Quotations(QuotationAction::Create) => SALES_DESK,
            Action::Quotations(QuotationAction::Update) => SALES_DESK,
            Action::Quotations(QuotationAction::Review) => SALES_DESK,
            Action::Quotations(QuotationAction::Delete) => MANAGERS,
            Action::Quotations(QuotationAction::Stats) => MANAGERS,
        }
    }
}

/// Check whether `role` may perform `action`.
#[must_use]
pub fn allows(role: Role, action: Action) -> bool { action.allowed_roles().contains(&role) }

/// Require that `role` may perform `action`, returning `Forbidden` otherwise.
pub fn require(role: Role, action: Action) -> Result<()> {
    if allows(role, action) {
        Ok(())
    }
    else {
        tracing::debug!(role = %role, action = %action, "authorization denied");
        Err(AppError::forbidden(format!(
            "Role {} is not allowed to perform {}",
            role, action
        )))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Users(action) => write!(f, "users:{}", action),
            Action::Customers(action) => write!(f, "customers:{}", action),
            Action::Machines(action) => write!(f, "machines:{}", action),
            Action::ServiceRecords(action) => write!(f, "service_records:{}", action),
            Action::Reports(action) => write!(f, "reports:{}", action),
            Action::Points(action) => write!(f, "points:{}", action),
            Action::Notifications(action) => write!(f, "notifications:{}", action),
            Action::Quotations(action) => write!(f, "quotations:{}", action),
        }
    }
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserAction::Create => write!(f, "create"),
            UserAction::List => write!(f, "list"),
            UserAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::fmt::Display for CustomerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerAction::Create => write!(f, "create"),
            CustomerAction::Update => write!(f, "update"),
            CustomerAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::fmt::Display for MachineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineAction::Create => write!(f, "create"),
            MachineAction::Update => write!(f, "update"),
            MachineAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::fmt::Display for RecordAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordAction::Create => write!(f, "create"),
            RecordAction::Update => write!(f, "update"),
            RecordAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::fmt::Display for ReportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportAction::Create => write!(f, "create"),
            ReportAction::Update => write!(f, "update"),
            ReportAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::fmt::Display for PointAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointAction::Create => write!(f, "create"),
            PointAction::Update => write!(f, "update"),
            PointAction::Delete => write!(f, "delete"),
            PointAction::Escalate => write!(f, "escalate"),
        }
    }
}

impl std::fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationAction::Send => write!(f, "send"),
            NotificationAction::Purge => write!(f, "purge"),
            NotificationAction::Stats => write!(f, "stats"),
        }
    }
}

impl std::fmt::Display for QuotationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotationAction::Create => write!(f, "create"),
            QuotationAction::Update => write!(f, "update"),
            QuotationAction::Review => write!(f, "review"),
            QuotationAction::Delete => write!(f, "delete"),
            QuotationAction::Stats => write!(f, "stats"),
        }
    }
}
