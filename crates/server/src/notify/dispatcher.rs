//! # Notification Dispatcher
//!
//! Fan-out of workflow events to role audiences. Each recipient gets a
//! persisted notification row; push delivery is attempted afterwards when
//! the user has a device token and never aborts the loop.

use chrono::Utc;
use entity::{
    notifications::{self, NotificationType},
    users::{self, Role},
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use super::push::PushClient;

/// One notification to deliver.
#[derive(Debug, Clone)]
pub struct NotificationInput {
    pub title:             String,
    pub message:           String,
    pub kind:              NotificationType,
    pub service_record_id: Option<Uuid>,
}

impl NotificationInput {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationType) -> Self {
        Self {
            title:             title.into(),
            message:           message.into(),
            kind,
            service_record_id: None,
        }
    }

    #[must_use]
    pub fn for_record(mut self, service_record_id: Uuid) -> Self {
        self.service_record_id = Some(service_record_id);
        self
    }
}

/// Notify every active user holding one of `roles`.
///
/// An empty audience is a successful no-op. Rows are persisted one by one;
/// a failed insert aborts with the error, a failed push does not.
pub async fn notify_by_role(
    db: &DbConn,
    push: &PushClient,
    roles: &[Role],
    input: &NotificationInput,
) -> Result<Vec<notifications::Model>> {
    let audience = users::Entity::find()
        .filter(users::Column::Role.is_in(roles.iter().copied()))
        .filter(users::Column::IsActive.eq(true))
        .all(db)
        .await
        .map_err(AppError::from)?;

    let target_roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
    let mut delivered = Vec::with_capacity(audience.len());

    for user in audience {
        let row = persist(db, user.id, input, json!({
            "sent_at": Utc::now().to_rfc3339(),
            "target_roles": target_roles,
        }))
        .await?;

        push_best_effort(push, &user, input).await;
        delivered.push(row);
    }

    tracing::info!(
        count = delivered.len(),
        title = %input.title,
        "notification fan-out complete"
    );

    Ok(delivered)
}

/// Notify a single user. Fails only when the user is missing or the row
/// cannot be persisted.
pub async fn notify_user(
    db: &DbConn,
    push: &PushClient,
    user_id: Uuid,
    input: &NotificationInput,
) -> Result<notifications::Model> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let row = persist(db, user.id, input, json!({
        "sent_at": Utc::now().to_rfc3339(),
    }))
    .await?;

    push_best_effort(push, &user, input).await;

    Ok(row)
}

async fn persist(
    db: &DbConn,
    user_id: Uuid,
    input: &NotificationInput,
    metadata: serde_json::Value,
) -> Result<notifications::Model> {
    let row = notifications::ActiveModel {
        id:                Set(Uuid::new_v4()),
        user_id:           Set(user_id),
        title:             Set(input.title.clone()),
        message:           Set(input.message.clone()),
        r#type:            Set(input.kind.clone()),
        service_record_id: Set(input.service_record_id),
        is_read:           Set(false),
        metadata:          Set(metadata),
        created_at:        Set(Utc::now()),
    };
    row.insert(db).await.map_err(AppError::from)
}

async fn push_best_effort(push: &PushClient, user: &users::Model, input: &NotificationInput) {
    let Some(token) = &user.push_token
    else {
        return;
    };
    if let Err(e) = push.send(token, &input.title, &input.message).await {
        tracing::warn!(user_id = %user.id, error = %e, "push delivery failed");
    }
}

// Workflow event audiences, mirroring who needs to know about each step of
// the service workflow.

/// Installation completed: management and the commercial side.
pub const INSTALLATION_AUDIENCE: &[Role] = &[Role::Admin, Role::ServiceHead, Role::Sales, Role::Commercial];
/// Report submitted: same audience as installations.
pub const REPORT_AUDIENCE: &[Role] = &[Role::Admin, Role::ServiceHead, Role::Sales, Role::Commercial];
/// Escalations go to service heads only.
pub const ESCALATION_AUDIENCE: &[Role] = &[Role::ServiceHead];
/// Expiring warranties concern management and sales.
pub const WARRANTY_AUDIENCE: &[Role] = &[Role::Admin, Role::ServiceHead, Role::Sales];
/// Pending payments concern the money-facing roles.
pub const PAYMENT_AUDIENCE: &[Role] = &[Role::Admin, Role::Sales, Role::Commercial];

/// Installation-completed event.
pub async fn notify_installation_completed(
    db: &DbConn,
    push: &PushClient,
    service_record_id: Uuid,
    customer_name: &str,
    machine_name: &str,
) -> Result<Vec<notifications::Model>> {
    let input = NotificationInput::new(
        "Installation Completed",
        format!("Installation completed for {} - {}", customer_name, machine_name),
        NotificationType::Info,
    )
    .for_record(service_record_id);
    notify_by_role(db, push, INSTALLATION_AUDIENCE, &input).await
}

/// Report-submitted event.
pub async fn notify_report_submitted(
    db: &DbConn,
    push: &PushClient,
    service_record_id: Uuid,
    customer_name: &str,
    machine_name: &str,
) -> Result<Vec<notifications::Model>> {
    let input = NotificationInput::new(
        "Service Report Submitted",
        format!("New service report submitted for {} - {}", customer_name, machine_name),
        NotificationType::Info,
    )
    .for_record(service_record_id);
    notify_by_role(db, push, REPORT_AUDIENCE, &input).await
}

/// Stale-open-points escalation event.
pub async fn notify_escalation(
    db: &DbConn,
    push: &PushClient,
    service_record_id: Uuid,
    open_count: u64,
    age_threshold_hours: i64,
) -> Result<Vec<notifications::Model>> {
    let input = NotificationInput::new(
        "Point Escalation",
        format!(
            "{} open point(s) older than {} hours require attention",
            open_count, age_threshold_hours
        ),
        NotificationType::Urgent,
    )
    .for_record(service_record_id);
    notify_by_role(db, push, ESCALATION_AUDIENCE, &input).await
}

/// Warranty-expiring event.
pub async fn notify_warranty_expiring(
    db: &DbConn,
    push: &PushClient,
    service_record_id: Uuid,
    customer_name: &str,
    machine_name: &str,
    days_remaining: i64,
) -> Result<Vec<notifications::Model>> {
    let input = NotificationInput::new(
        "Warranty Expiring",
        format!(
            "Warranty for {} - {} expires in {} day(s)",
            customer_name, machine_name, days_remaining
        ),
        NotificationType::Warning,
    )
    .for_record(service_record_id);
    notify_by_role(db, push, WARRANTY_AUDIENCE, &input).await
}

/// Pending-payment event. Callers only invoke this for amounts > 0.
pub async fn notify_pending_payment(
    db: &DbConn,
    push: &PushClient,
    service_record_id: Uuid,
    customer_name: &str,
    amount: f64,
) -> Result<Vec<notifications::Model>> {
    let input = NotificationInput::new(
        "Pending Payment",
        format!("Pending payment of {:.2} for {}", amount, customer_name),
        NotificationType::Warning,
    )
    .for_record(service_record_id);
    notify_by_role(db, push, PAYMENT_AUDIENCE, &input).await
}
