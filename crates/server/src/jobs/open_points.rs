//! # Open-Points Reminder Job
//!
//! One pass over every open point: admins get an aggregate summary,
//! each engineer with open points gets a personal summary plus a dedicated
//! URGENT notification per overdue point. The job is fire-and-forget;
//! re-running it re-sends the same reminders.

use std::collections::HashMap;

use chrono::Utc;
use entity::{
    notifications::NotificationType,
    points::{self, PointPriority, PointStatus},
    users::{self, Role},
};
use error::{traits::ok_or_log, Result};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter};
use tracing::info;
use uuid::Uuid;

use crate::notify::{
    dispatcher::{self, NotificationInput},
    push::PushClient,
};

/// What one job pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPointsSummary {
    /// Open points found (status not COMPLETED/CLOSED)
    pub open_points:           u64,
    /// Admins who received the aggregate summary
    pub admins_notified:       u64,
    /// Engineers who received a personal summary
    pub engineers_notified:    u64,
    /// Dedicated overdue-point notifications sent
    pub overdue_notifications: u64,
}

/// Run one reminder pass.
pub async fn run_open_points_job(db: &DbConn, push: &PushClient) -> Result<OpenPointsSummary> {
    let now = Utc::now();

    let open_points = points::Entity::find()
        .filter(points::Column::Status.is_in(PointStatus::open_statuses()))
        .all(db)
        .await?;

    let mut summary = OpenPointsSummary {
        open_points:           open_points.len() as u64,
        admins_notified:       0,
        engineers_notified:    0,
        overdue_notifications: 0,
    };

    if open_points.is_empty() {
        info!("no open points, nothing to remind");
        return Ok(summary);
    }

    let high = open_points.iter().filter(|p| p.priority == PointPriority::High).count();
    let medium = open_points.iter().filter(|p| p.priority == PointPriority::Medium).count();
    let low = open_points.iter().filter(|p| p.priority == PointPriority::Low).count();
    let overdue = open_points
        .iter()
        .filter(|p| p.due_date.is_some_and(|due| due < now))
        .count();
    let unassigned = open_points.iter().filter(|p| p.assigned_to_id.is_none()).count();

    // Aggregate summary for every active admin.
    let admin_input = NotificationInput::new(
        "Open Points Summary",
        format!(
            "HIGH: {} | MEDIUM: {} | LOW: {} | Overdue: {} | Unassigned: {}",
            high, medium, low, overdue, unassigned
        ),
        NotificationType::Warning,
    );
    let admins = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Admin))
        .filter(users::Column::IsActive.eq(true))
        .all(db)
        .await?;
    for admin in &admins {
        if ok_or_log(dispatcher::notify_user(db, push, admin.id, &admin_input).await).is_some() {
            summary.admins_notified += 1;
        }
    }

    // Personal reminders per assignee.
    let mut by_assignee: HashMap<Uuid, Vec<&points::Model>> = HashMap::new();
    for point in &open_points {
        if let Some(assignee_id) = point.assigned_to_id {
            by_assignee.entry(assignee_id).or_default().push(point);
        }
    }

    for (assignee_id, assigned) in by_assignee {
        let overdue_points: Vec<&&points::Model> = assigned
            .iter()
            .filter(|p| p.due_date.is_some_and(|due| due < now))
            .collect();

        let kind = if overdue_points.is_empty() {
            NotificationType::Warning
        }
        else {
            NotificationType::Urgent
        };
        let input = NotificationInput::new(
            "Your Open Points",
            format!(
                "You have {} open point(s), {} overdue",
                assigned.len(),
                overdue_points.len()
            ),
            kind,
        );
        if ok_or_log(dispatcher::notify_user(db, push, assignee_id, &input).await).is_some() {
            summary.engineers_notified += 1;
        }

        for point in overdue_points {
            let input = NotificationInput::new(
                "Overdue Point",
                format!("Point '{}' is past its due date", point.title),
                NotificationType::Urgent,
            )
            .for_record(point.service_record_id);
            if ok_or_log(dispatcher::notify_user(db, push, assignee_id, &input).await).is_some() {
                summary.overdue_notifications += 1;
            }
        }
    }

    info!(
        open_points = summary.open_points,
        admins = summary.admins_notified,
        engineers = summary.engineers_notified,
        overdue = summary.overdue_notifications,
        "open-points reminder pass complete"
    );

    Ok(summary)
}
