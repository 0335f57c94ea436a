//! # Open-Points Reminder Job Tests

mod common;

use chrono::{Duration, Utc};
use common::{create_customer, create_machine, create_point, create_service_record, create_user, test_state};
use entity::{notifications, points, users::Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use server::jobs::run_open_points_job;

#[tokio::test]
async fn test_no_open_points_is_a_noop() {
    let state = test_state().await;
    create_user(&state.db, Role::Admin, "admin").await;

    let summary = run_open_points_job(&state.db, &state.push).await.unwrap();

    assert_eq!(summary.open_points, 0);
    assert_eq!(summary.admins_notified, 0);
    assert_eq!(summary.engineers_notified, 0);
    assert_eq!(summary.overdue_notifications, 0);
}

#[tokio::test]
async fn test_reminders_for_admins_and_assignees() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;
    let customer = create_customer(&state.db, "Reminder Co").await;
    let machine = create_machine(&state.db, "Extruder").await;
    let record = create_service_record(&state.db, &customer, &machine, &admin).await;

    // One overdue point assigned to the engineer, one open unassigned one,
    // and one completed point the job must ignore.
    let overdue = create_point(&state.db, &record, &admin, "Overdue work").await;
    let mut active: points::ActiveModel = overdue.into();
    active.assigned_to_id = Set(Some(engineer.id));
    active.due_date = Set(Some(Utc::now() - Duration::days(2)));
    active.update(&state.db).await.unwrap();

    create_point(&state.db, &record, &admin, "Unassigned work").await;

    let done = create_point(&state.db, &record, &admin, "Done work").await;
    let mut active: points::ActiveModel = done.into();
    active.status = Set(points::PointStatus::Completed);
    active.update(&state.db).await.unwrap();

    let summary = run_open_points_job(&state.db, &state.push).await.unwrap();

    assert_eq!(summary.open_points, 2);
    assert_eq!(summary.admins_notified, 1);
    assert_eq!(summary.engineers_notified, 1);
    assert_eq!(summary.overdue_notifications, 1);

    // The admin gets one aggregate summary naming the overdue count
    let admin_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(admin.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(admin_inbox.len(), 1);
    assert!(admin_inbox[0].message.contains("Overdue: 1"));

    // The engineer gets a personal summary plus the overdue alert
    let engineer_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(engineer.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(engineer_inbox.len(), 2);
    assert!(
        engineer_inbox
            .iter()
            .any(|n| n.title == "Overdue Point" && n.r#type == notifications::NotificationType::Urgent)
    );

    // Re-running re-sends the same reminders
    let again = run_open_points_job(&state.db, &state.push).await.unwrap();
    assert_eq!(again.open_points, 2);
    let admin_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(admin.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(admin_inbox.len(), 2);
}
