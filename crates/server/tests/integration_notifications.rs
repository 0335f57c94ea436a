//! # Notification Inbox Integration Tests
//!
//! Owner scoping of read/delete, custom send targeting, and retention
//! purging.

mod common;

use axum::{
    extract::{Path, Query, State},
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use common::{authed, create_user, test_state};
use entity::{notifications, users::Role};
use error::AppError;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, Set};
use server::{
    dto::notifications::{NotificationListQuery, PurgeQuery, SendNotificationRequest},
    handlers::notifications::{
        clear_all_handler,
        delete_notification_handler,
        list_notifications_handler,
        mark_all_read_handler,
        mark_read_handler,
        purge_notifications_handler,
        send_notification_handler,
        unread_count_handler,
    },
};
use uuid::Uuid;

async fn insert_notification(db: &DbConn, user_id: Uuid, title: &str, is_read: bool) -> notifications::Model {
    notifications::ActiveModel {
        id:                Set(Uuid::new_v4()),
        user_id:           Set(user_id),
        title:             Set(title.to_string()),
        message:           Set("message".to_string()),
        r#type:            Set(notifications::NotificationType::Info),
        service_record_id: Set(None),
        is_read:           Set(is_read),
        metadata:          Set(serde_json::json!({})),
        created_at:        Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert notification")
}

#[tokio::test]
async fn test_list_is_scoped_to_owner() {
    let state = test_state().await;
    let owner = create_user(&state.db, Role::Engineer, "owner").await;
    let other = create_user(&state.db, Role::Engineer, "other").await;

    insert_notification(&state.db, owner.id, "Mine", false).await;
    insert_notification(&state.db, other.id, "Theirs", false).await;

    let query = NotificationListQuery {
        page:     None,
        per_page: None,
        is_read:  None,
        kind:     None,
    };
    let Json(listed) = list_notifications_handler(State(state.clone()), Extension(authed(&owner)), Query(query))
        .await
        .unwrap();

    assert_eq!(listed.notifications.len(), 1);
    assert_eq!(listed.notifications[0].title, "Mine");
    assert_eq!(listed.unread_count, 1);
}

#[tokio::test]
async fn test_mark_read_on_foreign_row_affects_nothing() {
    let state = test_state().await;
    let owner = create_user(&state.db, Role::Engineer, "owner").await;
    let intruder = create_user(&state.db, Role::Engineer, "intruder").await;
    let row = insert_notification(&state.db, owner.id, "Private", false).await;

    // Foreign caller: zero rows, still a success
    let Json(result) = mark_read_handler(State(state.clone()), Extension(authed(&intruder)), Path(row.id))
        .await
        .unwrap();
    assert_eq!(result.affected, 0);

    let reloaded = notifications::Entity::find_by_id(row.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.is_read);

    // The owner flips it
    let Json(result) = mark_read_handler(State(state.clone()), Extension(authed(&owner)), Path(row.id))
        .await
        .unwrap();
    assert_eq!(result.affected, 1);
}

#[tokio::test]
async fn test_mark_all_and_unread_count() {
    let state = test_state().await;
    let owner = create_user(&state.db, Role::Engineer, "owner").await;

    insert_notification(&state.db, owner.id, "One", false).await;
    insert_notification(&state.db, owner.id, "Two", false).await;
    insert_notification(&state.db, owner.id, "Already read", true).await;

    let Json(count) = unread_count_handler(State(state.clone()), Extension(authed(&owner)))
        .await
        .unwrap();
    assert_eq!(count.unread, 2);

    let Json(result) = mark_all_read_handler(State(state.clone()), Extension(authed(&owner)))
        .await
        .unwrap();
    assert_eq!(result.affected, 2);

    let Json(count) = unread_count_handler(State(state.clone()), Extension(authed(&owner)))
        .await
        .unwrap();
    assert_eq!(count.unread, 0);
}

#[tokio::test]
async fn test_delete_and_clear_are_owner_scoped() {
    let state = test_state().await;
    let owner = create_user(&state.db, Role::Engineer, "owner").await;
    let other = create_user(&state.db, Role::Engineer, "other").await;

    let mine = insert_notification(&state.db, owner.id, "Mine", false).await;
    insert_notification(&state.db, owner.id, "Mine too", false).await;
    insert_notification(&state.db, other.id, "Theirs", false).await;

    let Json(result) = delete_notification_handler(State(state.clone()), Extension(authed(&owner)), Path(mine.id))
        .await
        .unwrap();
    assert_eq!(result.affected, 1);

    let Json(result) = clear_all_handler(State(state.clone()), Extension(authed(&owner)))
        .await
        .unwrap();
    assert_eq!(result.affected, 1);

    // The other inbox is untouched
    let remaining = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(other.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

fn send_request() -> SendNotificationRequest {
    SendNotificationRequest {
        title:             "Maintenance window".to_string(),
        message:           "Scheduled downtime tonight".to_string(),
        kind:              Some("WARNING".to_string()),
        service_record_id: None,
        roles:             None,
        user_ids:          None,
    }
}

#[tokio::test]
async fn test_send_by_roles() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;
    let engineer_a = create_user(&state.db, Role::Engineer, "eng-a").await;
    let engineer_b = create_user(&state.db, Role::Engineer, "eng-b").await;
    create_user(&state.db, Role::Sales, "sales").await;

    let mut req = send_request();
    req.roles = Some(vec!["ENGINEER".to_string()]);

    let Json(result) = send_notification_handler(State(state.clone()), Extension(authed(&admin)), Json(req))
        .await
        .unwrap();
    assert_eq!(result.affected, 2);

    for engineer in [engineer_a.id, engineer_b.id] {
        let inbox = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(engineer))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].r#type, notifications::NotificationType::Warning);
    }
}

#[tokio::test]
async fn test_send_to_empty_audience_is_noop() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;

    let mut req = send_request();
    req.roles = Some(vec!["COMMERCIAL".to_string()]);

    let Json(result) = send_notification_handler(State(state.clone()), Extension(authed(&admin)), Json(req))
        .await
        .unwrap();
    assert_eq!(result.affected, 0);
}

#[tokio::test]
async fn test_send_requires_one_target_kind() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;

    // Neither roles nor user_ids
    let err = send_notification_handler(
        State(state.clone()),
        Extension(authed(&admin)),
        Json(send_request()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    // Both at once
    let mut req = send_request();
    req.roles = Some(vec!["ADMIN".to_string()]);
    req.user_ids = Some(vec![admin.id]);
    let err = send_notification_handler(State(state.clone()), Extension(authed(&admin)), Json(req))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    // Unknown recipient fails outright
    let mut req = send_request();
    req.user_ids = Some(vec![Uuid::new_v4()]);
    let err = send_notification_handler(State(state.clone()), Extension(authed(&admin)), Json(req))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_purge_spares_unread_by_default() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;

    let old_read = insert_notification(&state.db, admin.id, "Old read", true).await;
    let old_unread = insert_notification(&state.db, admin.id, "Old unread", false).await;
    insert_notification(&state.db, admin.id, "Recent", true).await;

    for row in [&old_read, &old_unread] {
        let mut active: notifications::ActiveModel = row.clone().into();
        active.created_at = Set(Utc::now() - Duration::days(120));
        active.update(&state.db).await.unwrap();
    }

    let Json(result) = purge_notifications_handler(
        State(state.clone()),
        Extension(authed(&admin)),
        Query(PurgeQuery {
            older_than_days: Some(90),
            include_unread:  None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(result.affected, 1);

    // Enabling include_unread takes the old unread row too
    let Json(result) = purge_notifications_handler(
        State(state.clone()),
        Extension(authed(&admin)),
        Query(PurgeQuery {
            older_than_days: Some(90),
            include_unread:  Some(true),
        }),
    )
    .await
    .unwrap();
    assert_eq!(result.affected, 1);

    assert_eq!(
        notifications::Entity::find().count(&state.db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_engineer_cannot_send_or_purge() {
    let state = test_state().await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;

    let mut req = send_request();
    req.roles = Some(vec!["ADMIN".to_string()]);
    let err = send_notification_handler(State(state.clone()), Extension(authed(&engineer)), Json(req))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = purge_notifications_handler(
        State(state.clone()),
        Extension(authed(&engineer)),
        Query(PurgeQuery {
            older_than_days: None,
            include_unread:  None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}
