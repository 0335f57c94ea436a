//! # Point Lifecycle Integration Tests
//!
//! Assignment notifications, completion timestamps, the open/completed
//! filters, and the manual escalation check.

mod common;

use axum::{
    extract::{Path, Query, State},
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use common::{authed, create_customer, create_machine, create_point, create_service_record, create_user, test_state};
use entity::{notifications, points, users::Role};
use error::AppError;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use server::{
    dto::points::{CreatePointRequest, EscalationQuery, MyPointsQuery, UpdatePointRequest},
    handlers::points::{check_escalation_handler, create_point_handler, my_points_handler, update_point_handler},
};

fn empty_update() -> UpdatePointRequest {
    UpdatePointRequest {
        title:          None,
        description:    None,
        status:         None,
        priority:       None,
        assigned_to_id: None,
        due_date:       None,
    }
}

#[tokio::test]
async fn test_create_with_assignee_notifies() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;
    let customer = create_customer(&state.db, "Pointy Co").await;
    let machine = create_machine(&state.db, "Mixer").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let (_, Json(point)) = create_point_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Json(CreatePointRequest {
            service_record_id: record.id,
            title:             "Replace seal".to_string(),
            description:       None,
            priority:          Some("HIGH".to_string()),
            assigned_to_id:    Some(engineer.id),
            due_date:          None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(point.priority, "HIGH");
    assert_eq!(point.status, "CREATED");
    assert!(point.completed_at.is_none());

    let inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(engineer.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "New Point Assigned");
    assert_eq!(inbox[0].service_record_id, Some(record.id));
}

#[tokio::test]
async fn test_completion_stamps_and_restamps() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let customer = create_customer(&state.db, "Stamp Co").await;
    let machine = create_machine(&state.db, "Dryer").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;
    let point = create_point(&state.db, &record, &head, "Tighten belt").await;

    let mut req = empty_update();
    req.status = Some("COMPLETED".to_string());
    let Json(completed) = update_point_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(point.id),
        Json(req.clone()),
    )
    .await
    .unwrap();

    assert_eq!(completed.status, "COMPLETED");
    let first_stamp = completed.completed_at.expect("completed_at should be set");

    // Completing again moves the timestamp forward
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let Json(recompleted) = update_point_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(point.id),
        Json(req),
    )
    .await
    .unwrap();
    assert!(recompleted.completed_at.unwrap() > first_stamp);
}

#[tokio::test]
async fn test_reassignment_notifies_new_assignee() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let first = create_user(&state.db, Role::Engineer, "first").await;
    let second = create_user(&state.db, Role::Engineer, "second").await;
    let customer = create_customer(&state.db, "Handover Co").await;
    let machine = create_machine(&state.db, "Cutter").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;
    let point = create_point(&state.db, &record, &head, "Inspect blade").await;

    let mut req = empty_update();
    req.assigned_to_id = Some(first.id);
    update_point_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(point.id),
        Json(req),
    )
    .await
    .unwrap();

    let mut req = empty_update();
    req.assigned_to_id = Some(second.id);
    update_point_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(point.id),
        Json(req),
    )
    .await
    .unwrap();

    let first_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(first.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(first_inbox[0].title, "Point Assigned");

    let second_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(second.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(second_inbox[0].title, "Point Reassigned");
}

#[tokio::test]
async fn test_outsider_cannot_update_point() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let outsider = create_user(&state.db, Role::Sales, "outsider").await;
    let customer = create_customer(&state.db, "Locked Co").await;
    let machine = create_machine(&state.db, "Pump").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;
    let point = create_point(&state.db, &record, &head, "Check valve").await;

    let err = update_point_handler(
        State(state.clone()),
        Extension(authed(&outsider)),
        Path(point.id),
        Json(empty_update()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn test_my_points_open_filter_excludes_closed() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;
    let customer = create_customer(&state.db, "Filter Co").await;
    let machine = create_machine(&state.db, "Oven").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let open_point = create_point(&state.db, &record, &head, "Open work").await;
    let done_point = create_point(&state.db, &record, &head, "Finished work").await;

    for (point, status) in [
        (&open_point, points::PointStatus::InProgress),
        (&done_point, points::PointStatus::Completed),
    ] {
        let mut active: points::ActiveModel = point.clone().into();
        active.assigned_to_id = Set(Some(engineer.id));
        active.status = Set(status);
        active.update(&state.db).await.unwrap();
    }

    let query = |filter: Option<&str>| {
        MyPointsQuery {
            filter:   filter.map(ToString::to_string),
            page:     None,
            per_page: None,
        }
    };

    let Json(open) = my_points_handler(
        State(state.clone()),
        Extension(authed(&engineer)),
        Query(query(Some("open"))),
    )
    .await
    .unwrap();
    assert_eq!(open.points.len(), 1);
    assert_eq!(open.points[0].id, open_point.id);

    let Json(completed) = my_points_handler(
        State(state.clone()),
        Extension(authed(&engineer)),
        Query(query(Some("completed"))),
    )
    .await
    .unwrap();
    assert_eq!(completed.points.len(), 1);
    assert_eq!(completed.points[0].id, done_point.id);

    let Json(all) = my_points_handler(State(state.clone()), Extension(authed(&engineer)), Query(query(None)))
        .await
        .unwrap();
    assert_eq!(all.points.len(), 2);

    let err = my_points_handler(
        State(state.clone()),
        Extension(authed(&engineer)),
        Query(query(Some("bogus"))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_escalation_check_without_stale_points() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let customer = create_customer(&state.db, "Fresh Co").await;
    let machine = create_machine(&state.db, "Chiller").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;
    create_point(&state.db, &record, &head, "Brand new point").await;

    let Json(result) = check_escalation_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(record.id),
        Query(EscalationQuery {
            age_threshold_hours: Some(72),
        }),
    )
    .await
    .unwrap();

    assert!(!result.escalation_required);
    assert!(result.points.is_empty());
    assert_eq!(result.notified, 0);
    assert_eq!(
        notifications::Entity::find().count(&state.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_escalation_notifies_service_heads() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let second_head = create_user(&state.db, Role::ServiceHead, "head2").await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;
    let customer = create_customer(&state.db, "Stale Co").await;
    let machine = create_machine(&state.db, "Furnace").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let stale = create_point(&state.db, &record, &head, "Forgotten point").await;
    let mut active: points::ActiveModel = stale.into();
    active.created_at = Set(Utc::now() - Duration::hours(100));
    active.update(&state.db).await.unwrap();

    let Json(result) = check_escalation_handler(
        State(state.clone()),
        Extension(authed(&admin)),
        Path(record.id),
        Query(EscalationQuery {
            age_threshold_hours: Some(72),
        }),
    )
    .await
    .unwrap();

    assert!(result.escalation_required);
    assert_eq!(result.points.len(), 1);
    // Both service heads get one URGENT row each; the admin gets none.
    assert_eq!(result.notified, 2);

    for recipient in [head.id, second_head.id] {
        let inbox = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(recipient))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "Point Escalation");
        assert_eq!(inbox[0].r#type, notifications::NotificationType::Urgent);
    }

    let admin_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(admin.id))
        .all(&state.db)
        .await
        .unwrap();
    assert!(admin_inbox.is_empty());
}
