//! # Service Record and Report Integration Tests
//!
//! Warranty derivation, workflow notifications, deletion guards, and the
//! warranty look-ahead listing.

mod common;

use axum::{
    extract::{Path, Query, State},
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use common::{authed, create_customer, create_machine, create_point, create_service_record, create_user, test_state};
use entity::{notifications, service_records, users::Role};
use error::AppError;
use http::StatusCode;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use server::{
    dto::{
        reports::CreateReportRequest,
        service_records::{CreateServiceRecordRequest, UpdateServiceRecordRequest, WarrantyExpiringQuery},
    },
    handlers::{
        reports::{create_report_handler, delete_report_handler, update_report_handler},
        service_records::{
            create_service_record_handler,
            delete_service_record_handler,
            get_service_record_handler,
            update_service_record_handler,
            warranty_expiring_handler,
        },
    },
    warranty,
};

#[tokio::test]
async fn test_create_derives_warranty_and_notifies() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let sales = create_user(&state.db, Role::Sales, "sales").await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;
    let customer = create_customer(&state.db, "Warranty Co").await;
    let machine = create_machine(&state.db, "Conveyor").await; // 12-month warranty

    let purchase_date = Utc::now();
    let (status, Json(record)) = create_service_record_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Json(CreateServiceRecordRequest {
            customer_id:    customer.id,
            machine_id:     machine.id,
            purchase_date,
            pending_amount: Some(1500.0),
            kpis:           None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record.status, "ACTIVE");
    assert_eq!(
        record.warranty_expires_at,
        warranty::warranty_expiry(purchase_date, 12)
    );
    assert_eq!(record.warranty_status, "ACTIVE");
    assert!(record.has_pending_amount);

    // Installation goes to management and the commercial side; the sales
    // account additionally receives the pending-payment warning.
    let head_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(head.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(head_inbox.len(), 1);
    assert_eq!(head_inbox[0].title, "Installation Completed");

    let sales_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(sales.id))
        .all(&state.db)
        .await
        .unwrap();
    let titles: Vec<&str> = sales_inbox.iter().map(|n| n.title.as_str()).collect();
    assert!(titles.contains(&"Installation Completed"));
    assert!(titles.contains(&"Pending Payment"));

    // Engineers are not in either audience.
    let engineer_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(engineer.id))
        .all(&state.db)
        .await
        .unwrap();
    assert!(engineer_inbox.is_empty());
}

#[tokio::test]
async fn test_create_without_pending_skips_payment_notice() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let customer = create_customer(&state.db, "Paid Up Co").await;
    let machine = create_machine(&state.db, "Saw").await;

    create_service_record_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Json(CreateServiceRecordRequest {
            customer_id:    customer.id,
            machine_id:     machine.id,
            purchase_date:  Utc::now(),
            pending_amount: None,
            kpis:           None,
        }),
    )
    .await
    .unwrap();

    let payment_rows = notifications::Entity::find()
        .filter(notifications::Column::Title.eq("Pending Payment"))
        .all(&state.db)
        .await
        .unwrap();
    assert!(payment_rows.is_empty());
}

#[tokio::test]
async fn test_sales_cannot_create_record() {
    let state = test_state().await;
    let sales = create_user(&state.db, Role::Sales, "sales").await;
    let customer = create_customer(&state.db, "No Access Co").await;
    let machine = create_machine(&state.db, "Drill").await;

    let err = create_service_record_handler(
        State(state.clone()),
        Extension(authed(&sales)),
        Json(CreateServiceRecordRequest {
            customer_id:    customer.id,
            machine_id:     machine.id,
            purchase_date:  Utc::now(),
            pending_amount: None,
            kpis:           None,
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn test_detail_counts_open_points() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let customer = create_customer(&state.db, "Detail Co").await;
    let machine = create_machine(&state.db, "Washer").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let open = create_point(&state.db, &record, &head, "Open item").await;
    let closed = create_point(&state.db, &record, &head, "Closed item").await;
    let mut active: entity::points::ActiveModel = closed.into();
    active.status = Set(entity::points::PointStatus::Closed);
    active.update(&state.db).await.unwrap();

    let Json(detail) = get_service_record_handler(State(state.clone()), Path(record.id))
        .await
        .unwrap();

    assert_eq!(detail.points.len(), 2);
    assert_eq!(detail.open_points, 1);
    assert!(detail.points.iter().any(|p| p.id == open.id));
}

#[tokio::test]
async fn test_update_pending_resends_payment_notice() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let sales = create_user(&state.db, Role::Sales, "sales").await;
    let customer = create_customer(&state.db, "Debtor Co").await;
    let machine = create_machine(&state.db, "Roller").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    update_service_record_handler(
        State(state.clone()),
        Extension(authed(&head)),
        Path(record.id),
        Json(UpdateServiceRecordRequest {
            pending_amount: Some(750.0),
            kpis:           None,
            status:         None,
        }),
    )
    .await
    .unwrap();

    let sales_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(sales.id))
        .filter(notifications::Column::Title.eq("Pending Payment"))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(sales_inbox.len(), 1);
    assert!(sales_inbox[0].message.contains("750.00"));
}

#[tokio::test]
async fn test_record_with_points_cannot_be_deleted() {
    let state = test_state().await;
    let admin = create_user(&state.db, Role::Admin, "admin").await;
    let customer = create_customer(&state.db, "Guarded Co").await;
    let machine = create_machine(&state.db, "Crane").await;
    let record = create_service_record(&state.db, &customer, &machine, &admin).await;
    create_point(&state.db, &record, &admin, "Blocking point").await;

    let err = delete_service_record_handler(State(state.clone()), Extension(authed(&admin)), Path(record.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState { .. }));

    // Without dependents the delete goes through
    let empty_record = create_service_record(&state.db, &customer, &machine, &admin).await;
    delete_service_record_handler(State(state.clone()), Extension(authed(&admin)), Path(empty_record.id))
        .await
        .unwrap();
    assert!(
        service_records::Entity::find_by_id(empty_record.id)
            .one(&state.db)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_warranty_expiring_window() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let customer = create_customer(&state.db, "Window Co").await;
    let machine = create_machine(&state.db, "Riveter").await;

    let inside = create_service_record(&state.db, &customer, &machine, &head).await;
    let mut active: service_records::ActiveModel = inside.clone().into();
    active.warranty_expires_at = Set(Utc::now() + Duration::days(10));
    active.update(&state.db).await.unwrap();

    let far_out = create_service_record(&state.db, &customer, &machine, &head).await;
    let mut active: service_records::ActiveModel = far_out.into();
    active.warranty_expires_at = Set(Utc::now() + Duration::days(200));
    active.update(&state.db).await.unwrap();

    let expired = create_service_record(&state.db, &customer, &machine, &head).await;
    let mut active: service_records::ActiveModel = expired.into();
    active.warranty_expires_at = Set(Utc::now() - Duration::days(5));
    active.update(&state.db).await.unwrap();

    let Json(expiring) = warranty_expiring_handler(
        State(state.clone()),
        Query(WarrantyExpiringQuery {
            days: Some(30),
        }),
    )
    .await
    .unwrap();

    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].id, inside.id);
}

// ==================== Reports ====================

#[tokio::test]
async fn test_report_submission_notifies_and_sets_engineer() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let engineer = create_user(&state.db, Role::Engineer, "engineer").await;
    let customer = create_customer(&state.db, "Reported Co").await;
    let machine = create_machine(&state.db, "Shredder").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let (status, Json(report)) = create_report_handler(
        State(state.clone()),
        Extension(authed(&engineer)),
        Json(CreateReportRequest {
            service_record_id: record.id,
            report_data:       serde_json::json!({"finding": "worn belt"}),
            scan_data:         None,
            manual_url:        None,
            e_drawings_url:    None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report.engineer_id, engineer.id);
    assert_eq!(report.scan_data, serde_json::json!({}));

    let head_inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(head.id))
        .filter(notifications::Column::Title.eq("Service Report Submitted"))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(head_inbox.len(), 1);
    assert_eq!(head_inbox[0].service_record_id, Some(record.id));
}

#[tokio::test]
async fn test_report_author_or_manager_only() {
    let state = test_state().await;
    let head = create_user(&state.db, Role::ServiceHead, "head").await;
    let author = create_user(&state.db, Role::Engineer, "author").await;
    let stranger = create_user(&state.db, Role::Engineer, "stranger").await;
    let customer = create_customer(&state.db, "Authored Co").await;
    let machine = create_machine(&state.db, "Bender").await;
    let record = create_service_record(&state.db, &customer, &machine, &head).await;

    let (_, Json(report)) = create_report_handler(
        State(state.clone()),
        Extension(authed(&author)),
        Json(CreateReportRequest {
            service_record_id: record.id,
            report_data:       serde_json::json!({}),
            scan_data:         None,
            manual_url:        None,
            e_drawings_url:    None,
        }),
    )
    .await
    .unwrap();

    let update = server::dto::reports::UpdateReportRequest {
        report_data:    Some(serde_json::json!({"finding": "revised"})),
        scan_data:      None,
        manual_url:     None,
        e_drawings_url: None,
    };

    // Another engineer may not touch it
    let err = update_report_handler(
        State(state.clone()),
        Extension(authed(&stranger)),
        Path(report.id),
        Json(update.clone()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    // The author may
    update_report_handler(
        State(state.clone()),
        Extension(authed(&author)),
        Path(report.id),
        Json(update),
    )
    .await
    .unwrap();

    // And management may delete
    delete_report_handler(State(state.clone()), Extension(authed(&head)), Path(report.id))
        .await
        .unwrap();
}
