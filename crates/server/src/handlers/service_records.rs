//! # Service Record Handlers
//!
//! The installation workflow. Creating a record derives the warranty expiry
//! from the machine's warranty period, persists the row, then fans out the
//! installation notification (and a pending-payment one when money is
//! outstanding). The notifications are best-effort: once the row is in, a
//! dispatcher failure is logged and the request still succeeds.

use auth::{policy, Action, RecordAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use entity::{customers, machines, notifications, points, reports, service_records::ServiceStatus};
use error::{traits::ok_or_log, AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        service_records::{
            CreateServiceRecordRequest,
            PendingSummaryResponse,
            ServiceRecordDetailResponse,
            ServiceRecordListQuery,
            ServiceRecordListResponse,
            ServiceRecordResponse,
            ServiceStatisticsResponse,
            UpdateServiceRecordRequest,
            WarrantyExpiringQuery,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    notify::dispatcher,
    warranty,
    AppState,
};

/// Create a service record.
pub async fn create_service_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateServiceRecordRequest>,
) -> Result<(StatusCode, Json<ServiceRecordResponse>)> {
    policy::require(user.role, Action::ServiceRecords(RecordAction::Create))?;
    req.validate()?;

    let customer = customers::Entity::find_by_id(req.customer_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let machine = machines::Entity::find_by_id(req.machine_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Machine not found"))?;

    let pending_amount = req.pending_amount.unwrap_or(0.0);
    let now = Utc::now();
    let created = entity::service_records::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        customer_id:         Set(customer.id),
        machine_id:          Set(machine.id),
        created_by_id:       Set(user.id),
        purchase_date:       Set(req.purchase_date),
        warranty_expires_at: Set(warranty::warranty_expiry(req.purchase_date, machine.warranty_time_in_months)),
        pending_amount:      Set(pending_amount),
        status:              Set(ServiceStatus::Active),
        kpis:                Set(req.kpis.unwrap_or_else(|| json!({}))),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(
        service_record_id = %created.id,
        customer_id = %customer.id,
        machine_id = %machine.id,
        "service record created"
    );

    // The record is persisted; notification failures must not undo that.
    ok_or_log(
        dispatcher::notify_installation_completed(&state.db, &state.push, created.id, &customer.name, &machine.name)
            .await,
    );
    if pending_amount > 0.0 {
        ok_or_log(
            dispatcher::notify_pending_payment(&state.db, &state.push, created.id, &customer.name, pending_amount)
                .await,
        );
    }

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List service records with filters.
pub async fn list_service_records_handler(
    State(state): State<AppState>,
    Query(query): Query<ServiceRecordListQuery>,
) -> Result<Json<ServiceRecordListResponse>> {
    let mut select = entity::service_records::Entity::find();

    if let Some(customer_id) = query.customer_id {
        select = select.filter(entity::service_records::Column::CustomerId.eq(customer_id));
    }
    if let Some(machine_id) = query.machine_id {
        select = select.filter(entity::service_records::Column::MachineId.eq(machine_id));
    }
    if let Some(status) = &query.status {
        let status = ServiceStatus::from_string(status).ok_or_else(|| {
            AppError::validation(format!(
                "Invalid status '{}', expected one of: {}",
                status,
                ServiceStatus::VALID_VALUES.join(", ")
            ))
        })?;
        select = select.filter(entity::service_records::Column::Status.eq(status));
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(entity::service_records::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(ServiceRecordListResponse {
        service_records: rows.into_iter().map(Into::into).collect(),
        pagination:      PaginationInfo::new(page, per_page, total),
    }))
}

/// Fetch a service record with its reports, points, and recent
/// notifications.
pub async fn get_service_record_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRecordDetailResponse>> {
    let record = entity::service_records::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    let record_reports = reports::Entity::find()
        .filter(reports::Column::ServiceRecordId.eq(id))
        .order_by_desc(reports::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let record_points = points::Entity::find()
        .filter(points::Column::ServiceRecordId.eq(id))
        .order_by_desc(points::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let open_points = record_points
        .iter()
        .filter(|p| entity::points::PointStatus::open_statuses().contains(&p.status))
        .count() as u64;

    let recent_notifications = notifications::Entity::find()
        .filter(notifications::Column::ServiceRecordId.eq(id))
        .order_by_desc(notifications::Column::CreatedAt)
        .limit(10)
        .all(&state.db)
        .await?;

    Ok(Json(ServiceRecordDetailResponse {
        record: record.into(),
        reports: record_reports.into_iter().map(Into::into).collect(),
        points: record_points.into_iter().map(Into::into).collect(),
        recent_notifications: recent_notifications.into_iter().map(Into::into).collect(),
        open_points,
    }))
}

/// Update a service record (pending amount, KPIs, status). Setting a
/// positive pending amount re-sends the pending-payment notification.
pub async fn update_service_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRecordRequest>,
) -> Result<Json<ServiceRecordResponse>> {
    policy::require(user.role, Action::ServiceRecords(RecordAction::Update))?;
    req.validate()?;

    let record = entity::service_records::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    let status = match &req.status {
        Some(status) => {
            Some(ServiceStatus::from_string(status).ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid status '{}', expected one of: {}",
                    status,
                    ServiceStatus::VALID_VALUES.join(", ")
                ))
            })?)
        },
        None => None,
    };

    let customer_id = record.customer_id;
    let mut active: entity::service_records::ActiveModel = record.into();
    if let Some(pending_amount) = req.pending_amount {
        active.pending_amount = Set(pending_amount);
    }
    if let Some(kpis) = req.kpis {
        active.kpis = Set(kpis);
    }
    if let Some(status) = status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(service_record_id = %updated.id, "service record updated");

    if let Some(pending_amount) = req.pending_amount {
        if pending_amount > 0.0 {
            if let Some(customer) = customers::Entity::find_by_id(customer_id).one(&state.db).await? {
                ok_or_log(
                    dispatcher::notify_pending_payment(
                        &state.db,
                        &state.push,
                        updated.id,
                        &customer.name,
                        pending_amount,
                    )
                    .await,
                );
            }
        }
    }

    Ok(Json(updated.into()))
}

/// Delete a service record. Blocked while reports or points reference it.
pub async fn delete_service_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    policy::require(user.role, Action::ServiceRecords(RecordAction::Delete))?;

    let record = entity::service_records::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    let dependent_reports = reports::Entity::find()
        .filter(reports::Column::ServiceRecordId.eq(id))
        .count(&state.db)
        .await?;
    let dependent_points = points::Entity::find()
        .filter(points::Column::ServiceRecordId.eq(id))
        .count(&state.db)
        .await?;

    if dependent_reports > 0 || dependent_points > 0 {
        return Err(AppError::invalid_state(
            "Service record has reports or points and cannot be deleted",
        ));
    }

    entity::service_records::Entity::delete_by_id(record.id).exec(&state.db).await?;

    info!(service_record_id = %id, "service record deleted");

    Ok(Json(json!({ "message": "Service record deleted" })))
}

/// Records whose warranty expires within the look-ahead window.
pub async fn warranty_expiring_handler(
    State(state): State<AppState>,
    Query(query): Query<WarrantyExpiringQuery>,
) -> Result<Json<Vec<ServiceRecordResponse>>> {
    let now = Utc::now();
    let cutoff = now + Duration::days(query.days());

    let rows = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::WarrantyExpiresAt.gt(now))
        .filter(entity::service_records::Column::WarrantyExpiresAt.lte(cutoff))
        .order_by_asc(entity::service_records::Column::WarrantyExpiresAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Summary of records carrying a pending amount.
pub async fn pending_summary_handler(State(state): State<AppState>) -> Result<Json<PendingSummaryResponse>> {
    let rows = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::PendingAmount.gt(0.0))
        .order_by_desc(entity::service_records::Column::PendingAmount)
        .all(&state.db)
        .await?;

    let total_pending: f64 = rows.iter().map(|r| r.pending_amount).sum();
    let count = rows.len() as u64;

    Ok(Json(PendingSummaryResponse {
        total_pending,
        count,
        records: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Aggregate service statistics.
pub async fn service_statistics_handler(
    State(state): State<AppState>,
) -> Result<Json<ServiceStatisticsResponse>> {
    let db = &state.db;
    let now = Utc::now();

    let total = entity::service_records::Entity::find().count(db).await?;
    let active = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::Status.eq(ServiceStatus::Active))
        .count(db)
        .await?;
    let completed = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::Status.eq(ServiceStatus::Completed))
        .count(db)
        .await?;
    let cancelled = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::Status.eq(ServiceStatus::Cancelled))
        .count(db)
        .await?;
    let expiring_soon = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::WarrantyExpiresAt.gt(now))
        .filter(entity::service_records::Column::WarrantyExpiresAt.lte(now + Duration::days(30)))
        .count(db)
        .await?;

    let pending_rows = entity::service_records::Entity::find()
        .filter(entity::service_records::Column::PendingAmount.gt(0.0))
        .all(db)
        .await?;
    let total_pending_amount: f64 = pending_rows.iter().map(|r| r.pending_amount).sum();

    Ok(Json(ServiceStatisticsResponse {
        total,
        active,
        completed,
        cancelled,
        expiring_soon,
        total_pending_amount,
    }))
}
