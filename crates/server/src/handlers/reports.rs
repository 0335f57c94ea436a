//! # Report Handlers
//!
//! Field-service report CRUD. Submitting a report notifies the management
//! and commercial roles; the owning engineer may edit their own report
//! without the manager-level gate.

use auth::{policy, Action, ReportAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::Utc;
use entity::{customers, machines, reports, service_records};
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
        reports::{
            CreateReportRequest,
            ReportListQuery,
            ReportListResponse,
            ReportResponse,
            UpdateReportRequest,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    notify::dispatcher,
    AppState,
};

/// Create a report against a service record.
pub async fn create_report_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    policy::require(user.role, Action::Reports(ReportAction::Create))?;
    req.validate()?;

    let record = service_records::Entity::find_by_id(req.service_record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    let now = Utc::now();
    let created = reports::ActiveModel {
        id:                Set(Uuid::new_v4()),
        service_record_id: Set(record.id),
        engineer_id:       Set(user.id),
        report_data:       Set(req.report_data),
        scan_data:         Set(req.scan_data.unwrap_or_else(|| json!({}))),
        manual_url:        Set(req.manual_url),
        e_drawings_url:    Set(req.e_drawings_url),
        created_at:        Set(now),
        updated_at:        Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(report_id = %created.id, service_record_id = %record.id, "report created");

    // Best-effort notification after the persisted insert.
    let customer = customers::Entity::find_by_id(record.customer_id).one(&state.db).await?;
    let machine = machines::Entity::find_by_id(record.machine_id).one(&state.db).await?;
    if let (Some(customer), Some(machine)) = (customer, machine) {
        ok_or_log(
            dispatcher::notify_report_submitted(&state.db, &state.push, record.id, &customer.name, &machine.name)
                .await,
        );
    }

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List reports with filters.
pub async fn list_reports_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ReportListResponse>> {
    let mut select = reports::Entity::find();

    if let Some(service_record_id) = query.service_record_id {
        select = select.filter(reports::Column::ServiceRecordId.eq(service_record_id));
    }
    if let Some(engineer_id) = query.engineer_id {
        select = select.filter(reports::Column::EngineerId.eq(engineer_id));
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(reports::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(ReportListResponse {
        reports:    rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Fetch a report by id.
pub async fn get_report_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>> {
    let report = reports::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    Ok(Json(report.into()))
}

/// Update a report. Privileged roles or the owning engineer.
pub async fn update_report_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReportRequest>,
) -> Result<Json<ReportResponse>> {
    req.validate()?;

    let report = reports::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    if !policy::allows(user.role, Action::Reports(ReportAction::Update)) && report.engineer_id != user.id {
        return Err(AppError::forbidden("You may only update your own reports"));
    }

    let mut active: reports::ActiveModel = report.into();
    if let Some(report_data) = req.report_data {
        active.report_data = Set(report_data);
    }
    if let Some(scan_data) = req.scan_data {
        active.scan_data = Set(scan_data);
    }
    if let Some(manual_url) = req.manual_url {
        active.manual_url = Set(Some(manual_url));
    }
    if let Some(e_drawings_url) = req.e_drawings_url {
        active.e_drawings_url = Set(Some(e_drawings_url));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(report_id = %updated.id, "report updated");

    Ok(Json(updated.into()))
}

/// Delete a report. Privileged roles or the owning engineer.
pub async fn delete_report_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let report = reports::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    if !policy::allows(user.role, Action::Reports(ReportAction::Delete)) && report.engineer_id != user.id {
        return Err(AppError::forbidden("You may only delete your own reports"));
    }

    reports::Entity::delete_by_id(report.id).exec(&state.db).await?;

    info!(report_id = %id, "report deleted");

    Ok(Json(json!({ "message": "Report deleted" })))
}

/// All reports for one service record, newest first.
pub async fn reports_by_record_handler(
    State(state): State<AppState>,
    Path(service_record_id): Path<Uuid>,
) -> Result<Json<Vec<ReportResponse>>> {
    let rows = reports::Entity::find()
        .filter(reports::Column::ServiceRecordId.eq(service_record_id))
        .order_by_desc(reports::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// All reports submitted by one engineer, newest first.
pub async fn reports_by_engineer_handler(
    State(state): State<AppState>,
    Path(engineer_id): Path<Uuid>,
) -> Result<Json<Vec<ReportResponse>>> {
    let rows = reports::Entity::find()
        .filter(reports::Column::EngineerId.eq(engineer_id))
        .order_by_desc(reports::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
