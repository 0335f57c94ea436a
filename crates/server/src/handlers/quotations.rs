//! # Spares Quotation Handlers
//!
//! Standalone spare-part quotations with a PENDING → APPROVED/REJECTED →
//! COMPLETED flow. `part_details` must be structured data; everything else
//! about the line items is opaque to the backend.

use auth::{policy, Action, QuotationAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::Utc;
use entity::spares_quotations::{self, QuotationStatus};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
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
        quotations::{
            CreateQuotationRequest,
            QuotationListQuery,
            QuotationListResponse,
            QuotationResponse,
            QuotationStatisticsResponse,
            ReviewQuotationRequest,
            UpdateQuotationRequest,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

fn parse_status(value: &str) -> Result<QuotationStatus> {
    QuotationStatus::from_string(value).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid status '{}', expected one of: {}",
            value,
            QuotationStatus::VALID_VALUES.join(", ")
        ))
    })
}

fn require_structured(part_details: &serde_json::Value) -> Result<()> {
    if part_details.is_object() || part_details.is_array() {
        Ok(())
    }
    else {
        Err(AppError::validation("part_details must be a JSON object or array"))
    }
}

/// Create a quotation.
pub async fn create_quotation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationResponse>)> {
    policy::require(user.role, Action::Quotations(QuotationAction::Create))?;
    req.validate()?;
    require_structured(&req.part_details)?;

    let now = Utc::now();
    let created = spares_quotations::ActiveModel {
        id:               Set(Uuid::new_v4()),
        customer_name:    Set(req.customer_name),
        machine_info:     Set(req.machine_info),
        part_details:     Set(req.part_details),
        quotation_amount: Set(req.quotation_amount),
        status:           Set(QuotationStatus::Pending),
        notes:            Set(req.notes),
        created_at:       Set(now),
        updated_at:       Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(quotation_id = %created.id, "quotation created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List quotations with status/search filters.
pub async fn list_quotations_handler(
    State(state): State<AppState>,
    Query(query): Query<QuotationListQuery>,
) -> Result<Json<QuotationListResponse>> {
    let mut select = spares_quotations::Entity::find();

    if let Some(status) = &query.status {
        select = select.filter(spares_quotations::Column::Status.eq(parse_status(status)?));
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        select = select.filter(
            Condition::any()
                .add(spares_quotations::Column::CustomerName.like(pattern.clone()))
                .add(spares_quotations::Column::MachineInfo.like(pattern)),
        );
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(spares_quotations::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(QuotationListResponse {
        quotations: rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// All quotations in one status, newest first.
pub async fn quotations_by_status_handler(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<QuotationResponse>>> {
    let status = parse_status(&status)?;

    let rows = spares_quotations::Entity::find()
        .filter(spares_quotations::Column::Status.eq(status))
        .order_by_desc(spares_quotations::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Fetch a quotation by id.
pub async fn get_quotation_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotationResponse>> {
    let quotation = spares_quotations::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Quotation not found"))?;

    Ok(Json(quotation.into()))
}

/// Update a quotation.
pub async fn update_quotation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuotationRequest>,
) -> Result<Json<QuotationResponse>> {
    policy::require(user.role, Action::Quotations(QuotationAction::Update))?;
    req.validate()?;

    let status = match &req.status {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    if let Some(part_details) = &req.part_details {
        require_structured(part_details)?;
    }

    let quotation = spares_quotations::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Quotation not found"))?;

    let mut active: spares_quotations::ActiveModel = quotation.into();
    if let Some(customer_name) = req.customer_name {
        active.customer_name = Set(customer_name);
    }
    if let Some(machine_info) = req.machine_info {
        active.machine_info = Set(machine_info);
    }
    if let Some(part_details) = req.part_details {
        active.part_details = Set(part_details);
    }
    if let Some(quotation_amount) = req.quotation_amount {
        active.quotation_amount = Set(Some(quotation_amount));
    }
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(notes) = req.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(quotation_id = %updated.id, "quotation updated");

    Ok(Json(updated.into()))
}

async fn review_quotation(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
    req: ReviewQuotationRequest,
    status: QuotationStatus,
) -> Result<Json<QuotationResponse>> {
    policy::require(user.role, Action::Quotations(QuotationAction::Review))?;
    req.validate()?;

    let quotation = spares_quotations::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Quotation not found"))?;

    let mut active: spares_quotations::ActiveModel = quotation.into();
    if let Some(quotation_amount) = req.quotation_amount {
        active.quotation_amount = Set(Some(quotation_amount));
    }
    if let Some(notes) = req.notes {
        active.notes = Set(Some(notes));
    }
    active.status = Set(status.clone());
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(quotation_id = %updated.id, reviewer = %user.id, status = %status, "quotation reviewed");

    Ok(Json(updated.into()))
}

/// Approve a quotation, stamping the final amount and notes.
pub async fn approve_quotation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewQuotationRequest>,
) -> Result<Json<QuotationResponse>> {
    review_quotation(&state, &user, id, req, QuotationStatus::Approved).await
}

/// Reject a quotation.
pub async fn reject_quotation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewQuotationRequest>,
) -> Result<Json<QuotationResponse>> {
    review_quotation(&state, &user, id, req, QuotationStatus::Rejected).await
}

/// Delete a quotation.
pub async fn delete_quotation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    policy::require(user.role, Action::Quotations(QuotationAction::Delete))?;

    let quotation = spares_quotations::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Quotation not found"))?;

    spares_quotations::Entity::delete_by_id(quotation.id).exec(&state.db).await?;

    info!(quotation_id = %id, "quotation deleted");

    Ok(Json(json!({ "message": "Quotation deleted" })))
}

/// Quotation statistics.
pub async fn quotation_statistics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<QuotationStatisticsResponse>> {
    policy::require(user.role, Action::Quotations(QuotationAction::Stats))?;

    let db = &state.db;
    let count_for = |status: QuotationStatus| {
        spares_quotations::Entity::find()
            .filter(spares_quotations::Column::Status.eq(status))
            .count(db)
    };

    let total = spares_quotations::Entity::find().count(db).await?;
    let pending = count_for(QuotationStatus::Pending).await?;
    let approved = count_for(QuotationStatus::Approved).await?;
    let rejected = count_for(QuotationStatus::Rejected).await?;
    let completed = count_for(QuotationStatus::Completed).await?;

    let approved_rows = spares_quotations::Entity::find()
        .filter(spares_quotations::Column::Status.eq(QuotationStatus::Approved))
        .all(db)
        .await?;
    let total_approved_amount: f64 = approved_rows.iter().filter_map(|q| q.quotation_amount).sum();

    Ok(Json(QuotationStatisticsResponse {
        total,
        pending,
        approved,
        rejected,
        completed,
        total_approved_amount,
    }))
}
