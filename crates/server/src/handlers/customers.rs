//! # Customer Handlers
//!
//! Customer CRUD plus the cascade delete: removing a customer removes its
//! service records and everything hanging off them, in one transaction, in
//! dependency order (points, reports, notifications, records, customer).

use auth::{policy, Action, CustomerAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::Utc;
use entity::{customers, machines, notifications, points, reports, service_records};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    ModelTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        customers::{
            CascadeDeleteResponse,
            CreateCustomerRequest,
            CustomerDetailResponse,
            CustomerListQuery,
            CustomerListResponse,
            CustomerResponse,
            QuickSearchQuery,
            QuickSearchResponse,
            UpdateCustomerRequest,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Create a customer.
pub async fn create_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    policy::require(user.role, Action::Customers(CustomerAction::Create))?;
    req.validate()?;

    let id = Uuid::new_v4();
    let now = Utc::now();
    let created = customers::ActiveModel {
        id:         Set(id),
        uid:        Set(customers::make_uid(id)),
        name:       Set(req.name),
        phone:      Set(req.phone),
        email:      Set(req.email),
        address:    Set(req.address),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(customer_id = %created.id, uid = %created.uid, "customer created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List/search customers.
pub async fn list_customers_handler(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<CustomerListResponse>> {
    let mut select = customers::Entity::find();

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        select = select.filter(
            Condition::any()
                .add(customers::Column::Name.like(pattern.clone()))
                .add(customers::Column::Uid.like(pattern.clone()))
                .add(customers::Column::Phone.like(pattern.clone()))
                .add(customers::Column::Email.like(pattern)),
        );
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_asc(customers::Column::Name)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(CustomerListResponse {
        customers:  rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Quick search for pickers: at most 10 customers, matched on name, uid,
/// phone, email, or the serial number of an installed machine.
pub async fn quick_search_handler(
    State(state): State<AppState>,
    Query(query): Query<QuickSearchQuery>,
) -> Result<Json<QuickSearchResponse>> {
    let fragment = query.q.trim();
    if fragment.is_empty() {
        return Ok(Json(QuickSearchResponse {
            customers: Vec::new(),
        }));
    }
    let pattern = format!("%{}%", fragment);

    // Customers reachable via a machine serial match.
    let machine_ids: Vec<Uuid> = machines::Entity::find()
        .filter(machines::Column::SerialNumber.like(pattern.clone()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let customer_ids_via_serial: Vec<Uuid> = if machine_ids.is_empty() {
        Vec::new()
    }
    else {
        service_records::Entity::find()
            .filter(service_records::Column::MachineId.is_in(machine_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|r| r.customer_id)
            .collect()
    };

    let mut condition = Condition::any()
        .add(customers::Column::Name.like(pattern.clone()))
        .add(customers::Column::Uid.like(pattern.clone()))
        .add(customers::Column::Phone.like(pattern.clone()))
        .add(customers::Column::Email.like(pattern));
    if !customer_ids_via_serial.is_empty() {
        condition = condition.add(customers::Column::Id.is_in(customer_ids_via_serial));
    }

    let rows = customers::Entity::find()
        .filter(condition)
        .order_by_asc(customers::Column::Name)
        .limit(10)
        .all(&state.db)
        .await?;

    Ok(Json(QuickSearchResponse {
        customers: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a customer with its service records.
pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDetailResponse>> {
    let customer = customers::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let records = customer
        .find_related(service_records::Entity)
        .order_by_desc(service_records::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(CustomerDetailResponse {
        customer:        customer.into(),
        service_records: records.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a customer by its human-readable code.
pub async fn get_customer_by_uid_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<CustomerDetailResponse>> {
    let customer = customers::Entity::find()
        .filter(customers::Column::Uid.eq(uid.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let records = customer
        .find_related(service_records::Entity)
        .order_by_desc(service_records::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(CustomerDetailResponse {
        customer:        customer.into(),
        service_records: records.into_iter().map(Into::into).collect(),
    }))
}

/// Update a customer.
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    policy::require(user.role, Action::Customers(CustomerAction::Update))?;
    req.validate()?;

    let customer = customers::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let mut active: customers::ActiveModel = customer.into();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(phone);
    }
    if let Some(email) = req.email {
        active.email = Set(Some(email));
    }
    if let Some(address) = req.address {
        active.address = Set(Some(address));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(customer_id = %updated.id, "customer updated");

    Ok(Json(updated.into()))
}

/// Cascade-delete a customer.
///
/// Single transaction, fixed order: points, reports, notifications that
/// reference the customer's service records, then the records, then the
/// customer. Either everything is removed or nothing is.
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CascadeDeleteResponse>> {
    policy::require(user.role, Action::Customers(CustomerAction::Delete))?;

    let customer = customers::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let txn = state.db.begin().await?;

    let record_ids: Vec<Uuid> = service_records::Entity::find()
        .filter(service_records::Column::CustomerId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    let deleted_points = points::Entity::delete_many()
        .filter(points::Column::ServiceRecordId.is_in(record_ids.clone()))
        .exec(&txn)
        .await?
        .rows_affected;

    let deleted_reports = reports::Entity::delete_many()
        .filter(reports::Column::ServiceRecordId.is_in(record_ids.clone()))
        .exec(&txn)
        .await?
        .rows_affected;

    let deleted_notifications = notifications::Entity::delete_many()
        .filter(notifications::Column::ServiceRecordId.is_in(record_ids.clone()))
        .exec(&txn)
        .await?
        .rows_affected;

    let deleted_service_records = service_records::Entity::delete_many()
        .filter(service_records::Column::Id.is_in(record_ids))
        .exec(&txn)
        .await?
        .rows_affected;

    customers::Entity::delete_by_id(customer.id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        customer_id = %id,
        deleted_points,
        deleted_reports,
        deleted_notifications,
        deleted_service_records,
        "customer cascade-deleted"
    );

    Ok(Json(CascadeDeleteResponse {
        deleted_points,
        deleted_reports,
        deleted_notifications,
        deleted_service_records,
    }))
}
