//! # Machine Handlers
//!
//! Machine catalogue CRUD. Serial numbers are unique per brand; a machine
//! with service records cannot be deleted.

use auth::{policy, Action, MachineAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::Utc;
use entity::{machines, service_records};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    FromQueryResult,
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
        machines::{
            CreateMachineRequest,
            GroupCount,
            MachineListQuery,
            MachineListResponse,
            MachineResponse,
            UpdateMachineRequest,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

#[derive(FromQueryResult)]
struct GroupRow {
    value: String,
    count: i64,
}

async fn serial_taken(
    db: &sea_orm::DbConn,
    brand: &str,
    serial: &str,
    exclude: Option<Uuid>,
) -> Result<bool> {
    let mut select = machines::Entity::find()
        .filter(machines::Column::Brand.eq(brand))
        .filter(machines::Column::SerialNumber.eq(serial));
    if let Some(id) = exclude {
        select = select.filter(machines::Column::Id.ne(id));
    }
    Ok(select.count(db).await? > 0)
}

/// Create a machine.
pub async fn create_machine_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateMachineRequest>,
) -> Result<(StatusCode, Json<MachineResponse>)> {
    policy::require(user.role, Action::Machines(MachineAction::Create))?;
    req.validate()?;

    if let Some(serial) = &req.serial_number {
        if serial_taken(&state.db, &req.brand, serial, None).await? {
            return Err(AppError::conflict(
                "A machine with this serial number already exists for this brand",
            ));
        }
    }

    let now = Utc::now();
    let created = machines::ActiveModel {
        id:                      Set(Uuid::new_v4()),
        name:                    Set(req.name),
        category:                Set(req.category),
        brand:                   Set(req.brand),
        warranty_time_in_months: Set(req.warranty_time_in_months),
        serial_number:           Set(req.serial_number),
        created_at:              Set(now),
        updated_at:              Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(machine_id = %created.id, brand = %created.brand, "machine created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List machines with category/brand/search filters.
pub async fn list_machines_handler(
    State(state): State<AppState>,
    Query(query): Query<MachineListQuery>,
) -> Result<Json<MachineListResponse>> {
    let mut select = machines::Entity::find();

    if let Some(category) = &query.category {
        select = select.filter(machines::Column::Category.eq(category.as_str()));
    }
    if let Some(brand) = &query.brand {
        select = select.filter(machines::Column::Brand.eq(brand.as_str()));
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        select = select.filter(
            Condition::any()
                .add(machines::Column::Name.like(pattern.clone()))
                .add(machines::Column::SerialNumber.like(pattern)),
        );
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_asc(machines::Column::Name)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(MachineListResponse {
        machines:   rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Fetch a machine by id.
pub async fn get_machine_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MachineResponse>> {
    let machine = machines::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Machine not found"))?;

    Ok(Json(machine.into()))
}

/// Find machines whose serial number contains the given fragment.
pub async fn get_by_serial_handler(
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> Result<Json<Vec<MachineResponse>>> {
    let rows = machines::Entity::find()
        .filter(machines::Column::SerialNumber.like(format!("%{}%", serial)))
        .order_by_asc(machines::Column::SerialNumber)
        .limit(50)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Update a machine.
pub async fn update_machine_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMachineRequest>,
) -> Result<Json<MachineResponse>> {
    policy::require(user.role, Action::Machines(MachineAction::Update))?;
    req.validate()?;

    let machine = machines::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Machine not found"))?;

    let brand = req.brand.clone().unwrap_or_else(|| machine.brand.clone());
    let serial = req.serial_number.clone().or_else(|| machine.serial_number.clone());
    if let Some(serial) = &serial {
        if serial_taken(&state.db, &brand, serial, Some(id)).await? {
            return Err(AppError::conflict(
                "A machine with this serial number already exists for this brand",
            ));
        }
    }

    let mut active: machines::ActiveModel = machine.into();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(category) = req.category {
        active.category = Set(category);
    }
    if let Some(brand) = req.brand {
        active.brand = Set(brand);
    }
    if let Some(months) = req.warranty_time_in_months {
        active.warranty_time_in_months = Set(months);
    }
    if let Some(serial_number) = req.serial_number {
        active.serial_number = Set(Some(serial_number));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(machine_id = %updated.id, "machine updated");

    Ok(Json(updated.into()))
}

/// Delete a machine. Blocked while service records reference it.
pub async fn delete_machine_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    policy::require(user.role, Action::Machines(MachineAction::Delete))?;

    let machine = machines::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Machine not found"))?;

    let in_use = service_records::Entity::find()
        .filter(service_records::Column::MachineId.eq(id))
        .count(&state.db)
        .await?;
    if in_use > 0 {
        return Err(AppError::invalid_state(
            "Machine has service records and cannot be deleted",
        ));
    }

    machines::Entity::delete_by_id(machine.id).exec(&state.db).await?;

    info!(machine_id = %id, "machine deleted");

    Ok(Json(json!({ "message": "Machine deleted" })))
}

/// Machine counts per category.
pub async fn list_categories_handler(State(state): State<AppState>) -> Result<Json<Vec<GroupCount>>> {
    let rows = machines::Entity::find()
        .select_only()
        .column_as(machines::Column::Category, "value")
        .column_as(machines::Column::Id.count(), "count")
        .group_by(machines::Column::Category)
        .into_model::<GroupRow>()
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| {
                GroupCount {
                    value: row.value,
                    count: row.count.max(0) as u64,
                }
            })
            .collect(),
    ))
}

/// Machine counts per brand.
pub async fn list_brands_handler(State(state): State<AppState>) -> Result<Json<Vec<GroupCount>>> {
    let rows = machines::Entity::find()
        .select_only()
        .column_as(machines::Column::Brand, "value")
        .column_as(machines::Column::Id.count(), "count")
        .group_by(machines::Column::Brand)
        .into_model::<GroupRow>()
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| {
                GroupCount {
                    value: row.value,
                    count: row.count.max(0) as u64,
                }
            })
            .collect(),
    ))
}
