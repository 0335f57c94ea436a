//! # API Router
//!
//! Route configuration. `/health` and login are public; everything else
//! goes through the bearer authentication middleware.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth::auth_middleware, AppState};

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::users::list_users_handler).post(handlers::users::create_user_handler))
        .route("/logout", post(handlers::users::logout_handler))
        .route("/me", get(handlers::users::me_handler))
        .route("/change-password", put(handlers::users::change_password_handler))
        .route("/push-token", put(handlers::users::update_push_token_handler))
        .route("/dashboard", get(handlers::users::dashboard_handler))
        .route(
            "/:id",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers_handler).post(handlers::customers::create_customer_handler),
        )
        .route("/search", get(handlers::customers::quick_search_handler))
        .route("/uid/:uid", get(handlers::customers::get_customer_by_uid_handler))
        .route(
            "/:id",
            get(handlers::customers::get_customer_handler)
                .put(handlers::customers::update_customer_handler)
                .delete(handlers::customers::delete_customer_handler),
        )
}

fn machine_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::machines::list_machines_handler).post(handlers::machines::create_machine_handler),
        )
        .route("/categories", get(handlers::machines::list_categories_handler))
        .route("/brands", get(handlers::machines::list_brands_handler))
        .route("/serial/:serial", get(handlers::machines::get_by_serial_handler))
        .route(
            "/:id",
            get(handlers::machines::get_machine_handler)
                .put(handlers::machines::update_machine_handler)
                .delete(handlers::machines::delete_machine_handler),
        )
}

fn service_record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::service_records::list_service_records_handler)
                .post(handlers::service_records::create_service_record_handler),
        )
        .route(
            "/warranty-expiring",
            get(handlers::service_records::warranty_expiring_handler),
        )
        .route("/pending-summary", get(handlers::service_records::pending_summary_handler))
        .route("/statistics", get(handlers::service_records::service_statistics_handler))
        .route(
            "/:id",
            get(handlers::service_records::get_service_record_handler)
                .put(handlers::service_records::update_service_record_handler)
                .delete(handlers::service_records::delete_service_record_handler),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::reports::list_reports_handler).post(handlers::reports::create_report_handler),
        )
        .route("/service-record/:id", get(handlers::reports::reports_by_record_handler))
        .route("/engineer/:id", get(handlers::reports::reports_by_engineer_handler))
        .route(
            "/:id",
            get(handlers::reports::get_report_handler)
                .put(handlers::reports::update_report_handler)
                .delete(handlers::reports::delete_report_handler),
        )
}

fn point_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::points::list_points_handler).post(handlers::points::create_point_handler),
        )
        .route("/my", get(handlers::points::my_points_handler))
        .route("/statistics", get(handlers::points::point_statistics_handler))
        .route("/service-record/:id", get(handlers::points::points_by_record_handler))
        .route(
            "/service-record/:id/check-escalation",
            post(handlers::points::check_escalation_handler),
        )
        .route(
            "/:id",
            get(handlers::points::get_point_handler)
                .put(handlers::points::update_point_handler)
                .delete(handlers::points::delete_point_handler),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::notifications::list_notifications_handler))
        .route("/unread-count", get(handlers::notifications::unread_count_handler))
        .route("/read-all", put(handlers::notifications::mark_all_read_handler))
        .route("/clear", delete(handlers::notifications::clear_all_handler))
        .route("/send", post(handlers::notifications::send_notification_handler))
        .route("/purge", delete(handlers::notifications::purge_notifications_handler))
        .route("/statistics", get(handlers::notifications::notification_statistics_handler))
        .route("/:id/read", put(handlers::notifications::mark_read_handler))
        .route(
            "/:id",
            get(handlers::notifications::get_notification_handler)
                .delete(handlers::notifications::delete_notification_handler),
        )
}

fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::quotations::list_quotations_handler).post(handlers::quotations::create_quotation_handler),
        )
        .route("/statistics", get(handlers::quotations::quotation_statistics_handler))
        .route("/status/:status", get(handlers::quotations::quotations_by_status_handler))
        .route("/:id/approve", post(handlers::quotations::approve_quotation_handler))
        .route("/:id/reject", post(handlers::quotations::reject_quotation_handler))
        .route(
            "/:id",
            get(handlers::quotations::get_quotation_handler)
                .put(handlers::quotations::update_quotation_handler)
                .delete(handlers::quotations::delete_quotation_handler),
        )
}

/// Build the application router.
pub fn create_app_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/customers", customer_routes())
        .nest("/api/machines", machine_routes())
        .nest("/api/service-records", service_record_routes())
        .nest("/api/reports", report_routes())
        .nest("/api/points", point_routes())
        .nest("/api/notifications", notification_routes())
        .nest("/api/spares-quotations", quotation_routes())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/users/login", post(handlers::users::login_handler))
        .merge(protected)
        .with_state(state)
}
