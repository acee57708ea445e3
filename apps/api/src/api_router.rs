use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use orgportal_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let admin_routes = Router::new()
        .route(
            "/api/organizations",
            get(handlers::organizations::list_organizations_handler)
                .post(handlers::organizations::create_organization_handler),
        )
        .route(
            "/api/organizations/{organization_id}",
            get(handlers::organizations::get_organization_handler)
                .put(handlers::organizations::update_organization_handler),
        )
        .route(
            "/api/configurations",
            get(handlers::configurations::list_configurations_handler)
                .post(handlers::configurations::create_configuration_handler),
        )
        .route(
            "/api/configurations/defaults",
            get(handlers::configurations::configuration_defaults_handler),
        )
        .route(
            "/api/configurations/{configuration_id}",
            get(handlers::configurations::get_configuration_handler)
                .put(handlers::configurations::update_configuration_handler),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/assignable-roles",
            get(handlers::users::assignable_roles_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(handlers::users::get_user_handler).put(handlers::users::update_user_handler),
        )
        .route_layer(from_fn(middleware::require_admin));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/layout/organization",
            get(handlers::layout::selected_organization_handler)
                .put(handlers::layout::select_organization_handler),
        )
        .route(
            "/api/layout/organizations",
            get(handlers::layout::switchable_organizations_handler),
        )
        .merge(admin_routes)
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}

