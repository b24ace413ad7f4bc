// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

async fn banner() -> Json<Value> {
    Json(json!({
        "message": "API de Seguridad CEDIS",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui",
    }))
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let session_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/logout", post(handlers::auth::logout));

    let site_routes = Router::new()
        .route(
            "/",
            get(handlers::sites::list_sites).post(handlers::sites::create_site),
        )
        .route("/states", get(handlers::sites::list_states))
        .route("/{site_id}", get(handlers::sites::get_site));

    let event_routes = Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/stats", get(handlers::events::event_stats));

    let expense_routes = Router::new()
        .route(
            "/",
            get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
        )
        .route("/stats", get(handlers::expenses::expense_stats))
        .route("/categorias", get(handlers::expenses::list_categories));

    let civil_protection_routes = Router::new()
        .route(
            "/extintores",
            get(handlers::civil_protection::list_extinguishers)
                .post(handlers::civil_protection::upsert_extinguisher),
        )
        .route(
            "/extintores/{site_id}",
            get(handlers::civil_protection::get_extinguisher),
        )
        .route(
            "/pipc",
            get(handlers::civil_protection::list_plans)
                .post(handlers::civil_protection::upsert_plan),
        )
        .route("/pipc/{site_id}", get(handlers::civil_protection::get_plan))
        .route(
            "/dictamenes",
            post(handlers::civil_protection::upsert_certificate),
        )
        .route(
            "/dictamenes/{site_id}",
            get(handlers::civil_protection::certificates_for_site),
        )
        .route(
            "/compliance",
            get(handlers::civil_protection::fleet_compliance),
        )
        .route(
            "/compliance/{site_id}",
            get(handlers::civil_protection::site_compliance),
        );

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .route("/mapa", get(handlers::dashboard::get_map))
        .route("/tendencias", get(handlers::dashboard::get_trends))
        .route(
            "/resumen-cedis/{site_id}",
            get(handlers::dashboard::get_site_summary),
        );

    // Tudo abaixo exige Bearer válido
    let protected_routes = Router::new()
        .nest("/api/auth", session_routes)
        .nest("/api/cedis", site_routes)
        .nest("/api/eventos", event_routes)
        .nest("/api/gastos", expense_routes)
        .nest("/api/proteccion-civil", civil_protection_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
