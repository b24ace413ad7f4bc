// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        dashboard::{FleetKpi, SiteSummary, TrendSeries},
        site::SiteMapEntry,
    },
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores da frota visível", body = FleetKpi),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let kpi = app_state
        .dashboard_service
        .fleet_kpi(&user.identity(), today)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(kpi)))
}

// GET /api/dashboard/mapa
#[utoipa::path(
    get,
    path = "/api/dashboard/mapa",
    tag = "Dashboard",
    responses(
        (status = 200, description = "CEDIS com coordenadas e score de 0 a 100", body = Vec<SiteMapEntry>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_map(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let entries = app_state
        .dashboard_service
        .map_snapshot(&user.identity(), today)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/dashboard/tendencias
#[utoipa::path(
    get,
    path = "/api/dashboard/tendencias",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Séries mensais dos últimos 180 dias", body = TrendSeries)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_trends(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let now = Local::now().naive_local();
    let trends = app_state
        .dashboard_service
        .trends(&user.identity(), now)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trends)))
}

// GET /api/dashboard/resumen-cedis/{site_id}
#[utoipa::path(
    get,
    path = "/api/dashboard/resumen-cedis/{site_id}",
    tag = "Dashboard",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "Resumo do CEDIS", body = SiteSummary),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_site_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let summary = app_state
        .dashboard_service
        .site_summary(&user.identity(), site_id, today)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}
