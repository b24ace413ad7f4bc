// src/handlers/sites.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        query::Pagination,
        site::{NewSite, Site},
    },
};

// GET /api/cedis
#[utoipa::path(
    get,
    path = "/api/cedis",
    tag = "CEDIS",
    params(Pagination),
    responses(
        (status = 200, description = "CEDIS visíveis para o usuário", body = Vec<Site>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_sites(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let sites = app_state
        .site_service
        .list_sites(&user.identity(), page)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sites)))
}

// POST /api/cedis
#[utoipa::path(
    post,
    path = "/api/cedis",
    tag = "CEDIS",
    request_body = NewSite,
    responses(
        (status = 201, description = "CEDIS criado", body = Site),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas Administrador ou Supervisor"),
        (status = 409, description = "Código já existe")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_site(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<NewSite>,
) -> Result<impl IntoResponse, ApiError> {
    let site = app_state
        .site_service
        .create_site(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(site)))
}

// GET /api/cedis/{site_id}
#[utoipa::path(
    get,
    path = "/api/cedis/{site_id}",
    tag = "CEDIS",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "CEDIS", body = Site),
        (status = 403, description = "Fora do escopo do usuário"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_site(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let site = app_state
        .site_service
        .get_site(&user.identity(), site_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(site)))
}

// GET /api/cedis/states
#[utoipa::path(
    get,
    path = "/api/cedis/states",
    tag = "CEDIS",
    responses(
        (status = 200, description = "Catálogo de estados", body = Vec<crate::models::site::State>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_states(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let states = app_state
        .site_service
        .list_states()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(states)))
}
